//! The booking state machine.
//!
//! ```text
//!               owner, before start
//!   requested ----------------------> approved
//!       |    \                           |
//!       |     \ owner, before start      | client, before start
//!       |      ---------> rejected       v
//!       | client, before start        cancelled
//!       -----------------> cancelled
//! ```
//!
//! `rejected` and `cancelled` are terminal. `approved` admits exactly one
//! further transition, cancellation by the client, and becomes effectively
//! historical once the rental starts. Every transition requires the
//! booking's start to still be in the future.

use chrono::{DateTime, Utc};

use crate::error::{GearshareError, Result};
use crate::ledger::Ledger;
use crate::types::{Booking, BookingStatus, UserId};

/// Approves a requested booking on behalf of the vehicle's owner.
///
/// Re-checks the ledger before committing: another request may have been
/// approved since this one was made, and approving over it would create the
/// very overlap the validator exists to prevent.
///
/// # Errors
///
/// - [`GearshareError::Forbidden`] if `actor` is not the vehicle's owner
/// - [`GearshareError::InvalidTransition`] unless the booking is `Requested`
/// - [`GearshareError::TooLate`] if the rental has already started
/// - [`GearshareError::SchedulingConflict`] if an overlapping booking was
///   approved in the interim
pub fn approve(
    booking: &Booking,
    ledger: &Ledger,
    actor: &UserId,
    now: DateTime<Utc>,
) -> Result<Booking> {
    owner_decision(booking, actor, now, BookingStatus::Approved)?;

    if ledger.has_conflict_excluding(&booking.interval, &booking.id) {
        return Err(GearshareError::SchedulingConflict);
    }

    Ok(with_status(booking, BookingStatus::Approved))
}

/// Rejects a requested booking on behalf of the vehicle's owner.
///
/// # Errors
///
/// Same actor, state and timing rules as [`approve`], minus the conflict
/// re-check: rejection never creates an overlap.
pub fn reject(booking: &Booking, actor: &UserId, now: DateTime<Utc>) -> Result<Booking> {
    owner_decision(booking, actor, now, BookingStatus::Rejected)?;
    Ok(with_status(booking, BookingStatus::Rejected))
}

/// Cancels a requested or approved booking on behalf of the client.
///
/// # Errors
///
/// - [`GearshareError::Forbidden`] if `actor` is not the booking's client
/// - [`GearshareError::InvalidTransition`] if the booking is already
///   `Rejected` or `Cancelled`
/// - [`GearshareError::TooLate`] if the rental has already started
pub fn cancel(booking: &Booking, actor: &UserId, now: DateTime<Utc>) -> Result<Booking> {
    if *actor != booking.client_id {
        return Err(GearshareError::Forbidden);
    }
    if booking.status.is_terminal() {
        return Err(GearshareError::InvalidTransition {
            from: booking.status,
            to: BookingStatus::Cancelled,
        });
    }
    check_not_started(booking, now)?;
    Ok(with_status(booking, BookingStatus::Cancelled))
}

fn owner_decision(
    booking: &Booking,
    actor: &UserId,
    now: DateTime<Utc>,
    to: BookingStatus,
) -> Result<()> {
    if *actor != booking.owner_id {
        return Err(GearshareError::Forbidden);
    }
    if booking.status != BookingStatus::Requested {
        return Err(GearshareError::InvalidTransition {
            from: booking.status,
            to,
        });
    }
    check_not_started(booking, now)
}

fn check_not_started(booking: &Booking, now: DateTime<Utc>) -> Result<()> {
    if booking.interval.start() <= now {
        return Err(GearshareError::TooLate {
            starts_at: booking.interval.start(),
        });
    }
    Ok(())
}

fn with_status(booking: &Booking, status: BookingStatus) -> Booking {
    let mut updated = booking.clone();
    updated.status = status;
    updated
}
