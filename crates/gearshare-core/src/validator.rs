//! Booking admission.
//!
//! [`validate`] is the single authority for deciding whether a new booking
//! request may enter the ledger. The engine calls it inside the vehicle's
//! lock scope, so the checks here see a stable ledger and no partial
//! mutation escapes on failure.

use chrono::{DateTime, Utc};

use crate::config::EngineConfig;
use crate::error::{GearshareError, Result};
use crate::interval::Interval;
use crate::ledger::Ledger;
use crate::pricing;
use crate::types::{Booking, BookingId, BookingStatus, PaymentMethod, UserId, Vehicle, VehicleStatus};

/// A client's request to book a vehicle.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    /// Client placing the request.
    pub client_id: UserId,
    /// Requested rental period.
    pub interval: Interval,
    /// How the client intends to pay.
    pub payment_method: PaymentMethod,
    /// Free-form pickup instructions.
    pub pickup_details: String,
}

/// Decides whether `request` is admissible against `vehicle` and its ledger,
/// and prices it.
///
/// Checks run in a fixed order so callers see the most specific refusal:
/// duration bounds, vehicle status, availability, conflicts. On success the
/// returned [`Booking`] is in `Requested` state but not yet admitted; the
/// caller inserts it via [`Ledger::admit`] while still holding the
/// vehicle's lock scope.
///
/// # Errors
///
/// - [`GearshareError::DurationOutOfBounds`] if the period is shorter or
///   longer than the configured limits
/// - [`GearshareError::VehicleInactive`] if the vehicle is not listed
/// - [`GearshareError::OutOfAvailability`] if no single availability window
///   covers the period
/// - [`GearshareError::SchedulingConflict`] if a slot-holding booking
///   overlaps the period
/// - [`GearshareError::DuplicateBooking`] if the identical request is
///   already pending
pub fn validate(
    config: &EngineConfig,
    vehicle: &Vehicle,
    ledger: &Ledger,
    request: &BookingRequest,
    now: DateTime<Utc>,
) -> Result<Booking> {
    check_duration_bounds(config, &request.interval)?;

    if vehicle.status != VehicleStatus::Active {
        return Err(GearshareError::VehicleInactive(vehicle.id.clone()));
    }

    if !vehicle.availability.covers(&request.interval) {
        return Err(GearshareError::OutOfAvailability);
    }

    // An identical pending tuple would also trip the overlap check; test it
    // first so the caller learns it is a duplicate, not merely a conflict.
    if ledger.has_duplicate(&vehicle.id, &request.interval, &request.client_id) {
        return Err(GearshareError::DuplicateBooking);
    }

    if ledger.has_conflict(&request.interval) {
        return Err(GearshareError::SchedulingConflict);
    }

    let total_price = pricing::quote(
        vehicle.price_per_hour,
        vehicle.price_per_day,
        &request.interval,
    );

    Ok(Booking {
        id: BookingId::generate(),
        vehicle_id: vehicle.id.clone(),
        client_id: request.client_id.clone(),
        owner_id: vehicle.owner_id.clone(),
        interval: request.interval,
        total_price,
        status: BookingStatus::Requested,
        payment_method: request.payment_method,
        pickup_details: request.pickup_details.clone(),
        requested_at: now,
    })
}

fn check_duration_bounds(config: &EngineConfig, interval: &Interval) -> Result<()> {
    let duration = interval.duration();
    if duration < config.min_booking_duration() {
        return Err(GearshareError::DurationOutOfBounds(format!(
            "shorter than the {} minute minimum",
            config.min_booking_minutes
        )));
    }
    if duration > config.max_booking_duration() {
        return Err(GearshareError::DurationOutOfBounds(format!(
            "longer than the {} day maximum",
            config.max_booking_days
        )));
    }
    Ok(())
}
