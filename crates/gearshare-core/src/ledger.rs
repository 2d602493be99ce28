//! The per-vehicle booking ledger.
//!
//! A [`Ledger`] is a view over one vehicle's bookings, built from the
//! storage collaborator inside that vehicle's lock scope. It answers the two
//! questions conflict detection needs: does a requested interval clash with
//! a slot-holding booking, and is a request an exact duplicate of one
//! already pending.

use crate::error::{GearshareError, Result};
use crate::interval::Interval;
use crate::types::{Booking, UserId, VehicleId};

/// All bookings for one vehicle, in no particular order.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    bookings: Vec<Booking>,
}

impl Ledger {
    /// Builds a ledger from a vehicle's stored bookings.
    #[must_use]
    pub fn new(bookings: Vec<Booking>) -> Self {
        Self { bookings }
    }

    /// Returns `true` iff any slot-holding booking (`requested` or
    /// `approved`) overlaps `requested`.
    #[must_use]
    pub fn has_conflict(&self, requested: &Interval) -> bool {
        self.bookings
            .iter()
            .filter(|b| b.holds_slot())
            .any(|b| b.interval.overlaps(requested))
    }

    /// Like [`Ledger::has_conflict`], but ignores the booking with the given
    /// identifier. Used when re-checking a booking against its peers at
    /// approval time.
    #[must_use]
    pub fn has_conflict_excluding(
        &self,
        requested: &Interval,
        excluded: &crate::types::BookingId,
    ) -> bool {
        self.bookings
            .iter()
            .filter(|b| b.holds_slot() && b.id != *excluded)
            .any(|b| b.interval.overlaps(requested))
    }

    /// Returns `true` if a non-terminal booking with the identical
    /// (vehicle, interval, client) tuple already exists.
    #[must_use]
    pub fn has_duplicate(
        &self,
        vehicle_id: &VehicleId,
        interval: &Interval,
        client_id: &UserId,
    ) -> bool {
        self.bookings.iter().any(|b| {
            !b.status.is_terminal()
                && b.vehicle_id == *vehicle_id
                && b.interval == *interval
                && b.client_id == *client_id
        })
    }

    /// Admits a freshly validated booking into the ledger.
    ///
    /// # Errors
    ///
    /// Returns [`GearshareError::DuplicateBooking`] if an identical request
    /// is already pending, or [`GearshareError::SchedulingConflict`] if the
    /// slot was taken between validation and admission.
    pub fn admit(&mut self, booking: Booking) -> Result<()> {
        if self.has_duplicate(&booking.vehicle_id, &booking.interval, &booking.client_id) {
            return Err(GearshareError::DuplicateBooking);
        }
        if self.has_conflict(&booking.interval) {
            return Err(GearshareError::SchedulingConflict);
        }
        self.bookings.push(booking);
        Ok(())
    }

    /// Looks up a booking by identifier.
    #[must_use]
    pub fn get(&self, id: &crate::types::BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == *id)
    }

    /// All bookings in the ledger.
    #[must_use]
    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    /// Returns `true` if any booking still holds its slot.
    #[must_use]
    pub fn has_live_bookings(&self) -> bool {
        self.bookings.iter().any(Booking::holds_slot)
    }
}
