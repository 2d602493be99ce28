//! Vehicle catalog queries and owner dashboard aggregates.
//!
//! Browse-screen filtering expressed as an explicit typed query instead of
//! ad-hoc predicate objects. All criteria are optional and conjunctive: a
//! vehicle matches when every set field accepts it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::interval::Interval;
use crate::types::{Booking, UserId, Vehicle, VehicleStatus, VehicleType};

/// Criteria for filtering the vehicle catalog.
#[derive(Debug, Clone, Default)]
pub struct VehicleQuery {
    /// Restrict to one kind of vehicle.
    pub vehicle_type: Option<VehicleType>,
    /// Restrict to a listing status. Browse screens pass `Active`.
    pub status: Option<VehicleStatus>,
    /// Restrict to vehicles of one owner.
    pub owner: Option<UserId>,
    /// Upper bound on the daily rate.
    pub max_price_per_day: Option<Decimal>,
    /// Keep only vehicles whose availability covers this period.
    pub available_during: Option<Interval>,
    /// Case-insensitive substring match on title and description.
    pub search: Option<String>,
}

impl VehicleQuery {
    /// Returns `true` if `vehicle` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        if self.vehicle_type.is_some_and(|t| vehicle.vehicle_type != t) {
            return false;
        }
        if self.status.is_some_and(|s| vehicle.status != s) {
            return false;
        }
        if self
            .owner
            .as_ref()
            .is_some_and(|owner| vehicle.owner_id != *owner)
        {
            return false;
        }
        if self
            .max_price_per_day
            .is_some_and(|cap| vehicle.price_per_day > cap)
        {
            return false;
        }
        if self
            .available_during
            .as_ref()
            .is_some_and(|period| !vehicle.availability.covers(period))
        {
            return false;
        }
        if let Some(needle) = &self.search {
            let needle = needle.to_lowercase();
            let in_title = vehicle.title.to_lowercase().contains(&needle);
            let in_description = vehicle.description.to_lowercase().contains(&needle);
            if !in_title && !in_description {
                return false;
            }
        }
        true
    }

    /// Applies the query to a list of vehicles, preserving order.
    #[must_use]
    pub fn filter(&self, vehicles: Vec<Vehicle>) -> Vec<Vehicle> {
        vehicles.into_iter().filter(|v| self.matches(v)).collect()
    }
}

/// Aggregates shown on an owner's dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerSummary {
    /// Number of vehicles the owner has listed.
    pub vehicles: usize,
    /// Booking requests awaiting a decision.
    pub requested: usize,
    /// Approved upcoming or past bookings.
    pub approved: usize,
    /// Sum of `total_price` over approved bookings.
    pub projected_earnings: Decimal,
}

/// Computes dashboard aggregates from an owner's vehicles and the bookings
/// referencing them.
#[must_use]
pub fn owner_summary(vehicles: &[Vehicle], bookings: &[Booking]) -> OwnerSummary {
    use crate::types::BookingStatus;

    let mut requested = 0;
    let mut approved = 0;
    let mut projected_earnings = Decimal::ZERO;
    for booking in bookings {
        match booking.status {
            BookingStatus::Requested => requested += 1,
            BookingStatus::Approved => {
                approved += 1;
                projected_earnings += booking.total_price;
            }
            BookingStatus::Rejected | BookingStatus::Cancelled => {}
        }
    }

    OwnerSummary {
        vehicles: vehicles.len(),
        requested,
        approved,
        projected_earnings,
    }
}
