//! Shared domain types.
//!
//! The vehicle-rental data model: users, vehicles, bookings and the small
//! enums hanging off them. These types are plain data; the rules that govern
//! them live in [`crate::validator`], [`crate::transitions`] and friends.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::availability::Availability;
use crate::interval::Interval;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id! {
    /// Identifier of a user (owner or client). Minted by the upstream
    /// service, e.g. `u_1`.
    UserId
}

string_id! {
    /// Identifier of a vehicle, e.g. `v_100`.
    VehicleId
}

string_id! {
    /// Identifier of a booking, e.g. `b_1`.
    BookingId
}

impl BookingId {
    /// Mints a fresh booking identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("b_{}", Uuid::new_v4().simple()))
    }
}

/// Role of a user within the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Lists vehicles and decides on booking requests.
    Owner,
    /// Browses vehicles and requests bookings.
    Client,
}

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Marketplace role.
    pub role: Role,
    /// Avatar image URL.
    pub avatar_url: String,
    /// Optional profile bio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Kind of vehicle on offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    /// A car.
    Car,
    /// A bike.
    Bike,
}

/// Whether a vehicle is accepting bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    /// Listed and bookable.
    Active,
    /// Hidden from booking; existing bookings are unaffected.
    Inactive,
}

/// Pickup location of a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Human-readable address.
    pub address: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

/// A vehicle listed for rental.
///
/// Owns its declared [`Availability`]; bookings reference the vehicle by
/// identifier only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Unique identifier.
    pub id: VehicleId,
    /// Identifier of the owning user.
    pub owner_id: UserId,
    /// Listing title.
    pub title: String,
    /// Kind of vehicle.
    pub vehicle_type: VehicleType,
    /// Hourly rental rate.
    pub price_per_hour: Decimal,
    /// Daily rental rate.
    pub price_per_day: Decimal,
    /// Listing image URLs.
    pub image_urls: Vec<String>,
    /// Pickup location.
    pub location: Location,
    /// Owner-declared windows during which the vehicle may be booked.
    pub availability: Availability,
    /// Free-form listing description.
    pub description: String,
    /// Listing status.
    pub status: VehicleStatus,
}

/// How a booking is paid for.
///
/// Cash on pickup is the only method the service currently supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on pickup.
    Cash,
}

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Created by a client; awaiting the owner's decision.
    Requested,
    /// Accepted by the owner.
    Approved,
    /// Declined by the owner. Terminal.
    Rejected,
    /// Withdrawn by the client. Terminal.
    Cancelled,
}

impl BookingStatus {
    /// Returns `true` if no further transition is ever permitted.
    ///
    /// `Approved` is not terminal here: the client may still cancel an
    /// approved booking before it starts.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Cancelled)
    }

    /// Returns `true` if a booking in this state occupies its time slot for
    /// conflict-detection purposes.
    #[inline]
    #[must_use]
    pub const fn holds_slot(self) -> bool {
        matches!(self, Self::Requested | Self::Approved)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Requested => "requested",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// A rental booking.
///
/// References its vehicle and client by identifier; neither side owns the
/// other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier.
    pub id: BookingId,
    /// Vehicle being booked.
    pub vehicle_id: VehicleId,
    /// Client who requested the booking.
    pub client_id: UserId,
    /// Owner of the vehicle at request time.
    pub owner_id: UserId,
    /// Rental period.
    pub interval: Interval,
    /// Price computed at request time.
    pub total_price: Decimal,
    /// Current lifecycle status.
    pub status: BookingStatus,
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Free-form pickup instructions.
    pub pickup_details: String,
    /// When the booking request was created.
    pub requested_at: DateTime<Utc>,
}

impl Booking {
    /// Returns `true` if this booking occupies its time slot for
    /// conflict-detection purposes.
    #[inline]
    #[must_use]
    pub const fn holds_slot(&self) -> bool {
        self.status.holds_slot()
    }
}
