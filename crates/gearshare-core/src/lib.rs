//! # gearshare-core
//!
//! Core booking logic for the gearshare vehicle-rental marketplace.
//!
//! This crate provides:
//! - Availability and booking-conflict resolution over half-open time ranges
//! - Pricing with dual hourly/daily rates (cheapest schedule wins)
//! - The booking state machine (requested, approved, rejected, cancelled)
//! - Per-vehicle serialization of booking mutations with bounded lock waits
//! - Pluggable persistence (in-memory and JSON-file stores included)
//!
//! ## Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`interval`] - Half-open time ranges shared by availability and bookings
//! - [`availability`] - Owner-declared windows and coverage queries
//! - [`ledger`] - Per-vehicle booking set and overlap queries
//! - [`pricing`] - Rental price computation
//! - [`validator`] - The single authority admitting new bookings
//! - [`transitions`] - The booking status state machine
//! - [`engine`] - Facade tying storage, validation and transitions together
//! - [`catalog`] - Typed vehicle queries and owner dashboard aggregates
//! - [`storage`] - The injected persistence collaborator
//! - [`config`] - Engine tunables
//! - [`error`] - Unified error types for the crate
//! - [`types`] - The domain model
//!
//! The engine has no wire format of its own: a request-handling layer calls
//! it with authenticated inputs and maps the typed errors to HTTP responses
//! via [`GearshareError::http_status_code`] and
//! [`GearshareError::error_code`].

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(missing_docs)]

pub mod availability;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod interval;
pub mod ledger;
pub mod pricing;
pub mod storage;
pub mod transitions;
pub mod types;
pub mod validator;

// Re-export primary types for convenience
pub use availability::Availability;
pub use catalog::{owner_summary, OwnerSummary, VehicleQuery};
pub use config::EngineConfig;
pub use engine::BookingEngine;
pub use error::{Error, GearshareError, Result};
pub use interval::Interval;
pub use ledger::Ledger;
pub use pricing::quote;
pub use storage::{default_data_dir, JsonStore, MemoryStore, Store};
pub use types::{
    Booking, BookingId, BookingStatus, Location, PaymentMethod, Role, User, UserId, Vehicle,
    VehicleId, VehicleStatus, VehicleType,
};
pub use validator::{validate, BookingRequest};
