//! Unified error types for the gearshare core library.
//!
//! Every failure mode in the booking engine is represented by one variant of
//! [`GearshareError`]. All variants are recoverable and user-facing: the core
//! never panics on bad input, it returns a typed [`Result`] that the
//! request-handling collaborator maps to an HTTP response.
//!
//! # Design Principles
//!
//! - **Specific variants**: each variant captures exactly one failure mode
//! - **Contextual**: variants carry the identifiers needed to act on them
//! - **HTTP-ready**: [`GearshareError::http_status_code`] and
//!   [`GearshareError::error_code`] give the calling layer everything it
//!   needs to build a response without inspecting variant internals
//!
//! # Example
//!
//! ```rust
//! use gearshare_core::error::{GearshareError, Result};
//! use gearshare_core::types::VehicleId;
//!
//! fn require_active(active: bool, id: &VehicleId) -> Result<()> {
//!     if !active {
//!         return Err(GearshareError::VehicleInactive(id.clone()));
//!     }
//!     Ok(())
//! }
//! ```

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::{BookingId, BookingStatus, VehicleId};

/// The unified error type for all gearshare operations.
#[derive(Debug, Error)]
pub enum GearshareError {
    // =========================================================================
    // INTERVAL & AVAILABILITY ERRORS
    // =========================================================================
    /// An interval was constructed with `start >= end`.
    #[error("Invalid interval: start {start} is not before end {end}")]
    InvalidInterval {
        /// Requested start of the range.
        start: DateTime<Utc>,
        /// Requested end of the range.
        end: DateTime<Utc>,
    },

    /// The requested booking duration falls outside the configured bounds.
    #[error("Booking duration out of bounds: {0}")]
    DurationOutOfBounds(String),

    /// Declared availability windows overlap or are out of order.
    #[error("Availability windows must be sorted and non-overlapping")]
    OverlappingWindows,

    /// The requested interval is not fully covered by any single
    /// availability window.
    #[error("Requested period is outside the vehicle's declared availability")]
    OutOfAvailability,

    // =========================================================================
    // BOOKING ADMISSION ERRORS
    // =========================================================================
    /// The vehicle exists but is not accepting bookings.
    #[error("Vehicle '{0}' is inactive and cannot be booked")]
    VehicleInactive(VehicleId),

    /// The requested interval overlaps a booking that still holds the slot.
    #[error("Requested period conflicts with an existing booking")]
    SchedulingConflict,

    /// An identical (vehicle, interval, client) booking already exists in a
    /// non-terminal state.
    #[error("An identical booking request is already pending for this vehicle")]
    DuplicateBooking,

    // =========================================================================
    // STATE MACHINE ERRORS
    // =========================================================================
    /// The actor is not permitted to perform this transition.
    #[error("Actor is not permitted to perform this action on the booking")]
    Forbidden,

    /// The booking's start time has already passed.
    #[error("Booking starts at {starts_at} which is not in the future")]
    TooLate {
        /// Start of the booking's interval.
        starts_at: DateTime<Utc>,
    },

    /// The requested status change is not part of the state machine.
    #[error("Cannot transition booking from '{from}' to '{to}'")]
    InvalidTransition {
        /// Current status of the booking.
        from: BookingStatus,
        /// Requested status.
        to: BookingStatus,
    },

    // =========================================================================
    // RESOURCE & LOOKUP ERRORS
    // =========================================================================
    /// No vehicle with the given identifier exists.
    #[error("Vehicle '{0}' not found")]
    VehicleNotFound(VehicleId),

    /// No booking with the given identifier exists.
    #[error("Booking '{0}' not found")]
    BookingNotFound(BookingId),

    /// The vehicle still has non-terminal bookings and cannot be retired.
    #[error("Vehicle '{0}' has pending or approved bookings and cannot be retired")]
    VehicleInUse(VehicleId),

    /// The per-vehicle lock scope could not be acquired in time.
    #[error("Vehicle '{0}' is busy handling another booking request; try again")]
    Busy(VehicleId),

    // =========================================================================
    // CONFIGURATION, PERSISTENCE & I/O ERRORS
    // =========================================================================
    /// The engine configuration contains invalid values.
    #[error("Configuration validation failed: {0}")]
    ConfigValidation(String),

    /// The storage collaborator failed to load or persist state.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A low-level I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized [`Result`] type for gearshare operations.
pub type Result<T> = std::result::Result<T, GearshareError>;

/// Shorthand alias used throughout the crate.
pub type Error = GearshareError;

impl GearshareError {
    /// Returns `true` if this error is a rejection of the booking request
    /// itself rather than a system fault.
    #[inline]
    #[must_use]
    pub const fn is_admission_error(&self) -> bool {
        matches!(
            self,
            Self::VehicleInactive(_)
                | Self::OutOfAvailability
                | Self::SchedulingConflict
                | Self::DuplicateBooking
                | Self::DurationOutOfBounds(_)
        )
    }

    /// Returns `true` if this error came from the booking state machine.
    #[inline]
    #[must_use]
    pub const fn is_transition_error(&self) -> bool {
        matches!(
            self,
            Self::Forbidden | Self::TooLate { .. } | Self::InvalidTransition { .. }
        )
    }

    /// Returns `true` if retrying the same call later may succeed.
    ///
    /// `Busy` is the only transient condition: it reports lock contention,
    /// not a decision about the booking.
    #[inline]
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Busy(_))
    }

    /// Returns `true` if this error indicates a persistence-layer failure.
    #[inline]
    #[must_use]
    pub const fn is_storage_error(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Io(_))
    }

    /// Returns an HTTP-appropriate status code for this error.
    #[inline]
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - malformed input
            Self::InvalidInterval { .. }
            | Self::DurationOutOfBounds(_)
            | Self::OverlappingWindows => 400,

            // 403 Forbidden - authenticated but not allowed
            Self::Forbidden => 403,

            // 404 Not Found
            Self::VehicleNotFound(_) | Self::BookingNotFound(_) => 404,

            // 409 Conflict - request clashes with current state
            Self::VehicleInactive(_)
            | Self::OutOfAvailability
            | Self::SchedulingConflict
            | Self::DuplicateBooking
            | Self::TooLate { .. }
            | Self::InvalidTransition { .. }
            | Self::VehicleInUse(_) => 409,

            // 500 Internal Server Error
            Self::ConfigValidation(_) | Self::Storage(_) | Self::Io(_) => 500,

            // 503 Service Unavailable - transient contention
            Self::Busy(_) => 503,
        }
    }

    /// Returns a machine-readable error code for API responses.
    #[inline]
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInterval { .. } => "INVALID_INTERVAL",
            Self::DurationOutOfBounds(_) => "DURATION_OUT_OF_BOUNDS",
            Self::OverlappingWindows => "OVERLAPPING_WINDOWS",
            Self::OutOfAvailability => "OUT_OF_AVAILABILITY",
            Self::VehicleInactive(_) => "VEHICLE_INACTIVE",
            Self::SchedulingConflict => "SCHEDULING_CONFLICT",
            Self::DuplicateBooking => "DUPLICATE_BOOKING",
            Self::Forbidden => "FORBIDDEN",
            Self::TooLate { .. } => "TOO_LATE",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::VehicleNotFound(_) => "VEHICLE_NOT_FOUND",
            Self::BookingNotFound(_) => "BOOKING_NOT_FOUND",
            Self::VehicleInUse(_) => "VEHICLE_IN_USE",
            Self::Busy(_) => "BUSY",
            Self::ConfigValidation(_) => "CONFIG_VALIDATION_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }
}

impl From<serde_json::Error> for GearshareError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<toml::de::Error> for GearshareError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigValidation(err.to_string())
    }
}

impl From<toml::ser::Error> for GearshareError {
    fn from(err: toml::ser::Error) -> Self {
        Self::ConfigValidation(err.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================
