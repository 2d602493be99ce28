//! The booking engine facade.
//!
//! [`BookingEngine`] ties the storage collaborator, the validator and the
//! state machine together behind one API. Every mutation of a vehicle's
//! bookings runs inside that vehicle's lock scope, so concurrent requests
//! against one vehicle are strictly ordered while different vehicles
//! proceed independently. Scope acquisition is bounded: a caller that
//! cannot get in within the configured wait fails with `Busy` instead of
//! queueing indefinitely.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use crate::catalog::{self, OwnerSummary, VehicleQuery};
use crate::config::EngineConfig;
use crate::error::{GearshareError, Result};
use crate::ledger::Ledger;
use crate::storage::Store;
use crate::transitions;
use crate::types::{Booking, BookingId, UserId, Vehicle, VehicleId, VehicleStatus};
use crate::validator::{self, BookingRequest};

/// The availability and booking conflict engine.
///
/// Generic over its [`Store`] so services can persist however they like;
/// tests run against the in-memory store.
pub struct BookingEngine<S: Store> {
    config: EngineConfig,
    store: S,
    scopes: StdMutex<HashMap<VehicleId, Arc<Mutex<()>>>>,
}

impl<S: Store> BookingEngine<S> {
    /// Creates an engine over `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(config: EngineConfig, store: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            store,
            scopes: StdMutex::new(HashMap::new()),
        })
    }

    /// The engine's configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    // =========================================================================
    // VEHICLE LIFECYCLE
    // =========================================================================

    /// Lists a new vehicle.
    ///
    /// The [`crate::availability::Availability`] carried by the vehicle has
    /// already been validated at construction, so registration is a plain
    /// insert.
    ///
    /// # Errors
    ///
    /// Fails if the identifier is already taken or the store write fails.
    pub fn register_vehicle(&self, vehicle: Vehicle) -> Result<()> {
        self.store.insert_vehicle(vehicle.clone())?;
        info!(vehicle = %vehicle.id, owner = %vehicle.owner_id, "vehicle registered");
        Ok(())
    }

    /// Activates or deactivates a listing. Owner only.
    ///
    /// Runs inside the vehicle's lock scope so a deactivation cannot race a
    /// booking request that already read the old status.
    ///
    /// # Errors
    ///
    /// - [`GearshareError::VehicleNotFound`] for an unknown vehicle
    /// - [`GearshareError::Forbidden`] if `actor` is not the owner
    /// - [`GearshareError::Busy`] on lock-scope timeout
    pub async fn set_vehicle_status(
        &self,
        vehicle_id: &VehicleId,
        status: VehicleStatus,
        actor: &UserId,
    ) -> Result<Vehicle> {
        let _guard = self.enter_scope(vehicle_id).await?;

        let mut vehicle = self.load_vehicle(vehicle_id)?;
        if vehicle.owner_id != *actor {
            return Err(GearshareError::Forbidden);
        }
        vehicle.status = status;
        self.store.update_vehicle(vehicle.clone())?;
        info!(vehicle = %vehicle_id, ?status, "vehicle status updated");
        Ok(vehicle)
    }

    /// Removes a listing. Owner only.
    ///
    /// Refused while any booking still holds its slot; booking history is
    /// preserved either way.
    ///
    /// # Errors
    ///
    /// - [`GearshareError::VehicleInUse`] if slot-holding bookings remain
    /// - plus the lookup, permission and `Busy` failures of
    ///   [`BookingEngine::set_vehicle_status`]
    pub async fn retire_vehicle(&self, vehicle_id: &VehicleId, actor: &UserId) -> Result<()> {
        let _guard = self.enter_scope(vehicle_id).await?;

        let vehicle = self.load_vehicle(vehicle_id)?;
        if vehicle.owner_id != *actor {
            return Err(GearshareError::Forbidden);
        }
        let ledger = self.load_ledger(vehicle_id)?;
        if ledger.has_live_bookings() {
            return Err(GearshareError::VehicleInUse(vehicle_id.clone()));
        }
        self.store.remove_vehicle(vehicle_id)?;
        info!(vehicle = %vehicle_id, "vehicle retired");
        Ok(())
    }

    // =========================================================================
    // BOOKING LIFECYCLE
    // =========================================================================

    /// Admits a new booking request.
    ///
    /// Acquires the vehicle's lock scope, validates the request against the
    /// current ledger, prices it, and persists the resulting `Requested`
    /// booking. The scope is released on every exit path; on failure no
    /// mutation is visible.
    ///
    /// # Errors
    ///
    /// All validator refusals (see [`validator::validate`]), plus
    /// [`GearshareError::VehicleNotFound`] and [`GearshareError::Busy`].
    pub async fn request_booking(
        &self,
        vehicle_id: &VehicleId,
        request: BookingRequest,
        now: DateTime<Utc>,
    ) -> Result<Booking> {
        let _guard = self.enter_scope(vehicle_id).await?;

        let vehicle = self.load_vehicle(vehicle_id)?;
        let mut ledger = self.load_ledger(vehicle_id)?;

        let booking = validator::validate(&self.config, &vehicle, &ledger, &request, now)
            .map_err(|e| {
                debug!(vehicle = %vehicle_id, client = %request.client_id,
                       reason = e.error_code(), "booking request refused");
                e
            })?;

        ledger.admit(booking.clone())?;
        self.store.insert_booking(booking.clone())?;
        info!(vehicle = %vehicle_id, booking = %booking.id, client = %booking.client_id,
              price = %booking.total_price, "booking requested");
        Ok(booking)
    }

    /// Approves a requested booking. Owner only.
    ///
    /// Re-checks the ledger inside the lock scope: a conflicting booking
    /// approved since request time fails this approval with
    /// `SchedulingConflict` rather than silently creating an overlap.
    ///
    /// # Errors
    ///
    /// See [`transitions::approve`], plus lookup and `Busy` failures.
    pub async fn approve_booking(
        &self,
        vehicle_id: &VehicleId,
        booking_id: &BookingId,
        actor: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Booking> {
        let _guard = self.enter_scope(vehicle_id).await?;

        let ledger = self.load_ledger(vehicle_id)?;
        let booking = self.find_booking(&ledger, booking_id)?;
        let approved = transitions::approve(booking, &ledger, actor, now)?;
        self.store.update_booking(approved.clone())?;
        info!(vehicle = %vehicle_id, booking = %booking_id, "booking approved");
        Ok(approved)
    }

    /// Rejects a requested booking. Owner only.
    ///
    /// # Errors
    ///
    /// See [`transitions::reject`], plus lookup and `Busy` failures.
    pub async fn reject_booking(
        &self,
        vehicle_id: &VehicleId,
        booking_id: &BookingId,
        actor: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Booking> {
        let _guard = self.enter_scope(vehicle_id).await?;

        let ledger = self.load_ledger(vehicle_id)?;
        let booking = self.find_booking(&ledger, booking_id)?;
        let rejected = transitions::reject(booking, actor, now)?;
        self.store.update_booking(rejected.clone())?;
        info!(vehicle = %vehicle_id, booking = %booking_id, "booking rejected");
        Ok(rejected)
    }

    /// Cancels a requested or approved booking. Client only.
    ///
    /// # Errors
    ///
    /// See [`transitions::cancel`], plus lookup and `Busy` failures.
    pub async fn cancel_booking(
        &self,
        vehicle_id: &VehicleId,
        booking_id: &BookingId,
        actor: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Booking> {
        let _guard = self.enter_scope(vehicle_id).await?;

        let ledger = self.load_ledger(vehicle_id)?;
        let booking = self.find_booking(&ledger, booking_id)?;
        let cancelled = transitions::cancel(booking, actor, now)?;
        self.store.update_booking(cancelled.clone())?;
        info!(vehicle = %vehicle_id, booking = %booking_id, "booking cancelled");
        Ok(cancelled)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Looks up a vehicle.
    ///
    /// # Errors
    ///
    /// [`GearshareError::VehicleNotFound`] for an unknown identifier.
    pub fn vehicle(&self, vehicle_id: &VehicleId) -> Result<Vehicle> {
        self.load_vehicle(vehicle_id)
    }

    /// Filters the catalog with a typed query.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn search(&self, query: &VehicleQuery) -> Result<Vec<Vehicle>> {
        Ok(query.filter(self.store.vehicles()?))
    }

    /// All bookings referencing a vehicle, terminal ones included.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn bookings_for_vehicle(&self, vehicle_id: &VehicleId) -> Result<Vec<Booking>> {
        self.store.bookings_for_vehicle(vehicle_id)
    }

    /// All bookings placed by a client.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn bookings_for_client(&self, client_id: &UserId) -> Result<Vec<Booking>> {
        self.store.bookings_for_client(client_id)
    }

    /// Dashboard aggregates for an owner.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn owner_summary(&self, owner_id: &UserId) -> Result<OwnerSummary> {
        let query = VehicleQuery {
            owner: Some(owner_id.clone()),
            ..VehicleQuery::default()
        };
        let vehicles = query.filter(self.store.vehicles()?);

        let mut bookings = Vec::new();
        for vehicle in &vehicles {
            bookings.extend(self.store.bookings_for_vehicle(&vehicle.id)?);
        }
        Ok(catalog::owner_summary(&vehicles, &bookings))
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Acquires the vehicle's lock scope, waiting at most the configured
    /// lock wait.
    async fn enter_scope(&self, vehicle_id: &VehicleId) -> Result<OwnedMutexGuard<()>> {
        let scope = {
            let mut scopes = self
                .scopes
                .lock()
                .map_err(|_| GearshareError::Storage("scope registry poisoned".into()))?;
            Arc::clone(
                scopes
                    .entry(vehicle_id.clone())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };

        match tokio::time::timeout(self.config.lock_wait(), scope.lock_owned()).await {
            Ok(guard) => Ok(guard),
            Err(_) => {
                warn!(vehicle = %vehicle_id, wait_ms = self.config.lock_wait_ms,
                      "lock scope acquisition timed out");
                Err(GearshareError::Busy(vehicle_id.clone()))
            }
        }
    }

    fn load_vehicle(&self, vehicle_id: &VehicleId) -> Result<Vehicle> {
        self.store
            .vehicle(vehicle_id)?
            .ok_or_else(|| GearshareError::VehicleNotFound(vehicle_id.clone()))
    }

    fn load_ledger(&self, vehicle_id: &VehicleId) -> Result<Ledger> {
        Ok(Ledger::new(self.store.bookings_for_vehicle(vehicle_id)?))
    }

    fn find_booking<'a>(&self, ledger: &'a Ledger, booking_id: &BookingId) -> Result<&'a Booking> {
        ledger
            .get(booking_id)
            .ok_or_else(|| GearshareError::BookingNotFound(booking_id.clone()))
    }
}
