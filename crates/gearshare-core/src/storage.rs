//! Persistence collaborators.
//!
//! The engine owns no process-wide mutable state; everything it reads and
//! writes goes through a [`Store`]. Two implementations ship with the crate:
//! [`MemoryStore`] for tests and embedding, and [`JsonStore`], which keeps
//! JSON files on disk organized per vehicle.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{GearshareError, Result};
use crate::types::{Booking, BookingId, UserId, Vehicle, VehicleId};

/// Storage collaborator for vehicles and bookings.
///
/// Implementations must be safe to share across tasks. Callers mutating one
/// vehicle's bookings always do so inside that vehicle's lock scope, so a
/// store does not need its own per-vehicle ordering guarantees.
pub trait Store: Send + Sync {
    /// Loads a vehicle by identifier.
    fn vehicle(&self, id: &VehicleId) -> Result<Option<Vehicle>>;

    /// Loads all vehicles.
    fn vehicles(&self) -> Result<Vec<Vehicle>>;

    /// Persists a new vehicle.
    ///
    /// # Errors
    ///
    /// Fails with [`GearshareError::Storage`] if the identifier is taken.
    fn insert_vehicle(&self, vehicle: Vehicle) -> Result<()>;

    /// Replaces an existing vehicle record.
    ///
    /// # Errors
    ///
    /// Fails with [`GearshareError::VehicleNotFound`] if it does not exist.
    fn update_vehicle(&self, vehicle: Vehicle) -> Result<()>;

    /// Removes a vehicle record. Booking history is kept.
    ///
    /// # Errors
    ///
    /// Fails with [`GearshareError::VehicleNotFound`] if it does not exist.
    fn remove_vehicle(&self, id: &VehicleId) -> Result<()>;

    /// Loads all bookings referencing a vehicle, terminal ones included.
    fn bookings_for_vehicle(&self, id: &VehicleId) -> Result<Vec<Booking>>;

    /// Loads all bookings placed by a client.
    fn bookings_for_client(&self, id: &UserId) -> Result<Vec<Booking>>;

    /// Persists a new booking.
    fn insert_booking(&self, booking: Booking) -> Result<()>;

    /// Replaces an existing booking record.
    ///
    /// # Errors
    ///
    /// Fails with [`GearshareError::BookingNotFound`] if it does not exist.
    fn update_booking(&self, booking: Booking) -> Result<()>;
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// Hash-map backed store for tests and single-process embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    vehicles: RwLock<HashMap<VehicleId, Vehicle>>,
    bookings: RwLock<HashMap<BookingId, Booking>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> GearshareError {
    GearshareError::Storage("store lock poisoned".into())
}

impl Store for MemoryStore {
    fn vehicle(&self, id: &VehicleId) -> Result<Option<Vehicle>> {
        let vehicles = self.vehicles.read().map_err(|_| poisoned())?;
        Ok(vehicles.get(id).cloned())
    }

    fn vehicles(&self) -> Result<Vec<Vehicle>> {
        let vehicles = self.vehicles.read().map_err(|_| poisoned())?;
        let mut all: Vec<Vehicle> = vehicles.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    fn insert_vehicle(&self, vehicle: Vehicle) -> Result<()> {
        let mut vehicles = self.vehicles.write().map_err(|_| poisoned())?;
        if vehicles.contains_key(&vehicle.id) {
            return Err(GearshareError::Storage(format!(
                "vehicle '{}' already exists",
                vehicle.id
            )));
        }
        vehicles.insert(vehicle.id.clone(), vehicle);
        Ok(())
    }

    fn update_vehicle(&self, vehicle: Vehicle) -> Result<()> {
        let mut vehicles = self.vehicles.write().map_err(|_| poisoned())?;
        if !vehicles.contains_key(&vehicle.id) {
            return Err(GearshareError::VehicleNotFound(vehicle.id));
        }
        vehicles.insert(vehicle.id.clone(), vehicle);
        Ok(())
    }

    fn remove_vehicle(&self, id: &VehicleId) -> Result<()> {
        let mut vehicles = self.vehicles.write().map_err(|_| poisoned())?;
        vehicles
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| GearshareError::VehicleNotFound(id.clone()))
    }

    fn bookings_for_vehicle(&self, id: &VehicleId) -> Result<Vec<Booking>> {
        let bookings = self.bookings.read().map_err(|_| poisoned())?;
        Ok(bookings
            .values()
            .filter(|b| b.vehicle_id == *id)
            .cloned()
            .collect())
    }

    fn bookings_for_client(&self, id: &UserId) -> Result<Vec<Booking>> {
        let bookings = self.bookings.read().map_err(|_| poisoned())?;
        Ok(bookings
            .values()
            .filter(|b| b.client_id == *id)
            .cloned()
            .collect())
    }

    fn insert_booking(&self, booking: Booking) -> Result<()> {
        let mut bookings = self.bookings.write().map_err(|_| poisoned())?;
        bookings.insert(booking.id.clone(), booking);
        Ok(())
    }

    fn update_booking(&self, booking: Booking) -> Result<()> {
        let mut bookings = self.bookings.write().map_err(|_| poisoned())?;
        if !bookings.contains_key(&booking.id) {
            return Err(GearshareError::BookingNotFound(booking.id));
        }
        bookings.insert(booking.id.clone(), booking);
        Ok(())
    }
}

// =============================================================================
// JSON FILE STORE
// =============================================================================

/// Store backed by JSON files on disk.
///
/// Layout under the data directory:
///
/// ```text
/// vehicles/<vehicle_id>.json   -- one Vehicle per file
/// bookings/<vehicle_id>.json   -- Vec<Booking> per vehicle
/// ```
#[derive(Debug, Clone)]
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    /// Creates a store rooted at `data_dir`.
    #[must_use]
    pub const fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Opens a store at the platform's default data location.
    ///
    /// On Linux servers: `/var/lib/gearshare/`. Elsewhere the per-user data
    /// directory is used.
    ///
    /// # Errors
    ///
    /// Returns an error if no data directory can be determined.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(default_data_dir()?))
    }

    fn vehicle_path(&self, id: &VehicleId) -> PathBuf {
        self.data_dir.join("vehicles").join(format!("{id}.json"))
    }

    fn bookings_path(&self, id: &VehicleId) -> PathBuf {
        self.data_dir.join("bookings").join(format!("{id}.json"))
    }

    fn read_bookings(&self, id: &VehicleId) -> Result<Vec<Booking>> {
        let path = self.bookings_path(id);
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Vec::new())
        }
    }

    fn write_bookings(&self, id: &VehicleId, bookings: &[Booking]) -> Result<()> {
        let path = self.bookings_path(id);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(bookings)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn all_booking_files(&self) -> Result<Vec<PathBuf>> {
        let dir = self.data_dir.join("bookings");
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        Ok(paths)
    }
}

impl Store for JsonStore {
    fn vehicle(&self, id: &VehicleId) -> Result<Option<Vehicle>> {
        let path = self.vehicle_path(id);
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            Ok(Some(serde_json::from_str(&content)?))
        } else {
            Ok(None)
        }
    }

    fn vehicles(&self) -> Result<Vec<Vehicle>> {
        let dir = self.data_dir.join("vehicles");
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut all = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let content = std::fs::read_to_string(&path)?;
                all.push(serde_json::from_str(&content)?);
            }
        }
        all.sort_by(|a: &Vehicle, b: &Vehicle| a.id.cmp(&b.id));
        Ok(all)
    }

    fn insert_vehicle(&self, vehicle: Vehicle) -> Result<()> {
        let path = self.vehicle_path(&vehicle.id);
        if path.exists() {
            return Err(GearshareError::Storage(format!(
                "vehicle '{}' already exists",
                vehicle.id
            )));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&vehicle)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn update_vehicle(&self, vehicle: Vehicle) -> Result<()> {
        let path = self.vehicle_path(&vehicle.id);
        if !path.exists() {
            return Err(GearshareError::VehicleNotFound(vehicle.id));
        }
        let content = serde_json::to_string_pretty(&vehicle)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn remove_vehicle(&self, id: &VehicleId) -> Result<()> {
        let path = self.vehicle_path(id);
        if !path.exists() {
            return Err(GearshareError::VehicleNotFound(id.clone()));
        }
        std::fs::remove_file(path)?;
        Ok(())
    }

    fn bookings_for_vehicle(&self, id: &VehicleId) -> Result<Vec<Booking>> {
        self.read_bookings(id)
    }

    fn bookings_for_client(&self, id: &UserId) -> Result<Vec<Booking>> {
        let mut matches = Vec::new();
        for path in self.all_booking_files()? {
            let content = std::fs::read_to_string(&path)?;
            let bookings: Vec<Booking> = serde_json::from_str(&content)?;
            matches.extend(bookings.into_iter().filter(|b| b.client_id == *id));
        }
        Ok(matches)
    }

    fn insert_booking(&self, booking: Booking) -> Result<()> {
        let mut bookings = self.read_bookings(&booking.vehicle_id)?;
        let vehicle_id = booking.vehicle_id.clone();
        bookings.push(booking);
        self.write_bookings(&vehicle_id, &bookings)
    }

    fn update_booking(&self, booking: Booking) -> Result<()> {
        let mut bookings = self.read_bookings(&booking.vehicle_id)?;
        let Some(slot) = bookings.iter_mut().find(|b| b.id == booking.id) else {
            return Err(GearshareError::BookingNotFound(booking.id));
        };
        let vehicle_id = booking.vehicle_id.clone();
        *slot = booking;
        self.write_bookings(&vehicle_id, &bookings)
    }
}

/// Returns the default data directory for the current platform.
///
/// # Errors
///
/// Returns [`GearshareError::Storage`] if no directory can be determined.
pub fn default_data_dir() -> Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        Ok(PathBuf::from("/var/lib/gearshare"))
    }
    #[cfg(not(target_os = "linux"))]
    {
        let dirs = directories::ProjectDirs::from("", "", "gearshare")
            .ok_or_else(|| GearshareError::Storage("cannot determine data directory".into()))?;
        Ok(dirs.data_dir().to_path_buf())
    }
}
