//! End-to-end engine tests: the full client/owner journey plus the
//! concurrency guarantees around the per-vehicle lock scope.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use gearshare_core::{
    Availability, BookingEngine, BookingRequest, BookingStatus, EngineConfig, GearshareError,
    Interval, Location, MemoryStore, PaymentMethod, Store, UserId, Vehicle, VehicleId,
    VehicleStatus, VehicleType,
};

fn interval(from: &str, to: &str) -> Interval {
    Interval::new(from.parse().unwrap(), to.parse().unwrap()).unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn now() -> DateTime<Utc> {
    "2025-09-20T08:00:00Z".parse().unwrap()
}

fn fixture_vehicle(id: &str) -> Vehicle {
    Vehicle {
        id: VehicleId::from(id),
        owner_id: UserId::from("u_1"),
        title: "City hatchback".into(),
        vehicle_type: VehicleType::Car,
        price_per_hour: dec("6.5"),
        price_per_day: dec("45"),
        image_urls: Vec::new(),
        location: Location {
            address: "12 Harbour St".into(),
            lat: 6.9271,
            lng: 79.8612,
        },
        availability: Availability::new(vec![interval(
            "2025-09-22T09:00:00Z",
            "2025-09-26T17:00:00Z",
        )])
        .unwrap(),
        description: "Well maintained, low mileage".into(),
        status: VehicleStatus::Active,
    }
}

fn request(client: &str, from: &str, to: &str) -> BookingRequest {
    BookingRequest {
        client_id: UserId::from(client),
        interval: interval(from, to),
        payment_method: PaymentMethod::Cash,
        pickup_details: "Meet at the harbour car park".into(),
    }
}

#[tokio::test]
async fn full_booking_journey() {
    let engine = BookingEngine::new(EngineConfig::default(), MemoryStore::new()).unwrap();
    engine.register_vehicle(fixture_vehicle("v_100")).unwrap();
    let vehicle_id = VehicleId::from("v_100");
    let owner = UserId::from("u_1");
    let client = UserId::from("u_2");

    // Six hours at 6.50/h; the daily schedule does not apply under 24h.
    let booking = engine
        .request_booking(
            &vehicle_id,
            request("u_2", "2025-09-22T09:00:00Z", "2025-09-22T15:00:00Z"),
            now(),
        )
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Requested);
    assert_eq!(booking.total_price, dec("39.00"));

    let approved = engine
        .approve_booking(&vehicle_id, &booking.id, &owner, now())
        .await
        .unwrap();
    assert_eq!(approved.status, BookingStatus::Approved);

    // An overlapping second request now conflicts.
    let overlap = engine
        .request_booking(
            &vehicle_id,
            request("u_3", "2025-09-22T12:00:00Z", "2025-09-22T18:00:00Z"),
            now(),
        )
        .await;
    assert!(matches!(overlap, Err(GearshareError::SchedulingConflict)));

    // The client's profile view sees the approved booking.
    let mine = engine.bookings_for_client(&client).unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].status, BookingStatus::Approved);
}

#[tokio::test]
async fn back_to_back_rentals_share_an_endpoint() {
    let engine = BookingEngine::new(EngineConfig::default(), MemoryStore::new()).unwrap();
    engine.register_vehicle(fixture_vehicle("v_100")).unwrap();
    let vehicle_id = VehicleId::from("v_100");

    engine
        .request_booking(
            &vehicle_id,
            request("u_2", "2025-09-22T09:00:00Z", "2025-09-22T15:00:00Z"),
            now(),
        )
        .await
        .unwrap();

    // Half-open intervals: starting exactly where the first ends is fine.
    engine
        .request_booking(
            &vehicle_id,
            request("u_3", "2025-09-22T15:00:00Z", "2025-09-22T21:00:00Z"),
            now(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn approval_after_start_is_too_late() {
    let engine = BookingEngine::new(EngineConfig::default(), MemoryStore::new()).unwrap();
    engine.register_vehicle(fixture_vehicle("v_100")).unwrap();
    let vehicle_id = VehicleId::from("v_100");

    let booking = engine
        .request_booking(
            &vehicle_id,
            request("u_2", "2025-09-22T09:00:00Z", "2025-09-22T15:00:00Z"),
            now(),
        )
        .await
        .unwrap();

    let after_start: DateTime<Utc> = "2025-09-22T10:00:00Z".parse().unwrap();
    let result = engine
        .approve_booking(&vehicle_id, &booking.id, &UserId::from("u_1"), after_start)
        .await;
    assert!(matches!(result, Err(GearshareError::TooLate { .. })));
}

#[tokio::test]
async fn cancelling_a_rejected_booking_is_invalid() {
    let engine = BookingEngine::new(EngineConfig::default(), MemoryStore::new()).unwrap();
    engine.register_vehicle(fixture_vehicle("v_100")).unwrap();
    let vehicle_id = VehicleId::from("v_100");

    let booking = engine
        .request_booking(
            &vehicle_id,
            request("u_2", "2025-09-22T09:00:00Z", "2025-09-22T15:00:00Z"),
            now(),
        )
        .await
        .unwrap();
    engine
        .reject_booking(&vehicle_id, &booking.id, &UserId::from("u_1"), now())
        .await
        .unwrap();

    let result = engine
        .cancel_booking(&vehicle_id, &booking.id, &UserId::from("u_2"), now())
        .await;
    assert!(matches!(
        result,
        Err(GearshareError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn concurrent_overlapping_requests_admit_exactly_one() {
    let engine = Arc::new(
        BookingEngine::new(EngineConfig::default(), MemoryStore::new()).unwrap(),
    );
    engine.register_vehicle(fixture_vehicle("v_100")).unwrap();
    let vehicle_id = VehicleId::from("v_100");

    let first = {
        let engine = Arc::clone(&engine);
        let vehicle_id = vehicle_id.clone();
        tokio::spawn(async move {
            engine
                .request_booking(
                    &vehicle_id,
                    request("u_2", "2025-09-22T09:00:00Z", "2025-09-22T15:00:00Z"),
                    now(),
                )
                .await
        })
    };
    let second = {
        let engine = Arc::clone(&engine);
        let vehicle_id = vehicle_id.clone();
        tokio::spawn(async move {
            engine
                .request_booking(
                    &vehicle_id,
                    request("u_3", "2025-09-22T12:00:00Z", "2025-09-22T18:00:00Z"),
                    now(),
                )
                .await
        })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one of two overlapping requests wins");
    assert!(results.iter().any(|r| matches!(
        r,
        Err(GearshareError::SchedulingConflict)
    )));

    let stored = engine.bookings_for_vehicle(&vehicle_id).unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn different_vehicles_proceed_independently() {
    let engine = Arc::new(
        BookingEngine::new(EngineConfig::default(), MemoryStore::new()).unwrap(),
    );
    engine.register_vehicle(fixture_vehicle("v_100")).unwrap();
    engine.register_vehicle(fixture_vehicle("v_101")).unwrap();

    let v_100 = VehicleId::from("v_100");
    let v_101 = VehicleId::from("v_101");
    let (a, b) = tokio::join!(
        engine.request_booking(
            &v_100,
            request("u_2", "2025-09-22T09:00:00Z", "2025-09-22T15:00:00Z"),
            now(),
        ),
        engine.request_booking(
            &v_101,
            request("u_2", "2025-09-22T09:00:00Z", "2025-09-22T15:00:00Z"),
            now(),
        ),
    );
    assert!(a.is_ok());
    assert!(b.is_ok());
}

/// Store wrapper that stalls ledger loads, to hold a vehicle's lock scope
/// long enough for a competing call to hit its acquisition deadline.
struct SlowStore {
    inner: MemoryStore,
    delay: Duration,
}

impl Store for SlowStore {
    fn vehicle(&self, id: &VehicleId) -> gearshare_core::Result<Option<Vehicle>> {
        self.inner.vehicle(id)
    }

    fn vehicles(&self) -> gearshare_core::Result<Vec<Vehicle>> {
        self.inner.vehicles()
    }

    fn insert_vehicle(&self, vehicle: Vehicle) -> gearshare_core::Result<()> {
        self.inner.insert_vehicle(vehicle)
    }

    fn update_vehicle(&self, vehicle: Vehicle) -> gearshare_core::Result<()> {
        self.inner.update_vehicle(vehicle)
    }

    fn remove_vehicle(&self, id: &VehicleId) -> gearshare_core::Result<()> {
        self.inner.remove_vehicle(id)
    }

    fn bookings_for_vehicle(
        &self,
        id: &VehicleId,
    ) -> gearshare_core::Result<Vec<gearshare_core::Booking>> {
        std::thread::sleep(self.delay);
        self.inner.bookings_for_vehicle(id)
    }

    fn bookings_for_client(
        &self,
        id: &UserId,
    ) -> gearshare_core::Result<Vec<gearshare_core::Booking>> {
        self.inner.bookings_for_client(id)
    }

    fn insert_booking(&self, booking: gearshare_core::Booking) -> gearshare_core::Result<()> {
        self.inner.insert_booking(booking)
    }

    fn update_booking(&self, booking: gearshare_core::Booking) -> gearshare_core::Result<()> {
        self.inner.update_booking(booking)
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn contended_scope_times_out_with_busy() {
    let config = EngineConfig {
        lock_wait_ms: 50,
        ..EngineConfig::default()
    };
    let store = SlowStore {
        inner: MemoryStore::new(),
        delay: Duration::from_millis(500),
    };
    let engine = Arc::new(BookingEngine::new(config, store).unwrap());
    engine.register_vehicle(fixture_vehicle("v_100")).unwrap();
    let vehicle_id = VehicleId::from("v_100");

    let holder = {
        let engine = Arc::clone(&engine);
        let vehicle_id = vehicle_id.clone();
        tokio::spawn(async move {
            engine
                .request_booking(
                    &vehicle_id,
                    request("u_2", "2025-09-22T09:00:00Z", "2025-09-22T15:00:00Z"),
                    now(),
                )
                .await
        })
    };

    // Let the first request take the scope and stall inside the store.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let contender = engine
        .request_booking(
            &vehicle_id,
            request("u_3", "2025-09-23T09:00:00Z", "2025-09-23T15:00:00Z"),
            now(),
        )
        .await;
    assert!(matches!(contender, Err(GearshareError::Busy(_))));

    holder.await.unwrap().unwrap();
}
