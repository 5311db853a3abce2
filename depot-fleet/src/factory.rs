//! Id assignment and random vehicle generation.

use std::ops::{Range, RangeInclusive};
use std::sync::atomic::{AtomicU32, Ordering};

use rand::Rng;

use crate::vehicle::{Car, Truck, Vehicle, VehicleId};

/// First id handed out by a fresh [`VehicleFactory`].
pub const FIRST_ID: u32 = 1001;

/// Model name of randomly generated cars.
pub const CAR_MODEL: &str = "Tesla";

/// Model name of randomly generated trucks.
pub const TRUCK_MODEL: &str = "Volvo";

/// Passenger range of randomly generated cars.
pub const PASSENGERS: RangeInclusive<u8> = 2..=7;

/// Load range (kg) of randomly generated trucks.
pub const LOAD_KG: Range<f32> = 500.0..5000.0;

/// Builds vehicles with sequential, unique ids.
///
/// The counter is an [`AtomicU32`], so one factory can be shared by
/// reference (or `Arc`) between any number of producer threads. Ids are
/// unique per factory; two factories produce overlapping sequences.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
///
/// use depot_fleet::VehicleFactory;
///
/// let factory = Arc::new(VehicleFactory::new());
///
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let factory = Arc::clone(&factory);
///         thread::spawn(move || factory.car("Tesla", 4).id().get())
///     })
///     .collect();
///
/// let mut ids: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
/// ids.sort_unstable();
/// assert_eq!(ids, vec![1001, 1002, 1003, 1004]);
/// ```
#[derive(Debug)]
pub struct VehicleFactory {
    next_id: AtomicU32,
}

impl VehicleFactory {
    /// Creates a factory whose first id is [`FIRST_ID`].
    pub const fn new() -> Self {
        Self::starting_at(FIRST_ID)
    }

    /// Creates a factory whose first id is `first`.
    pub const fn starting_at(first: u32) -> Self {
        Self {
            next_id: AtomicU32::new(first),
        }
    }

    /// Builds a car with the next id.
    pub fn car(&self, model: impl Into<String>, max_passengers: u8) -> Vehicle {
        Car::new(self.next_id(), model, max_passengers).into()
    }

    /// Builds a truck with the next id.
    pub fn truck(&self, model: impl Into<String>, max_load_kg: f32) -> Vehicle {
        Truck::new(self.next_id(), model, max_load_kg).into()
    }

    /// Builds a car or a truck with equal probability.
    ///
    /// Cars are [`CAR_MODEL`] with [`PASSENGERS`] seats, trucks are
    /// [`TRUCK_MODEL`] with a load in [`LOAD_KG`].
    pub fn random<R: Rng>(&self, rng: &mut R) -> Vehicle {
        if rng.gen_bool(0.5) {
            self.car(CAR_MODEL, rng.gen_range(PASSENGERS))
        } else {
            self.truck(TRUCK_MODEL, rng.gen_range(LOAD_KG))
        }
    }

    /// The id the next vehicle will get.
    pub fn peek_next_id(&self) -> u32 {
        self.next_id.load(Ordering::Relaxed)
    }

    fn next_id(&self) -> VehicleId {
        // Only uniqueness matters, not ordering against other memory
        VehicleId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for VehicleFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VehicleKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn ids_start_at_first_id() {
        let factory = VehicleFactory::new();

        assert_eq!(factory.peek_next_id(), FIRST_ID);
        assert_eq!(factory.car("Tesla", 4).id().get(), 1001);
        assert_eq!(factory.truck("Volvo", 900.0).id().get(), 1002);
        assert_eq!(factory.peek_next_id(), 1003);
    }

    #[test]
    fn factories_are_independent() {
        let a = VehicleFactory::new();
        let b = VehicleFactory::starting_at(1);

        a.car("Tesla", 2);
        a.car("Tesla", 2);

        assert_eq!(b.car("Tesla", 2).id().get(), 1);
        assert_eq!(a.car("Tesla", 2).id().get(), 1003);
    }

    #[test]
    fn ids_unique_across_threads() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 1_000;

        let factory = Arc::new(VehicleFactory::new());

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let factory = Arc::clone(&factory);
                thread::spawn(move || {
                    (0..PER_THREAD)
                        .map(|_| factory.car("Tesla", 4).id().get())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let ids: HashSet<u32> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();

        assert_eq!(ids.len(), THREADS * PER_THREAD);
        let expected: HashSet<u32> = (FIRST_ID..FIRST_ID + (THREADS * PER_THREAD) as u32).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn random_vehicles_stay_in_range() {
        let factory = VehicleFactory::new();
        let mut rng = StdRng::seed_from_u64(7);

        let mut kinds = HashSet::new();
        for _ in 0..1_000 {
            let vehicle = factory.random(&mut rng);
            kinds.insert(vehicle.kind());

            match &vehicle {
                Vehicle::Car(car) => {
                    assert_eq!(vehicle.model(), CAR_MODEL);
                    assert!(PASSENGERS.contains(&car.max_passengers()));
                }
                Vehicle::Truck(truck) => {
                    assert_eq!(vehicle.model(), TRUCK_MODEL);
                    assert!(LOAD_KG.contains(&truck.max_load_kg()));
                }
            }
        }

        // 1000 fair coin flips: both kinds show up
        assert!(kinds.contains(&VehicleKind::Car));
        assert!(kinds.contains(&VehicleKind::Truck));
        assert_eq!(factory.peek_next_id(), FIRST_ID + 1_000);
    }
}
