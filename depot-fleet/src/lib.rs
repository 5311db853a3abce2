//! # depot-fleet
//!
//! Payloads that flow through the depot warehouse: vehicles built by
//! producers and displayed by dealers.
//!
//! - [`Vehicle`] is a plain sum type over [`Car`] and [`Truck`], so a
//!   warehouse stores values directly (no boxing, no trait objects).
//! - [`VehicleFactory`] hands out ids from its own atomic counter, starting
//!   at [`FIRST_ID`]. Share one factory between every producer that should
//!   draw from the same id sequence.
//!
//! ## Example
//!
//! ```
//! use depot_fleet::{Vehicle, VehicleFactory, VehicleKind};
//!
//! let factory = VehicleFactory::new();
//!
//! let car = factory.car("Tesla", 4);
//! let truck = factory.truck("Volvo", 2750.5);
//!
//! assert_eq!(car.id().get(), 1001);
//! assert_eq!(truck.id().get(), 1002);
//! assert_eq!(truck.kind(), VehicleKind::Truck);
//!
//! assert_eq!(
//!     car.to_string(),
//!     "ID: 1001\nType: Car\nModel: Tesla\nMax. Passengers: 4\n"
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod factory;
mod vehicle;

pub use factory::{CAR_MODEL, FIRST_ID, LOAD_KG, PASSENGERS, TRUCK_MODEL, VehicleFactory};
pub use vehicle::{Car, Truck, Vehicle, VehicleId, VehicleKind};
