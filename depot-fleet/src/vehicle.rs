//! Vehicle variants and their display format.

use std::fmt;

/// Process-unique vehicle identifier, assigned by a
/// [`VehicleFactory`](crate::VehicleFactory).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VehicleId(u32);

impl VehicleId {
    pub(crate) const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Passenger vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    id: VehicleId,
    model: String,
    max_passengers: u8,
}

impl Car {
    pub(crate) fn new(id: VehicleId, model: impl Into<String>, max_passengers: u8) -> Self {
        Self {
            id,
            model: model.into(),
            max_passengers,
        }
    }

    /// Maximum number of passengers.
    #[inline]
    pub fn max_passengers(&self) -> u8 {
        self.max_passengers
    }
}

/// Load-carrying vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct Truck {
    id: VehicleId,
    model: String,
    max_load_kg: f32,
}

impl Truck {
    pub(crate) fn new(id: VehicleId, model: impl Into<String>, max_load_kg: f32) -> Self {
        Self {
            id,
            model: model.into(),
            max_load_kg,
        }
    }

    /// Maximum load weight in kilograms.
    #[inline]
    pub fn max_load_kg(&self) -> f32 {
        self.max_load_kg
    }
}

/// Discriminant of a [`Vehicle`], without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleKind {
    /// A [`Car`].
    Car,
    /// A [`Truck`].
    Truck,
}

impl fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleKind::Car => write!(f, "Car"),
            VehicleKind::Truck => write!(f, "Truck"),
        }
    }
}

/// A vehicle moving through the warehouse.
///
/// Displays as a multi-line record ending in a newline:
///
/// ```text
/// ID: 1002
/// Type: Truck
/// Model: Volvo
/// Max. Load Weight: 2750.5 kg
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Vehicle {
    /// Passenger vehicle.
    Car(Car),
    /// Load-carrying vehicle.
    Truck(Truck),
}

impl Vehicle {
    /// The vehicle's id.
    pub fn id(&self) -> VehicleId {
        match self {
            Vehicle::Car(car) => car.id,
            Vehicle::Truck(truck) => truck.id,
        }
    }

    /// Model name.
    pub fn model(&self) -> &str {
        match self {
            Vehicle::Car(car) => &car.model,
            Vehicle::Truck(truck) => &truck.model,
        }
    }

    /// Which variant this is.
    pub fn kind(&self) -> VehicleKind {
        match self {
            Vehicle::Car(_) => VehicleKind::Car,
            Vehicle::Truck(_) => VehicleKind::Truck,
        }
    }
}

impl From<Car> for Vehicle {
    fn from(car: Car) -> Self {
        Vehicle::Car(car)
    }
}

impl From<Truck> for Vehicle {
    fn from(truck: Truck) -> Self {
        Vehicle::Truck(truck)
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ID: {}", self.id())?;
        writeln!(f, "Type: {}", self.kind())?;
        writeln!(f, "Model: {}", self.model())?;
        match self {
            Vehicle::Car(car) => writeln!(f, "Max. Passengers: {}", car.max_passengers),
            Vehicle::Truck(truck) => writeln!(f, "Max. Load Weight: {:.1} kg", truck.max_load_kg),
        }
    }
}
