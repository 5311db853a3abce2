//! Dealer output: one banner-and-vehicle block per delivery.

use std::io::{self, Write};

use depot_fleet::Vehicle;
use tracing::warn;

/// Writes one delivery block.
///
/// ```text
/// ========== Dealer 2 ==========
/// ID: 1004
/// Type: Truck
/// Model: Volvo
/// Max. Load Weight: 1234.5 kg
/// ```
///
/// # Errors
///
/// Propagates the writer's error.
pub fn write_delivery<W: Write>(out: &mut W, dealer: usize, vehicle: &Vehicle) -> io::Result<()> {
    write!(out, "========== Dealer {dealer} ==========\n{vehicle}")
}

/// Prints one delivery block to stdout.
///
/// Stdout stays locked for the whole block, so blocks from concurrent
/// dealers never interleave. A failed write is logged and otherwise ignored.
pub fn print_delivery(dealer: usize, vehicle: &Vehicle) {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Err(e) = write_delivery(&mut out, dealer, vehicle).and_then(|()| out.flush()) {
        warn!(dealer, error = %e, "failed to print delivery");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_fleet::VehicleFactory;

    #[test]
    fn car_block() {
        let factory = VehicleFactory::new();
        let car = factory.car("Tesla", 5);

        let mut out = Vec::new();
        write_delivery(&mut out, 1, &car).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "========== Dealer 1 ==========\n\
             ID: 1001\n\
             Type: Car\n\
             Model: Tesla\n\
             Max. Passengers: 5\n"
        );
    }

    #[test]
    fn truck_block() {
        let factory = VehicleFactory::starting_at(1004);
        let truck = factory.truck("Volvo", 1234.5);

        let mut out = Vec::new();
        write_delivery(&mut out, 2, &truck).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "========== Dealer 2 ==========\n\
             ID: 1004\n\
             Type: Truck\n\
             Model: Volvo\n\
             Max. Load Weight: 1234.5 kg\n"
        );
    }

    #[test]
    fn blocks_concatenate() {
        let factory = VehicleFactory::new();
        let mut out = Vec::new();

        write_delivery(&mut out, 1, &factory.car("Tesla", 2)).unwrap();
        write_delivery(&mut out, 3, &factory.car("Tesla", 7)).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("==========").count(), 4);
        assert!(text.contains("Dealer 3 ==========\nID: 1002\n"));
    }
}
