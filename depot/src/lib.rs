//! # depot
//!
//! A vehicle warehouse simulation: producer threads build cars and trucks
//! and push them into a [`BoundedChannel`](depot_channel::BoundedChannel);
//! dealer threads pop them and print them.
//!
//! ```text
//! producer-1 ──┐                         ┌──► dealer-1 ──► stdout
//! producer-2 ──┼──► warehouse (FIFO) ────┼──► dealer-2 ──► stdout
//!      ...     ┘     capacity >= 8       └──► ...
//! ```
//!
//! The building blocks are independent of each other:
//!
//! - [`run_producer`] and [`run_consumer`] are generic driver loops over any
//!   channel item, paced by a [`Pause`] and stopped by a [`Shutdown`] token.
//! - [`Session`] wires the loops to the fleet types, one shared warehouse
//!   and one shared [`VehicleFactory`](depot_fleet::VehicleFactory).
//! - [`Cli`] is the `depot` binary's argument parser.
//!
//! Stopping a session never loses a vehicle: every produced vehicle is
//! delivered before [`Session::stop`] returns, so
//! `report.produced == report.consumed`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod cli;
mod dealer;
mod driver;
mod pause;
mod session;
mod shutdown;

pub use cli::Cli;
pub use dealer::{print_delivery, write_delivery};
pub use driver::{ConsumerReport, ProducerReport, run_consumer, run_producer};
pub use pause::{Pause, PauseError};
pub use session::{ConfigError, MIN_CONSUMERS, Session, SessionConfig, SessionError, SessionReport};
pub use shutdown::{Shutdown, ShutdownTrigger, shutdown};
