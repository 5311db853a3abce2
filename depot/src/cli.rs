//! Command-line surface of the `depot` binary.

use std::time::Duration;

use clap::Parser;
use depot_channel::MIN_CAPACITY;

use crate::pause::Pause;
use crate::session::{MIN_CONSUMERS, SessionConfig};

/// Vehicle warehouse: producers build cars and trucks, dealers display them
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "depot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Number of consumer (dealer) threads, at least 2
    #[arg(value_name = "CONSUMERS", value_parser = parse_consumers)]
    pub consumers: usize,

    /// Warehouse capacity, at least 8
    #[arg(short, long, value_name = "N", default_value = "8", value_parser = parse_capacity)]
    pub capacity: usize,

    /// Number of producer threads, at least 1
    #[arg(short, long, value_name = "N", default_value = "1", value_parser = parse_producers)]
    pub producers: usize,

    /// Stop after this many seconds; run until killed if omitted
    #[arg(long, value_name = "SECS")]
    pub run_for: Option<u64>,

    /// Producer think time as MIN..MAX milliseconds
    #[arg(long, value_name = "MS", default_value = "100..1000")]
    pub produce_delay: Pause,

    /// Consumer think time as MIN..MAX milliseconds
    #[arg(long, value_name = "MS", default_value = "200..1200")]
    pub consume_delay: Pause,

    /// Seed every thread's RNG for a reproducible workload
    #[arg(long)]
    pub seed: Option<u64>,

    /// Enable debug-level logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Session settings described by the flags.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            capacity: self.capacity,
            producers: self.producers,
            consumers: self.consumers,
            produce_pause: self.produce_delay,
            consume_pause: self.consume_delay,
            seed: self.seed,
        }
    }

    /// How long to run before stopping, if bounded.
    pub fn run_for(&self) -> Option<Duration> {
        self.run_for.map(Duration::from_secs)
    }
}

fn parse_at_least(s: &str, minimum: usize, what: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("`{s}` is not a valid {what} count"))?;
    if n < minimum {
        return Err(format!("{what} must be at least {minimum}"));
    }
    Ok(n)
}

fn parse_consumers(s: &str) -> Result<usize, String> {
    parse_at_least(s, MIN_CONSUMERS, "consumer")
}

fn parse_producers(s: &str) -> Result<usize, String> {
    parse_at_least(s, 1, "producer")
}

fn parse_capacity(s: &str) -> Result<usize, String> {
    parse_at_least(s, MIN_CAPACITY, "capacity")
}
