//! `depot` - vehicle warehouse simulation
//!
//! Producers build cars and trucks into a bounded warehouse; dealers take
//! them out and print them.

use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use depot::{Cli, Session, print_delivery};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only dealer output
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = cli.session_config();
    let session = Session::start(config, |dealer, vehicle| print_delivery(dealer, &vehicle))
        .context("failed to start warehouse")?;

    let report = match cli.run_for() {
        Some(duration) => {
            tracing::info!("running for {}s", duration.as_secs());
            thread::sleep(duration);
            session.stop().context("failed to stop warehouse")?
        }
        None => session.wait().context("warehouse stopped abnormally")?,
    };

    tracing::info!(
        "{} vehicle(s) produced, {} delivered ({:?} per dealer)",
        report.produced,
        report.consumed,
        report.per_dealer
    );
    Ok(())
}
