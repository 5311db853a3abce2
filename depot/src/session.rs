//! A running warehouse: producer and dealer threads around one channel.

use std::io;
use std::mem;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use depot_channel::{BoundedChannel, CapacityError, MIN_CAPACITY};
use depot_fleet::{Vehicle, VehicleFactory};
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::driver::{ConsumerReport, ProducerReport, run_consumer, run_producer};
use crate::pause::Pause;
use crate::shutdown::{Shutdown, ShutdownTrigger, shutdown};

/// Fewest dealer threads a session accepts.
pub const MIN_CONSUMERS: usize = 2;

/// Invalid [`SessionConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Fewer than [`MIN_CONSUMERS`] dealers.
    #[error("number of consumers must be at least {minimum}, got {requested}")]
    TooFewConsumers {
        /// Requested dealer count.
        requested: usize,
        /// Smallest accepted dealer count.
        minimum: usize,
    },

    /// No producers.
    #[error("number of producers must be at least 1")]
    NoProducers,

    /// Capacity rejected by the channel.
    #[error(transparent)]
    Capacity(#[from] CapacityError),
}

/// Failure starting or stopping a [`Session`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// The configuration was rejected before any thread started.
    #[error("invalid configuration")]
    Config(#[from] ConfigError),

    /// The OS refused to spawn a worker thread.
    #[error("failed to spawn {name}")]
    Spawn {
        /// Thread name.
        name: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// A worker thread panicked.
    #[error("{name} panicked")]
    Panicked {
        /// Thread name.
        name: String,
    },
}

/// Shape of a warehouse session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Warehouse capacity, at least [`MIN_CAPACITY`].
    pub capacity: usize,
    /// Number of producer threads, at least 1.
    pub producers: usize,
    /// Number of dealer threads, at least [`MIN_CONSUMERS`].
    pub consumers: usize,
    /// Think time between produced vehicles.
    pub produce_pause: Pause,
    /// Think time between delivered vehicles.
    pub consume_pause: Pause,
    /// Seed for reproducible workloads; fresh entropy per thread if `None`.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: MIN_CAPACITY,
            producers: 1,
            consumers: MIN_CONSUMERS,
            produce_pause: Pause::PRODUCER,
            consume_pause: Pause::CONSUMER,
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Checks every bound without starting anything.
    ///
    /// # Errors
    ///
    /// Returns the first violated bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.consumers < MIN_CONSUMERS {
            return Err(ConfigError::TooFewConsumers {
                requested: self.consumers,
                minimum: MIN_CONSUMERS,
            });
        }
        if self.producers == 0 {
            return Err(ConfigError::NoProducers);
        }
        if self.capacity < MIN_CAPACITY {
            return Err(CapacityError {
                requested: self.capacity,
                minimum: MIN_CAPACITY,
            }
            .into());
        }
        Ok(())
    }

    fn rng(&self, stream: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
            None => StdRng::from_entropy(),
        }
    }
}

/// Totals of a stopped session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
    /// Vehicles pushed by all producers.
    pub produced: u64,
    /// Vehicles delivered by all dealers.
    pub consumed: u64,
    /// Deliveries per dealer, indexed by dealer number minus one.
    pub per_dealer: Vec<u64>,
}

/// Producer and dealer threads sharing one warehouse and one vehicle factory.
///
/// Dealers are numbered from 1. Every popped vehicle is handed to the
/// `deliver` callback given to [`start`](Self::start) together with the
/// dealer number.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use std::thread;
/// use std::time::Duration;
///
/// use depot::{Pause, Session, SessionConfig};
///
/// let config = SessionConfig {
///     produce_pause: Pause::fixed(1),
///     consume_pause: Pause::fixed(1),
///     seed: Some(7),
///     ..SessionConfig::default()
/// };
///
/// let delivered = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&delivered);
/// let session = Session::start(config, move |_dealer, vehicle| {
///     sink.lock().unwrap().push(vehicle.id());
/// })
/// .unwrap();
///
/// thread::sleep(Duration::from_millis(50));
/// let report = session.stop().unwrap();
///
/// assert_eq!(report.produced, report.consumed);
/// assert_eq!(delivered.lock().unwrap().len() as u64, report.consumed);
/// ```
#[derive(Debug)]
pub struct Session {
    channel: Arc<BoundedChannel<Vehicle>>,
    factory: Arc<VehicleFactory>,
    trigger: Option<ShutdownTrigger>,
    producers: Vec<Worker<ProducerReport>>,
    dealers: Vec<Worker<ConsumerReport>>,
}

#[derive(Debug)]
struct Worker<R> {
    name: String,
    handle: JoinHandle<R>,
}

impl<R> Worker<R> {
    fn join(self) -> Result<R, SessionError> {
        self.handle.join().map_err(|_| {
            error!(thread = %self.name, "worker panicked");
            SessionError::Panicked { name: self.name }
        })
    }
}

/// Closes the warehouse if a dealer unwinds, so producers blocked on a
/// full warehouse are not stranded when no dealer is left to pop.
struct CloseOnPanic(Arc<BoundedChannel<Vehicle>>);

impl Drop for CloseOnPanic {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.close();
        }
    }
}

fn spawn_worker<R, F>(name: String, f: F) -> Result<Worker<R>, SessionError>
where
    R: Send + 'static,
    F: FnOnce() -> R + Send + 'static,
{
    let handle = thread::Builder::new()
        .name(name.clone())
        .spawn(f)
        .map_err(|source| SessionError::Spawn {
            name: name.clone(),
            source,
        })?;
    Ok(Worker { name, handle })
}

impl Session {
    /// Validates `config`, builds the warehouse and starts every thread.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Config`] if the configuration is invalid; nothing
    ///   is started.
    /// - [`SessionError::Spawn`] if a thread cannot be created; threads that
    ///   did start are stopped and joined first.
    pub fn start<D>(config: SessionConfig, deliver: D) -> Result<Self, SessionError>
    where
        D: Fn(usize, Vehicle) + Send + Sync + 'static,
    {
        config.validate()?;
        let channel = Arc::new(BoundedChannel::new(config.capacity).map_err(ConfigError::from)?);
        let (trigger, token) = shutdown();

        let mut session = Session {
            channel,
            factory: Arc::new(VehicleFactory::new()),
            trigger: Some(trigger),
            producers: Vec::with_capacity(config.producers),
            dealers: Vec::with_capacity(config.consumers),
        };

        if let Err(e) = session.spawn_all(&config, &token, Arc::new(deliver)) {
            // Unwind whatever did start; the spawn failure is the error to report
            let _ = session.stop();
            return Err(e);
        }

        info!(
            capacity = config.capacity,
            producers = config.producers,
            dealers = config.consumers,
            "warehouse open"
        );
        Ok(session)
    }

    fn spawn_all<D>(
        &mut self,
        config: &SessionConfig,
        token: &Shutdown,
        deliver: Arc<D>,
    ) -> Result<(), SessionError>
    where
        D: Fn(usize, Vehicle) + Send + Sync + 'static,
    {
        for dealer in 1..=config.consumers {
            let channel = Arc::clone(&self.channel);
            let deliver = Arc::clone(&deliver);
            let token = token.clone();
            let mut rng = config.rng(1_000 + dealer as u64);
            let pause = config.consume_pause;

            let worker = spawn_worker(format!("dealer-{dealer}"), move || {
                let _guard = CloseOnPanic(Arc::clone(&channel));
                debug!(dealer, "dealer started");
                let report = run_consumer(
                    &channel,
                    |vehicle: Vehicle| {
                        debug!(dealer, id = %vehicle.id(), kind = %vehicle.kind(), "delivered");
                        (*deliver)(dealer, vehicle);
                    },
                    pause,
                    &mut rng,
                    &token,
                );
                info!(dealer, consumed = report.consumed, "dealer finished");
                report
            })?;
            self.dealers.push(worker);
        }

        for producer in 1..=config.producers {
            let channel = Arc::clone(&self.channel);
            let factory = Arc::clone(&self.factory);
            let token = token.clone();
            let mut rng = config.rng(producer as u64);
            let pause = config.produce_pause;

            let worker = spawn_worker(format!("producer-{producer}"), move || {
                debug!(producer, "producer started");
                let report = run_producer(
                    &channel,
                    |rng: &mut StdRng| {
                        let vehicle = factory.random(rng);
                        debug!(producer, id = %vehicle.id(), kind = %vehicle.kind(), "produced");
                        vehicle
                    },
                    pause,
                    &mut rng,
                    &token,
                );
                info!(producer, produced = report.produced, "producer finished");
                report
            })?;
            self.producers.push(worker);
        }

        Ok(())
    }

    /// The shared warehouse.
    pub fn channel(&self) -> &BoundedChannel<Vehicle> {
        &self.channel
    }

    /// The shared vehicle factory.
    pub fn factory(&self) -> &VehicleFactory {
        &self.factory
    }

    /// Stops producing, drains the warehouse and joins every thread.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Panicked`] for the first thread that
    /// panicked. Every other thread is still joined.
    pub fn stop(mut self) -> Result<SessionReport, SessionError> {
        info!("closing warehouse");
        if let Some(trigger) = self.trigger.take() {
            trigger.trigger();
        }
        self.finish()
    }

    /// Blocks until every producer exits on its own, then drains.
    ///
    /// Producers only exit when the warehouse is closed or a producer
    /// panics, so for a normal session this runs until the process is
    /// killed.
    ///
    /// # Errors
    ///
    /// Same as [`stop`](Self::stop).
    pub fn wait(mut self) -> Result<SessionReport, SessionError> {
        self.finish()
    }

    fn finish(&mut self) -> Result<SessionReport, SessionError> {
        let mut report = SessionReport::default();
        let mut first_error = None;

        for worker in mem::take(&mut self.producers) {
            match worker.join() {
                Ok(r) => report.produced += r.produced,
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        self.channel.close();

        for worker in mem::take(&mut self.dealers) {
            match worker.join() {
                Ok(r) => {
                    report.consumed += r.consumed;
                    report.per_dealer.push(r.consumed);
                }
                Err(e) => {
                    report.per_dealer.push(0);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                info!(
                    produced = report.produced,
                    consumed = report.consumed,
                    "warehouse closed"
                );
                Ok(report)
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // Unblock every worker even if the session was never stopped
        self.trigger.take();
        self.channel.close();
    }
}
