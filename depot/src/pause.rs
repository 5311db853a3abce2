//! Randomized think time between driver iterations.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;

/// Error parsing or building a [`Pause`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PauseError {
    /// Input is neither `MS` nor `MIN..MAX`.
    #[error("invalid pause `{0}`: expected MS or MIN..MAX in milliseconds")]
    Malformed(String),

    /// Lower bound above upper bound.
    #[error("invalid pause: min {min} ms exceeds max {max} ms")]
    Inverted {
        /// Lower bound in milliseconds.
        min: u64,
        /// Upper bound in milliseconds.
        max: u64,
    },
}

/// Uniform random delay in `min..=max` milliseconds.
///
/// Parses from `"250"` (fixed) or `"100..1000"` (inclusive range).
///
/// # Example
///
/// ```
/// use depot::Pause;
///
/// let pause: Pause = "100..1000".parse().unwrap();
/// assert_eq!(pause, Pause::PRODUCER);
///
/// let mut rng = rand::thread_rng();
/// let d = pause.sample(&mut rng);
/// assert!((100..=1000).contains(&d.as_millis()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pause {
    min_ms: u64,
    max_ms: u64,
}

impl Pause {
    /// Default producer think time: 100 to 1000 ms.
    pub const PRODUCER: Pause = Pause {
        min_ms: 100,
        max_ms: 1000,
    };

    /// Default consumer think time: 200 to 1200 ms.
    pub const CONSUMER: Pause = Pause {
        min_ms: 200,
        max_ms: 1200,
    };

    /// No pause at all.
    pub const NONE: Pause = Pause::fixed(0);

    /// Creates a pause drawn uniformly from `min_ms..=max_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`PauseError::Inverted`] if `min_ms > max_ms`.
    pub fn new(min_ms: u64, max_ms: u64) -> Result<Self, PauseError> {
        if min_ms > max_ms {
            return Err(PauseError::Inverted {
                min: min_ms,
                max: max_ms,
            });
        }
        Ok(Self { min_ms, max_ms })
    }

    /// A pause that always lasts exactly `ms` milliseconds.
    pub const fn fixed(ms: u64) -> Self {
        Self {
            min_ms: ms,
            max_ms: ms,
        }
    }

    /// Lower bound.
    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }

    /// Upper bound (inclusive).
    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }

    /// Draws one delay.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Duration {
        if self.min_ms == self.max_ms {
            return self.min();
        }
        Duration::from_millis(rng.gen_range(self.min_ms..=self.max_ms))
    }
}

impl fmt::Display for Pause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min_ms == self.max_ms {
            write!(f, "{}", self.min_ms)
        } else {
            write!(f, "{}..{}", self.min_ms, self.max_ms)
        }
    }
}

impl FromStr for Pause {
    type Err = PauseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || PauseError::Malformed(s.to_string());
        let parse = |part: &str| part.trim().parse::<u64>().map_err(|_| malformed());

        match s.split_once("..") {
            Some((min, max)) => Pause::new(parse(min)?, parse(max)?),
            None => Ok(Pause::fixed(parse(s)?)),
        }
    }
}
