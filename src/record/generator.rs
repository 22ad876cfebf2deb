use chrono::{DateTime, Utc};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::types::{Level, LogRecord, Service, DUMMY_MESSAGE, HOST_COUNT};

/// Samples independent, uniformly distributed records from an injected RNG.
///
/// Timestamps never go backwards within one generator: a wall clock that steps
/// back is clamped to the last emitted instant.
pub struct RecordGenerator<R: Rng = SmallRng> {
    rng: R,
    last_timestamp: Option<DateTime<Utc>>,
}

impl RecordGenerator<SmallRng> {
    /// Reproducible sequence of field choices for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }

    pub fn from_os_rng() -> Self {
        Self::new(SmallRng::from_os_rng())
    }
}

impl<R: Rng> RecordGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            last_timestamp: None,
        }
    }

    pub fn sample(&mut self) -> LogRecord {
        self.sample_at(Utc::now())
    }

    pub fn sample_at(&mut self, now: DateTime<Utc>) -> LogRecord {
        let timestamp = match self.last_timestamp {
            Some(last) if now < last => last,
            _ => now,
        };
        self.last_timestamp = Some(timestamp);

        let service = Service::ALL[self.rng.random_range(0..Service::ALL.len())];
        let level = Level::ALL[self.rng.random_range(0..Level::ALL.len())];
        let host = LogRecord::host_name(self.rng.random_range(1..=HOST_COUNT));

        LogRecord {
            service,
            level,
            message: DUMMY_MESSAGE.to_string(),
            timestamp,
            host,
        }
    }
}
