use std::io::Write;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::Rng;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use super::ack::Acknowledgement;
use super::EmitterError;
use crate::record::{LogRecord, RecordGenerator};
use crate::store::LogStore;
use crate::telemetry::{EmitterEvent, TelemetryRecorder, TelemetrySnapshot};

/// Build a record, insert it, acknowledge it, sleep. Until cancelled or an insert fails.
pub struct Emitter<S, W, R = SmallRng>
where
    S: LogStore,
    W: Write,
    R: Rng,
{
    store: S,
    generator: RecordGenerator<R>,
    out: W,
    interval: Duration,
    cancel: CancellationToken,
    run_id: Uuid,
    iterations: u64,
    pub telemetry: TelemetryRecorder,
}

impl<S, W, R> Emitter<S, W, R>
where
    S: LogStore,
    W: Write,
    R: Rng,
{
    pub fn new(store: S, generator: RecordGenerator<R>, out: W, interval: Duration) -> Self {
        Self {
            store,
            generator,
            out,
            interval,
            cancel: CancellationToken::new(),
            run_id: Uuid::new_v4(),
            iterations: 0,
            telemetry: TelemetryRecorder::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Cancelling the returned token ends `run` at its next check.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Id of the current or most recent run; a fresh one is drawn each time `run` starts.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Loops until the token is cancelled. The first failed insert ends the run
    /// with an error; there is no retry.
    pub async fn run(&mut self) -> Result<TelemetrySnapshot, EmitterError> {
        self.run_id = Uuid::new_v4();
        let span = info_span!("emitter", run_id = %self.run_id, namespace = %self.store.namespace());
        self.run_loop().instrument(span).await
    }

    async fn run_loop(&mut self) -> Result<TelemetrySnapshot, EmitterError> {
        let interval_ms = u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX);
        info!(interval_ms, "emitter started");

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            self.emit_once().await?;

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = sleep(self.interval) => {}
            }
        }

        self.telemetry.record(EmitterEvent::Stopped {
            iterations: self.iterations,
        });
        let snapshot = self.telemetry.snapshot();
        info!(
            inserted = snapshot.inserted,
            avg_latency_ms = snapshot.latency.avg_ms,
            max_latency_ms = snapshot.latency.max_ms,
            "emitter stopped"
        );
        Ok(snapshot)
    }

    /// A single iteration without the trailing sleep.
    pub async fn emit_once(&mut self) -> Result<LogRecord, EmitterError> {
        let record = self.generator.sample();
        let started = Instant::now();

        let ack = match self.store.insert_one(&record).await {
            Ok(ack) => ack,
            Err(e) => {
                self.telemetry.record(EmitterEvent::InsertFailed {
                    latency_ms: elapsed_ms(started),
                });
                error!(error = %e, iteration = self.iterations, "insert failed, stopping");
                return Err(e.into());
            }
        };
        let latency_ms = elapsed_ms(started);

        // Counted as soon as the store has it, whether or not the ack below goes out
        self.iterations += 1;
        self.telemetry.record(EmitterEvent::RecordInserted {
            service: record.service,
            level: record.level,
            latency_ms,
        });

        writeln!(
            self.out,
            "{}",
            Acknowledgement {
                record: &record,
                id: ack.id.as_deref(),
            }
        )?;
        self.out.flush()?;

        debug!(
            service = %record.service,
            level = %record.level,
            host = %record.host,
            latency_ms,
            "record emitted"
        );

        Ok(record)
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
