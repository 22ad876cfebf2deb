//! In-process record of what the emitter did.
//!
//! Telemetry is write-only from the emitter's point of view: nothing in the run
//! loop reads it back to make a decision. It only ever holds IDs, enums and
//! timings, never the record payload itself.

pub mod event;
pub mod metrics;
pub mod recorder;

pub use event::EmitterEvent;
pub use metrics::{compute_snapshot, TelemetrySnapshot};
pub use recorder::TelemetryRecorder;
