use serde::{Deserialize, Serialize};

use crate::record::{Level, Service};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmitterEvent {
    RecordInserted {
        service: Service,
        level: Level,
        latency_ms: u64,
    },

    /// The insert that ended the run.
    InsertFailed {
        latency_ms: u64,
    },

    Stopped {
        iterations: u64,
    },
}
