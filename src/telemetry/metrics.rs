use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};

use super::event::EmitterEvent;
use crate::record::{Level, Service};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TelemetrySnapshot {
    pub inserted: u64,
    pub failed: u64,
    pub stopped: bool,
    pub by_level: BTreeMap<Level, u64>,
    pub by_service: BTreeMap<Service, u64>,
    pub latency: LatencyStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LatencyStats {
    pub total_ms: u64,
    pub max_ms: u64,
    pub avg_ms: f64,
}

pub fn compute_snapshot(events: &VecDeque<EmitterEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();

    for event in events {
        match event {
            EmitterEvent::RecordInserted {
                service,
                level,
                latency_ms,
            } => {
                snap.inserted += 1;
                *snap.by_level.entry(*level).or_default() += 1;
                *snap.by_service.entry(*service).or_default() += 1;
                snap.latency.total_ms += latency_ms;
                snap.latency.max_ms = snap.latency.max_ms.max(*latency_ms);
            }
            EmitterEvent::InsertFailed { .. } => snap.failed += 1,
            EmitterEvent::Stopped { .. } => snap.stopped = true,
        }
    }

    // Latency covers successful inserts only.
    if snap.inserted > 0 {
        snap.latency.avg_ms = snap.latency.total_ms as f64 / snap.inserted as f64;
    }

    snap
}
