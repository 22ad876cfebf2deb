use log_emitter::emitter::ack::ACK_PREFIX;
use log_emitter::record::{Level, RecordGenerator, Service, DUMMY_MESSAGE};
use log_emitter::store::{MemoryStore, StoreError};
use log_emitter::{Emitter, EmitterError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const INTERVAL: Duration = Duration::from_secs(2);

fn output_lines(buf: &[u8]) -> Vec<String> {
    String::from_utf8(buf.to_vec())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_run_fills_collection_until_cancelled() {
    let store = MemoryStore::new();
    let mut emitter = Emitter::new(store.clone(), RecordGenerator::seeded(5), Vec::new(), INTERVAL);
    let token = emitter.cancellation_token();

    let handle = tokio::spawn(async move {
        let result = emitter.run().await;
        (emitter, result)
    });

    tokio::time::sleep(Duration::from_secs(5)).await;
    token.cancel();

    let (emitter, result) = handle.await.unwrap();
    let snapshot = result.expect("run should end cleanly on cancel");

    let records = store.records().await;
    assert!(records.len() >= 2, "expected at least 2 documents, got {}", records.len());
    assert!(records.len() <= 3, "2s interval allows at most 3 inserts in 5s");
    assert_eq!(snapshot.inserted as usize, records.len());
    assert!(snapshot.stopped);
    assert_eq!(emitter.iterations() as usize, records.len());

    for record in &records {
        assert!(Service::ALL.contains(&record.service));
        assert!(Level::ALL.contains(&record.level));
        assert!(record.host_index().is_some());
        assert_eq!(record.message, DUMMY_MESSAGE);
    }
    for pair in records.windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }

    // One acknowledgement line per stored record
    let lines = output_lines(emitter.output());
    assert_eq!(lines.len(), records.len());
    assert!(lines.iter().all(|l| l.starts_with(ACK_PREFIX)));
}

#[tokio::test(start_paused = true)]
async fn test_interval_paces_inserts() {
    let store = MemoryStore::new();
    let mut emitter = Emitter::new(store.clone(), RecordGenerator::seeded(8), Vec::new(), INTERVAL);
    let token = emitter.cancellation_token();
    let handle = tokio::spawn(async move { emitter.run().await });

    // First insert happens immediately, the next only after the full interval
    tokio::time::sleep(Duration::from_millis(1_900)).await;
    assert_eq!(store.len().await, 1);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(store.len().await, 2);

    token.cancel();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_unreachable_store_stops_on_first_insert() {
    let store = MemoryStore::unreachable();
    let mut emitter = Emitter::new(store.clone(), RecordGenerator::seeded(1), Vec::new(), INTERVAL);

    let result = tokio::time::timeout(Duration::from_secs(1), emitter.run())
        .await
        .expect("a failing insert must end the run, not loop");

    match result {
        Err(EmitterError::Store(StoreError::Unavailable(_))) => {}
        other => panic!("expected store error, got {:?}", other.map(|_| ())),
    }
    assert_eq!(emitter.iterations(), 0);
    assert!(emitter.output().is_empty(), "nothing is acknowledged on failure");
    assert!(store.is_empty().await);

    let snap = emitter.telemetry.snapshot();
    assert_eq!(snap.failed, 1);
    assert_eq!(snap.inserted, 0);
}

#[tokio::test(start_paused = true)]
async fn test_store_failure_mid_run_ends_the_loop() {
    let store = MemoryStore::new();
    let mut emitter = Emitter::new(store.clone(), RecordGenerator::seeded(2), Vec::new(), INTERVAL);
    let handle = tokio::spawn(async move { emitter.run().await });

    tokio::time::sleep(Duration::from_secs(3)).await;
    store.set_unavailable(true);

    let result = handle.await.unwrap();
    assert!(matches!(result, Err(EmitterError::Store(_))));
    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn test_cancelled_before_start_inserts_nothing() {
    let store = MemoryStore::new();
    let mut emitter = Emitter::new(store.clone(), RecordGenerator::seeded(4), Vec::new(), INTERVAL);
    emitter.cancellation_token().cancel();

    let snapshot = emitter.run().await.unwrap();
    assert_eq!(snapshot.inserted, 0);
    assert!(snapshot.stopped);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_emit_once_acknowledges_the_written_record() {
    let store = MemoryStore::new();
    let mut emitter = Emitter::new(store.clone(), RecordGenerator::seeded(11), Vec::new(), INTERVAL);

    let record = emitter.emit_once().await.unwrap();
    let stored = store.records().await;
    assert_eq!(stored, vec![record.clone()]);

    let lines = output_lines(emitter.output());
    assert_eq!(lines.len(), 1);
    let line = &lines[0];
    assert!(line.starts_with("Inserted log: {"));
    assert!(line.contains(&format!("\"service\":\"{}\"", record.service)));
    assert!(line.contains(&format!("\"host\":\"{}\"", record.host)));
    assert!(line.ends_with(" _id=1"), "memory store ids are 1-based positions: {line}");
}

#[tokio::test]
async fn test_output_failure_is_reported() {
    struct BrokenPipe;
    impl std::io::Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let store = MemoryStore::new();
    let mut emitter = Emitter::new(store.clone(), RecordGenerator::seeded(6), BrokenPipe, INTERVAL);

    let result = emitter.run().await;
    assert!(matches!(result, Err(EmitterError::Output(_))));
    // The insert itself went through before the acknowledgement failed
    assert_eq!(store.len().await, 1);

    // ...and the emitter's own counters agree with the store
    let snap = emitter.telemetry.snapshot();
    assert_eq!(snap.inserted, 1);
    assert_eq!(snap.failed, 0);
    assert_eq!(emitter.iterations(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_external_token_stops_the_run() {
    let shutdown = CancellationToken::new();
    let store = MemoryStore::new();
    let mut emitter = Emitter::new(store.clone(), RecordGenerator::seeded(13), Vec::new(), INTERVAL)
        .with_cancellation(shutdown.clone());
    let handle = tokio::spawn(async move { emitter.run().await });

    tokio::time::sleep(Duration::from_secs(3)).await;
    shutdown.cancel();

    let snapshot = handle.await.unwrap().expect("cancel ends the run cleanly");
    assert!(snapshot.stopped);
    assert_eq!(snapshot.inserted, 2);
    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn test_each_run_gets_its_own_id() {
    let store = MemoryStore::new();
    let mut emitter = Emitter::new(store.clone(), RecordGenerator::seeded(14), Vec::new(), INTERVAL);
    emitter.cancellation_token().cancel();

    emitter.run().await.unwrap();
    let first = emitter.run_id();
    emitter.run().await.unwrap();
    let second = emitter.run_id();

    assert_ne!(first, second);
}
