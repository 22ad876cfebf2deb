pub mod config;
pub mod emitter;
pub mod record;
pub mod store;
pub mod telemetry;

// Re-export the pieces the binary wires together
pub use config::EmitterConfig;
pub use emitter::{Emitter, EmitterError};
pub use record::{LogRecord, RecordGenerator};
pub use store::{LogStore, MemoryStore, MongoStore, StoreError};
