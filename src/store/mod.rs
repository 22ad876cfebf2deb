use std::future::Future;
use thiserror::Error;

use crate::record::LogRecord;

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not set up client for {uri}")]
    Connect {
        uri: String,
        #[source]
        source: mongodb::error::Error,
    },
    #[error("insert into {namespace} failed")]
    Insert {
        namespace: String,
        #[source]
        source: mongodb::error::Error,
    },
    #[error("query on {namespace} failed")]
    Query {
        namespace: String,
        #[source]
        source: mongodb::error::Error,
    },
    #[error("stored document is not a log record: {0}")]
    Decode(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// What the store reports back for one accepted document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertAck {
    /// Server-assigned document id, when the backend generates one.
    pub id: Option<String>,
}

/// The single write the emitter needs: put one document into one collection.
pub trait LogStore {
    fn insert_one(
        &self,
        record: &LogRecord,
    ) -> impl Future<Output = Result<InsertAck, StoreError>> + Send;

    /// `database.collection` style name, used in diagnostics.
    fn namespace(&self) -> String;
}
