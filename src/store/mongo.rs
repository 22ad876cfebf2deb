use mongodb::bson::{doc, Bson, DateTime as BsonDateTime, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use tracing::{debug, info};

use super::{InsertAck, LogStore, StoreError};
use crate::config::EmitterConfig;
use crate::record::{Level, LogRecord, Service};

const APP_NAME: &str = "log-emitter";

/// One MongoDB client opened at startup and reused for the whole process.
#[derive(Clone)]
pub struct MongoStore {
    collection: Collection<Document>,
    namespace: String,
}

impl MongoStore {
    /// Client construction is lazy: an unreachable server only shows up on the
    /// first operation, once server selection times out.
    pub async fn connect(config: &EmitterConfig) -> Result<Self, StoreError> {
        let connect_err = |source| StoreError::Connect {
            uri: config.mongo_uri.clone(),
            source,
        };

        let mut options = ClientOptions::parse(config.mongo_uri.as_str())
            .await
            .map_err(connect_err)?;
        options.app_name = Some(APP_NAME.to_string());
        if let Some(timeout) = config.server_selection_timeout {
            options.server_selection_timeout = Some(timeout);
        }

        let client = Client::with_options(options).map_err(connect_err)?;
        let collection = client
            .database(&config.database)
            .collection::<Document>(&config.collection);
        let namespace = format!("{}.{}", config.database, config.collection);

        info!(uri = %config.mongo_uri, %namespace, "MongoDB client ready");
        Ok(Self {
            collection,
            namespace,
        })
    }

    pub async fn count_documents(&self) -> Result<u64, StoreError> {
        self.collection
            .count_documents(doc! {})
            .await
            .map_err(|source| self.query_err(source))
    }

    /// Reads every document back as a record, in natural order.
    pub async fn fetch_all(&self) -> Result<Vec<LogRecord>, StoreError> {
        let mut cursor = self
            .collection
            .find(doc! {})
            .await
            .map_err(|source| self.query_err(source))?;

        let mut records = Vec::new();
        while cursor.advance().await.map_err(|source| self.query_err(source))? {
            let raw = cursor
                .deserialize_current()
                .map_err(|source| self.query_err(source))?;
            records.push(from_document(&raw)?);
        }
        Ok(records)
    }

    /// Drops every document in the collection. Used to reset test collections.
    pub async fn clear(&self) -> Result<u64, StoreError> {
        let result = self
            .collection
            .delete_many(doc! {})
            .await
            .map_err(|source| self.query_err(source))?;
        Ok(result.deleted_count)
    }

    fn query_err(&self, source: mongodb::error::Error) -> StoreError {
        StoreError::Query {
            namespace: self.namespace.clone(),
            source,
        }
    }
}

impl LogStore for MongoStore {
    async fn insert_one(&self, record: &LogRecord) -> Result<InsertAck, StoreError> {
        let result = self
            .collection
            .insert_one(to_document(record))
            .await
            .map_err(|source| StoreError::Insert {
                namespace: self.namespace.clone(),
                source,
            })?;

        let id = match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        };
        debug!(namespace = %self.namespace, %id, "document inserted");
        Ok(InsertAck { id: Some(id) })
    }

    fn namespace(&self) -> String {
        self.namespace.clone()
    }
}

/// Timestamp goes in as a native BSON date, everything else as strings.
pub fn to_document(record: &LogRecord) -> Document {
    doc! {
        "service": record.service.as_str(),
        "level": record.level.as_str(),
        "message": record.message.as_str(),
        "timestamp": BsonDateTime::from_chrono(record.timestamp),
        "host": record.host.as_str(),
    }
}

pub fn from_document(raw: &Document) -> Result<LogRecord, StoreError> {
    let field = |key: &str| {
        raw.get_str(key)
            .map_err(|e| StoreError::Decode(format!("{key}: {e}")))
    };

    let service = field("service")?;
    let level = field("level")?;
    let timestamp = raw
        .get_datetime("timestamp")
        .map_err(|e| StoreError::Decode(format!("timestamp: {e}")))?;

    Ok(LogRecord {
        service: Service::parse(service)
            .ok_or_else(|| StoreError::Decode(format!("unknown service {service:?}")))?,
        level: Level::parse(level)
            .ok_or_else(|| StoreError::Decode(format!("unknown level {level:?}")))?,
        message: field("message")?.to_string(),
        timestamp: timestamp.to_chrono(),
        host: field("host")?.to_string(),
    })
}
