use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DUMMY_MESSAGE: &str = "Dummy log message";
pub const HOST_PREFIX: &str = "server-";
pub const HOST_COUNT: u8 = 3;

/// The service a synthetic record claims to come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Service {
    #[serde(rename = "auth-service")]
    Auth,
    #[serde(rename = "payment-service")]
    Payment,
    #[serde(rename = "order-service")]
    Order,
}

impl Service {
    pub const ALL: [Service; 3] = [Service::Auth, Service::Payment, Service::Order];

    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Auth => "auth-service",
            Service::Payment => "payment-service",
            Service::Order => "order-service",
        }
    }

    pub fn parse(raw: &str) -> Option<Service> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Info, Level::Warn, Level::Error];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    pub fn parse(raw: &str) -> Option<Level> {
        Self::ALL.into_iter().find(|l| l.as_str() == raw)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One synthetic log line. Built fresh every iteration and dropped after the insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub service: Service,
    pub level: Level,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub host: String,
}

impl LogRecord {
    pub fn host_name(index: u8) -> String {
        format!("{}{}", HOST_PREFIX, index)
    }

    /// Index N of a `server-N` host, if the host is one of the known servers.
    pub fn host_index(&self) -> Option<u8> {
        self.host
            .strip_prefix(HOST_PREFIX)
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=HOST_COUNT).contains(n))
    }
}
