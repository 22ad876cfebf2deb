use std::fmt;

use crate::record::LogRecord;

pub const ACK_PREFIX: &str = "Inserted log:";

/// The stdout line printed after a successful insert.
pub struct Acknowledgement<'a> {
    pub record: &'a LogRecord,
    pub id: Option<&'a str>,
}

impl fmt::Display for Acknowledgement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self.record).map_err(|_| fmt::Error)?;
        write!(f, "{} {}", ACK_PREFIX, json)?;
        if let Some(id) = self.id {
            write!(f, " _id={}", id)?;
        }
        Ok(())
    }
}
