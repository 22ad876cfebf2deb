use thiserror::Error;

use crate::store::StoreError;

pub mod ack;
pub mod runner;

pub use ack::Acknowledgement;
pub use runner::Emitter;

#[derive(Debug, Error)]
pub enum EmitterError {
    /// Insert failures are never retried; the run ends on the first one.
    #[error("storage write failed")]
    Store(#[from] StoreError),
    #[error("failed to write acknowledgement")]
    Output(#[from] std::io::Error),
}
