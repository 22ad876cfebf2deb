pub mod types;
pub mod generator;

pub use types::*;
pub use generator::*;
