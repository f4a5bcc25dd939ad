pub mod config;
pub mod errors;
pub mod metrics;
pub mod quantity;
pub mod reconcile;
pub mod telemetry;
pub mod wait;

pub use errors::*;
