/// `Database` custom resource
pub mod api;

/// Client, configuration and metrics shared by the reconcilers
pub mod context;
pub use context::{Context, State};

/// Deployment + claim backed databases
pub mod local;
pub use local::Local;

/// Provider traits consumed by the outer control loop
pub mod provider;
pub use provider::{DatabaseProvider, ServiceProvider};

/// Externally hosted databases
pub mod rds;
pub use rds::Rds;

/// Errors, config, metrics, logging and the fetch-or-create/wait primitives
pub mod util;
pub use util::errors::{Error, Result};
pub use util::telemetry;

#[cfg(test)]
pub mod fixtures;
