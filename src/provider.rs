#![allow(async_fn_in_trait)]

use crate::api::v1::Database;
use crate::util::errors::Result;

/// Something that can stand up and tear down the workload behind a `Database`
pub trait DatabaseProvider {
    /// Bring the database to its desired state, returning the name of the workload.
    async fn create_database(&self, db: &Database) -> Result<String>;

    async fn delete_database(&self, db: &Database) -> Result<()>;
}

/// In-cluster plumbing for databases hosted outside the cluster
pub trait ServiceProvider {
    /// Point `internal_name` in `namespace` at `hostname`.
    async fn ensure_external_service(&self, namespace: &str, hostname: &str, internal_name: &str) -> Result<()>;

    async fn delete_external_service(&self, namespace: &str, name: &str) -> Result<()>;

    /// Decoded value of `key` in secret `name`.
    async fn resolve_secret(&self, namespace: &str, name: &str, key: &str) -> Result<String>;
}
