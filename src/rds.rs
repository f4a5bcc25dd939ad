//! Databases hosted outside the cluster, reached through an `ExternalName` Service.
use crate::context::Context;
use crate::provider::ServiceProvider;
use crate::util::errors::Result;
use std::sync::Arc;
use tracing::info;

pub mod service;

pub struct Rds {
    ctx: Arc<Context>,
}

impl Rds {
    pub fn new(ctx: Arc<Context>) -> Self {
        Rds { ctx }
    }
}

impl ServiceProvider for Rds {
    async fn ensure_external_service(&self, namespace: &str, hostname: &str, internal_name: &str) -> Result<()> {
        self.ensure_service(namespace, hostname, internal_name).await
    }

    /// No-op. The Service outlives the chart that created it.
    async fn delete_external_service(&self, namespace: &str, name: &str) -> Result<()> {
        info!(
            "delete of service {} in namespace {} requested; external services are never deleted",
            name, namespace
        );
        Ok(())
    }

    async fn resolve_secret(&self, namespace: &str, name: &str, key: &str) -> Result<String> {
        self.secret_value(namespace, name, key).await
    }
}
