//! Databases running inside the cluster as a single-replica Deployment backed by a claim.
use crate::api::v1::Database;
use crate::context::Context;
use crate::provider::DatabaseProvider;
use crate::util::errors::{Result, StdError};
use kube::ResourceExt;
use std::sync::Arc;
use tracing::{field, instrument, Span};

pub mod delete;
pub mod deployment;
pub mod pvc;
pub mod spec;

pub struct Local {
    ctx: Arc<Context>,
}

impl Local {
    pub fn new(ctx: Arc<Context>) -> Self {
        Local { ctx }
    }

    fn namespace(db: &Database) -> Result<String> {
        db.namespace().ok_or_else(|| {
            StdError::MetadataMissing(format!("database {} has no namespace", db.name_any())).into()
        })
    }
}

impl DatabaseProvider for Local {
    /// Claim first, then the deployment that mounts it.
    #[instrument(skip(self, db), fields(name = %db.name_any(), namespace = field::Empty))]
    async fn create_database(&self, db: &Database) -> Result<String> {
        let _timer = self.ctx.metrics.count_and_measure("create_database");

        let result = async {
            let namespace = Self::namespace(db)?;
            Span::current().record("namespace", &field::display(&namespace));
            self.ensure_pvc(&db.name_any(), &namespace, db.spec.size).await?;
            self.ensure_deployment(db).await
        }
        .await;

        if let Err(e) = &result {
            self.ctx.metrics.reconcile_failure(db, e);
        }
        result
    }

    #[instrument(skip(self, db), fields(name = %db.name_any()))]
    async fn delete_database(&self, db: &Database) -> Result<()> {
        let _timer = self.ctx.metrics.count_and_measure("delete_database");

        let result = self.delete_resources(db).await;
        if let Err(e) = &result {
            self.ctx.metrics.reconcile_failure(db, e);
        }
        result
    }
}
