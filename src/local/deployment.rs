use crate::api::v1::Database;
use crate::util::errors::{Result, StdError};
use crate::util::reconcile::{apply, Decision};
use k8s_openapi::api::apps::v1::Deployment;
use kube::api::Api;
use kube::ResourceExt;
use tracing::{info, instrument};

use super::{spec::desired_deployment, Local};

/// Computed fields replace whatever is there; server-owned metadata is kept.
fn merge_deployment(mut current: Deployment, desired: Deployment) -> Deployment {
    current.metadata.name = desired.metadata.name;
    current.metadata.labels = desired.metadata.labels;
    current.spec = desired.spec;
    current.status = None;
    current
}

impl Local {
    /// Create or fully overwrite the database's Deployment, returning its name.
    #[instrument(skip(self, db), fields(name = %db.name_any()))]
    pub async fn ensure_deployment(&self, db: &Database) -> Result<String> {
        let name = db.name_any();
        let namespace = Self::namespace(db)?;
        let deployments: Api<Deployment> = Api::namespaced(self.ctx.client.clone(), &namespace);

        let current = deployments.get_opt(&name).await.map_err(StdError::KubeError)?;
        let desired = desired_deployment(db, self.ctx.config.image_repository());

        let decision = Decision::plan(current, desired, merge_deployment);
        if decision.is_create() {
            info!("creating database {}", name);
        } else {
            info!("updating database {}", name);
        }
        apply(&deployments, &name, &decision).await?;

        Ok(name)
    }
}
