use crate::api::v1::Database;
use crate::util::errors::{is_not_found, Error, ErrorWithRequeue, Result, StdError};
use crate::util::wait::retry;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::PersistentVolumeClaim;
use kube::api::{Api, DeleteParams};
use kube::{Resource, ResourceExt};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tracing::{debug, info, warn};

use super::Local;

/// Deletes `name`, treating an already missing object as deleted.
async fn delete_if_present<K>(api: &Api<K>, name: &str) -> Result<(), kube::Error>
where
    K: Resource + Clone + DeserializeOwned + Debug,
{
    match api.delete(name, &DeleteParams::default()).await {
        Ok(_) => Ok(()),
        Err(e) if is_not_found(&e) => {
            debug!("{} already gone", name);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

impl Local {
    /// Remove the Deployment, then the claim unless the database is delete protected.
    ///
    /// Each resource gets its own retry budget, so a failing claim delete never
    /// re-issues the Deployment delete.
    pub(super) async fn delete_resources(&self, db: &Database) -> Result<()> {
        let name = db.name_any();
        let namespace = Self::namespace(db)?;
        let retry_config = &self.ctx.config.delete_retry;

        let deployments: Api<Deployment> = Api::namespaced(self.ctx.client.clone(), &namespace);
        retry("deleting the deployment", retry_config, || {
            delete_if_present(&deployments, &name)
        })
        .await
        .map_err(|(attempts, source)| self.attempts_exceeded("deployment", &name, attempts, source))?;
        info!("deleted deployment {}", name);

        if db.spec.delete_protection {
            warn!(
                "Trying to delete {} in {} which is a delete protected database, keeping its pvc",
                name, namespace
            );
            return Ok(());
        }

        let pvcs: Api<PersistentVolumeClaim> = Api::namespaced(self.ctx.client.clone(), &namespace);
        retry("deleting the pvc", retry_config, || delete_if_present(&pvcs, &name))
            .await
            .map_err(|(attempts, source)| self.attempts_exceeded("pvc", &name, attempts, source))?;
        info!("deleted pvc {}", name);

        Ok(())
    }

    fn attempts_exceeded(&self, kind: &'static str, name: &str, attempts: u32, source: kube::Error) -> Error {
        Error::ErrorWithRequeue(ErrorWithRequeue::new(
            StdError::AttemptsExceeded {
                kind,
                name: name.to_string(),
                attempts,
                source,
            },
            self.ctx.config.requeue(),
        ))
    }
}
