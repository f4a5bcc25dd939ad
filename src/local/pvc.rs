use crate::util::errors::{Error, ErrorWithRequeue, Result, StdError};
use crate::util::quantity::{self, gibibytes};
use crate::util::reconcile::{apply, Decision};
use crate::util::wait::poll_until;
use k8s_openapi::api::core::v1::{
    PersistentVolume, PersistentVolumeClaim, PersistentVolumeClaimSpec, ResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::api::{Api, ObjectMeta};
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

use super::Local;

pub const STORAGE_CLASS: &str = "default";
pub const STORAGE_RESOURCE: &str = "storage";
pub const BOUND_PHASE: &str = "Bound";
pub const PROVENANCE_ANNOTATION: &str = "repository";
pub const PROVENANCE: &str = env!("CARGO_PKG_REPOSITORY");

pub fn desired_pvc(name: &str, namespace: &str, size: i64) -> PersistentVolumeClaim {
    PersistentVolumeClaim {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(BTreeMap::from([("app".to_string(), name.to_string())])),
            annotations: Some(BTreeMap::from([(
                PROVENANCE_ANNOTATION.to_string(),
                PROVENANCE.to_string(),
            )])),
            ..Default::default()
        },
        spec: Some(PersistentVolumeClaimSpec {
            access_modes: Some(vec!["ReadWriteOnce".to_string()]),
            resources: Some(ResourceRequirements {
                requests: Some(BTreeMap::from([(STORAGE_RESOURCE.to_string(), gibibytes(size))])),
                ..Default::default()
            }),
            storage_class_name: Some(STORAGE_CLASS.to_string()),
            ..Default::default()
        }),
        status: None,
    }
}

pub fn storage_request(pvc: &PersistentVolumeClaim) -> Option<&Quantity> {
    pvc.spec
        .as_ref()?
        .resources
        .as_ref()?
        .requests
        .as_ref()?
        .get(STORAGE_RESOURCE)
}

/// Only the requested size of a bound claim may change, so everything else is kept.
fn merge_pvc(mut current: PersistentVolumeClaim, desired: PersistentVolumeClaim) -> PersistentVolumeClaim {
    let size = storage_request(&desired).cloned();
    current.metadata.labels = desired.metadata.labels;
    current.metadata.annotations = desired.metadata.annotations;

    if let Some(size) = size {
        current
            .spec
            .get_or_insert_with(Default::default)
            .resources
            .get_or_insert_with(Default::default)
            .requests
            .get_or_insert_with(Default::default)
            .insert(STORAGE_RESOURCE.to_string(), size);
    }
    current.status = None;
    current
}

/// A current request that cannot be parsed counts as a different size, so the update rewrites it.
fn same_size(current: &PersistentVolumeClaim, desired: &PersistentVolumeClaim) -> Result<bool> {
    let (Some(current), Some(desired)) = (storage_request(current), storage_request(desired)) else {
        return Ok(false);
    };
    match quantity::same_size(current, desired) {
        Err(Error::StdError(StdError::InvalidQuantity(raw))) => {
            warn!("pvc requests unparsable storage quantity {}: rewriting it", raw);
            Ok(false)
        }
        other => other,
    }
}

impl Local {
    /// Make sure claim `name` exists with `size` GiB, then wait for it to bind.
    ///
    /// An existing claim of the right size is left alone and not waited on.
    #[instrument(skip(self))]
    pub async fn ensure_pvc(&self, name: &str, namespace: &str, size: i64) -> Result<()> {
        let pvcs: Api<PersistentVolumeClaim> = Api::namespaced(self.ctx.client.clone(), namespace);

        let current = pvcs.get_opt(name).await.map_err(|source| StdError::PvcFetchError {
            name: name.to_string(),
            source,
        })?;
        let desired = desired_pvc(name, namespace, size);

        let unchanged = match &current {
            Some(existing) => same_size(existing, &desired)?,
            None => false,
        };
        if unchanged {
            info!("pvc {} has same size: not updating", name);
            return Ok(());
        }

        let decision = Decision::plan(current, desired, merge_pvc);
        if decision.is_create() {
            info!("creating pvc {}", name);
            apply(&pvcs, name, &decision).await?;
        } else {
            info!("updating pvc {}", name);
            apply(&pvcs, name, &decision)
                .await
                .map_err(|source| StdError::PvcUpdateError {
                    name: name.to_string(),
                    source,
                })?;
        }

        if self.ctx.config.skip_waiting {
            return Ok(());
        }
        self.wait_for_bound(&pvcs, name).await
    }

    async fn wait_for_bound(&self, pvcs: &Api<PersistentVolumeClaim>, name: &str) -> Result<()> {
        let config = &self.ctx.config.pvc_wait;
        if poll_until(config, || self.is_bound(pvcs, name)).await? {
            info!("pvc {} is ready (bound)", name);
            return Ok(());
        }

        Err(Error::ErrorWithRequeue(ErrorWithRequeue::new(
            StdError::WaitExceeded {
                name: name.to_string(),
                iterations: config.max_iterations,
            },
            self.ctx.config.requeue(),
        )))
    }

    /// Both the claim and the volume it points at report `Bound`.
    async fn is_bound(&self, pvcs: &Api<PersistentVolumeClaim>, name: &str) -> Result<bool> {
        let pvc = pvcs.get(name).await.map_err(|source| StdError::PvcFetchError {
            name: name.to_string(),
            source,
        })?;

        let phase = pvc.status.as_ref().and_then(|s| s.phase.as_deref());
        let volume_name = pvc.spec.as_ref().and_then(|s| s.volume_name.as_deref());
        let volume_name = match (phase, volume_name) {
            (Some(BOUND_PHASE), Some(volume_name)) => volume_name,
            _ => return Ok(false),
        };

        let pvs: Api<PersistentVolume> = Api::all(self.ctx.client.clone());
        let pv = pvs.get(volume_name).await.map_err(|source| StdError::PvFetchError {
            name: volume_name.to_string(),
            source,
        })?;

        Ok(pv.status.and_then(|s| s.phase).as_deref() == Some(BOUND_PHASE))
    }
}
