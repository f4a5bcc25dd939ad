use crate::util::errors::{Result, StdError};
use crate::util::reconcile::{apply, Decision};
use k8s_openapi::api::core::v1::{Secret, Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::api::{Api, ObjectMeta};
use std::collections::BTreeMap;
use tracing::{info, instrument};

use super::Rds;

pub const EXTERNAL_NAME: &str = "ExternalName";
pub const SERVICE_PORT: i32 = 5432;
pub const SERVICE_PORT_NAME: &str = "pgsql";
pub const ORIGIN_ANNOTATION: &str = "origin";
pub const ORIGIN: &str = "rds";

/// An `ExternalName` Service called `internal_name` resolving to `hostname`.
pub fn external_service(namespace: &str, hostname: &str, internal_name: &str) -> Service {
    Service {
        metadata: ObjectMeta {
            name: Some(internal_name.to_string()),
            namespace: Some(namespace.to_string()),
            annotations: Some(BTreeMap::from([(
                ORIGIN_ANNOTATION.to_string(),
                ORIGIN.to_string(),
            )])),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            type_: Some(EXTERNAL_NAME.to_string()),
            external_name: Some(hostname.to_string()),
            ports: Some(vec![ServicePort {
                name: Some(SERVICE_PORT_NAME.to_string()),
                port: SERVICE_PORT,
                target_port: Some(IntOrString::Int(SERVICE_PORT)),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        status: None,
    }
}

/// Type, target, ports and annotation are always overwritten.
///
/// Cluster IP fields are cleared since an `ExternalName` Service may not carry them.
fn merge_service(mut current: Service, desired: Service) -> Service {
    current.metadata.name = desired.metadata.name;
    current.metadata.namespace = desired.metadata.namespace;
    current.metadata.annotations = desired.metadata.annotations;

    let desired_spec = desired.spec.unwrap_or_default();
    let spec = current.spec.get_or_insert_with(Default::default);
    spec.type_ = desired_spec.type_;
    spec.external_name = desired_spec.external_name;
    spec.ports = desired_spec.ports;
    spec.cluster_ip = None;
    spec.cluster_ips = None;
    spec.ip_families = None;
    spec.ip_family_policy = None;

    current.status = None;
    current
}

impl Rds {
    #[instrument(skip(self))]
    pub(super) async fn ensure_service(&self, namespace: &str, hostname: &str, internal_name: &str) -> Result<()> {
        let services: Api<Service> = Api::namespaced(self.ctx.client.clone(), namespace);

        let current = services.get_opt(internal_name).await.map_err(StdError::KubeError)?;
        let desired = external_service(namespace, hostname, internal_name);

        let decision = Decision::plan(current, desired, merge_service);
        if decision.is_create() {
            info!("creating service {} pointing at {}", internal_name, hostname);
        } else {
            info!("updating service {} to point at {}", internal_name, hostname);
        }
        apply(&services, internal_name, &decision).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub(super) async fn secret_value(&self, namespace: &str, name: &str, key: &str) -> Result<String> {
        let secrets: Api<Secret> = Api::namespaced(self.ctx.client.clone(), namespace);
        let secret = secrets.get(name).await.map_err(|source| StdError::SecretFetchError {
            name: name.to_string(),
            source,
        })?;

        let value = secret
            .data
            .as_ref()
            .and_then(|data| data.get(key))
            .ok_or_else(|| StdError::SecretKeyMissing {
                name: name.to_string(),
                key: key.to_string(),
            })?;

        String::from_utf8(value.0.clone()).map_err(|_| {
            StdError::DecodingError(format!("key {key} of secret {name} is not valid UTF-8")).into()
        })
    }
}
