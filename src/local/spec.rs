use crate::api::v1::Database;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec, DeploymentStrategy};
use k8s_openapi::api::core::v1::{
    Affinity, Container, ContainerPort, EnvVar, EnvVarSource, NodeAffinity, NodeSelector,
    NodeSelectorRequirement, NodeSelectorTerm, PersistentVolumeClaimVolumeSource, PodSpec,
    PodTemplateSpec, SecretKeySelector, Toleration, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use kube::ResourceExt;
use std::collections::BTreeMap;

pub const DATA_MOUNT_PATH: &str = "/var/lib/postgresql/data";
pub const PGDATA: &str = "/var/lib/postgresql/data/pgdata";
pub const POSTGRES_PORT: i32 = 5432;
pub const PORT_NAME: &str = "pgsql";
pub const MAX_CONNECTIONS: &str = "400";
pub const DEFAULT_VERSION: &str = "latest";

/// Label tying the deployment, its selector and its pods to one database
pub const DB_LABEL: &str = "db";

/// `[repository/]engine:version`, version defaulting to `latest`.
pub fn image(engine: &str, version: &str, repository: Option<&str>) -> String {
    let version = if version.is_empty() { DEFAULT_VERSION } else { version };
    match repository.filter(|r| !r.is_empty()) {
        Some(repository) => format!("{repository}/{engine}:{version}"),
        None => format!("{engine}:{version}"),
    }
}

pub fn labels(db: &Database) -> BTreeMap<String, String> {
    BTreeMap::from([(DB_LABEL.to_string(), db.name_any())])
}

pub fn volume_name(db: &Database) -> String {
    format!("{}-data", db.name_any())
}

/// The complete desired Deployment for a database.
pub fn desired_deployment(db: &Database, repository: Option<&str>) -> Deployment {
    Deployment {
        metadata: ObjectMeta {
            name: Some(db.name_any()),
            namespace: db.namespace(),
            labels: Some(labels(db)),
            ..Default::default()
        },
        spec: Some(deployment_spec(db, repository)),
        status: None,
    }
}

pub fn deployment_spec(db: &Database, repository: Option<&str>) -> DeploymentSpec {
    let name = db.name_any();
    let labels = labels(db);

    DeploymentSpec {
        replicas: Some(1),
        selector: LabelSelector {
            match_labels: Some(labels.clone()),
            ..Default::default()
        },
        // the single ReadWriteOnce volume cannot be attached to two pods at once
        strategy: Some(DeploymentStrategy {
            type_: Some("Recreate".to_string()),
            ..Default::default()
        }),
        template: PodTemplateSpec {
            metadata: Some(ObjectMeta {
                labels: Some(labels),
                ..Default::default()
            }),
            spec: Some(PodSpec {
                tolerations: Some(tolerations()),
                affinity: Some(affinity()),
                containers: vec![Container {
                    name: name.clone(),
                    image: Some(image(&db.spec.engine, &db.spec.version, repository)),
                    env: Some(env(db)),
                    args: Some(vec!["-N".to_string(), MAX_CONNECTIONS.to_string()]),
                    ports: Some(vec![ContainerPort {
                        name: Some(PORT_NAME.to_string()),
                        protocol: Some("TCP".to_string()),
                        container_port: POSTGRES_PORT,
                        ..Default::default()
                    }]),
                    volume_mounts: Some(vec![VolumeMount {
                        name: volume_name(db),
                        mount_path: DATA_MOUNT_PATH.to_string(),
                        ..Default::default()
                    }]),
                    ..Default::default()
                }],
                volumes: Some(vec![Volume {
                    name: volume_name(db),
                    persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                        claim_name: name,
                        ..Default::default()
                    }),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
        },
        ..Default::default()
    }
}

fn env(db: &Database) -> Vec<EnvVar> {
    vec![
        EnvVar {
            name: "POSTGRES_PASSWORD".to_string(),
            value_from: Some(EnvVarSource {
                secret_key_ref: Some(SecretKeySelector {
                    name: Some(db.spec.password.name.clone()),
                    key: db.spec.password.key.clone(),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        },
        EnvVar {
            name: "POSTGRES_USER".to_string(),
            value: Some(db.spec.username.clone()),
            ..Default::default()
        },
        EnvVar {
            name: "POSTGRES_DB".to_string(),
            value: Some(db.spec.db_name.clone()),
            ..Default::default()
        },
        EnvVar {
            name: "PGDATA".to_string(),
            value: Some(PGDATA.to_string()),
            ..Default::default()
        },
    ]
}

fn tolerations() -> Vec<Toleration> {
    vec![Toleration {
        effect: Some("NoSchedule".to_string()),
        key: Some("ARM".to_string()),
        operator: Some("Equal".to_string()),
        value: Some("TRUE".to_string()),
        ..Default::default()
    }]
}

fn affinity() -> Affinity {
    Affinity {
        node_affinity: Some(NodeAffinity {
            required_during_scheduling_ignored_during_execution: Some(NodeSelector {
                node_selector_terms: vec![NodeSelectorTerm {
                    match_expressions: Some(vec![NodeSelectorRequirement {
                        key: "kubernetes.io/arch".to_string(),
                        operator: "In".to_string(),
                        values: Some(vec!["arm64".to_string()]),
                    }]),
                    ..Default::default()
                }],
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}
