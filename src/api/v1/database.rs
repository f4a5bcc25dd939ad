use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Generate the Kubernetes wrapper struct `Database` from our Spec and Status struct
///
/// This provides a hook for generating the CRD yaml (in crdgen.rs)
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, JsonSchema)]
#[cfg_attr(test, derive(Default))]
#[kube(kind = "Database", group = "k8s.io", version = "v1", namespaced)]
#[kube(status = "DatabaseStatus", shortname = "db")]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSpec {
    /// Image name of the engine, e.g. `postgres`
    pub engine: String,
    /// Image tag; empty means `latest`
    #[serde(default)]
    pub version: String,
    /// Volume size in GiB
    pub size: i64,
    pub username: String,
    #[serde(rename = "dbname")]
    pub db_name: String,
    pub password: SecretRef,
    /// Keep the volume when the database is deleted
    #[serde(default)]
    pub delete_protection: bool,
}

/// A key inside a secret in the database's namespace
#[derive(Deserialize, Serialize, Clone, Default, Debug, PartialEq, JsonSchema)]
pub struct SecretRef {
    pub name: String,
    pub key: String,
}

/// The status object of `Database`
#[derive(Deserialize, Serialize, Clone, Default, Debug, JsonSchema)]
pub struct DatabaseStatus {
    pub state: Option<String>,
    pub message: Option<String>,
}
