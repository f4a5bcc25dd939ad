use kube::api::{Api, PostParams};
use kube::Resource;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

/// Outcome of comparing what the cluster has with what we want.
#[derive(Clone, Debug, PartialEq)]
pub enum Decision<K> {
    /// Nothing exists yet, submit the desired object as-is
    Create(K),
    /// The current object with the desired fields written over it
    Update(K),
}

impl<K> Decision<K> {
    /// Fetch-or-create: `merge` receives `(current, desired)` and returns the object to write.
    pub fn plan(current: Option<K>, desired: K, merge: impl FnOnce(K, K) -> K) -> Self {
        match current {
            None => Decision::Create(desired),
            Some(current) => Decision::Update(merge(current, desired)),
        }
    }

    pub fn is_create(&self) -> bool {
        matches!(self, Decision::Create(_))
    }

    pub fn object(&self) -> &K {
        match self {
            Decision::Create(k) | Decision::Update(k) => k,
        }
    }

    pub fn into_inner(self) -> K {
        match self {
            Decision::Create(k) | Decision::Update(k) => k,
        }
    }
}

/// Submits a decision: `Create` posts, `Update` replaces the named object.
pub async fn apply<K>(api: &Api<K>, name: &str, decision: &Decision<K>) -> Result<K, kube::Error>
where
    K: Resource + Clone + DeserializeOwned + Serialize + Debug,
{
    let pp = PostParams::default();
    match decision {
        Decision::Create(obj) => api.create(&pp, obj).await,
        Decision::Update(obj) => api.replace(name, &pp, obj).await,
    }
}
