use kube::client::Client;
use std::sync::Arc;

use crate::util::{config::Config, metrics::Metrics};

/// State shared between the reconcilers and whoever serves metrics
#[derive(Clone, Default)]
pub struct State {
    /// Metrics registry
    registry: prometheus::Registry,
}

impl State {
    /// Metrics getter
    pub fn metrics(&self) -> Vec<prometheus::proto::MetricFamily> {
        self.registry.gather()
    }

    /// Create a reconciler Context whose metrics land in this State's registry.
    ///
    /// Fails if a context was already created from this State.
    pub fn to_context(&self, client: Client, config: Config) -> Result<Arc<Context>, prometheus::Error> {
        Ok(Arc::new(Context {
            client,
            config,
            metrics: Metrics::default().register(&self.registry)?,
        }))
    }
}

// Context for our reconcilers
#[derive(Clone)]
pub struct Context {
    /// Kubernetes client
    pub client: Client,
    /// Operator configuration
    pub config: Config,
    /// Prometheus metrics
    pub metrics: Metrics,
}

impl Context {
    /// Context with unregistered metrics, for callers that do not export them.
    pub fn new(client: Client, config: Config) -> Arc<Context> {
        Arc::new(Context {
            client,
            config,
            metrics: Metrics::default(),
        })
    }
}
