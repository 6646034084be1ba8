use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::cluster::{EndpointRegistry, LocalCluster};
use crate::metrics::RequestMetrics;
use crate::model::ModelBinder;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub cluster: LocalCluster,
    pub registry: Arc<EndpointRegistry>,
    pub metrics: Arc<RequestMetrics>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(binder: ModelBinder) -> Self {
        let cluster = LocalCluster::new();
        let registry = EndpointRegistry::new(Arc::new(cluster.clone()), Arc::new(binder));

        Self {
            cluster,
            registry: Arc::new(registry),
            metrics: Arc::new(RequestMetrics::new()),
            started_at: Utc::now(),
        }
    }

    /// Seconds since the gateway started
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
