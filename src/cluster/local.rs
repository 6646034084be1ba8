//! In-process serving substrate backed by concurrent maps.
//!
//! Data-plane lookups read these maps on every request, so they must never
//! block on administrative mutations; `DashMap` gives both sides lock-free
//! access in the common case.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use crate::cluster::serve::{BackendRecord, ClusterError, EndpointRecord, ServeCluster};

#[derive(Clone, Default)]
pub struct LocalCluster {
    backends: Arc<DashMap<String, BackendRecord>>,
    endpoints: Arc<DashMap<String, EndpointRecord>>,
}

impl LocalCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }
}

#[async_trait]
impl ServeCluster for LocalCluster {
    async fn create_backend(
        &self,
        backend_id: &str,
        backend: BackendRecord,
    ) -> Result<(), ClusterError> {
        debug!("creating backend {}", backend_id);
        self.backends.insert(backend_id.to_string(), backend);
        Ok(())
    }

    async fn delete_backend(&self, backend_id: &str) -> Result<bool, ClusterError> {
        let existed = self.backends.remove(backend_id).is_some();
        if existed {
            debug!("deleted backend {}", backend_id);
        }
        Ok(existed)
    }

    async fn create_endpoint(
        &self,
        endpoint_id: &str,
        endpoint: EndpointRecord,
    ) -> Result<(), ClusterError> {
        if !self.backends.contains_key(&endpoint.backend) {
            return Err(ClusterError::BackendNotFound(endpoint.backend.clone()));
        }
        debug!("creating endpoint {} at {}", endpoint_id, endpoint.route);
        self.endpoints.insert(endpoint_id.to_string(), endpoint);
        Ok(())
    }

    async fn delete_endpoint(&self, endpoint_id: &str) -> Result<bool, ClusterError> {
        let existed = self.endpoints.remove(endpoint_id).is_some();
        if existed {
            debug!("deleted endpoint {}", endpoint_id);
        }
        Ok(existed)
    }

    async fn get_backend(&self, backend_id: &str) -> Option<BackendRecord> {
        self.backends.get(backend_id).map(|r| r.clone())
    }

    async fn get_endpoint(&self, endpoint_id: &str) -> Option<EndpointRecord> {
        self.endpoints.get(endpoint_id).map(|r| r.clone())
    }

    async fn list_endpoints(&self) -> Vec<(String, EndpointRecord)> {
        self.endpoints
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect()
    }
}
