//! The serving-substrate interface.
//!
//! The registry and server talk to the cluster only through [`ServeCluster`],
//! so lifecycle logic stays independent of where records actually live. The
//! in-process implementation is [`LocalCluster`](crate::cluster::local::LocalCluster).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::cluster::endpoint::HttpMethod;
use crate::model::InferenceHandler;

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("Backend '{0}' not found")]
    BackendNotFound(String),

    #[error("Cluster operation failed: {0}")]
    OperationFailed(String),
}

/// Cluster-side record of a deployed backend: the bound pipeline plus the
/// opaque resource options it was deployed with.
#[derive(Clone)]
pub struct BackendRecord {
    pub handler: Arc<dyn InferenceHandler>,
    pub options: Option<HashMap<String, Value>>,
}

/// Cluster-side record of a routable endpoint.
#[derive(Debug, Clone)]
pub struct EndpointRecord {
    /// Backend id this endpoint forwards to.
    pub backend: String,
    pub route: String,
    pub methods: Vec<HttpMethod>,
}

/// Create/delete operations the serving substrate must provide.
///
/// Creates overwrite silently: identifiers are deterministic, so writing the
/// same id twice is an update, never a duplicate. Deletes report whether the
/// record existed — deleting a missing record is not an error, which keeps
/// replace safe on a first-time deploy.
#[async_trait]
pub trait ServeCluster: Send + Sync {
    /// Create or overwrite a backend record.
    async fn create_backend(
        &self,
        backend_id: &str,
        backend: BackendRecord,
    ) -> Result<(), ClusterError>;

    /// Delete a backend record, returning whether it existed.
    async fn delete_backend(&self, backend_id: &str) -> Result<bool, ClusterError>;

    /// Create or overwrite an endpoint record. The referenced backend must
    /// already exist.
    async fn create_endpoint(
        &self,
        endpoint_id: &str,
        endpoint: EndpointRecord,
    ) -> Result<(), ClusterError>;

    /// Delete an endpoint record, returning whether it existed.
    async fn delete_endpoint(&self, endpoint_id: &str) -> Result<bool, ClusterError>;

    async fn get_backend(&self, backend_id: &str) -> Option<BackendRecord>;

    async fn get_endpoint(&self, endpoint_id: &str) -> Option<EndpointRecord>;

    /// All endpoints with their ids, in no particular order.
    async fn list_endpoints(&self) -> Vec<(String, EndpointRecord)>;
}

// ============================================================================
// Recording mock for lifecycle-order assertions (no I/O)
// ============================================================================
