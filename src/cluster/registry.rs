//! Idempotent endpoint lifecycle operations.
//!
//! The registry is the operator-driven control path: it binds a pipeline for
//! each [`EndpointSpec`] and mutates the cluster's backend/endpoint records.
//! It never runs on the per-request serving path. A bind or cluster failure
//! aborts the operation for that spec — continuing with a half-configured
//! endpoint is worse than failing loudly.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::cluster::endpoint::{backend_id, endpoint_id, model_id, route, EndpointSpec};
use crate::cluster::serve::{BackendRecord, EndpointRecord, ServeCluster};
use crate::model::{ModelBinder, ModelIdentity};

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to bind model for endpoint '{0}': {1}")]
    BindFailed(String, String),

    #[error("Cluster operation failed for endpoint '{0}': {1}")]
    ClusterFailed(String, String),
}

/// Create/update/delete of endpoint+backend pairs on the cluster.
pub struct EndpointRegistry {
    cluster: Arc<dyn ServeCluster>,
    binder: Arc<ModelBinder>,
}

impl EndpointRegistry {
    pub fn new(cluster: Arc<dyn ServeCluster>, binder: Arc<ModelBinder>) -> Self {
        Self { cluster, binder }
    }

    /// Create (or overwrite) an endpoint+backend pair for each spec.
    ///
    /// Identifiers are deterministic, so publishing the same spec twice
    /// overwrites rather than duplicates.
    pub async fn publish(&self, specs: &[EndpointSpec]) -> Result<(), RegistryError> {
        for spec in specs {
            self.create(spec).await?;
        }
        Ok(())
    }

    /// Delete then recreate each spec's records, rebinding its pipeline.
    ///
    /// Used to push an updated implementation to a running cluster. Deleting
    /// records that were never deployed is a no-op, so replace is safe on a
    /// first-time deploy.
    pub async fn replace(&self, specs: &[EndpointSpec]) -> Result<(), RegistryError> {
        for spec in specs {
            self.teardown(&spec.identity()).await?;
            self.create(spec).await?;
        }
        Ok(())
    }

    /// Delete an endpoint and its backend. Always both — deletion of one
    /// without the other is never performed.
    pub async fn teardown(&self, identity: &ModelIdentity) -> Result<(), RegistryError> {
        let id = model_id(identity);

        let endpoint_existed = self
            .cluster
            .delete_endpoint(&endpoint_id(&id))
            .await
            .map_err(|e| RegistryError::ClusterFailed(id.clone(), e.to_string()))?;
        let backend_existed = self
            .cluster
            .delete_backend(&backend_id(&id))
            .await
            .map_err(|e| RegistryError::ClusterFailed(id.clone(), e.to_string()))?;

        if endpoint_existed || backend_existed {
            info!("removed endpoint {}", endpoint_id(&id));
        } else {
            debug!("endpoint {} was not deployed, nothing to remove", id);
        }
        Ok(())
    }

    async fn create(&self, spec: &EndpointSpec) -> Result<(), RegistryError> {
        let identity = spec.identity();
        let id = model_id(&identity);

        // Binding loads the model synchronously and may be slow; keep it off
        // the async executor.
        let binder = Arc::clone(&self.binder);
        let bind_identity = identity.clone();
        let override_type = spec.response_content_type.clone();
        let handler =
            tokio::task::spawn_blocking(move || binder.bind(bind_identity, override_type))
                .await
                .map_err(|e| RegistryError::BindFailed(id.clone(), e.to_string()))?
                .map_err(|e| RegistryError::BindFailed(id.clone(), e.to_string()))?;

        self.cluster
            .create_backend(
                &backend_id(&id),
                BackendRecord {
                    handler,
                    options: spec.options.clone(),
                },
            )
            .await
            .map_err(|e| RegistryError::ClusterFailed(id.clone(), e.to_string()))?;

        self.cluster
            .create_endpoint(
                &endpoint_id(&id),
                EndpointRecord {
                    backend: backend_id(&id),
                    route: route(&identity),
                    methods: spec.methods.clone(),
                },
            )
            .await
            .map_err(|e| RegistryError::ClusterFailed(id.clone(), e.to_string()))?;

        info!(
            "published endpoint {} at {}",
            endpoint_id(&id),
            route(&identity)
        );
        Ok(())
    }
}
