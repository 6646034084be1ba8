//! Dynamic resolution of named model implementations.
//!
//! A [`ModelBinder`] maps implementation names to pipeline factories
//! registered at startup. Resolution is by name only — the version is routing
//! metadata, so distinct versions of one name share the implementation but
//! each bind produces its own loaded instance.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::model::contract::{ModelIdentity, ModelImplementation};
use crate::model::error::InferenceError;
use crate::model::pipeline::{InferenceHandler, ModelPipeline};

/// A binding failure. Both variants indicate the deployment is misconfigured,
/// not that a request was bad; they abort the operation that triggered the
/// bind and are never folded into a per-request error envelope.
#[derive(Debug, Error)]
pub enum BindError {
    /// No implementation registered under the requested name.
    #[error("Unknown model implementation: {0}")]
    UnknownModel(String),

    /// The implementation's load step failed.
    #[error("Model load failed: {0}")]
    LoadFailed(String),
}

type PipelineFactory = Box<
    dyn Fn(ModelIdentity, Option<String>) -> Result<Arc<dyn InferenceHandler>, InferenceError>
        + Send
        + Sync,
>;

/// Registry of pluggable model implementations, keyed by name.
#[derive(Default)]
pub struct ModelBinder {
    factories: HashMap<String, PipelineFactory>,
}

impl ModelBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an implementation under its own name. Registering the same
    /// name twice replaces the earlier factory.
    pub fn register<M>(&mut self, implementation: M)
    where
        M: ModelImplementation + Clone,
    {
        debug!("registering model implementation {}", M::name());
        self.factories.insert(
            M::name().to_string(),
            Box::new(move |identity, override_type| {
                let pipeline = ModelPipeline::bind(identity, implementation.clone(), override_type)?;
                Ok(Arc::new(pipeline) as Arc<dyn InferenceHandler>)
            }),
        );
    }

    /// Whether an implementation is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Resolve the implementation for `identity.name` and construct a ready
    /// pipeline. Synchronous and blocking: the model is fully loaded before
    /// this returns, so a pipeline is never exposed to traffic half-loaded.
    pub fn bind(
        &self,
        identity: ModelIdentity,
        response_content_type: Option<String>,
    ) -> Result<Arc<dyn InferenceHandler>, BindError> {
        let factory = self
            .factories
            .get(&identity.name)
            .ok_or_else(|| BindError::UnknownModel(identity.name.clone()))?;

        debug!("binding model {}", identity);
        factory(identity, response_content_type).map_err(|e| BindError::LoadFailed(e.to_string()))
    }
}
