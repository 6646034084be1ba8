//! Three-stage execution engine around one loaded model instance.
//!
//! A pipeline has two states: loading (transient, inside [`ModelPipeline::bind`])
//! and ready. There is no failed steady state — a load failure aborts
//! construction and no pipeline object exists afterwards. Once ready, every
//! request runs preprocess → predict → postprocess, short-circuiting on the
//! first failing stage.

use std::time::Instant;

use tracing::{debug, error, info};

use crate::model::contract::{
    resolve_response_type, InferenceRequest, InferenceResponse, ModelIdentity, ModelImplementation,
};
use crate::model::error::InferenceError;

/// Type-erased handle to a ready pipeline.
///
/// The registry and server share pipelines as `Arc<dyn InferenceHandler>`;
/// the generic machinery stays behind the binding site.
pub trait InferenceHandler: Send + Sync {
    fn identity(&self) -> &ModelIdentity;

    /// Run the three-stage flow for one request.
    fn handle(&self, request: InferenceRequest) -> Result<InferenceResponse, InferenceError>;
}

/// The execution engine wrapping one pluggable implementation.
///
/// Owns the loaded instance exclusively; concurrent requests share it
/// read-only and the pipeline adds no per-request mutable state or locking.
pub struct ModelPipeline<M: ModelImplementation> {
    identity: ModelIdentity,
    implementation: M,
    instance: M::Instance,
    response_content_type: Option<String>,
}

impl<M: ModelImplementation> ModelPipeline<M> {
    /// Load the implementation's instance and construct a ready pipeline.
    ///
    /// Loading happens exactly once, here, before any request can be served.
    /// Synchronous and potentially slow; async callers move this onto the
    /// blocking thread pool.
    pub fn bind(
        identity: ModelIdentity,
        implementation: M,
        response_content_type: Option<String>,
    ) -> Result<Self, InferenceError> {
        info!("loading model {}", identity);
        let started = Instant::now();

        let instance = implementation.load().map_err(|e| {
            error!("failed to load model {}: {}", identity, e);
            e
        })?;

        info!("model {} loaded in {:.2?}", identity, started.elapsed());

        Ok(Self {
            identity,
            implementation,
            instance,
            response_content_type,
        })
    }

    fn preprocess(&self, body: &[u8], content_type: &str) -> Result<M::Input, InferenceError> {
        debug!(
            "preprocessing {} bytes of input with type {}",
            body.len(),
            content_type
        );
        self.implementation
            .preprocess(body, content_type)
            .map_err(|e| {
                error!("failed to preprocess input data: {}", e);
                e
            })
    }

    fn predict(&self, input: M::Input) -> Result<M::Output, InferenceError> {
        debug!("running {} prediction", self.identity.name);
        self.implementation
            .predict(input, &self.instance)
            .map_err(|e| {
                error!("prediction failed: {}", e);
                e
            })
    }

    fn postprocess(
        &self,
        output: M::Output,
        response_content_type: &str,
    ) -> Result<Vec<u8>, InferenceError> {
        debug!("serializing model output to {}", response_content_type);
        self.implementation
            .postprocess(output, response_content_type)
            .map_err(|e| {
                error!("postprocessing failed: {}", e);
                e
            })
    }
}

impl<M: ModelImplementation> InferenceHandler for ModelPipeline<M> {
    fn identity(&self) -> &ModelIdentity {
        &self.identity
    }

    fn handle(&self, request: InferenceRequest) -> Result<InferenceResponse, InferenceError> {
        let response_content_type =
            resolve_response_type(&request.content_type, self.response_content_type.as_deref());

        let input = self.preprocess(&request.body, &request.content_type)?;
        let output = self.predict(input)?;
        let body = self.postprocess(output, &response_content_type)?;

        Ok(InferenceResponse {
            body,
            content_type: response_content_type,
        })
    }
}
