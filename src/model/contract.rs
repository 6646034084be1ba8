//! The uniform contract between the gateway and a pluggable model.

use serde::{Deserialize, Serialize};

use crate::model::error::InferenceError;

/// Name and version of a published model.
///
/// Immutable once constructed; determines both the bound implementation and
/// the route the endpoint is published under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelIdentity {
    pub name: String,
    pub version: String,
}

impl ModelIdentity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl std::fmt::Display for ModelIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

/// One transport-level request as the pipeline sees it.
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// A successful pipeline result.
#[derive(Debug, Clone)]
pub struct InferenceResponse {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Resolve the response media type for a request.
///
/// A configured override always wins; otherwise the request's own content
/// type is echoed back. Most implementations serialize output in the same
/// format family they accept, unless a pipeline fixes its output format.
pub fn resolve_response_type(request_content_type: &str, override_type: Option<&str>) -> String {
    match override_type {
        Some(fixed) => fixed.to_string(),
        None => request_content_type.to_string(),
    }
}

/// The pluggable contract a model implementation brings to the gateway.
///
/// One implementor covers one model family. The pipeline drives the three
/// stages around a single instance produced by [`load`](Self::load). All
/// operations are synchronous; slow loads and long-running predictions are
/// expected, and the caller decides which thread they run on.
pub trait ModelImplementation: Send + Sync + 'static {
    /// The loaded artifact shared by every request (weights, compiled
    /// assets). Invoked read-only and concurrently; implementations whose
    /// instance is not safe for concurrent use must serialize internally.
    type Instance: Send + Sync + 'static;

    /// Decoded request input handed to predict.
    type Input: Send + 'static;

    /// Raw prediction output handed to postprocess.
    type Output: Send + 'static;

    /// Implementation key used for binding.
    fn name() -> &'static str;

    /// Load the model artifact. Called exactly once per pipeline; a failure
    /// here aborts pipeline construction.
    fn load(&self) -> Result<Self::Instance, InferenceError>;

    /// Convert a raw request body into model input. Failures here are
    /// client-input failures.
    fn preprocess(&self, body: &[u8], content_type: &str) -> Result<Self::Input, InferenceError>;

    /// Run inference against the shared instance.
    fn predict(
        &self,
        input: Self::Input,
        instance: &Self::Instance,
    ) -> Result<Self::Output, InferenceError>;

    /// Serialize the prediction for the negotiated response type. Must fail
    /// when the type has no registered serializer.
    fn postprocess(
        &self,
        output: Self::Output,
        response_content_type: &str,
    ) -> Result<Vec<u8>, InferenceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_echoes_without_override() {
        assert_eq!(
            resolve_response_type("application/json", None),
            "application/json"
        );
        assert_eq!(resolve_response_type("image/jpeg", None), "image/jpeg");
        assert_eq!(resolve_response_type("", None), "");
    }

    #[test]
    fn test_resolve_override_wins() {
        assert_eq!(
            resolve_response_type("text/plain", Some("application/json")),
            "application/json"
        );
        assert_eq!(
            resolve_response_type("application/json", Some("image/jpeg")),
            "image/jpeg"
        );
    }

    #[test]
    fn test_identity_display() {
        let identity = ModelIdentity::new("echo", "v1");
        assert_eq!(identity.to_string(), "echo/v1");
    }

    #[test]
    fn test_identity_equality() {
        assert_eq!(
            ModelIdentity::new("echo", "v1"),
            ModelIdentity::new("echo", "v1")
        );
        assert_ne!(
            ModelIdentity::new("echo", "v1"),
            ModelIdentity::new("echo", "v2")
        );
    }
}
