//! Endpoint specifications and identifier derivation.
//!
//! Identifiers are deterministic functions of `(name, version)`, so
//! re-publishing a spec always lands on the same cluster records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::ModelIdentity;

/// HTTP methods an endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    #[default]
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

fn default_methods() -> Vec<HttpMethod> {
    vec![HttpMethod::Put]
}

/// Declarative description of one desired published endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointSpec {
    pub name: String,
    pub version: String,

    /// Opaque resource configuration, forwarded to the cluster untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<HashMap<String, Value>>,

    #[serde(default = "default_methods")]
    pub methods: Vec<HttpMethod>,

    /// Fixed response content type; absent means echo the request's type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_content_type: Option<String>,
}

impl EndpointSpec {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            options: None,
            methods: default_methods(),
            response_content_type: None,
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }

    pub fn with_methods(mut self, methods: Vec<HttpMethod>) -> Self {
        self.methods = methods;
        self
    }

    pub fn with_response_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.response_content_type = Some(content_type.into());
        self
    }

    pub fn identity(&self) -> ModelIdentity {
        ModelIdentity::new(&self.name, &self.version)
    }
}

// ============================================================================
// SBIO: Pure identifier derivation (no I/O)
// ============================================================================

/// `<name>_<version>` — the shared key both cluster records derive from.
pub fn model_id(identity: &ModelIdentity) -> String {
    format!("{}_{}", identity.name, identity.version)
}

pub fn backend_id(model_id: &str) -> String {
    format!("model.{}", model_id)
}

pub fn endpoint_id(model_id: &str) -> String {
    format!("endpoint.{}", model_id)
}

/// The route an endpoint is published under.
pub fn route(identity: &ModelIdentity) -> String {
    format!("/{}/{}", identity.name, identity.version)
}
