//! The endpoint manifest: the operator-facing list of desired endpoints.
//!
//! Names and versions embed into routes and cluster identifiers, so the
//! manifest is validated up front rather than letting a stray character
//! break route construction at serve time.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cluster::{model_id, EndpointSpec};

/// Errors raised while parsing or validating a manifest
#[derive(Error, Debug, PartialEq)]
pub enum ManifestError {
    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("Invalid model name '{0}': allowed characters are letters, digits, '.', '_' and '-'")]
    InvalidName(String),

    #[error("Invalid version '{0}' for model '{1}'")]
    InvalidVersion(String, String),

    #[error("Model name '{0}' collides with a reserved route segment")]
    ReservedName(String),

    #[error("Duplicate endpoint for '{0}'")]
    DuplicateEndpoint(String),

    #[error("Endpoint '{0}' declares no allowed methods")]
    NoMethods(String),
}

/// The complete manifest file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub endpoints: Vec<EndpointSpec>,
}

/// Top-level path segments claimed by the gateway's own routes. A model with
/// one of these names would be shadowed by the static route.
const RESERVED_SEGMENTS: [&str; 3] = ["v1", "health", "status"];

// ============================================================================
// SBIO: Pure parsing and validation (no I/O)
// ============================================================================

/// Parse a JSON string into a Manifest.
/// This is a pure function - no I/O.
pub fn parse_manifest(content: &str) -> Result<Manifest, ManifestError> {
    serde_json::from_str(content).map_err(|e| ManifestError::ParseError(e.to_string()))
}

fn valid_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Validate a manifest for consistency.
/// This is a pure function - no I/O.
pub fn validate_manifest(manifest: &Manifest) -> Result<(), ManifestError> {
    let mut seen = HashSet::new();

    for spec in &manifest.endpoints {
        if !valid_identifier(&spec.name) {
            return Err(ManifestError::InvalidName(spec.name.clone()));
        }
        if RESERVED_SEGMENTS.contains(&spec.name.as_str()) {
            return Err(ManifestError::ReservedName(spec.name.clone()));
        }
        if !valid_identifier(&spec.version) {
            return Err(ManifestError::InvalidVersion(
                spec.version.clone(),
                spec.name.clone(),
            ));
        }
        if spec.methods.is_empty() {
            return Err(ManifestError::NoMethods(spec.name.clone()));
        }

        let id = model_id(&spec.identity());
        if !seen.insert(id.clone()) {
            return Err(ManifestError::DuplicateEndpoint(id));
        }
    }

    Ok(())
}

impl Manifest {
    /// Parse and validate from a JSON string.
    /// Pure function - no I/O.
    pub fn from_str(content: &str) -> Result<Self, ManifestError> {
        let manifest = parse_manifest(content)?;
        validate_manifest(&manifest)?;
        Ok(manifest)
    }
}

/// The endpoint set used when no manifest path is given.
pub fn default_endpoint_specs() -> Vec<EndpointSpec> {
    vec![
        EndpointSpec::new("textstats", "v1").with_option("num_cpus", serde_json::json!(1)),
        EndpointSpec::new("echo", "v1"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::HttpMethod;

    #[test]
    fn test_parse_minimal_manifest() {
        let manifest = Manifest::from_str(
            r#"{"endpoints": [{"name": "echo", "version": "v1"}]}"#,
        )
        .unwrap();

        assert_eq!(manifest.endpoints.len(), 1);
        assert_eq!(manifest.endpoints[0].methods, vec![HttpMethod::Put]);
    }

    #[test]
    fn test_parse_full_manifest() {
        let json = r#"{
            "endpoints": [
                {
                    "name": "textstats",
                    "version": "v2",
                    "options": {"num_cpus": 2},
                    "methods": ["PUT", "POST"],
                    "response_content_type": "application/json"
                }
            ]
        }"#;

        let manifest = Manifest::from_str(json).unwrap();
        let spec = &manifest.endpoints[0];

        assert_eq!(spec.options.as_ref().unwrap()["num_cpus"], 2);
        assert_eq!(spec.methods, vec![HttpMethod::Put, HttpMethod::Post]);
        assert_eq!(
            spec.response_content_type.as_deref(),
            Some("application/json")
        );
    }

    #[test]
    fn test_parse_error_reported() {
        let result = Manifest::from_str("{not json");
        assert!(matches!(result, Err(ManifestError::ParseError(_))));
    }

    #[test]
    fn test_invalid_name_rejected() {
        let result = Manifest::from_str(
            r#"{"endpoints": [{"name": "bad name", "version": "v1"}]}"#,
        );
        assert_eq!(
            result.unwrap_err(),
            ManifestError::InvalidName("bad name".to_string())
        );

        let result = Manifest::from_str(
            r#"{"endpoints": [{"name": "a/b", "version": "v1"}]}"#,
        );
        assert!(matches!(result, Err(ManifestError::InvalidName(_))));
    }

    #[test]
    fn test_empty_name_rejected() {
        let result =
            Manifest::from_str(r#"{"endpoints": [{"name": "", "version": "v1"}]}"#);
        assert!(matches!(result, Err(ManifestError::InvalidName(_))));
    }

    #[test]
    fn test_reserved_name_rejected() {
        for reserved in ["v1", "health", "status"] {
            let json = format!(
                r#"{{"endpoints": [{{"name": "{}", "version": "v1"}}]}}"#,
                reserved
            );
            let result = Manifest::from_str(&json);
            assert!(
                matches!(result, Err(ManifestError::ReservedName(_))),
                "{} should be reserved",
                reserved
            );
        }
    }

    #[test]
    fn test_invalid_version_rejected() {
        let result = Manifest::from_str(
            r#"{"endpoints": [{"name": "echo", "version": "v 1"}]}"#,
        );
        assert_eq!(
            result.unwrap_err(),
            ManifestError::InvalidVersion("v 1".to_string(), "echo".to_string())
        );
    }

    #[test]
    fn test_duplicate_endpoint_rejected() {
        let json = r#"{
            "endpoints": [
                {"name": "echo", "version": "v1"},
                {"name": "echo", "version": "v1"}
            ]
        }"#;

        let result = Manifest::from_str(json);
        assert_eq!(
            result.unwrap_err(),
            ManifestError::DuplicateEndpoint("echo_v1".to_string())
        );
    }

    #[test]
    fn test_same_name_distinct_versions_allowed() {
        let json = r#"{
            "endpoints": [
                {"name": "echo", "version": "v1"},
                {"name": "echo", "version": "v2"}
            ]
        }"#;

        assert!(Manifest::from_str(json).is_ok());
    }

    #[test]
    fn test_empty_methods_rejected() {
        let result = Manifest::from_str(
            r#"{"endpoints": [{"name": "echo", "version": "v1", "methods": []}]}"#,
        );
        assert_eq!(
            result.unwrap_err(),
            ManifestError::NoMethods("echo".to_string())
        );
    }

    #[test]
    fn test_default_endpoint_specs() {
        let specs = default_endpoint_specs();
        let manifest = Manifest {
            endpoints: specs.clone(),
        };

        validate_manifest(&manifest).unwrap();
        assert_eq!(specs.len(), 2);
        assert!(specs.iter().any(|s| s.name == "echo"));
        assert!(specs.iter().any(|s| s.name == "textstats"));
        assert!(specs
            .iter()
            .all(|s| s.methods == vec![HttpMethod::Put]));
    }
}
