pub mod manifest;

pub use manifest::{
    default_endpoint_specs, parse_manifest, validate_manifest, Manifest, ManifestError,
};

use std::path::Path;
use thiserror::Error;

/// Errors for file I/O operations (separate from pure parsing errors)
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Manifest error: {0}")]
    ManifestError(#[from] ManifestError),
}

// ============================================================================
// SBIO: I/O wrapper - thin layer over pure functions
// ============================================================================

/// Load and parse a manifest file from disk.
/// This is the I/O boundary - it reads the file and delegates to pure parsing functions.
pub fn load_manifest_file(path: &Path) -> Result<Manifest, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let manifest = Manifest::from_str(&content)?;
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_manifest_file() {
        let content = r#"{
            "endpoints": [
                {"name": "echo", "version": "v1"},
                {"name": "textstats", "version": "v1", "options": {"num_cpus": 1}}
            ]
        }"#;

        let file = create_temp_file(content);
        let manifest = load_manifest_file(file.path()).unwrap();
        assert_eq!(manifest.endpoints.len(), 2);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_manifest_file(Path::new("/nonexistent/manifest.json"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_load_invalid_manifest() {
        let file = create_temp_file(r#"{"endpoints": [{"name": "bad name", "version": "v1"}]}"#);
        let result = load_manifest_file(file.path());
        assert!(matches!(result, Err(ConfigError::ManifestError(_))));
    }
}
