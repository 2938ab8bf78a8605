//! Configuration file discovery and loading

use std::path::{Path, PathBuf};

use super::admin_config::AdminConfig;
use crate::error::AdminError;
use crate::result::Result;

/// Config file names in discovery priority order
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".fhir-admin.json",
    ".fhir-admin.toml",
    "fhir-admin.yaml",
    "fhir-admin.yml",
];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a config file by walking up from `start_path`
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| AdminError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<AdminConfig> {
        AdminConfig::load(path).map_err(|e| match e {
            AdminError::ConfigError { message } => AdminError::config_error(format!(
                "Failed to load config from '{}': {}",
                path.display(),
                message
            )),
            other => other,
        })
    }

    /// Load config from an explicit path, or discover one
    ///
    /// Unlike an explicit path, a failed discovery is not an error: the
    /// defaults are used so environment overrides alone are enough.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<AdminConfig> {
        let config = if let Some(path) = custom_path {
            if !path.exists() {
                return Err(AdminError::config_error(format!(
                    "Config file not found: {}. Run 'fhir-admin config init' to create one.",
                    path.display()
                )));
            }
            Self::load_from_file(path)?
        } else {
            let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
            match Self::auto_discover(search_dir)? {
                Some(path) => Self::load_from_file(&path)?,
                None => {
                    tracing::debug!("No config file found, using defaults");
                    AdminConfig::default()
                }
            }
        };

        Ok(config.with_process_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_from_file_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            ".fhir-admin.json",
            r#"{ "fhirBaseUrl": "http://localhost/fhir", "rootLocationId": "root" }"#,
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(config.fhir_base_url.as_deref(), Some("http://localhost/fhir"));
        assert_eq!(config.root_location_id.as_deref(), Some("root"));
    }

    #[test]
    fn test_auto_discover_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        create_temp_config(temp_dir.path(), "fhir-admin.yaml", "pageSize: 10\n");

        let found = ConfigLoader::auto_discover(&nested).unwrap().unwrap();
        assert!(found.ends_with("fhir-admin.yaml"));
    }

    #[test]
    fn test_priority_prefers_json() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "fhir-admin.yaml", "pageSize: 10\n");
        create_temp_config(temp_dir.path(), ".fhir-admin.json", r#"{ "pageSize": 20 }"#);

        let found = ConfigLoader::auto_discover(temp_dir.path()).unwrap().unwrap();
        assert!(found.ends_with(".fhir-admin.json"));
    }

    #[test]
    fn test_invalid_file_mentions_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(temp_dir.path(), ".fhir-admin.json", "{ not json");
        let err = ConfigLoader::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains(".fhir-admin.json"));
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.json");
        assert!(ConfigLoader::load(Some(&missing), None).is_err());
    }
}
