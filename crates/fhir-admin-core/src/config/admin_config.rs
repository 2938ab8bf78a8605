//! The configuration structure

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::AdminError;
use crate::location::Lang;
use crate::result::Result;

/// Overrides `fhirBaseUrl`
pub const ENV_BASE_URL: &str = "FHIR_ADMIN_BASE_URL";
/// Overrides `rootLocationId`
pub const ENV_ROOT_LOCATION: &str = "FHIR_ADMIN_ROOT_LOCATION";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminConfig {
    /// Base URL of the FHIR server, e.g. `https://fhir.example.org/fhir`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fhir_base_url: Option<String>,

    /// Location that top-level locations are attached to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_location_id: Option<String>,

    pub request_timeout_secs: u64,

    /// `_count` used when loading the location list
    pub page_size: u32,

    /// Whether new locations start out as jurisdictions
    pub default_is_jurisdiction: bool,

    pub lang: Lang,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            fhir_base_url: None,
            root_location_id: None,
            request_timeout_secs: 30,
            page_size: 500,
            default_is_jurisdiction: true,
            lang: Lang::default(),
        }
    }
}

impl AdminConfig {
    /// Load a config file, picking the format from the extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| AdminError::io_error(path, e))?;
        let ext = path.extension().and_then(|e| e.to_str());

        match ext {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| AdminError::config_error(format!("Invalid JSON: {e}"))),
            Some("toml") => toml::from_str(&content)
                .map_err(|e| AdminError::config_error(format!("Invalid TOML: {e}"))),
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .map_err(|e| AdminError::config_error(format!("Invalid YAML: {e}"))),
            _ => Err(AdminError::config_error(
                "Unsupported file extension (expected .json, .toml, .yaml or .yml)",
            )),
        }
    }

    /// Apply environment overrides from a lookup function
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            self.fhir_base_url = Some(url);
        }
        if let Some(root) = lookup(ENV_ROOT_LOCATION).filter(|v| !v.is_empty()) {
            self.root_location_id = Some(root);
        }
    }

    /// Apply overrides from the process environment
    pub fn with_process_env(mut self) -> Self {
        self.apply_env(|key| std::env::var(key).ok());
        self
    }

    pub fn base_url(&self) -> Result<&str> {
        self.fhir_base_url.as_deref().ok_or_else(|| {
            AdminError::config_error(format!(
                "No FHIR base URL configured. Set 'fhirBaseUrl' or {ENV_BASE_URL}"
            ))
        })
    }

    pub fn root_location(&self) -> Result<&str> {
        self.root_location_id.as_deref().ok_or_else(|| {
            AdminError::config_error(format!(
                "No root location configured. Set 'rootLocationId' or {ENV_ROOT_LOCATION}"
            ))
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
