//! Command implementations for the CLI

pub mod config;
pub mod location;
pub mod team;

use fhir_admin_core::{AdminConfig, AdminError, ConfigLoader, FhirClient, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Load configuration from `--config` or by discovery from the working directory
pub(crate) fn load_config(config_path: Option<&Path>) -> Result<AdminConfig> {
    let config = ConfigLoader::load(config_path, None)?;
    debug!("Using configuration: {:?}", config);
    Ok(config)
}

/// HTTP client for the configured server
pub(crate) fn connect(config: &AdminConfig) -> Result<FhirClient> {
    let client = FhirClient::with_timeout(config.base_url()?, config.request_timeout())?;
    debug!("Connected to {}", client.base_url());
    Ok(client)
}

/// Read a JSON document from disk
pub(crate) fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| AdminError::io_error(path, e))?;
    serde_json::from_str(&content).map_err(|e| {
        AdminError::serialization_error(format!("Invalid JSON in '{}': {e}", path.display()))
    })
}

/// Count command implementation
pub async fn count_command(
    resource_type: String,
    filters: Vec<(String, String)>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let client = connect(&config)?;

    let count = client.summary_count(&resource_type, &filters).await?;
    println!("{count}");
    Ok(())
}
