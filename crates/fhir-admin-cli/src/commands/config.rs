//! `config` subcommands

use fhir_admin_core::{AdminConfig, AdminError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use super::load_config;
use crate::ConfigFormat;
use crate::output;

fn file_name(format: ConfigFormat) -> &'static str {
    match format {
        ConfigFormat::Json => ".fhir-admin.json",
        ConfigFormat::Toml => ".fhir-admin.toml",
        ConfigFormat::Yaml => "fhir-admin.yaml",
    }
}

/// Starter configuration written by `config init`
fn starter_config() -> AdminConfig {
    AdminConfig {
        fhir_base_url: Some("http://localhost:8080/fhir".to_string()),
        root_location_id: Some(String::new()),
        ..Default::default()
    }
}

fn render(config: &AdminConfig, format: ConfigFormat) -> Result<String> {
    match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)
            .map_err(|e| AdminError::config_error(format!("Failed to serialize JSON: {e}"))),
        ConfigFormat::Toml => toml::to_string_pretty(config)
            .map_err(|e| AdminError::config_error(format!("Failed to serialize TOML: {e}"))),
        ConfigFormat::Yaml => serde_yaml::to_string(config)
            .map_err(|e| AdminError::config_error(format!("Failed to serialize YAML: {e}"))),
    }
}

/// Config init command implementation
pub async fn init_command(format: ConfigFormat, force: bool) -> Result<()> {
    debug!("Initializing configuration file with format: {:?}", format);
    write_config(Path::new(file_name(format)), format, force)?;

    output::print_success(&format!(
        "Created configuration file: {}",
        file_name(format)
    ));
    println!("   Set fhirBaseUrl and rootLocationId for your server.");
    Ok(())
}

fn write_config(path: &Path, format: ConfigFormat, force: bool) -> Result<()> {
    if path.exists() && !force {
        error!(
            "Configuration file '{}' already exists. Use --force to overwrite.",
            path.display()
        );
        return Err(AdminError::config_error(format!(
            "Configuration file '{}' already exists",
            path.display()
        )));
    }

    let content = render(&starter_config(), format)?;
    std::fs::write(path, content).map_err(|e| AdminError::io_error(path, e))
}

/// Config show command implementation
pub async fn show_command(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    println!("{}", render(&config, ConfigFormat::Json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_written_config_loads_back() {
        let dir = TempDir::new().unwrap();
        for format in [ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml] {
            let path = dir.path().join(file_name(format));
            write_config(&path, format, false).unwrap();

            let loaded = AdminConfig::load(&path).unwrap();
            assert_eq!(loaded, starter_config());
        }
    }

    #[test]
    fn test_existing_file_needs_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".fhir-admin.json");
        std::fs::write(&path, "{}").unwrap();

        assert!(write_config(&path, ConfigFormat::Json, false).is_err());
        write_config(&path, ConfigFormat::Json, true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("fhirBaseUrl"));
    }
}
