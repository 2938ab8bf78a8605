//! `team` subcommands

use fhir_admin_core::location::FieldError;
use fhir_admin_core::{
    AdminError, Organization, Practitioner, PractitionerRole, Result, TeamFormFields,
    fetch_team_details, save_team, team_form_fields,
};
use std::path::PathBuf;

use super::{connect, load_config, read_json_file};
use crate::OutputFormat;
use crate::output;

/// Team show command implementation
pub async fn show_command(
    id: String,
    format: OutputFormat,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let client = connect(&config)?;

    let details = fetch_team_details(
        &client.service::<Organization>(),
        &client.service::<PractitionerRole>(),
        &client.service::<Practitioner>(),
        &id,
    )
    .await?;

    output::print_team(&details, &team_form_fields(&details), format)
}

fn validate_team_form(form: &TeamFormFields) -> Result<()> {
    if form.name.trim().is_empty() {
        return Err(AdminError::ValidationError {
            errors: vec![FieldError {
                field: "name".to_string(),
                message: "Team name is required".to_string(),
            }],
        });
    }
    Ok(())
}

/// Team save command implementation
pub async fn save_command(file: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let form: TeamFormFields = read_json_file(&file)?;
    validate_team_form(&form)?;

    let client = connect(&config)?;
    let organizations = client.service::<Organization>();
    let roles = client.service::<PractitionerRole>();

    let (previous, existing_roles) = match form.id.as_deref().filter(|_| form.is_edit()) {
        Some(id) => {
            let details =
                fetch_team_details(&organizations, &roles, &client.service::<Practitioner>(), id)
                    .await?;
            (team_form_fields(&details), details.roles)
        }
        None => (TeamFormFields::default(), Vec::new()),
    };

    let saved = save_team(&organizations, &roles, &form, &previous, &existing_roles).await?;
    output::print_success(&format!(
        "Saved team '{}' ({})",
        saved.name.as_deref().unwrap_or_default(),
        saved.id.as_deref().unwrap_or_default()
    ));
    Ok(())
}
