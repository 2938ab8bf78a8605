//! `location` subcommands

use fhir_admin_core::location::FieldError;
use fhir_admin_core::{
    AdminConfig, AdminError, FhirClient, Location, LocationFormFields, ResourceService, Result,
    TreeNode, build_forest, build_hierarchy, find_node, generate_location_unit, is_jurisdiction,
    location_form_fields, submit_location, tree_to_options, validation_rules,
};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::{connect, load_config, read_json_file};
use crate::OutputFormat;
use crate::output;

/// Fetch every location on the server
async fn load_locations(client: &FhirClient, config: &AdminConfig) -> Result<Vec<Location>> {
    let params = [("_count".to_string(), config.page_size.to_string())];
    let locations = client.service::<Location>().list_all(&params).await?;
    debug!("Loaded {} locations", locations.len());
    Ok(locations)
}

/// Trees offered as parents: the configured root's tree, or every tree
fn parent_trees(locations: &[Location], config: &AdminConfig) -> Vec<TreeNode> {
    match config.root_location_id.as_deref() {
        Some(root) => match build_hierarchy(locations, root) {
            Some(tree) => vec![tree],
            None => {
                warn!("Root location '{}' not found; showing all locations", root);
                build_forest(locations)
            }
        },
        None => build_forest(locations),
    }
}

/// Location form command implementation
pub async fn form_command(
    id: Option<String>,
    structure: bool,
    format: OutputFormat,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config_path.as_deref())?;

    let fields = match id {
        Some(id) => {
            let client = connect(&config)?;
            let location = client.service::<Location>().read(&id).await?;
            location_form_fields(Some(&location), !structure && is_jurisdiction(&location))
        }
        None => location_form_fields(None, !structure && config.default_is_jurisdiction),
    };

    output::print_form_fields(&fields, format)
}

/// Location tree command implementation
pub async fn tree_command(
    exclude: Option<String>,
    format: OutputFormat,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let client = connect(&config)?;
    let locations = load_locations(&client, &config).await?;
    let trees = parent_trees(&locations, &config);

    let excluded = exclude.as_deref().map(|id| match find_node(&trees, id) {
        Some(node) => node.subtree_ids(),
        None => {
            warn!("Location '{}' is not in the tree; nothing disabled", id);
            Default::default()
        }
    });

    let options = match &excluded {
        Some(ids) => {
            let is_disabled: &dyn Fn(&TreeNode) -> bool =
                &|node| ids.contains(node.node_id.as_str());
            tree_to_options(&trees, Some(is_disabled))
        }
        None => tree_to_options(&trees, None),
    };

    output::print_options(&options, format)
}

/// Location save command implementation
pub async fn save_command(
    file: PathBuf,
    parent: Option<String>,
    dry_run: bool,
    format: OutputFormat,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let input: Value = read_json_file(&file)?;
    let form = LocationFormFields::from_input(&input, &validation_rules(&config.lang))?;

    let client = connect(&config)?;
    let service = client.service::<Location>();

    let previous = match form.id.as_deref().filter(|_| form.is_edit()) {
        Some(id) => {
            let existing = service.read(id).await?;
            location_form_fields(Some(&existing), form.is_jurisdiction)
        }
        None => LocationFormFields::default(),
    };

    let parent_id = parent.or_else(|| form.parent_id.clone());
    let trees = match parent_id {
        Some(_) => build_forest(&load_locations(&client, &config).await?),
        None => Vec::new(),
    };
    let parent_node = parent_id
        .as_deref()
        .map(|id| find_node(&trees, id).ok_or_else(|| AdminError::not_found("Location", id)))
        .transpose()?;

    if let (Some(node), Some(id)) = (parent_node, form.id.as_deref().filter(|_| form.is_edit())) {
        check_not_own_ancestor(&trees, id, node)?;
    }

    let root = match parent_node {
        Some(_) => config.root_location_id.as_deref().unwrap_or_default(),
        None => config.root_location()?,
    };
    let payload = generate_location_unit(&form, &previous, root, parent_node);

    if dry_run {
        info!("Dry run: not submitting");
        return output::print_location(&payload, format);
    }

    let saved = submit_location(&service, &payload, form.is_edit()).await?;
    output::print_location(&saved, format)
}

/// Reject moving a location under itself or one of its descendants
fn check_not_own_ancestor(trees: &[TreeNode], location_id: &str, parent: &TreeNode) -> Result<()> {
    let Some(edited) = find_node(trees, location_id) else {
        return Ok(());
    };
    if edited.subtree_ids().contains(parent.node_id.as_str()) {
        return Err(AdminError::ValidationError {
            errors: vec![FieldError {
                field: "parentId".to_string(),
                message: format!(
                    "'{}' cannot be placed under itself or its descendants",
                    edited.title()
                ),
            }],
        });
    }
    Ok(())
}
