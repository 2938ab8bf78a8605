//! Mapping between Location resources and flat form fields

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::tree::TreeNode;
use super::validation::ValidationRules;
use crate::client::{FhirError, ResourceService};
use crate::error::AdminError;
use crate::models::{Identifier, Location, LocationStatus, PhysicalType, Reference};
use crate::result::Result;

/// Known fields of the location form
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationFormFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: LocationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default = "default_is_jurisdiction")]
    pub is_jurisdiction: bool,
    /// Identifiers of the loaded resource; the stable one is reused on save
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
}

fn default_is_jurisdiction() -> bool {
    true
}

impl Default for LocationFormFields {
    fn default() -> Self {
        Self {
            id: Some(String::new()),
            name: String::new(),
            status: LocationStatus::Active,
            parent_id: None,
            description: None,
            alias: None,
            is_jurisdiction: true,
            identifier: Vec::new(),
        }
    }
}

impl LocationFormFields {
    /// Validate raw form input and decode it
    pub fn from_input(input: &Value, rules: &ValidationRules) -> Result<Self> {
        let errors = rules.validate(input);
        if !errors.is_empty() {
            return Err(AdminError::ValidationError { errors });
        }
        Ok(serde_json::from_value(input.clone())?)
    }

    /// True when editing an existing resource
    pub fn is_edit(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }

    fn stable_identifier(&self) -> Option<&str> {
        self.identifier
            .first()
            .and_then(|i| i.value.as_deref())
            .filter(|v| !v.is_empty())
    }
}

/// Initial form values for a location, or the create defaults when `None`
///
/// `is_jurisdiction` is taken from the caller rather than the resource's
/// physical type; see [`is_jurisdiction`] to derive it.
pub fn location_form_fields(location: Option<&Location>, is_jurisdiction: bool) -> LocationFormFields {
    let Some(location) = location else {
        return LocationFormFields {
            is_jurisdiction,
            ..Default::default()
        };
    };

    LocationFormFields {
        id: location.id.clone(),
        name: location.name.clone().unwrap_or_default(),
        status: location.status.unwrap_or_default(),
        parent_id: location.parent_id().map(str::to_string),
        description: location.description.clone(),
        alias: location.alias.first().cloned(),
        is_jurisdiction,
        identifier: location.identifier.clone(),
    }
}

/// Whether the resource is classified as a jurisdiction
///
/// Unknown or missing physical types count as jurisdictions.
pub fn is_jurisdiction(location: &Location) -> bool {
    location.physical_type_kind() != Some(PhysicalType::Building)
}

/// Build the Location payload to submit from edited form values
///
/// * `previous` - the values the form was opened with; its identifier is reused
/// * `root_location_id` - parent used when no `parent_node` is chosen
/// * `parent_node` - the selected parent
pub fn generate_location_unit(
    form: &LocationFormFields,
    previous: &LocationFormFields,
    root_location_id: &str,
    parent_node: Option<&TreeNode>,
) -> Location {
    let identifier = previous
        .stable_identifier()
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let part_of = match parent_node {
        Some(node) => {
            let reference = Reference::to("Location", node.location_id());
            match &node.node.name {
                Some(name) => reference.with_display(name.clone()),
                None => reference,
            }
        }
        None => Reference::to("Location", root_location_id),
    };

    let physical_type = if form.is_jurisdiction {
        PhysicalType::Jurisdiction
    } else {
        PhysicalType::Building
    };

    Location {
        id: form.id.clone().filter(|id| !id.is_empty()),
        identifier: vec![Identifier::official(identifier)],
        status: Some(form.status),
        name: Some(form.name.clone()),
        alias: form.alias.iter().cloned().collect(),
        description: form.description.clone(),
        physical_type: Some(physical_type.to_codeable_concept()),
        part_of: Some(part_of),
        ..Default::default()
    }
}

/// Update the location when editing, create it otherwise
///
/// Failures are returned as-is for the caller to report.
pub async fn submit_location<S>(
    service: &S,
    payload: &Location,
    is_edit: bool,
) -> std::result::Result<Location, FhirError>
where
    S: ResourceService<Location> + ?Sized,
{
    let saved = if is_edit {
        service.update(payload).await?
    } else {
        service.create(payload).await?
    };
    info!(
        "{} location '{}'",
        if is_edit { "Updated" } else { "Created" },
        saved.id.as_deref().unwrap_or_default()
    );
    Ok(saved)
}
