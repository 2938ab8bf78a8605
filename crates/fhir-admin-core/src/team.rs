//! Teams: Organizations and the practitioners assigned to them
//!
//! A practitioner belongs to a team when a `PractitionerRole` references both
//! `Practitioner/<id>` and `Organization/<team id>`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::client::{FhirError, ResourceService};
use crate::models::{
    CodeableConcept, Coding, Identifier, Organization, Practitioner, PractitionerRole, Reference,
};

/// Code system for `Organization.type`
pub const ORGANIZATION_TYPE_SYSTEM: &str =
    "http://terminology.hl7.org/CodeSystem/organization-type";

/// A team with its role links and member practitioners resolved
#[derive(Debug, Clone, PartialEq)]
pub struct TeamDetails {
    pub team: Organization,
    pub roles: Vec<PractitionerRole>,
    pub practitioners: Vec<Practitioner>,
}

/// Fields of the team form
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamFormFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Practitioner ids
    #[serde(default)]
    pub practitioners: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
}

fn default_active() -> bool {
    true
}

impl Default for TeamFormFields {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            active: true,
            practitioners: Vec::new(),
            identifier: Vec::new(),
        }
    }
}

impl TeamFormFields {
    pub fn is_edit(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// Role links that must change to make the team's membership match the form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleChanges {
    pub to_create: Vec<PractitionerRole>,
    /// Ids of `PractitionerRole` resources to delete
    pub to_delete: Vec<String>,
}

impl RoleChanges {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_delete.is_empty()
    }
}

fn practitioner_id(role: &PractitionerRole) -> Option<&str> {
    role.practitioner.as_ref().and_then(Reference::target_id)
}

fn belongs_to(role: &PractitionerRole, team_id: &str) -> bool {
    role.organization
        .as_ref()
        .is_some_and(|org| org.points_to("Organization", team_id))
}

/// Resolve the roles and practitioners of `team`
///
/// Practitioners are listed in role order; roles pointing at practitioners
/// missing from `practitioners` are kept but contribute no member.
pub fn load_team_details(
    team: Organization,
    roles: &[PractitionerRole],
    practitioners: &[Practitioner],
) -> TeamDetails {
    let team_id = team.id.clone().unwrap_or_default();
    let roles: Vec<PractitionerRole> = roles
        .iter()
        .filter(|role| belongs_to(role, &team_id))
        .cloned()
        .collect();

    let mut seen = HashSet::new();
    let members = roles
        .iter()
        .filter_map(practitioner_id)
        .filter(|id| seen.insert(*id))
        .filter_map(|id| {
            let found = practitioners.iter().find(|p| p.id.as_deref() == Some(id));
            if found.is_none() {
                warn!("Team '{}' references unknown practitioner '{}'", team_id, id);
            }
            found.cloned()
        })
        .collect();

    TeamDetails {
        team,
        roles,
        practitioners: members,
    }
}

/// Initial form values for a loaded team
pub fn team_form_fields(details: &TeamDetails) -> TeamFormFields {
    TeamFormFields {
        id: details.team.id.clone(),
        name: details.team.name.clone().unwrap_or_default(),
        active: details.team.active.unwrap_or(true),
        practitioners: details
            .practitioners
            .iter()
            .filter_map(|p| p.id.clone())
            .collect(),
        identifier: details.team.identifier.clone(),
    }
}

fn identifier_or_fresh(identifier: &[Identifier]) -> Identifier {
    let value = identifier
        .first()
        .and_then(|i| i.value.clone())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    Identifier::official(value)
}

/// Organization payload for the edited team
pub fn generate_team_payload(form: &TeamFormFields, previous: &TeamFormFields) -> Organization {
    Organization {
        id: form.id.clone().filter(|id| !id.is_empty()),
        identifier: vec![identifier_or_fresh(&previous.identifier)],
        active: Some(form.active),
        type_: vec![CodeableConcept::from_coding(Coding {
            system: Some(ORGANIZATION_TYPE_SYSTEM.to_string()),
            code: Some("team".to_string()),
            display: Some("Team".to_string()),
        })],
        name: Some(form.name.clone()),
        ..Default::default()
    }
}

/// Roles to create for newly selected practitioners and delete for removed ones
///
/// New roles follow the order of `selected`; duplicates are ignored.
pub fn practitioner_role_changes(
    team: &Organization,
    existing: &[PractitionerRole],
    selected: &[String],
) -> RoleChanges {
    let team_id = team.id.as_deref().unwrap_or_default();
    let wanted: HashSet<&str> = selected.iter().map(String::as_str).collect();
    let current: Vec<&PractitionerRole> = existing
        .iter()
        .filter(|role| belongs_to(role, team_id))
        .collect();
    let mut linked: HashSet<&str> = current.iter().filter_map(|r| practitioner_id(r)).collect();

    let to_delete = current
        .iter()
        .filter(|role| practitioner_id(role).is_none_or(|id| !wanted.contains(id)))
        .filter_map(|role| role.id.clone())
        .collect();

    let mut organization = Reference::to("Organization", team_id);
    organization.display = team.name.clone();

    let to_create = selected
        .iter()
        .filter(|id| linked.insert(id.as_str()))
        .map(|id| PractitionerRole {
            identifier: vec![Identifier::official(Uuid::new_v4().to_string())],
            active: Some(true),
            practitioner: Some(Reference::to("Practitioner", id)),
            organization: Some(organization.clone()),
            ..Default::default()
        })
        .collect();

    RoleChanges {
        to_create,
        to_delete,
    }
}

/// Read a team and resolve its members from the server
pub async fn fetch_team_details(
    organizations: &dyn ResourceService<Organization>,
    roles: &dyn ResourceService<PractitionerRole>,
    practitioners: &dyn ResourceService<Practitioner>,
    team_id: &str,
) -> Result<TeamDetails, FhirError> {
    let team = organizations.read(team_id).await?;
    let params = [("organization".to_string(), format!("Organization/{team_id}"))];
    let team_roles: Vec<PractitionerRole> = roles
        .list_all(&params)
        .await?
        .into_iter()
        .filter(|role| belongs_to(role, team_id))
        .collect();

    let mut members = Vec::new();
    let mut seen = HashSet::new();
    for id in team_roles.iter().filter_map(practitioner_id) {
        if seen.insert(id) {
            members.push(practitioners.read(id).await?);
        }
    }

    Ok(load_team_details(team, &team_roles, &members))
}

/// Save the team, then bring its role links in line with the form
///
/// Returns the stored Organization. Stops at the first failing request.
pub async fn save_team(
    organizations: &dyn ResourceService<Organization>,
    roles: &dyn ResourceService<PractitionerRole>,
    form: &TeamFormFields,
    previous: &TeamFormFields,
    existing_roles: &[PractitionerRole],
) -> Result<Organization, FhirError> {
    let payload = generate_team_payload(form, previous);
    let saved = if form.is_edit() {
        organizations.update(&payload).await?
    } else {
        organizations.create(&payload).await?
    };

    if saved.id.is_none() {
        return Err(FhirError::MissingId {
            resource_type: "Organization".to_string(),
            operation: "link practitioners to",
        });
    }

    let changes = practitioner_role_changes(&saved, existing_roles, &form.practitioners);
    for role in &changes.to_create {
        roles.create(role).await?;
    }
    for id in &changes.to_delete {
        roles.delete(id).await?;
    }

    info!(
        "Saved team '{}' (+{} / -{} practitioners)",
        saved.name.as_deref().unwrap_or_default(),
        changes.to_create.len(),
        changes.to_delete.len()
    );
    Ok(saved)
}
