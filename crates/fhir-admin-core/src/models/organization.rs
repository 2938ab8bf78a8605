//! Team resources: Organization, Practitioner and PractitionerRole

use serde::{Deserialize, Serialize};

use super::common::{CodeableConcept, HumanName, Identifier, Reference};

/// Organization resource (a team)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(default = "organization_type_name")]
    pub resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(rename = "type", default, skip_serializing_if = "Vec::is_empty")]
    pub type_: Vec<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

fn organization_type_name() -> String {
    "Organization".to_string()
}

impl Default for Organization {
    fn default() -> Self {
        Self {
            resource_type: organization_type_name(),
            id: None,
            identifier: Vec::new(),
            active: None,
            type_: Vec::new(),
            name: None,
        }
    }
}

/// Practitioner resource
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Practitioner {
    #[serde(default = "practitioner_type_name")]
    pub resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,
}

fn practitioner_type_name() -> String {
    "Practitioner".to_string()
}

impl Default for Practitioner {
    fn default() -> Self {
        Self {
            resource_type: practitioner_type_name(),
            id: None,
            identifier: Vec::new(),
            active: None,
            name: Vec::new(),
        }
    }
}

impl Practitioner {
    /// Human readable name, falling back to the id
    pub fn display_name(&self) -> String {
        self.name
            .first()
            .map(HumanName::display)
            .filter(|n| !n.is_empty())
            .or_else(|| self.id.clone())
            .unwrap_or_default()
    }
}

/// PractitionerRole resource linking a practitioner to a team
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PractitionerRole {
    #[serde(default = "practitioner_role_type_name")]
    pub resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub practitioner: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<Reference>,
}

fn practitioner_role_type_name() -> String {
    "PractitionerRole".to_string()
}

impl Default for PractitionerRole {
    fn default() -> Self {
        Self {
            resource_type: practitioner_role_type_name(),
            id: None,
            identifier: Vec::new(),
            active: None,
            practitioner: None,
            organization: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_type_field_renamed() {
        let json = r#"{
            "resourceType": "Organization",
            "id": "team-1",
            "active": true,
            "name": "Blue team",
            "type": [{ "coding": [{ "code": "team" }] }]
        }"#;
        let org: Organization = serde_json::from_str(json).unwrap();
        assert_eq!(org.type_.len(), 1);
        assert_eq!(org.type_[0].coding[0].code.as_deref(), Some("team"));
    }

    #[test]
    fn test_practitioner_display_name_falls_back_to_id() {
        let practitioner = Practitioner {
            id: Some("p1".into()),
            ..Default::default()
        };
        assert_eq!(practitioner.display_name(), "p1");
    }
}
