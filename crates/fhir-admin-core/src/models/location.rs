//! FHIR Location resource

use serde::{Deserialize, Serialize};

use super::common::{CodeableConcept, Coding, Identifier, Reference};

/// Code system for `Location.physicalType`
pub const PHYSICAL_TYPE_SYSTEM: &str =
    "http://terminology.hl7.org/CodeSystem/location-physical-type";

/// Location lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationStatus {
    #[default]
    Active,
    Suspended,
    Inactive,
}

impl LocationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationStatus::Active => "active",
            LocationStatus::Suspended => "suspended",
            LocationStatus::Inactive => "inactive",
        }
    }
}

/// The two physical types the administration UI distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalType {
    /// Administrative area (`jdn`)
    Jurisdiction,
    /// Physical structure (`bu`)
    Building,
}

impl PhysicalType {
    pub fn code(&self) -> &'static str {
        match self {
            PhysicalType::Jurisdiction => "jdn",
            PhysicalType::Building => "bu",
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            PhysicalType::Jurisdiction => "Jurisdiction",
            PhysicalType::Building => "Building",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "jdn" => Some(PhysicalType::Jurisdiction),
            "bu" => Some(PhysicalType::Building),
            _ => None,
        }
    }

    pub fn to_codeable_concept(self) -> CodeableConcept {
        CodeableConcept::from_coding(Coding {
            system: Some(PHYSICAL_TYPE_SYSTEM.to_string()),
            code: Some(self.code().to_string()),
            display: Some(self.display().to_string()),
        })
    }
}

/// Location resource
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default = "Location::resource_type_name")]
    pub resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LocationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alias: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_type: Option<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_of: Option<Reference>,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            resource_type: Self::resource_type_name(),
            id: None,
            identifier: Vec::new(),
            status: None,
            name: None,
            alias: Vec::new(),
            description: None,
            physical_type: None,
            part_of: None,
        }
    }
}

impl Location {
    fn resource_type_name() -> String {
        "Location".to_string()
    }

    /// Parent location id taken from `partOf`
    pub fn parent_id(&self) -> Option<&str> {
        self.part_of.as_ref().and_then(Reference::target_id)
    }

    /// The physical type if it is one of the two known codes
    pub fn physical_type_kind(&self) -> Option<PhysicalType> {
        self.physical_type
            .as_ref()?
            .coding
            .iter()
            .filter(|c| c.system.as_deref() == Some(PHYSICAL_TYPE_SYSTEM))
            .find_map(|c| c.code.as_deref().and_then(PhysicalType::from_code))
    }

    /// Value of the first identifier that carries one
    pub fn identifier_value(&self) -> Option<&str> {
        self.identifier.iter().find_map(|i| i.value.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_location() {
        let json = r#"{
            "resourceType": "Location",
            "id": "303",
            "identifier": [{ "use": "official", "value": "93bc9c3d-6321-41b0-9b93-1275d7114e22" }],
            "status": "active",
            "name": "Ward 1",
            "alias": ["W1"],
            "partOf": { "reference": "Location/2252", "display": "Kenya" },
            "physicalType": {
                "coding": [{
                    "system": "http://terminology.hl7.org/CodeSystem/location-physical-type",
                    "code": "bu",
                    "display": "Building"
                }]
            }
        }"#;

        let location: Location = serde_json::from_str(json).unwrap();
        assert_eq!(location.id.as_deref(), Some("303"));
        assert_eq!(location.status, Some(LocationStatus::Active));
        assert_eq!(location.parent_id(), Some("2252"));
        assert_eq!(location.physical_type_kind(), Some(PhysicalType::Building));
        assert_eq!(
            location.identifier_value(),
            Some("93bc9c3d-6321-41b0-9b93-1275d7114e22")
        );
    }

    #[test]
    fn test_missing_resource_type_defaults() {
        let location: Location = serde_json::from_str(r#"{ "name": "Nairobi" }"#).unwrap();
        assert_eq!(location.resource_type, "Location");
        assert_eq!(location.parent_id(), None);
        assert_eq!(location.physical_type_kind(), None);
    }

    #[test]
    fn test_unknown_physical_type_code() {
        let location = Location {
            physical_type: Some(CodeableConcept::from_coding(Coding {
                system: Some(PHYSICAL_TYPE_SYSTEM.into()),
                code: Some("ro".into()),
                display: Some("Room".into()),
            })),
            ..Default::default()
        };
        assert_eq!(location.physical_type_kind(), None);
    }
}
