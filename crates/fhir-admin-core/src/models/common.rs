//! Common FHIR datatypes shared by the administered resources

use serde::{Deserialize, Serialize};

/// Identifier type
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Identifier {
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Identifier {
    /// An `official` identifier carrying the given value
    pub fn official(value: impl Into<String>) -> Self {
        Self {
            use_: Some("official".to_string()),
            system: None,
            value: Some(value.into()),
        }
    }
}

/// Reference type
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Reference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Reference {
    /// Literal reference of the form `<ResourceType>/<id>`
    pub fn to(resource_type: &str, id: &str) -> Self {
        Self {
            reference: Some(format!("{resource_type}/{id}")),
            display: None,
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    /// The id segment of a literal reference (`Location/42` -> `42`)
    ///
    /// Anything without a second `/` segment yields `None`.
    pub fn target_id(&self) -> Option<&str> {
        self.reference
            .as_deref()?
            .split('/')
            .nth(1)
            .filter(|id| !id.is_empty())
    }

    /// Whether this reference points at `<resource_type>/<id>`
    pub fn points_to(&self, resource_type: &str, id: &str) -> bool {
        self.reference.as_deref() == Some(format!("{resource_type}/{id}").as_str())
    }
}

/// Coding type
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Coding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// CodeableConcept type
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CodeableConcept {
    pub fn from_coding(coding: Coding) -> Self {
        Self {
            coding: vec![coding],
            text: None,
        }
    }

    /// Whether any coding matches `system` and `code`
    pub fn has_code(&self, system: &str, code: &str) -> bool {
        self.coding
            .iter()
            .any(|c| c.system.as_deref() == Some(system) && c.code.as_deref() == Some(code))
    }
}

/// HumanName type
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct HumanName {
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<String>,
}

impl HumanName {
    /// Text if present, otherwise given names followed by the family name
    pub fn display(&self) -> String {
        if let Some(text) = &self.text {
            return text.clone();
        }
        self.given
            .iter()
            .map(String::as_str)
            .chain(self.family.as_deref())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_target_id() {
        assert_eq!(Reference::to("Location", "42").target_id(), Some("42"));

        let bare = Reference {
            reference: Some("42".into()),
            display: None,
        };
        assert_eq!(bare.target_id(), None);

        let trailing = Reference {
            reference: Some("Location/".into()),
            display: None,
        };
        assert_eq!(trailing.target_id(), None);
        assert_eq!(Reference::default().target_id(), None);
    }

    #[test]
    fn test_reference_without_display_omits_key() {
        let json = serde_json::to_value(Reference::to("Location", "root")).unwrap();
        assert_eq!(json, serde_json::json!({ "reference": "Location/root" }));
    }

    #[test]
    fn test_human_name_display() {
        let name = HumanName {
            family: Some("Doe".into()),
            given: vec!["Jane".into(), "Q".into()],
            ..Default::default()
        };
        assert_eq!(name.display(), "Jane Q Doe");

        let texted = HumanName {
            text: Some("Dr. Jane Doe".into()),
            ..name
        };
        assert_eq!(texted.display(), "Dr. Jane Doe");
    }
}
