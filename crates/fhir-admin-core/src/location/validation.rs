//! Declarative validation rules for the location form

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lang::Lang;

/// Value type a field must hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Boolean,
}

impl ValueType {
    fn matches(&self, value: &Value) -> bool {
        match self {
            ValueType::String => value.is_string(),
            ValueType::Boolean => value.is_boolean(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Boolean => "boolean",
        }
    }
}

/// A single constraint on a form field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Rule {
    Type {
        #[serde(rename = "type")]
        value_type: ValueType,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Required {
        required: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl Rule {
    pub fn of_type(value_type: ValueType) -> Self {
        Rule::Type {
            value_type,
            message: None,
        }
    }

    pub fn required(required: bool) -> Self {
        Rule::Required {
            required,
            message: None,
        }
    }

    pub fn with_message(self, text: impl Into<String>) -> Self {
        let text = Some(text.into());
        match self {
            Rule::Type { value_type, .. } => Rule::Type {
                value_type,
                message: text,
            },
            Rule::Required { required, .. } => Rule::Required {
                required,
                message: text,
            },
        }
    }

    /// Returns the failure message if `value` breaks this rule
    fn check(&self, field: &str, value: Option<&Value>) -> Option<String> {
        match self {
            Rule::Type {
                value_type,
                message,
            } => {
                let value = value?;
                (!value_type.matches(value)).then(|| {
                    message
                        .clone()
                        .unwrap_or_else(|| format!("'{field}' is not a valid {}", value_type.name()))
                })
            }
            Rule::Required { required, message } => {
                let missing = match value {
                    None => true,
                    Some(Value::String(s)) => s.trim().is_empty(),
                    Some(_) => false,
                };
                (*required && missing)
                    .then(|| message.clone().unwrap_or_else(|| format!("'{field}' is required")))
            }
        }
    }
}

/// A field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Ordered rules per form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationRules(IndexMap<&'static str, Vec<Rule>>);

impl ValidationRules {
    pub fn get(&self, field: &str) -> Option<&[Rule]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    /// Whether any rule marks `field` as required
    pub fn is_required(&self, field: &str) -> bool {
        self.get(field).is_some_and(|rules| {
            rules
                .iter()
                .any(|r| matches!(r, Rule::Required { required: true, .. }))
        })
    }

    /// Check raw form input, reporting the first broken rule per field
    ///
    /// `null` counts as absent. Input that is not a JSON object is treated as
    /// an empty form.
    pub fn validate(&self, input: &Value) -> Vec<FieldError> {
        let object = input.as_object();
        self.0
            .iter()
            .filter_map(|(field, rules)| {
                let value = object
                    .and_then(|o| o.get(*field))
                    .filter(|v| !v.is_null());
                rules
                    .iter()
                    .find_map(|rule| rule.check(field, value))
                    .map(|message| FieldError {
                        field: field.to_string(),
                        message,
                    })
            })
            .collect()
    }
}

/// Rules for the location form
///
/// `name`, `alias` and `status` are required; the rest are optional.
pub fn validation_rules(lang: &Lang) -> ValidationRules {
    let mut rules = IndexMap::new();
    rules.insert("id", vec![Rule::of_type(ValueType::String)]);
    rules.insert(
        "parentId",
        vec![
            Rule::of_type(ValueType::String).with_message(&lang.error_parent_id_string),
            Rule::required(false),
        ],
    );
    rules.insert(
        "name",
        vec![
            Rule::of_type(ValueType::String).with_message(&lang.error_name_string),
            Rule::required(true).with_message(&lang.error_name_required),
        ],
    );
    rules.insert(
        "alias",
        vec![
            Rule::of_type(ValueType::String).with_message(&lang.error_alias_string),
            Rule::required(true).with_message(&lang.error_alias_required),
        ],
    );
    rules.insert(
        "status",
        vec![
            Rule::of_type(ValueType::String),
            Rule::required(true).with_message(&lang.error_status_required),
        ],
    );
    rules.insert(
        "isJurisdiction",
        vec![Rule::of_type(ValueType::Boolean), Rule::required(false)],
    );
    rules.insert(
        "description",
        vec![Rule::of_type(ValueType::String), Rule::required(false)],
    );
    ValidationRules(rules)
}
