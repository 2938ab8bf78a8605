//! User-facing messages for location form validation

use serde::{Deserialize, Serialize};

/// Message table for the location form
///
/// Every entry can be overridden from the `lang` section of the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lang {
    pub error_parent_id_string: String,
    pub error_name_string: String,
    pub error_name_required: String,
    pub error_alias_string: String,
    pub error_alias_required: String,
    pub error_status_required: String,
}

impl Default for Lang {
    fn default() -> Self {
        Self {
            error_parent_id_string: "Parent ID can only contain letters, numbers and spaces"
                .to_string(),
            error_name_string: "Name can only contain letters, numbers and spaces".to_string(),
            error_name_required: "Name is required".to_string(),
            error_alias_string: "Alias can only contain letters, numbers and spaces".to_string(),
            error_alias_required: "Alias is required".to_string(),
            error_status_required: "Status is required".to_string(),
        }
    }
}
