//! Location administration: form mapping, parent selection trees and validation
//!
//! The typical edit cycle is:
//!
//! 1. load a [`Location`](crate::models::Location) and the location list from the server
//! 2. [`location_form_fields`] gives the initial form values
//! 3. [`build_forest`] + [`tree_to_options`] give the selectable parents
//! 4. the edited input is checked with [`ValidationRules::validate`]
//! 5. [`generate_location_unit`] builds the payload and [`submit_location`] saves it

mod form;
mod hierarchy;
mod lang;
mod tree;
mod validation;

pub use form::{
    LocationFormFields, generate_location_unit, is_jurisdiction, location_form_fields,
    submit_location,
};
pub use hierarchy::{build_forest, build_hierarchy, find_node};
pub use lang::Lang;
pub use tree::{DisplayOption, TreeNode, tree_to_options};
pub use validation::{FieldError, Rule, ValidationRules, ValueType, validation_rules};
