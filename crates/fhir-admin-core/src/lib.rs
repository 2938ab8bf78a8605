//! fhir-admin core
//!
//! Building blocks for administering FHIR R4 `Location` hierarchies and
//! teams (`Organization` + `PractitionerRole`) against a remote server:
//! resource models, form mapping, parent selection trees, validation rules
//! and a small REST client.

pub mod client;
pub mod config;
pub mod error;
pub mod location;
pub mod models;
pub mod result;
pub mod team;

// Re-export commonly used types
pub use client::{FhirClient, FhirError, FhirService, ResourceService};
pub use config::{AdminConfig, ConfigLoader};
pub use error::{AdminError, ErrorKind};
pub use location::{
    DisplayOption, FieldError, Lang, LocationFormFields, TreeNode, ValidationRules,
    build_forest, build_hierarchy, find_node, generate_location_unit, is_jurisdiction,
    location_form_fields, submit_location, tree_to_options, validation_rules,
};
pub use models::{
    Bundle, FhirResource, Identifier, Location, LocationStatus, Organization, PhysicalType,
    Practitioner, PractitionerRole, Reference,
};
pub use result::Result;
pub use team::{
    RoleChanges, TeamDetails, TeamFormFields, fetch_team_details, generate_team_payload,
    load_team_details, practitioner_role_changes, save_team, team_form_fields,
};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    init_tracing_with("fhir_admin=info");
}

/// Initialize tracing with `default_directive` unless `RUST_LOG` is set
pub fn init_tracing_with(default_directive: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
