//! Configuration for fhir-admin
//!
//! Settings come from a config file, discovered by walking up from the
//! working directory, then environment overrides:
//!
//! - `.fhir-admin.json`
//! - `.fhir-admin.toml`
//! - `fhir-admin.yaml` / `fhir-admin.yml`
//!
//! ## Example Configuration (.fhir-admin.json)
//!
//! ```json
//! {
//!   "fhirBaseUrl": "https://fhir.example.org/fhir",
//!   "rootLocationId": "eff94f33-c356-4634-8795-d52340706ba9",
//!   "requestTimeoutSecs": 30,
//!   "pageSize": 500,
//!   "defaultIsJurisdiction": true,
//!   "lang": {
//!     "errorNameRequired": "Name is required"
//!   }
//! }
//! ```

mod admin_config;
mod loader;

pub use admin_config::{AdminConfig, ENV_BASE_URL, ENV_ROOT_LOCATION};
pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
