//! FHIR R4 resource models used by the administration tooling

mod bundle;
mod common;
mod location;
mod organization;

pub use bundle::{Bundle, BundleEntry, BundleLink};
pub use common::{CodeableConcept, Coding, HumanName, Identifier, Reference};
pub use location::{Location, LocationStatus, PHYSICAL_TYPE_SYSTEM, PhysicalType};
pub use organization::{Organization, Practitioner, PractitionerRole};

use serde::{Serialize, de::DeserializeOwned};

/// A resource type the REST service can read and write
pub trait FhirResource: Clone + Serialize + DeserializeOwned + Send + Sync {
    /// The `resourceType` discriminator, also the REST path segment
    const RESOURCE_TYPE: &'static str;

    /// Server-assigned logical id, if any
    fn id(&self) -> Option<&str>;
}

macro_rules! impl_fhir_resource {
    ($ty:ty, $name:literal) => {
        impl FhirResource for $ty {
            const RESOURCE_TYPE: &'static str = $name;

            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }
        }
    };
}

impl_fhir_resource!(Location, "Location");
impl_fhir_resource!(Organization, "Organization");
impl_fhir_resource!(Practitioner, "Practitioner");
impl_fhir_resource!(PractitionerRole, "PractitionerRole");
