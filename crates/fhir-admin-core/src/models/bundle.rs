//! Search result bundles

use serde::{Deserialize, Serialize};

/// A searchset Bundle holding resources of one type
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle<T> {
    #[serde(default = "bundle_type_name")]
    pub resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub link: Vec<BundleLink>,
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<BundleEntry<T>>,
}

/// Paging link (`self`, `next`, `previous`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BundleLink {
    pub relation: String,
    pub url: String,
}

fn bundle_type_name() -> String {
    "Bundle".to_string()
}

/// A single Bundle entry
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<T>,
}

impl<T> Bundle<T> {
    /// Resources carried by the entries, in order
    pub fn resources(&self) -> impl Iterator<Item = &T> {
        self.entry.iter().filter_map(|e| e.resource.as_ref())
    }

    /// URL of the next page, if the server paged the result
    pub fn next_link(&self) -> Option<&str> {
        self.link
            .iter()
            .find(|l| l.relation == "next")
            .map(|l| l.url.as_str())
    }

    /// URL this page was served from, when the server reports it
    pub fn self_link(&self) -> Option<&str> {
        self.link
            .iter()
            .find(|l| l.relation == "self")
            .map(|l| l.url.as_str())
    }

    pub fn into_resources(self) -> Vec<T> {
        self.entry.into_iter().filter_map(|e| e.resource).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;

    #[test]
    fn test_summary_bundle_without_entries() {
        let bundle: Bundle<Location> =
            serde_json::from_str(r#"{ "resourceType": "Bundle", "type": "searchset", "total": 17 }"#)
                .unwrap();
        assert_eq!(bundle.total, Some(17));
        assert!(bundle.entry.is_empty());
        assert_eq!(bundle.next_link(), None);
    }

    #[test]
    fn test_into_resources_skips_empty_entries() {
        let json = r#"{
            "resourceType": "Bundle",
            "entry": [
                { "fullUrl": "http://x/Location/1", "resource": { "resourceType": "Location", "id": "1" } },
                { "fullUrl": "http://x/Location/2" }
            ]
        }"#;
        let bundle: Bundle<Location> = serde_json::from_str(json).unwrap();
        let ids: Vec<_> = bundle
            .into_resources()
            .into_iter()
            .filter_map(|l| l.id)
            .collect();
        assert_eq!(ids, vec!["1".to_string()]);
    }
}
