//! REST access to a FHIR server
//!
//! [`FhirClient`] holds the HTTP client and base URL; [`FhirService`] is a
//! typed view of one resource type on top of it. Submission helpers are
//! written against the [`ResourceService`] trait.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{Bundle, FhirResource};

const FHIR_JSON: &str = "application/fhir+json";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors talking to the FHIR server
#[derive(Debug, Error)]
pub enum FhirError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("FHIR server returned {status} for {url}: {body}")]
    Http {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Failed to encode {resource_type}: {message}")]
    Encode {
        resource_type: String,
        message: String,
    },

    #[error("Failed to decode {resource_type} response: {message}")]
    Decode {
        resource_type: String,
        message: String,
    },

    #[error("Cannot {operation} {resource_type} without an id")]
    MissingId {
        resource_type: String,
        operation: &'static str,
    },
}

impl FhirError {
    /// HTTP status for server-side rejections
    pub fn status(&self) -> Option<u16> {
        match self {
            FhirError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Operations on one resource type
#[async_trait]
pub trait ResourceService<T: FhirResource>: Send + Sync {
    async fn read(&self, id: &str) -> Result<T, FhirError>;

    /// One page of search results
    async fn list(&self, params: &[(String, String)]) -> Result<Bundle<T>, FhirError>;

    async fn create(&self, resource: &T) -> Result<T, FhirError>;

    async fn update(&self, resource: &T) -> Result<T, FhirError>;

    async fn delete(&self, id: &str) -> Result<(), FhirError>;

    /// The page after `current`, or `None` when this service does not page
    async fn next_page(&self, _current: &Bundle<T>) -> Result<Option<Bundle<T>>, FhirError> {
        Ok(None)
    }

    /// Every page of a search
    ///
    /// Stops with a warning when a `next` link points at a page already seen.
    async fn list_all(&self, params: &[(String, String)]) -> Result<Vec<T>, FhirError> {
        let mut page = self.list(params).await?;
        let mut seen = HashSet::new();
        let mut resources = Vec::new();

        loop {
            if let Some(url) = page.self_link() {
                seen.insert(url.to_string());
            }
            let following = match page.next_link() {
                Some(url) if !seen.insert(url.to_string()) => {
                    warn!("Paging link {} was already visited; stopping", url);
                    None
                }
                Some(_) => self.next_page(&page).await?,
                None => None,
            };

            resources.extend(page.into_resources());
            match following {
                Some(next) => page = next,
                None => break,
            }
        }

        Ok(resources)
    }
}

/// HTTP client bound to a FHIR base URL
#[derive(Debug, Clone)]
pub struct FhirClient {
    http: reqwest::Client,
    base_url: String,
}

impl FhirClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FhirError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FhirError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FhirError::ClientBuild)?;
        Ok(Self::from_parts(http, base_url))
    }

    /// Reuse an existing HTTP client (shared pools, custom auth middleware)
    pub fn from_parts(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Typed service for `T`
    pub fn service<T: FhirResource>(&self) -> FhirService<T> {
        FhirService {
            client: self.clone(),
            _marker: PhantomData,
        }
    }

    fn url(&self, resource_type: &str, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/{}/{}", self.base_url, resource_type, id),
            None => format!("{}/{}", self.base_url, resource_type),
        }
    }

    /// Number of `resource_type` resources matching `filters`
    ///
    /// Uses `_summary=count`; a bundle without `total` counts as zero.
    pub async fn summary_count(
        &self,
        resource_type: &str,
        filters: &[(String, String)],
    ) -> Result<u64, FhirError> {
        let url = self.url(resource_type, None);
        let mut query = vec![("_summary".to_string(), "count".to_string())];
        query.extend(filters.iter().cloned());

        debug!("GET {} {:?}", url, query);
        let request = self.http.get(&url).query(&query);
        let bundle: Bundle<serde_json::Value> = self.execute(request, &url, "Bundle").await?;
        Ok(bundle.total.unwrap_or(0))
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<String, FhirError> {
        let response = request
            .header(ACCEPT, FHIR_JSON)
            .send()
            .await
            .map_err(|source| FhirError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| FhirError::Transport {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            return Err(FhirError::Http {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }
        Ok(body)
    }

    async fn execute<R: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
        resource_type: &str,
    ) -> Result<R, FhirError> {
        let body = self.send(request, url).await?;
        serde_json::from_str(&body).map_err(|e| FhirError::Decode {
            resource_type: resource_type.to_string(),
            message: e.to_string(),
        })
    }

    fn encode<T: FhirResource>(resource: &T) -> Result<Vec<u8>, FhirError> {
        serde_json::to_vec(resource).map_err(|e| FhirError::Encode {
            resource_type: T::RESOURCE_TYPE.to_string(),
            message: e.to_string(),
        })
    }

    /// Decode a write response, accepting an empty body as "stored as sent"
    fn decode_written<T: FhirResource>(body: &str, sent: &T) -> Result<T, FhirError> {
        if body.trim().is_empty() {
            return Ok(sent.clone());
        }
        serde_json::from_str(body).map_err(|e| FhirError::Decode {
            resource_type: T::RESOURCE_TYPE.to_string(),
            message: e.to_string(),
        })
    }
}

/// Typed access to one resource type
#[derive(Debug, Clone)]
pub struct FhirService<T> {
    client: FhirClient,
    _marker: PhantomData<fn() -> T>,
}

impl<T: FhirResource + 'static> FhirService<T> {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FhirError> {
        Ok(FhirClient::new(base_url)?.service())
    }

    pub fn client(&self) -> &FhirClient {
        &self.client
    }

    pub async fn summary_count(&self, filters: &[(String, String)]) -> Result<u64, FhirError> {
        self.client.summary_count(T::RESOURCE_TYPE, filters).await
    }
}

#[async_trait]
impl<T: FhirResource + 'static> ResourceService<T> for FhirService<T> {
    async fn read(&self, id: &str) -> Result<T, FhirError> {
        let url = self.client.url(T::RESOURCE_TYPE, Some(id));
        debug!("GET {}", url);
        let request = self.client.http.get(&url);
        self.client.execute(request, &url, T::RESOURCE_TYPE).await
    }

    async fn list(&self, params: &[(String, String)]) -> Result<Bundle<T>, FhirError> {
        let url = self.client.url(T::RESOURCE_TYPE, None);
        debug!("GET {} {:?}", url, params);
        let request = self.client.http.get(&url).query(params);
        self.client.execute(request, &url, "Bundle").await
    }

    async fn create(&self, resource: &T) -> Result<T, FhirError> {
        let url = self.client.url(T::RESOURCE_TYPE, None);
        debug!("POST {}", url);
        let request = self
            .client
            .http
            .post(&url)
            .header(CONTENT_TYPE, FHIR_JSON)
            .header("Prefer", "return=representation")
            .body(FhirClient::encode(resource)?);
        let body = self.client.send(request, &url).await?;
        FhirClient::decode_written(&body, resource)
    }

    async fn update(&self, resource: &T) -> Result<T, FhirError> {
        let id = resource.id().filter(|id| !id.is_empty()).ok_or_else(|| {
            FhirError::MissingId {
                resource_type: T::RESOURCE_TYPE.to_string(),
                operation: "update",
            }
        })?;
        let url = self.client.url(T::RESOURCE_TYPE, Some(id));
        debug!("PUT {}", url);
        let request = self
            .client
            .http
            .put(&url)
            .header(CONTENT_TYPE, FHIR_JSON)
            .header("Prefer", "return=representation")
            .body(FhirClient::encode(resource)?);
        let body = self.client.send(request, &url).await?;
        FhirClient::decode_written(&body, resource)
    }

    async fn delete(&self, id: &str) -> Result<(), FhirError> {
        let url = self.client.url(T::RESOURCE_TYPE, Some(id));
        debug!("DELETE {}", url);
        let request = self.client.http.delete(&url);
        self.client.send(request, &url).await.map(|_| ())
    }

    async fn next_page(&self, current: &Bundle<T>) -> Result<Option<Bundle<T>>, FhirError> {
        let Some(url) = current.next_link() else {
            return Ok(None);
        };
        debug!("GET {}", url);
        let request = self.client.http.get(url);
        self.client.execute(request, url, "Bundle").await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn location_service(server: &MockServer) -> FhirService<Location> {
        FhirService::new(format!("{}/fhir/", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_read_location() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fhir/Location/303"))
            .and(header("accept", FHIR_JSON))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resourceType": "Location",
                "id": "303",
                "name": "Ward 1"
            })))
            .mount(&server)
            .await;

        let location = location_service(&server).read("303").await.unwrap();
        assert_eq!(location.name.as_deref(), Some("Ward 1"));
    }

    #[tokio::test]
    async fn test_create_posts_to_collection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/fhir/Location"))
            .and(body_partial_json(json!({ "resourceType": "Location", "name": "New" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "resourceType": "Location",
                "id": "1001",
                "name": "New"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let payload = Location {
            name: Some("New".into()),
            ..Default::default()
        };
        let saved = location_service(&server).create(&payload).await.unwrap();
        assert_eq!(saved.id.as_deref(), Some("1001"));
    }

    #[tokio::test]
    async fn test_update_puts_by_id_and_accepts_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/fhir/Location/303"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let payload = Location {
            id: Some("303".into()),
            name: Some("Renamed".into()),
            ..Default::default()
        };
        let saved = location_service(&server).update(&payload).await.unwrap();
        assert_eq!(saved, payload);
    }

    #[tokio::test]
    async fn test_update_without_id_is_rejected_locally() {
        let server = MockServer::start().await;
        let err = location_service(&server)
            .update(&Location::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FhirError::MissingId { .. }));
    }

    #[tokio::test]
    async fn test_server_error_is_propagated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/fhir/Location"))
            .respond_with(ResponseTemplate::new(422).set_body_string("bad status"))
            .mount(&server)
            .await;

        let err = location_service(&server)
            .create(&Location::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(422));
        assert!(err.to_string().contains("bad status"));
    }

    #[tokio::test]
    async fn test_summary_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fhir/PractitionerRole"))
            .and(query_param("_summary", "count"))
            .and(query_param("organization", "team-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resourceType": "Bundle",
                "type": "searchset",
                "total": 4
            })))
            .mount(&server)
            .await;

        let client = FhirClient::new(format!("{}/fhir", server.uri())).unwrap();
        let count = client
            .summary_count(
                "PractitionerRole",
                &[("organization".to_string(), "team-1".to_string())],
            )
            .await
            .unwrap();
        assert_eq!(count, 4);
    }

    #[tokio::test]
    async fn test_summary_count_defaults_to_zero() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fhir/Location"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "resourceType": "Bundle" })),
            )
            .mount(&server)
            .await;

        let count = location_service(&server).summary_count(&[]).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_list_all_follows_next_links() {
        let server = MockServer::start().await;
        let next = format!("{}/fhir/page2", server.uri());
        Mock::given(method("GET"))
            .and(path("/fhir/Location"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resourceType": "Bundle",
                "link": [{ "relation": "next", "url": next }],
                "entry": [{ "resource": { "resourceType": "Location", "id": "1" } }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/fhir/page2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resourceType": "Bundle",
                "entry": [{ "resource": { "resourceType": "Location", "id": "2" } }]
            })))
            .mount(&server)
            .await;

        let ids: Vec<_> = location_service(&server)
            .list_all(&[])
            .await
            .unwrap()
            .into_iter()
            .filter_map(|l| l.id)
            .collect();
        assert_eq!(ids, vec!["1".to_string(), "2".to_string()]);
    }

    #[tokio::test]
    async fn test_list_all_stops_when_next_link_loops_back() {
        let server = MockServer::start().await;
        let first = format!("{}/fhir/Location", server.uri());
        let second = format!("{}/fhir/page2", server.uri());
        Mock::given(method("GET"))
            .and(path("/fhir/Location"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resourceType": "Bundle",
                "link": [
                    { "relation": "self", "url": first },
                    { "relation": "next", "url": second }
                ],
                "entry": [{ "resource": { "resourceType": "Location", "id": "1" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/fhir/page2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resourceType": "Bundle",
                "link": [{ "relation": "next", "url": first }],
                "entry": [{ "resource": { "resourceType": "Location", "id": "2" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let locations = location_service(&server).list_all(&[]).await.unwrap();
        assert_eq!(locations.len(), 2);
    }

    #[tokio::test]
    async fn test_list_all_stops_when_page_links_to_itself() {
        let server = MockServer::start().await;
        let same = format!("{}/fhir/Location", server.uri());
        Mock::given(method("GET"))
            .and(path("/fhir/Location"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resourceType": "Bundle",
                "link": [
                    { "relation": "self", "url": same },
                    { "relation": "next", "url": same }
                ],
                "entry": [{ "resource": { "resourceType": "Location", "id": "1" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let locations = location_service(&server).list_all(&[]).await.unwrap();
        assert_eq!(locations.len(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fhir/Location/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = location_service(&server).read("1").await.unwrap_err();
        assert!(matches!(err, FhirError::Decode { .. }));
    }
}
