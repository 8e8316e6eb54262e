//! API-version-aware path construction over the raw transport.

use restforce_client::{HttpClient, RequestBuilder, Response};

/// Wraps the transport bound to the API host and prefixes resource paths
/// with the versioned data path.
///
/// Pure and stateless: the only work here is URL composition. Three path
/// shapes are recognized:
/// - absolute URLs (`http://`/`https://`) pass through verbatim;
/// - paths already rooted at `/services/data` (pagination continuation
///   URLs) get only the host prepended;
/// - anything else becomes `{host}/services/data/{version}/{path}`.
#[derive(Debug, Clone)]
pub struct VersionedPathClient {
    http: HttpClient,
    api_host: String,
    api_version: String,
}

impl VersionedPathClient {
    /// Create a new versioned client over a transport.
    pub fn new(
        http: HttpClient,
        api_host: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_host: api_host.into().trim_end_matches('/').to_string(),
            api_version: api_version.into(),
        }
    }

    /// Get the API host.
    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    /// Get the API version segment (e.g. "v38.0").
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Build the full URL for a resource path.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let path = format!("/{}", path.trim_start_matches('/'));
        if path.starts_with("/services/data") {
            format!("{}{}", self.api_host, path)
        } else {
            format!("{}/services/data/{}{}", self.api_host, self.api_version, path)
        }
    }

    /// Create a GET request builder for a resource path.
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path))
    }

    /// Create a POST request builder for a resource path.
    pub fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.url(path))
    }

    /// Create a PATCH request builder for a resource path.
    pub fn patch(&self, path: &str) -> RequestBuilder {
        self.http.patch(self.url(path))
    }

    /// Execute a request on the underlying transport.
    pub async fn execute(&self, request: RequestBuilder) -> restforce_client::Result<Response> {
        self.http.execute(request).await
    }
}
