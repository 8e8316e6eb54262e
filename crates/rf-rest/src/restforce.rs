//! The public operation surface.

use restforce_auth::{AuthenticationMode, Authenticator, OAuthAccessToken};
use restforce_client::{ClientConfig, HttpClient, Response, DEFAULT_API_VERSION};
use serde::Serialize;
use tracing::instrument;

use crate::error::{Error, ErrorKind, Result};
use crate::oauth_rest::OAuthRestClient;
use crate::versioned::VersionedPathClient;

/// Default host serving the versioned data API.
pub const DEFAULT_API_HOST: &str = "https://na1.salesforce.com";

/// Default path prefix for custom Apex REST endpoints on the OAuth host.
pub const DEFAULT_APEX_BASE_PATH: &str = "/services/apexrest/api/";

/// Salesforce REST API client.
///
/// Each instance owns one OAuth session: the token is established lazily on
/// the first operation and cached for the lifetime of the instance. Every
/// operation returns the raw [`Response`]; non-2xx statuses are the caller's
/// to interpret.
///
/// # Example
///
/// ```rust,ignore
/// use restforce_rest::Restforce;
///
/// #[tokio::main]
/// async fn main() -> Result<(), restforce_rest::Error> {
///     let client = Restforce::builder(
///         "consumer_key",
///         "consumer_secret",
///         "https://login.salesforce.com",
///     )
///     .username("user@example.com")
///     .password("hunter2")
///     .build()?;
///
///     let response = client.query("SELECT Id, Name FROM Account").await?;
///     let records: serde_json::Value = response.json().await?;
///     println!("{records}");
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Restforce {
    oauth: OAuthRestClient,
    oauth_url: String,
    apex_base_path: String,
}

impl Restforce {
    /// Start building a client with the required credential fields.
    pub fn builder(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        oauth_url: impl Into<String>,
    ) -> RestforceBuilder {
        RestforceBuilder {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            oauth_url: oauth_url.into(),
            access_token: None,
            username: None,
            password: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            api_host: DEFAULT_API_HOST.to_string(),
            apex_base_path: DEFAULT_APEX_BASE_PATH.to_string(),
            client_config: ClientConfig::default(),
        }
    }

    /// Get the OAuth host URL.
    pub fn oauth_url(&self) -> &str {
        &self.oauth_url
    }

    /// Get the API version segment.
    pub fn api_version(&self) -> &str {
        self.oauth.versioned().api_version()
    }

    /// Get the Apex REST base path.
    pub fn apex_base_path(&self) -> &str {
        &self.apex_base_path
    }

    /// Create a new record of the given object type.
    #[instrument(skip(self, data))]
    pub async fn create<T: Serialize>(&self, object_type: &str, data: &T) -> Result<Response> {
        let path = format!("sobjects/{object_type}");
        self.oauth.post_json(&path, data).await
    }

    /// Update an existing record.
    #[instrument(skip(self, data))]
    pub async fn update<T: Serialize>(
        &self,
        object_type: &str,
        id: &str,
        data: &T,
    ) -> Result<Response> {
        let path = format!("sobjects/{object_type}/{id}");
        self.oauth.patch_json(&path, data).await
    }

    /// Get metadata for an object type.
    #[instrument(skip(self))]
    pub async fn describe(&self, object_type: &str) -> Result<Response> {
        let path = format!("sobjects/{object_type}/describe");
        self.oauth.get(&path, &[]).await
    }

    /// Fetch a record by id, optionally restricted to the given fields.
    #[instrument(skip(self))]
    pub async fn find(&self, object_type: &str, id: &str, fields: &[&str]) -> Result<Response> {
        let path = format!("sobjects/{object_type}/{id}");

        let mut query = Vec::new();
        if !fields.is_empty() {
            query.push(("fields".to_string(), fields.join(",")));
        }

        self.oauth.get(&path, &query).await
    }

    /// Get org limits.
    #[instrument(skip(self))]
    pub async fn limits(&self) -> Result<Response> {
        self.oauth.get("/limits", &[]).await
    }

    /// Follow a pagination continuation URL verbatim.
    #[instrument(skip(self))]
    pub async fn get_next(&self, url: &str) -> Result<Response> {
        self.oauth.get(url, &[]).await
    }

    /// Execute a SOQL query.
    #[instrument(skip(self))]
    pub async fn query(&self, soql: &str) -> Result<Response> {
        self.oauth
            .get("query", &[("q".to_string(), soql.to_string())])
            .await
    }

    /// Get the resource-owner info for the authenticated identity.
    #[instrument(skip(self))]
    pub async fn user_info(&self) -> Result<Response> {
        self.oauth.user_info().await
    }

    /// Fetch an object from a custom Apex REST endpoint.
    ///
    /// Apex endpoints live on the OAuth host, outside the versioned data
    /// path.
    #[instrument(skip(self))]
    pub async fn find_apex_object(&self, object_type: &str, id: &str) -> Result<Response> {
        let url = format!(
            "{}{}{}/{}",
            self.oauth_url, self.apex_base_path, object_type, id
        );
        self.oauth.get(&url, &[]).await
    }

    /// Create an object through a custom Apex REST endpoint.
    #[instrument(skip(self, data))]
    pub async fn create_apex_object<T: Serialize>(
        &self,
        object_type: &str,
        data: &T,
    ) -> Result<Response> {
        let url = format!("{}{}{}/", self.oauth_url, self.apex_base_path, object_type);
        self.oauth.post_json(&url, data).await
    }

    /// Update an object through a custom Apex REST endpoint.
    #[instrument(skip(self, data))]
    pub async fn update_apex_object<T: Serialize>(
        &self,
        object_type: &str,
        data: &T,
    ) -> Result<Response> {
        let url = format!("{}{}{}/", self.oauth_url, self.apex_base_path, object_type);
        self.oauth.patch_json(&url, data).await
    }
}

/// Builder for [`Restforce`].
///
/// Validation happens in [`build`](RestforceBuilder::build): an access token
/// or a username/password pair must be supplied, and the endpoint URLs must
/// parse. No network I/O happens until the first operation.
pub struct RestforceBuilder {
    client_id: String,
    client_secret: String,
    oauth_url: String,
    access_token: Option<OAuthAccessToken>,
    username: Option<String>,
    password: Option<String>,
    api_version: String,
    api_host: String,
    apex_base_path: String,
    client_config: ClientConfig,
}

impl std::fmt::Debug for RestforceBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestforceBuilder")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("oauth_url", &self.oauth_url)
            .field("access_token", &self.access_token)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("api_version", &self.api_version)
            .field("api_host", &self.api_host)
            .field("apex_base_path", &self.apex_base_path)
            .finish_non_exhaustive()
    }
}

impl RestforceBuilder {
    /// Supply an existing access token.
    pub fn access_token(mut self, token: OAuthAccessToken) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Set the username for the password grant.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the password for the password grant.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the API version segment, including the leading "v" (e.g. "v38.0").
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the host serving the versioned data API.
    pub fn api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = host.into();
        self
    }

    /// Set the path prefix for Apex REST endpoints.
    pub fn apex_base_path(mut self, path: impl Into<String>) -> Self {
        self.apex_base_path = path.into();
        self
    }

    /// Set the HTTP client configuration for both transports.
    pub fn client_config(mut self, config: ClientConfig) -> Self {
        self.client_config = config;
        self
    }

    /// Validate the configuration and assemble the client.
    pub fn build(self) -> Result<Restforce> {
        let oauth_url = self.oauth_url.trim_end_matches('/').to_string();
        url::Url::parse(&oauth_url)
            .map_err(|e| Error::with_source(ErrorKind::Config(format!("invalid OAuth URL: {e}")), e))?;
        url::Url::parse(&self.api_host)
            .map_err(|e| Error::with_source(ErrorKind::Config(format!("invalid API host: {e}")), e))?;

        // A username/password pair can refresh a rejected session, so it
        // wins the mode even when a token is also supplied; the token then
        // just seeds the store.
        let (mode, seed) = match (self.access_token, self.username, self.password) {
            (token, Some(username), Some(password)) => {
                (AuthenticationMode::PasswordGrant { username, password }, token)
            }
            (Some(token), _, _) => (AuthenticationMode::PresuppliedToken(token), None),
            _ => {
                return Err(Error::new(ErrorKind::Config(
                    "an access token or a username/password pair is required".to_string(),
                )))
            }
        };

        let api_transport = HttpClient::new(self.client_config.clone())?;
        let oauth_transport = HttpClient::new(self.client_config)?;

        let versioned = VersionedPathClient::new(api_transport, self.api_host, self.api_version);
        let authenticator = Authenticator::new(
            self.client_id,
            self.client_secret,
            oauth_url.clone(),
            mode,
            oauth_transport,
        );

        Ok(Restforce {
            oauth: OAuthRestClient::new(versioned, authenticator, seed),
            oauth_url,
            apex_base_path: self.apex_base_path,
        })
    }
}
