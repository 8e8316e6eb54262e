//! Access tokens and the in-memory token store.
//!
//! All token-bearing types implement custom Debug to redact sensitive data.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use tokio::sync::{Mutex, MutexGuard};

/// Token response from the OAuth token endpoint.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Instance URL the session is bound to.
    #[serde(default)]
    pub instance_url: Option<String>,
    /// Resource-owner identity URL.
    #[serde(default)]
    pub id: Option<String>,
    /// Token type (usually "Bearer").
    #[serde(default)]
    pub token_type: Option<String>,
    /// Signature for verification.
    #[serde(default)]
    pub signature: Option<String>,
    /// Issued-at timestamp, epoch milliseconds as a string.
    #[serde(default)]
    pub issued_at: Option<String>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("instance_url", &self.instance_url)
            .field("id", &self.id)
            .field("token_type", &self.token_type)
            .field("signature", &self.signature.as_ref().map(|_| "[REDACTED]"))
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

/// An OAuth access token with its session metadata.
///
/// Immutable once issued: a refresh replaces the whole token, it never
/// mutates one in place.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthAccessToken {
    access_token: String,
    instance_url: Option<String>,
    resource_owner_url: Option<String>,
    token_type: Option<String>,
    issued_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for OAuthAccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthAccessToken")
            .field("access_token", &"[REDACTED]")
            .field("instance_url", &self.instance_url)
            .field("resource_owner_url", &self.resource_owner_url)
            .field("token_type", &self.token_type)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

impl OAuthAccessToken {
    /// Create a token from a bare access-token value.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            instance_url: None,
            resource_owner_url: None,
            token_type: None,
            issued_at: None,
        }
    }

    /// Set the instance URL.
    pub fn with_instance_url(mut self, url: impl Into<String>) -> Self {
        self.instance_url = Some(url.into());
        self
    }

    /// Set the resource-owner identity URL.
    pub fn with_resource_owner_url(mut self, url: impl Into<String>) -> Self {
        self.resource_owner_url = Some(url.into());
        self
    }

    /// Set the token type.
    pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = Some(token_type.into());
        self
    }

    /// Get the access-token value.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Get the instance URL, if the token carries one.
    pub fn instance_url(&self) -> Option<&str> {
        self.instance_url.as_deref()
    }

    /// Get the resource-owner identity URL, if the token carries one.
    pub fn resource_owner_url(&self) -> Option<&str> {
        self.resource_owner_url.as_deref()
    }

    /// Get the token type, if the token carries one.
    pub fn token_type(&self) -> Option<&str> {
        self.token_type.as_deref()
    }

    /// Get the issued-at timestamp, if the token carries one.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.issued_at
    }
}

impl From<TokenResponse> for OAuthAccessToken {
    fn from(response: TokenResponse) -> Self {
        let issued_at = response
            .issued_at
            .as_deref()
            .and_then(|millis| millis.parse::<i64>().ok())
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single());

        Self {
            access_token: response.access_token,
            instance_url: response.instance_url,
            resource_owner_url: response.id,
            token_type: response.token_type,
            issued_at,
        }
    }
}

/// In-memory store for the current session token.
///
/// One store belongs to one client pipeline; tokens are never shared across
/// instances or persisted. The mutex serializes the check-token /
/// refresh-token / retry sequence when a client is shared across tasks.
#[derive(Debug, Default)]
pub struct TokenStore {
    slot: Mutex<Option<OAuthAccessToken>>,
}

impl TokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a token.
    pub fn seeded(token: OAuthAccessToken) -> Self {
        Self {
            slot: Mutex::new(Some(token)),
        }
    }

    /// Get a copy of the current token, if any.
    pub async fn get(&self) -> Option<OAuthAccessToken> {
        self.slot.lock().await.clone()
    }

    /// Replace the current token.
    pub async fn set(&self, token: OAuthAccessToken) {
        *self.slot.lock().await = Some(token);
    }

    /// Lock the store for a compound check-and-replace sequence.
    pub async fn lock(&self) -> MutexGuard<'_, Option<OAuthAccessToken>> {
        self.slot.lock().await
    }
}
