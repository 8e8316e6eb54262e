//! The authenticating request pipeline.
//!
//! Every dispatch moves through a small session state machine:
//! Unauthenticated → Authenticated → (rejected) → Reauthenticating →
//! Authenticated or Failed. A request that comes back 401 clears the cached
//! token, re-authenticates exactly once, and retries the original request
//! exactly once. A second 401 is terminal for that call.

use restforce_auth::{Authenticator, OAuthAccessToken, TokenStore};
use restforce_client::{RequestBuilder, Response};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Error, ErrorKind, Result};
use crate::versioned::VersionedPathClient;

/// OAuth-authenticating client over the versioned transport.
///
/// Owns the session: the cached token is private to this instance and is
/// never shared with another pipeline.
#[derive(Debug)]
pub struct OAuthRestClient {
    versioned: VersionedPathClient,
    authenticator: Authenticator,
    tokens: TokenStore,
}

impl OAuthRestClient {
    /// Create a new authenticating client.
    ///
    /// `seed` pre-populates the token store (used when a caller supplies an
    /// existing token alongside password-grant credentials); a token carried
    /// by the authenticator's mode seeds the store as well.
    pub fn new(
        versioned: VersionedPathClient,
        authenticator: Authenticator,
        seed: Option<OAuthAccessToken>,
    ) -> Self {
        let seed = seed.or_else(|| authenticator.initial_token().cloned());
        let tokens = match seed {
            Some(token) => TokenStore::seeded(token),
            None => TokenStore::new(),
        };

        Self {
            versioned,
            authenticator,
            tokens,
        }
    }

    /// Get the versioned path client.
    pub fn versioned(&self) -> &VersionedPathClient {
        &self.versioned
    }

    /// Get the authenticator.
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    /// GET a resource path with query parameters.
    pub async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Response> {
        self.dispatch(|| {
            let mut request = self.versioned.get(path);
            for (name, value) in query {
                request = request.query(name.as_str(), value.as_str());
            }
            request
        })
        .await
    }

    /// POST a JSON body to a resource path.
    pub async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let body = serde_json::to_value(body)
            .map_err(|e| Error::with_source(ErrorKind::Serialization(e.to_string()), e))?;
        self.dispatch(|| self.versioned.post(path).json_value(body.clone()))
            .await
    }

    /// PATCH a resource path with a JSON body.
    pub async fn patch_json<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let body = serde_json::to_value(body)
            .map_err(|e| Error::with_source(ErrorKind::Serialization(e.to_string()), e))?;
        self.dispatch(|| self.versioned.patch(path).json_value(body.clone()))
            .await
    }

    /// GET the resource-owner info for the authenticated identity.
    pub async fn user_info(&self) -> Result<Response> {
        let token = self.current_token().await?;
        let url = self.authenticator.user_info_url(&token);
        self.get(&url, &[]).await
    }

    /// Dispatch one request with the session token attached, running the
    /// single reauthenticate-and-retry cycle on rejection.
    ///
    /// The request factory is invoked per attempt so the retry carries the
    /// fresh token on an otherwise identical request.
    async fn dispatch<F>(&self, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let token = self.current_token().await?;
        let request = build().bearer_auth(token.access_token());
        let response = self.versioned.execute(request).await?;

        if response.status() != 401 {
            return Ok(response);
        }

        warn!("request rejected as unauthenticated, re-establishing session");
        let fresh = self.replace_rejected(&token).await?;
        let retry = build().bearer_auth(fresh.access_token());
        let response = self.versioned.execute(retry).await?;

        if response.status() == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::new(ErrorKind::Authentication(format!(
                "request rejected again after re-authentication: {body}"
            ))));
        }

        Ok(response)
    }

    /// Get the cached token, establishing the session on first use.
    async fn current_token(&self) -> Result<OAuthAccessToken> {
        let mut slot = self.tokens.lock().await;
        if let Some(token) = slot.as_ref() {
            return Ok(token.clone());
        }

        debug!("no cached access token, establishing session");
        let token = self.authenticator.authenticate().await?;
        *slot = Some(token.clone());
        Ok(token)
    }

    /// Replace a token the remote rejected.
    ///
    /// If another task already swapped in a fresh token, that one is used
    /// instead of forcing a second exchange.
    async fn replace_rejected(&self, rejected: &OAuthAccessToken) -> Result<OAuthAccessToken> {
        let mut slot = self.tokens.lock().await;
        if let Some(current) = slot.as_ref() {
            if current != rejected {
                return Ok(current.clone());
            }
        }

        *slot = None;
        let token = self.authenticator.reauthenticate().await?;
        *slot = Some(token.clone());
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restforce_auth::AuthenticationMode;
    use restforce_client::HttpClient;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn pipeline(api_host: &str, oauth_url: &str, mode: AuthenticationMode) -> OAuthRestClient {
        let versioned = VersionedPathClient::new(
            HttpClient::default_client().unwrap(),
            api_host,
            "v38.0",
        );
        let authenticator = Authenticator::new(
            "client123",
            "secret456",
            oauth_url,
            mode,
            HttpClient::default_client().unwrap(),
        );
        OAuthRestClient::new(versioned, authenticator, None)
    }

    #[tokio::test]
    async fn test_seeded_token_is_attached_without_exchange() {
        let api = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/services/data/v38.0/limits"))
            .and(header("Authorization", "Bearer seeded-token"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&api)
            .await;

        let client = pipeline(
            &api.uri(),
            "https://login.salesforce.com",
            AuthenticationMode::PresuppliedToken(OAuthAccessToken::new("seeded-token")),
        );

        let response = client.get("/limits", &[]).await.unwrap();
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_non_auth_failures_pass_through() {
        let api = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/services/data/v38.0/sobjects/Account/describe"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&api)
            .await;

        let client = pipeline(
            &api.uri(),
            "https://login.salesforce.com",
            AuthenticationMode::PresuppliedToken(OAuthAccessToken::new("t")),
        );

        // A 500 is the caller's problem, not an authentication event.
        let response = client.get("sobjects/Account/describe", &[]).await.unwrap();
        assert_eq!(response.status(), 500);
    }

    #[tokio::test]
    async fn test_rejected_presupplied_token_cannot_recover() {
        let api = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/services/data/v38.0/limits"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&api)
            .await;

        let client = pipeline(
            &api.uri(),
            "https://login.salesforce.com",
            AuthenticationMode::PresuppliedToken(OAuthAccessToken::new("stale")),
        );

        let err = client.get("/limits", &[]).await.unwrap_err();
        assert!(err.is_authentication());
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_refresh() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;

        let api = MockServer::start().await;
        let oauth = MockServer::start().await;

        let grant_count = Arc::new(AtomicU32::new(0));
        let grant_count_clone = grant_count.clone();

        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .respond_with(move |_: &wiremock::Request| {
                let n = grant_count_clone.fetch_add(1, Ordering::SeqCst);
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "access_token": format!("token-{n}"),
                    "instance_url": "https://na1.salesforce.com",
                    "token_type": "Bearer"
                }))
            })
            .mount(&oauth)
            .await;

        Mock::given(method("GET"))
            .and(path("/services/data/v38.0/limits"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&api)
            .await;

        let client = Arc::new(pipeline(
            &api.uri(),
            &oauth.uri(),
            AuthenticationMode::PasswordGrant {
                username: "user@example.com".to_string(),
                password: "hunter2".to_string(),
            },
        ));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let client = client.clone();
            handles.push(tokio::spawn(async move {
                client.get("/limits", &[]).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // All eight callers raced on an empty store; the mutex serialized
        // them into a single exchange.
        assert_eq!(grant_count.load(Ordering::SeqCst), 1);
    }
}
