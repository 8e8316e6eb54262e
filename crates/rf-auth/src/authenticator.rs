//! OAuth 2.0 resource-owner password-grant authentication.

use restforce_client::{HttpClient, Response};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{Error, ErrorKind, Result};
use crate::token::{OAuthAccessToken, TokenResponse};

/// Path of the OAuth token endpoint on the login host.
pub const TOKEN_PATH: &str = "/services/oauth2/token";

/// Path of the resource-owner info endpoint on the login host, used when a
/// token does not carry its own identity URL.
pub const USER_INFO_PATH: &str = "/services/oauth2/userinfo";

/// How a session is established, resolved once at construction.
#[derive(Clone)]
pub enum AuthenticationMode {
    /// An existing access token is used as-is. No grant material is
    /// available, so a rejected token cannot be replaced.
    PresuppliedToken(OAuthAccessToken),
    /// Username/password pair exchanged for a token via the password grant.
    PasswordGrant { username: String, password: String },
}

impl std::fmt::Debug for AuthenticationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthenticationMode::PresuppliedToken(token) => {
                f.debug_tuple("PresuppliedToken").field(token).finish()
            }
            AuthenticationMode::PasswordGrant { username, .. } => f
                .debug_struct("PasswordGrant")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Produces valid access tokens for the request pipeline.
///
/// The authenticator does not retry: a failed exchange surfaces
/// immediately. Retry policy for rejected sessions lives in the
/// request-dispatch layer.
#[derive(Clone)]
pub struct Authenticator {
    client_id: String,
    client_secret: String,
    oauth_url: String,
    mode: AuthenticationMode,
    transport: HttpClient,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("oauth_url", &self.oauth_url)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    /// Create a new authenticator bound to an OAuth host.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        oauth_url: impl Into<String>,
        mode: AuthenticationMode,
        transport: HttpClient,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            oauth_url: oauth_url.into().trim_end_matches('/').to_string(),
            mode,
            transport,
        }
    }

    /// Get the OAuth host URL.
    pub fn oauth_url(&self) -> &str {
        &self.oauth_url
    }

    /// Get the authentication mode.
    pub fn mode(&self) -> &AuthenticationMode {
        &self.mode
    }

    /// The token injected at construction, if any.
    pub fn initial_token(&self) -> Option<&OAuthAccessToken> {
        match &self.mode {
            AuthenticationMode::PresuppliedToken(token) => Some(token),
            AuthenticationMode::PasswordGrant { .. } => None,
        }
    }

    /// Produce a valid access token for a new session.
    ///
    /// A pre-supplied token is returned as-is; the password grant performs
    /// one exchange round trip.
    pub async fn authenticate(&self) -> Result<OAuthAccessToken> {
        match &self.mode {
            AuthenticationMode::PresuppliedToken(token) => Ok(token.clone()),
            AuthenticationMode::PasswordGrant { username, password } => {
                self.password_grant(username, password).await
            }
        }
    }

    /// Produce a replacement token after the remote rejected the cached one.
    pub async fn reauthenticate(&self) -> Result<OAuthAccessToken> {
        match &self.mode {
            AuthenticationMode::PresuppliedToken(_) => {
                Err(Error::new(ErrorKind::TokenRejected(
                    "access token was rejected and no username/password pair is available to obtain a new one"
                        .to_string(),
                )))
            }
            AuthenticationMode::PasswordGrant { username, password } => {
                debug!("re-running password grant after session rejection");
                self.password_grant(username, password).await
            }
        }
    }

    /// Resolve the resource-owner info endpoint for a token.
    pub fn user_info_url(&self, token: &OAuthAccessToken) -> String {
        token
            .resource_owner_url()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}{}", self.oauth_url, USER_INFO_PATH))
    }

    /// Exchange username/password for an access token.
    ///
    /// Credential parameters are not logged.
    #[instrument(skip(self, username, password))]
    async fn password_grant(&self, username: &str, password: &str) -> Result<OAuthAccessToken> {
        let form = vec![
            ("grant_type".to_string(), "password".to_string()),
            ("client_id".to_string(), self.client_id.clone()),
            ("client_secret".to_string(), self.client_secret.clone()),
            ("username".to_string(), username.to_string()),
            ("password".to_string(), password.to_string()),
        ];

        let url = format!("{}{}", self.oauth_url, TOKEN_PATH);
        let request = self.transport.post(url).form(form);
        let response = self.transport.execute(request).await?;

        self.handle_token_response(response).await
    }

    /// Handle a token response, checking for errors.
    async fn handle_token_response(&self, response: Response) -> Result<OAuthAccessToken> {
        let status = response.status();
        let success = response.is_success();
        let body = response.text().await?;

        if !success {
            if let Ok(error) = serde_json::from_str::<OAuthErrorResponse>(&body) {
                return Err(Error::new(ErrorKind::OAuth {
                    status,
                    error: error.error,
                    description: error.error_description,
                }));
            }
            return Err(Error::new(ErrorKind::TokenExchange { status, body }));
        }

        match serde_json::from_str::<TokenResponse>(&body) {
            Ok(token) => Ok(OAuthAccessToken::from(token)),
            Err(e) => Err(Error::with_source(
                ErrorKind::TokenExchange { status, body },
                e,
            )),
        }
    }
}

/// OAuth error response.
#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: String,
    error_description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn password_grant_mode() -> AuthenticationMode {
        AuthenticationMode::PasswordGrant {
            username: "user@example.com".to_string(),
            password: "hunter2".to_string(),
        }
    }

    fn authenticator(oauth_url: &str, mode: AuthenticationMode) -> Authenticator {
        Authenticator::new(
            "client123",
            "secret456",
            oauth_url,
            mode,
            HttpClient::default_client().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_password_grant_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .and(header("Content-Type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("grant_type=password"))
            .and(body_string_contains("client_id=client123"))
            .and(body_string_contains("client_secret=secret456"))
            .and(body_string_contains("username=user%40example.com"))
            .and(body_string_contains("password=hunter2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "granted_token",
                "instance_url": "https://na1.salesforce.com",
                "id": "https://login.salesforce.com/id/00Dx/005x",
                "token_type": "Bearer",
                "issued_at": "1278448832702"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let auth = authenticator(&mock_server.uri(), password_grant_mode());
        let token = auth.authenticate().await.unwrap();

        assert_eq!(token.access_token(), "granted_token");
        assert_eq!(token.instance_url(), Some("https://na1.salesforce.com"));
    }

    #[tokio::test]
    async fn test_password_grant_oauth_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "authentication failure"
            })))
            .mount(&mock_server)
            .await;

        let auth = authenticator(&mock_server.uri(), password_grant_mode());
        let err = auth.authenticate().await.unwrap_err();

        match err.kind {
            ErrorKind::OAuth {
                status,
                error,
                description,
            } => {
                assert_eq!(status, 400);
                assert_eq!(error, "invalid_grant");
                assert_eq!(description, "authentication failure");
            }
            other => panic!("expected OAuth error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_password_grant_unparseable_failure_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .respond_with(ResponseTemplate::new(503).set_body_string("<html>down</html>"))
            .mount(&mock_server)
            .await;

        let auth = authenticator(&mock_server.uri(), password_grant_mode());
        let err = auth.authenticate().await.unwrap_err();

        match err.kind {
            ErrorKind::TokenExchange { status, body } => {
                assert_eq!(status, 503);
                assert!(body.contains("down"));
            }
            other => panic!("expected TokenExchange error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_password_grant_missing_access_token_field() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "instance_url": "https://na1.salesforce.com"
            })))
            .mount(&mock_server)
            .await;

        let auth = authenticator(&mock_server.uri(), password_grant_mode());
        let err = auth.authenticate().await.unwrap_err();

        assert!(matches!(
            err.kind,
            ErrorKind::TokenExchange { status: 200, .. }
        ));
        assert!(err.source.is_some());
    }

    #[tokio::test]
    async fn test_presupplied_token_is_used_as_is() {
        // Deliberately no mock server: no network call may happen.
        let token = OAuthAccessToken::new("presupplied");
        let auth = authenticator(
            "https://login.salesforce.com",
            AuthenticationMode::PresuppliedToken(token),
        );

        let resolved = auth.authenticate().await.unwrap();
        assert_eq!(resolved.access_token(), "presupplied");
        assert_eq!(auth.initial_token().unwrap().access_token(), "presupplied");
    }

    #[tokio::test]
    async fn test_presupplied_token_cannot_reauthenticate() {
        let auth = authenticator(
            "https://login.salesforce.com",
            AuthenticationMode::PresuppliedToken(OAuthAccessToken::new("rejected")),
        );

        let err = auth.reauthenticate().await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::TokenRejected(_)));
    }

    #[test]
    fn test_user_info_url_prefers_token_identity() {
        let auth = authenticator("https://login.salesforce.com", password_grant_mode());

        let token = OAuthAccessToken::new("t")
            .with_resource_owner_url("https://login.salesforce.com/id/00Dx/005x");
        assert_eq!(
            auth.user_info_url(&token),
            "https://login.salesforce.com/id/00Dx/005x"
        );

        let bare = OAuthAccessToken::new("t");
        assert_eq!(
            auth.user_info_url(&bare),
            "https://login.salesforce.com/services/oauth2/userinfo"
        );
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let auth = authenticator("https://login.salesforce.com", password_grant_mode());

        let debug_output = format!("{:?}", auth);
        assert!(debug_output.contains("client123"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("secret456"));
        assert!(!debug_output.contains("hunter2"));
    }
}
