//! Error types for restforce-rest.

/// Result type alias for restforce-rest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for restforce-rest operations.
///
/// Non-2xx HTTP responses are not errors at this level: they are returned
/// to the caller as ordinary responses. An `Error` means the operation
/// could not produce a response at all.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if this is a construction/configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self.kind, ErrorKind::Config(_))
    }

    /// Returns true if this is an authentication error.
    pub fn is_authentication(&self) -> bool {
        matches!(self.kind, ErrorKind::Authentication(_))
    }

    /// Returns true if this is a transport-level error.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, ErrorKind::Transport(_))
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Invalid or incomplete construction arguments.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session establishment failed, or the remote rejected a request again
    /// after one re-authentication.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// A request body could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Network-level failure, passed through from the transport.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<restforce_auth::Error> for Error {
    fn from(err: restforce_auth::Error) -> Self {
        let message = err.to_string();
        let kind = match &err.kind {
            // A connection failure during the token exchange is still a
            // transport failure, not a rejection of the credentials.
            restforce_auth::ErrorKind::Http(_) => ErrorKind::Transport(message),
            _ => ErrorKind::Authentication(message),
        };
        Error::with_source(kind, err)
    }
}

impl From<restforce_client::Error> for Error {
    fn from(err: restforce_client::Error) -> Self {
        let kind = match &err.kind {
            restforce_client::ErrorKind::Json(m) => ErrorKind::Serialization(m.clone()),
            restforce_client::ErrorKind::Config(m) => ErrorKind::Config(m.clone()),
            _ => ErrorKind::Transport(err.to_string()),
        };
        Error::with_source(kind, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        let err = ErrorKind::Config("no authentication path".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: no authentication path"
        );

        let err = ErrorKind::Authentication("session rejected".into());
        assert_eq!(err.to_string(), "Authentication error: session rejected");
    }

    #[test]
    fn test_auth_error_conversion() {
        let auth_err = restforce_auth::Error::new(restforce_auth::ErrorKind::OAuth {
            status: 400,
            error: "invalid_grant".into(),
            description: "authentication failure".into(),
        });
        let err: Error = auth_err.into();
        assert!(err.is_authentication());
        assert!(err.to_string().contains("invalid_grant"));
    }

    #[test]
    fn test_auth_transport_error_stays_transport() {
        let auth_err = restforce_auth::Error::new(restforce_auth::ErrorKind::Http(
            "connection refused".into(),
        ));
        let err: Error = auth_err.into();
        assert!(err.is_transport());
        assert!(!err.is_authentication());
    }

    #[test]
    fn test_client_error_conversion() {
        let client_err = restforce_client::Error::new(restforce_client::ErrorKind::Timeout);
        let err: Error = client_err.into();
        assert!(err.is_transport());

        let client_err =
            restforce_client::Error::new(restforce_client::ErrorKind::Config("bad".into()));
        let err: Error = client_err.into();
        assert!(err.is_config());
    }
}
