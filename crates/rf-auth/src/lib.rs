//! # restforce-auth
//!
//! OAuth 2.0 session establishment for the Restforce API crates.
//!
//! ## Security
//!
//! This library is designed with security in mind:
//! - Sensitive data (tokens, secrets, passwords) are redacted in Debug output
//! - Tracing/logging skips credential parameters
//! - Error messages sanitize any credential data
//!
//! ## Supported Authentication Methods
//!
//! - **Pre-supplied access token** - An existing token is used as-is; no
//!   network call is made to establish the session
//! - **Resource-owner password grant** - Exchanges client id/secret plus
//!   username/password for an access token at the OAuth host
//!
//! ## Example
//!
//! ```rust,ignore
//! use restforce_auth::{AuthenticationMode, Authenticator};
//! use restforce_client::HttpClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), restforce_auth::Error> {
//!     let authenticator = Authenticator::new(
//!         "consumer_key",
//!         "consumer_secret",
//!         restforce_auth::PRODUCTION_LOGIN_URL,
//!         AuthenticationMode::PasswordGrant {
//!             username: "user@example.com".to_string(),
//!             password: "hunter2".to_string(),
//!         },
//!         HttpClient::default_client()?,
//!     );
//!
//!     let token = authenticator.authenticate().await?;
//!     println!("session established against {:?}", token.instance_url());
//!     Ok(())
//! }
//! ```

mod authenticator;
mod error;
mod token;

pub use authenticator::{AuthenticationMode, Authenticator, TOKEN_PATH, USER_INFO_PATH};
pub use error::{Error, ErrorKind, Result};
pub use token::{OAuthAccessToken, TokenResponse, TokenStore};

/// Default Salesforce login URL for production.
pub const PRODUCTION_LOGIN_URL: &str = "https://login.salesforce.com";

/// Default Salesforce login URL for sandbox.
pub const SANDBOX_LOGIN_URL: &str = "https://test.salesforce.com";
