//! # restforce-api
//!
//! A Salesforce REST API client for Rust with managed OAuth2 sessions.
//!
//! The client performs object CRUD, SOQL queries, describe, limits,
//! user-info and custom Apex REST operations without the caller managing
//! authentication, API versioning, or base-URL composition.
//!
//! ## Security
//!
//! - Sensitive data (tokens, secrets, passwords) are redacted in Debug output
//! - Tracing/logging skips credential parameters
//! - Error messages sanitize any credential data
//!
//! ## Crates
//!
//! - **restforce-client** - Raw HTTP transport: request building, bearer
//!   auth, pooling, tracing
//! - **restforce-auth** - OAuth2 session establishment: password grant,
//!   tokens, token store
//! - **restforce-rest** - The facade and the authenticating pipeline
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use restforce_api::Restforce;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Restforce::builder(
//!         "consumer_key",
//!         "consumer_secret",
//!         "https://login.salesforce.com",
//!     )
//!     .username("user@example.com")
//!     .password("hunter2")
//!     .build()?;
//!
//!     let response = client.query("SELECT Id, Name FROM Account LIMIT 10").await?;
//!     let result: serde_json::Value = response.json().await?;
//!
//!     for record in result["records"].as_array().unwrap_or(&vec![]) {
//!         println!("{}", record["Name"]);
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-export all crates for convenient access
pub use restforce_auth as auth;
pub use restforce_client as client;
pub use restforce_rest as rest;

// Re-export commonly used types at the top level
pub use restforce_auth::{AuthenticationMode, Authenticator, OAuthAccessToken};
pub use restforce_client::{ClientConfig, HttpClient, Response};
pub use restforce_rest::{Restforce, RestforceBuilder};
