//! # restforce-rest
//!
//! Salesforce REST API facade with managed OAuth2 session state.
//!
//! ## Features
//!
//! - **Object CRUD** - Create, update, fetch and describe records
//! - **SOQL Query** - Execute queries and follow pagination continuations
//! - **Limits / User Info** - Org limits and resource-owner introspection
//! - **Apex REST** - Custom Apex endpoints on the OAuth host
//! - **Session management** - Lazy token establishment, bearer attachment,
//!   and a single reauthenticate-and-retry cycle on rejection
//!
//! ## Example
//!
//! ```rust,ignore
//! use restforce_rest::Restforce;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), restforce_rest::Error> {
//!     let client = Restforce::builder(
//!         "consumer_key",
//!         "consumer_secret",
//!         "https://login.salesforce.com",
//!     )
//!     .username("user@example.com")
//!     .password("hunter2")
//!     .build()?;
//!
//!     // Query
//!     let response = client.query("SELECT Id, Name FROM Account").await?;
//!
//!     // Create
//!     let response = client
//!         .create("Account", &serde_json::json!({"Name": "New Account"}))
//!         .await?;
//!
//!     // Fetch selected fields
//!     let response = client.find("Account", "001xx", &["Name", "Industry"]).await?;
//!
//!     Ok(())
//! }
//! ```

mod error;
mod oauth_rest;
mod restforce;
mod versioned;

// Main client
pub use restforce::{Restforce, RestforceBuilder, DEFAULT_API_HOST, DEFAULT_APEX_BASE_PATH};

// Pipeline layers
pub use oauth_rest::OAuthRestClient;
pub use versioned::VersionedPathClient;

// Error types
pub use error::{Error, ErrorKind, Result};

// Re-export types that users need at this level
pub use restforce_auth::OAuthAccessToken;
pub use restforce_client::{ClientConfig, ClientConfigBuilder, Response, DEFAULT_API_VERSION};
