//! # restforce-client
//!
//! Raw HTTP transport for the Restforce API crates.
//!
//! This crate provides the foundational HTTP client:
//! - Request building (methods, headers, query parameters, JSON/form bodies)
//! - Bearer-token attachment
//! - Connection pooling and timeouts via configuration
//! - Request/response tracing
//!
//! The transport deliberately does not interpret response status codes:
//! any HTTP response, 2xx or not, is returned to the caller as a
//! [`Response`]. Session management and error policy live in the layers
//! above (`restforce-auth`, `restforce-rest`).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Restforce facade                      │
//! │  (restforce-rest: operations, OAuth session state machine)  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        HttpClient                           │
//! │  - Raw HTTP dispatch, one request per call                  │
//! │  - Request building, bearer auth, tracing                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;

pub use client::HttpClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use request::{RequestBody, RequestBuilder, RequestMethod};
pub use response::Response;

/// Default Salesforce REST API version segment.
pub const DEFAULT_API_VERSION: &str = "v38.0";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("restforce-api/", env!("CARGO_PKG_VERSION"));
