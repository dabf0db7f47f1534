//! fluent_http: a chainable request builder over `reqwest`.
//!
//! This library wraps a configured `reqwest` client with a fluent builder:
//! chained calls accumulate method, URL, headers, query values, JSON/form
//! bodies, and per-request TLS overrides; nothing fails until the terminal
//! [`Request::send`]. Construction failures (bad URL, bad header, body
//! serialization, unreadable certificate file) are recorded and reported
//! together at dispatch, so a chain can always run to completion. The
//! [`Response`] buffers its body on first access and offers status
//! classification and JSON decoding.
//!
//! # Example
//!
//! ```no_run
//! use fluent_http::Client;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new()?;
//! let mut response = client
//!     .get("https://api.example.com/search")
//!     .query("q", "rust")
//!     .query("q", "http")
//!     .header("Accept", "application/json")
//!     .send()
//!     .await?;
//!
//! response.error_for_status().await?;
//! let body = response.json_map().await?;
//! println!("{} keys", body.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! Dispatch is async and requires a Tokio runtime, the same runtime
//! requirement `reqwest` itself has. Everything else (building requests,
//! inspecting recorded errors) is synchronous.
//!
//! All protocol concerns (connections, pooling, redirects, TLS handshakes,
//! DNS, proxies) belong to the underlying client and are not reimplemented
//! here.

#![warn(missing_docs)]

mod client;
mod config;
mod error;
mod request;
mod response;
mod tls;

pub use client::Client;
pub use config::{
    ClientConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT,
    DEFAULT_USER_AGENT,
};
pub use error::{BuildError, BuildErrors, Error, Result};
pub use request::Request;
pub use response::Response;
pub use tls::TlsOptions;

// The platform types callers interact with directly.
pub use reqwest::{Certificate, Method, StatusCode};
