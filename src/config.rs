//! Client configuration.
//!
//! A [`Client`](crate::Client) keeps its `ClientConfig` after construction:
//! when a request carries TLS overrides, the one-off client for that
//! dispatch is rebuilt from the same config, so redirect policy, timeouts,
//! and the cookie jar survive the swap.

use std::time::Duration;

/// Default `User-Agent` header sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("fluent_http/", env!("CARGO_PKG_VERSION"));

/// Default whole-request timeout (connect + transfer).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default TCP connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default maximum number of redirect hops before the underlying client
/// gives up.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Settings for the underlying `reqwest` client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Whole-request timeout, covering connect, redirects, and transfer.
    pub timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Maximum redirect hops followed automatically.
    pub max_redirects: usize,
    /// Whether responses may store cookies for later requests. The jar is
    /// shared between the primary client and any one-off TLS client.
    pub cookie_store: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            cookie_store: true,
        }
    }
}

impl ClientConfig {
    pub(crate) fn apply(&self, builder: reqwest::ClientBuilder) -> reqwest::ClientBuilder {
        builder
            .user_agent(self.user_agent.clone())
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .redirect(reqwest::redirect::Policy::limited(self.max_redirects))
    }
}
