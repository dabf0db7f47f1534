//! Client construction and dispatch.

use std::fmt;
use std::sync::Arc;

use log::debug;
use reqwest::cookie::Jar;
use reqwest::Method;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::request::Request;
use crate::tls::TlsOptions;

/// Factory for [`Request`]s bound to one configured underlying client.
///
/// Cloning is cheap: clones share the underlying connection pool and the
/// cookie jar. A `Client` is meant to be constructed once and passed to
/// whatever needs to make requests; there is no process-wide instance.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    config: ClientConfig,
    jar: Arc<Jar>,
}

impl Client {
    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be initialized
    /// (e.g. the TLS backend fails to load).
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be initialized.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let mut builder = config.apply(reqwest::Client::builder());
        if config.cookie_store {
            builder = builder.cookie_provider(Arc::clone(&jar));
        }
        let http = builder.build()?;
        Ok(Self { http, config, jar })
    }

    /// Replaces the underlying `reqwest` client, returning the modified
    /// client for chaining.
    ///
    /// Requests with TLS overrides still rebuild their one-off client from
    /// this client's [`ClientConfig`], not from the replacement.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Starts a request with an arbitrary method.
    ///
    /// A URL that fails to parse does not fail here: the error is recorded
    /// on the returned [`Request`] and surfaces from
    /// [`send`](Request::send).
    pub fn request(&self, method: Method, url: &str) -> Request {
        Request::new(self.clone(), method, url)
    }

    /// Starts a GET request.
    pub fn get(&self, url: &str) -> Request {
        self.request(Method::GET, url)
    }

    /// Starts a HEAD request.
    pub fn head(&self, url: &str) -> Request {
        self.request(Method::HEAD, url)
    }

    /// Starts a POST request.
    pub fn post(&self, url: &str) -> Request {
        self.request(Method::POST, url)
    }

    /// Starts a PUT request.
    pub fn put(&self, url: &str) -> Request {
        self.request(Method::PUT, url)
    }

    /// Starts a PATCH request.
    pub fn patch(&self, url: &str) -> Request {
        self.request(Method::PATCH, url)
    }

    /// Starts a DELETE request.
    pub fn delete(&self, url: &str) -> Request {
        self.request(Method::DELETE, url)
    }

    /// Starts a CONNECT request.
    pub fn connect(&self, url: &str) -> Request {
        self.request(Method::CONNECT, url)
    }

    /// Starts an OPTIONS request.
    pub fn options(&self, url: &str) -> Request {
        self.request(Method::OPTIONS, url)
    }

    /// Starts a TRACE request.
    pub fn trace(&self, url: &str) -> Request {
        self.request(Method::TRACE, url)
    }

    /// Dispatches a finalized request, optionally through a one-off client
    /// carrying TLS overrides. The one-off client is rebuilt from the
    /// stored config and shares the cookie jar, so redirect policy,
    /// timeouts, and cookies behave exactly like the primary client's.
    pub(crate) async fn execute(
        &self,
        request: reqwest::Request,
        tls: Option<&TlsOptions>,
    ) -> Result<reqwest::Response> {
        let response = match tls {
            Some(options) => {
                debug!("building one-off client with TLS overrides for {}", request.url());
                let mut builder = self.config.apply(reqwest::Client::builder());
                if self.config.cookie_store {
                    builder = builder.cookie_provider(Arc::clone(&self.jar));
                }
                let one_off = options.apply(builder).build()?;
                one_off.execute(request).await?
            }
            None => self.http.execute(request).await?,
        };
        Ok(response)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client::new().expect("client construction")
    }

    #[test]
    fn verb_constructors_use_their_own_verb() {
        let client = client();
        let cases = [
            (client.get("http://example.com/"), Method::GET),
            (client.head("http://example.com/"), Method::HEAD),
            (client.post("http://example.com/"), Method::POST),
            (client.put("http://example.com/"), Method::PUT),
            (client.patch("http://example.com/"), Method::PATCH),
            (client.delete("http://example.com/"), Method::DELETE),
            (client.connect("http://example.com/"), Method::CONNECT),
            (client.options("http://example.com/"), Method::OPTIONS),
            (client.trace("http://example.com/"), Method::TRACE),
        ];
        for (request, expected) in cases {
            assert_eq!(request.method(), Some(&expected));
        }
    }

    #[test]
    fn invalid_url_is_deferred_not_fatal() {
        let request = client().get("::not-a-url::");
        assert!(request.method().is_none());
        let error = request.error().expect("recorded URL error");
        assert!(error.to_string().contains("invalid URL"));
    }

    #[test]
    fn with_http_client_replaces_the_handle() {
        let custom = reqwest::Client::builder()
            .user_agent("custom-agent/1.0")
            .build()
            .unwrap();
        // Chainable: the call returns the client for further use.
        let client = client().with_http_client(custom);
        assert!(client.get("http://example.com/").error().is_none());
    }
}
