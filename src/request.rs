//! Fluent request construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use log::{debug, trace};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use url::Url;

use crate::client::Client;
use crate::error::{BuildError, BuildErrors, Error, Result};
use crate::response::Response;
use crate::tls::TlsOptions;

/// A request under construction.
///
/// Builder methods consume and return the request, so a chain reads
/// top-to-bottom and the value has exactly one owner throughout. A failing
/// step records its error instead of aborting the chain; [`send`] reports
/// every recorded failure at once and performs no network activity when any
/// exist.
///
/// A `Request` is not meant to be shared: to dispatch variants of one
/// request from several tasks, hand each task its own [`try_clone`].
///
/// [`send`]: Request::send
/// [`try_clone`]: Request::try_clone
pub struct Request {
    client: Client,
    inner: Option<reqwest::Request>,
    query: Vec<(String, String)>,
    errors: BuildErrors,
    tls: Option<TlsOptions>,
}

impl Request {
    pub(crate) fn new(client: Client, method: Method, url: &str) -> Self {
        let mut errors = BuildErrors::default();
        let inner = match Url::parse(url) {
            Ok(parsed) => Some(reqwest::Request::new(method, parsed)),
            Err(source) => {
                errors.push(BuildError::Url {
                    url: url.to_string(),
                    source,
                });
                None
            }
        };
        Self {
            client,
            inner,
            query: Vec::new(),
            errors,
            tls: None,
        }
    }

    /// Appends one query-string value for `key`.
    ///
    /// Values accumulate: calling this twice with the same key sends both
    /// values, in call order, after any values already present in the URL.
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Sets a header, replacing any previous value for the same name.
    ///
    /// An invalid name or value is recorded as a deferred error.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        let parsed_name = match HeaderName::try_from(name) {
            Ok(parsed) => parsed,
            Err(error) => {
                self.errors.push(BuildError::Header {
                    name: name.to_string(),
                    reason: error.to_string(),
                });
                return self;
            }
        };
        let parsed_value = match HeaderValue::from_str(value) {
            Ok(parsed) => parsed,
            Err(error) => {
                self.errors.push(BuildError::Header {
                    name: name.to_string(),
                    reason: error.to_string(),
                });
                return self;
            }
        };
        if let Some(request) = self.inner.as_mut() {
            request.headers_mut().insert(parsed_name, parsed_value);
        }
        self
    }

    /// Serializes `payload` as the JSON body of the request.
    ///
    /// On success this sets `Content-Type: application/json` and installs
    /// the serialized bytes as a replayable body with exact content length,
    /// so the underlying client can resend it across redirects. A
    /// serialization failure is recorded as a deferred error and leaves the
    /// body unset.
    pub fn json<T: Serialize + ?Sized>(mut self, payload: &T) -> Self {
        match serde_json::to_vec(payload) {
            Ok(body) => self.set_body("application/json", body),
            Err(error) => {
                self.errors.push(BuildError::JsonBody {
                    reason: error.to_string(),
                });
                self
            }
        }
    }

    /// URL-encodes `pairs` as the form body of the request.
    ///
    /// Repeated keys are allowed and kept in order. Sets
    /// `Content-Type: application/x-www-form-urlencoded`.
    pub fn form<K, V>(self, pairs: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        self.set_body("application/x-www-form-urlencoded", encoded.into_bytes())
    }

    fn set_body(mut self, content_type: &'static str, body: Vec<u8>) -> Self {
        if let Some(request) = self.inner.as_mut() {
            request
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
            *request.body_mut() = Some(reqwest::Body::from(body));
        }
        self
    }

    /// Replaces the TLS overrides for this request wholesale.
    pub fn tls_options(mut self, options: TlsOptions) -> Self {
        self.tls = Some(options);
        self
    }

    /// Toggles server-certificate verification for this request.
    ///
    /// Verification defaults to on; passing `true` disables it. Creates the
    /// TLS overrides if none exist yet.
    pub fn insecure(mut self, accept_invalid_certs: bool) -> Self {
        let options = self.tls.take().unwrap_or_default();
        self.tls = Some(options.danger_accept_invalid_certs(accept_invalid_certs));
        self
    }

    /// Reads a PEM certificate file and trusts it as a root for this
    /// request.
    ///
    /// Creates the TLS overrides if none exist yet, so this may be the
    /// first TLS call on the chain. A read or parse failure is recorded as
    /// a deferred error.
    pub fn cert_file(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let pem = match std::fs::read(path) {
            Ok(pem) => pem,
            Err(error) => {
                self.errors.push(BuildError::CertFile {
                    path: path.to_path_buf(),
                    reason: error.to_string(),
                });
                return self;
            }
        };
        let certificate = match reqwest::Certificate::from_pem(&pem) {
            Ok(certificate) => certificate,
            Err(error) => {
                self.errors.push(BuildError::CertFile {
                    path: path.to_path_buf(),
                    reason: error.to_string(),
                });
                return self;
            }
        };
        let options = self.tls.take().unwrap_or_default();
        self.tls = Some(options.add_root_certificate(certificate));
        self
    }

    /// Binds a deadline to this request, overriding the client-wide
    /// timeout. Cancelling early is done by dropping the [`send`] future.
    ///
    /// [`send`]: Request::send
    pub fn timeout(mut self, deadline: Duration) -> Self {
        if let Some(request) = self.inner.as_mut() {
            *request.timeout_mut() = Some(deadline);
        }
        self
    }

    /// Deep-copies this request so the copy can be mutated or sent without
    /// affecting the original. Pending query values, recorded errors, and
    /// TLS overrides are copied; the [`Client`] handle is shared.
    ///
    /// Returns `None` if the body cannot be replayed, which never happens
    /// for bodies installed by this builder.
    pub fn try_clone(&self) -> Option<Self> {
        let inner = match &self.inner {
            Some(request) => Some(request.try_clone()?),
            None => None,
        };
        Some(Self {
            client: self.client.clone(),
            inner,
            query: self.query.clone(),
            errors: self.errors.clone(),
            tls: self.tls.clone(),
        })
    }

    /// Combined view of every construction failure recorded so far, or
    /// `None` if the chain is clean.
    pub fn error(&self) -> Option<Error> {
        if self.errors.is_empty() {
            None
        } else {
            Some(Error::Build(self.errors.clone()))
        }
    }

    /// The request method, if the URL parsed.
    pub fn method(&self) -> Option<&Method> {
        self.inner.as_ref().map(reqwest::Request::method)
    }

    /// The request URL, if it parsed. Pending query values are not merged
    /// until [`send`](Request::send).
    pub fn url(&self) -> Option<&Url> {
        self.inner.as_ref().map(reqwest::Request::url)
    }

    /// The headers set so far, if the URL parsed.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.inner.as_ref().map(reqwest::Request::headers)
    }

    /// Finalizes and dispatches the request.
    ///
    /// Runs in order: report accumulated construction errors (no network
    /// activity happens in that case), merge pending query values into the
    /// URL after its existing ones, then dispatch through the client,
    /// via a one-off client when TLS overrides are present.
    ///
    /// # Errors
    ///
    /// [`Error::Build`] for accumulated construction failures,
    /// [`Error::Transport`] when the underlying client fails to deliver
    /// the request. A non-success status is not an error; see
    /// [`Response::error_for_status`].
    pub async fn send(self) -> Result<Response> {
        if !self.errors.is_empty() {
            debug!("refusing dispatch, {} construction error(s) recorded", self.errors.len());
            return Err(Error::Build(self.errors));
        }
        let Some(mut request) = self.inner else {
            // A missing platform request always comes with a recorded URL
            // error, making this unreachable; kept as a guard.
            return Err(Error::Build(self.errors));
        };

        if !self.query.is_empty() {
            trace!("appending {} pending query pair(s)", self.query.len());
            let mut pairs = request.url_mut().query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }

        debug!("sending {} {}", request.method(), request.url());
        let response = self.client.execute(request, self.tls.as_ref()).await?;
        Ok(Response::new(response))
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method())
            .field("url", &self.url())
            .field("pending_query", &self.query)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}
