//! Response wrapping and body buffering.

use std::fmt;

use bytes::Bytes;
use log::{debug, trace};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use url::Url;

use crate::error::{Error, Result};

/// Body buffering state. The underlying stream is consumed exactly once on
/// the `Unread` -> `Read` transition, and the platform response is dropped
/// with it, releasing the connection deterministically.
enum Body {
    Unread(reqwest::Response),
    Read(Bytes),
}

/// A completed HTTP exchange.
///
/// Status, headers, and the final URL are captured eagerly; the body stays
/// unread until the first accessor needs it and is cached from then on.
/// A `Response` only exists when the transport succeeded; a non-success
/// status is carried as data, not as an error, until
/// [`error_for_status`](Response::error_for_status) is asked to convert it.
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    url: Url,
    body: Body,
}

impl Response {
    pub(crate) fn new(response: reqwest::Response) -> Self {
        Self {
            status: response.status(),
            headers: response.headers().clone(),
            url: response.url().clone(),
            body: Body::Unread(response),
        }
    }

    /// True when the status is below 300 (informational, success, or
    /// redirection).
    pub fn ok(&self) -> bool {
        self.status.as_u16() < 300
    }

    /// The response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The final URL of the exchange, after any redirects.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The response body.
    ///
    /// The first call reads the underlying stream to completion, closes it,
    /// and caches the bytes; every later call returns the cache without
    /// touching the network. If that single read fails, the error surfaces
    /// once and later calls see an empty cached body.
    pub async fn bytes(&mut self) -> Result<Bytes> {
        match std::mem::replace(&mut self.body, Body::Read(Bytes::new())) {
            Body::Read(cached) => {
                self.body = Body::Read(cached.clone());
                Ok(cached)
            }
            Body::Unread(response) => {
                trace!("buffering response body for {}", self.url);
                let buffered = response.bytes().await?;
                debug!("buffered {} byte body for {}", buffered.len(), self.url);
                self.body = Body::Read(buffered.clone());
                Ok(buffered)
            }
        }
    }

    /// The body decoded as UTF-8, with invalid sequences replaced.
    pub async fn text(&mut self) -> Result<String> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Decodes the body as JSON into `T`.
    ///
    /// # Errors
    ///
    /// [`Error::Transport`] if the body could not be read,
    /// [`Error::Decode`] if it is not valid JSON for `T`.
    pub async fn json<T: DeserializeOwned>(&mut self) -> Result<T> {
        let bytes = self.bytes().await?;
        serde_json::from_slice(&bytes).map_err(Error::Decode)
    }

    /// Decodes the body as a generic string-keyed JSON object.
    pub async fn json_map(&mut self) -> Result<Map<String, Value>> {
        self.json().await
    }

    /// Converts a non-success status into an error carrying the status line
    /// and the body text; returns `Ok(())` when [`ok`](Response::ok).
    pub async fn error_for_status(&mut self) -> Result<()> {
        if self.ok() {
            return Ok(());
        }
        let body = self.text().await?;
        Err(Error::Status {
            status: self.status,
            body,
        })
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}
