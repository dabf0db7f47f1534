//! Error types.
//!
//! Two layers of failure exist in this crate:
//! - **Construction failures** ([`BuildError`]) are recorded on the request
//!   while it is being chained and only surface, combined, when
//!   [`Request::send`](crate::Request::send) runs.
//! - **Dispatch-time failures** ([`Error`]) are what `send` and the response
//!   accessors return: the combined construction errors, a transport
//!   failure, a non-success status converted on request, or a JSON decode
//!   failure.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error as ThisError;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// A single construction failure recorded while chaining builder calls.
///
/// These are `Clone` so a cloned request carries its history with it.
#[derive(Debug, Clone, ThisError)]
pub enum BuildError {
    /// The request URL did not parse.
    #[error("invalid URL {url:?}: {source}")]
    Url {
        /// The URL string as given.
        url: String,
        /// The parse failure.
        source: url::ParseError,
    },

    /// A header name or value was not valid.
    #[error("invalid header {name:?}: {reason}")]
    Header {
        /// The offending header name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The JSON body payload could not be serialized.
    #[error("JSON body serialization failed: {reason}")]
    JsonBody {
        /// The serializer's message.
        reason: String,
    },

    /// A trusted-root certificate file could not be read or parsed.
    #[error("certificate file {path:?}: {reason}")]
    CertFile {
        /// The file that was given.
        path: PathBuf,
        /// Why loading it failed.
        reason: String,
    },
}

/// Every construction failure accumulated by a request, in call order.
///
/// Displayed as one combined message so a caller logging the error sees all
/// failed steps at once, not just the first.
#[derive(Debug, Clone, Default)]
pub struct BuildErrors(Vec<BuildError>);

impl BuildErrors {
    pub(crate) fn push(&mut self, error: BuildError) {
        self.0.push(error);
    }

    /// True when no builder call has failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of recorded failures.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The recorded failures, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &BuildError> {
        self.0.iter()
    }
}

impl fmt::Display for BuildErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for BuildErrors {}

/// Errors surfaced by [`Request::send`](crate::Request::send) and the
/// [`Response`](crate::Response) accessors.
#[derive(Debug, ThisError)]
pub enum Error {
    /// One or more builder calls failed; nothing was sent.
    #[error("request construction failed: {0}")]
    Build(#[from] BuildErrors),

    /// The underlying client failed to deliver the request or read the
    /// response body.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// A non-success status, converted into an error only by
    /// [`Response::error_for_status`](crate::Response::error_for_status).
    #[error("{status}: {body}")]
    Status {
        /// The response status.
        status: reqwest::StatusCode,
        /// The response body as text.
        body: String,
    },

    /// The response body was not valid JSON for the requested type.
    #[error("JSON decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_errors_display_joins_all_failures() {
        let mut errors = BuildErrors::default();
        errors.push(BuildError::JsonBody {
            reason: "key must be a string".to_string(),
        });
        errors.push(BuildError::CertFile {
            path: PathBuf::from("/tmp/ca.pem"),
            reason: "No such file or directory".to_string(),
        });

        let message = errors.to_string();
        assert!(message.contains("JSON body serialization failed"));
        assert!(message.contains("certificate file"));
        assert!(message.contains("; "));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn build_errors_keep_call_order() {
        let mut errors = BuildErrors::default();
        errors.push(BuildError::Header {
            name: "bad name".to_string(),
            reason: "invalid HTTP header name".to_string(),
        });
        errors.push(BuildError::JsonBody {
            reason: "unsupported".to_string(),
        });

        let kinds: Vec<_> = errors.iter().collect();
        assert!(matches!(kinds[0], BuildError::Header { .. }));
        assert!(matches!(kinds[1], BuildError::JsonBody { .. }));
    }

    #[test]
    fn status_error_includes_status_line_and_body() {
        let error = Error::Status {
            status: reqwest::StatusCode::NOT_FOUND,
            body: "not found".to_string(),
        };
        assert_eq!(error.to_string(), "404 Not Found: not found");
    }

    #[test]
    fn url_parse_failure_is_preserved_as_source() {
        let source = url::Url::parse("not a url").unwrap_err();
        let error = BuildError::Url {
            url: "not a url".to_string(),
            source,
        };
        assert!(error.to_string().starts_with("invalid URL"));
        assert!(std::error::Error::source(&error).is_some());
    }
}
