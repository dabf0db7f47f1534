//! Per-request TLS overrides.

use log::warn;
use reqwest::{Certificate, ClientBuilder};

/// TLS settings applied to a single request.
///
/// When a request carries `TlsOptions`, dispatch builds a one-off client
/// with these settings instead of using the shared client. Certificate
/// verification stays on unless [`danger_accept_invalid_certs`] is called
/// with `true`.
///
/// [`danger_accept_invalid_certs`]: TlsOptions::danger_accept_invalid_certs
#[derive(Debug, Clone, Default)]
pub struct TlsOptions {
    accept_invalid_certs: bool,
    root_certificates: Vec<Certificate>,
}

impl TlsOptions {
    /// Options with verification on and no extra trusted roots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Disables server certificate verification for the request.
    ///
    /// This drops all authenticity guarantees of TLS; only use it against
    /// servers you control, such as test fixtures with self-signed
    /// certificates.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Trusts an additional root certificate when verifying the server.
    pub fn add_root_certificate(mut self, certificate: Certificate) -> Self {
        self.root_certificates.push(certificate);
        self
    }

    pub(crate) fn apply(&self, mut builder: ClientBuilder) -> ClientBuilder {
        if self.accept_invalid_certs {
            warn!("certificate verification disabled for this request");
            builder = builder.danger_accept_invalid_certs(true);
        }
        for certificate in &self.root_certificates {
            builder = builder.add_root_certificate(certificate.clone());
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_is_on_by_default() {
        let options = TlsOptions::new();
        assert!(!options.accept_invalid_certs);
        assert!(options.root_certificates.is_empty());
    }

    #[test]
    fn applied_options_produce_a_buildable_client() {
        let options = TlsOptions::new().danger_accept_invalid_certs(true);
        assert!(options.apply(reqwest::Client::builder()).build().is_ok());
    }
}
