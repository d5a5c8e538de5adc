//! TLS trust policy.
//!
//! The transport talks to servers that commonly run with self-signed
//! certificates, so the default policy accepts any certificate and any
//! hostname. That gives up man-in-the-middle protection; `Verified` restores
//! normal validation against the bundled web roots.
//!
//! ureq only assembles its rustls client config on the first HTTPS
//! connection. `tls_config` builds the same config up front from the chosen
//! crypto provider, so a provider that cannot serve every protocol version
//! is reported when the transport is constructed.

use std::sync::Arc;

use rustls::crypto::CryptoProvider;
use serde::{Deserialize, Serialize};
use ureq::tls::{TlsConfig, TlsProvider};

use crate::error::{Result, TransportError};

/// How server certificates and hostnames are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustPolicy {
    /// Accept any certificate chain and any hostname.
    #[default]
    TrustAll,
    /// Validate the chain and the hostname.
    Verified,
}

impl TrustPolicy {
    pub fn verifies_certificates(&self) -> bool {
        matches!(self, TrustPolicy::Verified)
    }

    /// Build the agent's TLS configuration on `provider`.
    ///
    /// Fails with `TransportError::Config` when rustls rejects the provider.
    pub fn tls_config(&self, provider: Arc<CryptoProvider>) -> Result<TlsConfig> {
        rustls::ClientConfig::builder_with_provider(provider.clone())
            .with_protocol_versions(rustls::ALL_VERSIONS)
            .map_err(|e| TransportError::Config(format!("TLS setup failed: {e}")))?;

        Ok(TlsConfig::builder()
            .provider(TlsProvider::Rustls)
            .unversioned_rustls_crypto_provider(provider)
            .disable_verification(!self.verifies_certificates())
            .build())
    }
}

/// The process-wide rustls provider if one is installed, ring otherwise.
pub fn default_crypto_provider() -> Arc<CryptoProvider> {
    CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::ring::default_provider()))
}
