//! Dialing gRPC services.

use serde::{Deserialize, Serialize};
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tracing::{debug, info};

use crate::{GrpcError, Result};

/// Where and how to reach a gRPC service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// `host:port` or a full `http(s)://` URI.
    pub address: String,
    /// TLS settings; plaintext when absent.
    #[serde(default)]
    pub tls: Option<TlsConfig>,
}

/// TLS settings for a service connection.
///
/// Certificates are verified against the operating system's root store, so
/// self-signed certificates are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Enable TLS.
    #[serde(default)]
    pub enable: bool,
}

impl ServiceConfig {
    /// Plaintext service at `address`.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            tls: None,
        }
    }

    /// Enable TLS.
    pub fn with_tls(mut self) -> Self {
        self.tls = Some(TlsConfig { enable: true });
        self
    }

    /// Whether TLS is enabled.
    pub fn tls_enabled(&self) -> bool {
        self.tls.as_ref().is_some_and(|tls| tls.enable)
    }

    /// Endpoint URI, adding a scheme to bare `host:port` addresses.
    pub fn uri(&self) -> String {
        if self.address.contains("://") {
            return self.address.clone();
        }
        let scheme = if self.tls_enabled() { "https" } else { "http" };
        format!("{}://{}", scheme, self.address)
    }
}

/// Create a channel to a service.
///
/// The channel connects on first use and reconnects as needed, so this
/// returns without touching the network. Must be called within a Tokio
/// runtime.
pub fn connect(config: &ServiceConfig) -> Result<Channel> {
    if config.address.trim().is_empty() {
        return Err(GrpcError::Config("service address is required".to_string()));
    }

    let uri = config.uri();
    info!(address = %config.address, tls = config.tls_enabled(), "Creating gRPC channel");

    let mut endpoint = Endpoint::from_shared(uri.clone())
        .map_err(|e| GrpcError::Config(format!("invalid service address {:?}: {}", uri, e)))?;

    if config.tls_enabled() {
        endpoint = endpoint.tls_config(ClientTlsConfig::new().with_native_roots())?;
    }

    debug!(uri = %uri, "gRPC channel ready");
    Ok(endpoint.connect_lazy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_adds_scheme() {
        assert_eq!(ServiceConfig::new("localhost:50051").uri(), "http://localhost:50051");
        assert_eq!(
            ServiceConfig::new("api.example.com:443").with_tls().uri(),
            "https://api.example.com:443"
        );
        assert_eq!(
            ServiceConfig::new("http://localhost:50051").with_tls().uri(),
            "http://localhost:50051"
        );
    }

    #[test]
    fn test_tls_enabled() {
        let mut config = ServiceConfig::new("localhost:1");
        assert!(!config.tls_enabled());

        config.tls = Some(TlsConfig { enable: false });
        assert!(!config.tls_enabled());

        assert!(config.with_tls().tls_enabled());
    }

    #[test]
    fn test_empty_address_is_rejected() {
        let err = connect(&ServiceConfig::default()).unwrap_err();
        assert!(matches!(err, GrpcError::Config(_)));
    }
}
