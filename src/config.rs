//! File-based client configuration.
//!
//! ```toml
//! [server]
//! address = "localhost:9000"
//! insecure = true
//! request_timeout_ms = 30000
//!
//! [session]
//! model_id = "1"
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// `host:port` or a full `http(s)://` URI.
    pub address: String,

    /// Connect without TLS.
    #[serde(default)]
    pub insecure: bool,

    /// PEM root certificate to trust, for self-signed servers.
    #[serde(default)]
    pub server_cert: Option<PathBuf>,

    /// PEM client certificate for mutual TLS. Requires `client_key`.
    #[serde(default)]
    pub client_cert: Option<PathBuf>,

    #[serde(default)]
    pub client_key: Option<PathBuf>,

    /// Deadline for each unary call, in milliseconds. Unset means no deadline.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,

    #[serde(default)]
    pub connect_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub wakeword: Option<String>,
}

impl ClientConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    /// Returns an error if the TOML is malformed or the settings are
    /// inconsistent.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "Loaded client config");
        Self::from_toml_str(&source)
    }

    /// # Errors
    /// Returns `Error::Config` if the address is missing or only one half of
    /// the client identity is given.
    pub fn validate(&self) -> Result<()> {
        let server = &self.server;
        if server.address.trim().is_empty() {
            return Err(Error::Config("missing server address".to_string()));
        }
        if server.client_cert.is_some() != server.client_key.is_some() {
            return Err(Error::Config(
                "client_cert and client_key must be given together".to_string(),
            ));
        }
        if server.insecure && (server.server_cert.is_some() || server.client_cert.is_some()) {
            return Err(Error::Config(
                "certificates cannot be used with an insecure connection".to_string(),
            ));
        }
        Ok(())
    }
}

impl ServerConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config() {
        let config = ClientConfig::from_toml_str(
            r#"
            [server]
            address = "localhost:9000"
            insecure = true
            "#,
        )
        .unwrap();
        assert_eq!(config.server.address, "localhost:9000");
        assert!(config.server.insecure);
        assert!(config.server.request_timeout().is_none());
        assert!(config.session.model_id.is_none());
    }

    #[test]
    fn parses_session_and_timeouts() {
        let config = ClientConfig::from_toml_str(
            r#"
            [server]
            address = "dialog.example.com:443"
            request_timeout_ms = 30000

            [session]
            model_id = "restaurant"
            wakeword = "hey cobalt"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.session.model_id.as_deref(), Some("restaurant"));
        assert_eq!(config.session.wakeword.as_deref(), Some("hey cobalt"));
    }

    #[test]
    fn missing_address_is_rejected() {
        let err = ClientConfig::from_toml_str("[server]\naddress = \"\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = ClientConfig::from_toml_str("[session]\nmodel_id = \"1\"\n").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn client_cert_requires_key() {
        let err = ClientConfig::from_toml_str(
            r#"
            [server]
            address = "localhost:9000"
            client_cert = "client.pem"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("together")));
    }
}
