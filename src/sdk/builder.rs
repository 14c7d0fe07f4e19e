use crate::config::ClientConfig;
use crate::transport::grpc::{self, ConnectOptions};
use crate::{Client, Error, Result};

use super::transport::Transport;
use std::sync::Arc;
use std::time::Duration;

pub struct ClientBuilder {
    address: Option<String>,
    insecure: bool,
    server_cert_pem: Option<Vec<u8>>,
    client_cert_pem: Option<Vec<u8>>,
    client_key_pem: Option<Vec<u8>>,
    connect_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            address: None,
            insecure: false,
            server_cert_pem: None,
            client_cert_pem: None,
            client_key_pem: None,
            connect_timeout: None,
            request_timeout: None,
            transport: None,
        }
    }

    /// Start from a loaded config file. Certificate files are read here.
    ///
    /// # Errors
    /// Returns an error if a certificate file cannot be read.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let server = &config.server;
        let mut builder = Self::new()
            .address(server.address.clone())
            .insecure(server.insecure);
        builder.request_timeout = server.request_timeout();
        builder.connect_timeout = server.connect_timeout();

        if let Some(path) = &server.server_cert {
            builder.server_cert_pem = Some(std::fs::read(path)?);
        }
        if let (Some(cert), Some(key)) = (&server.client_cert, &server.client_key) {
            builder.client_cert_pem = Some(std::fs::read(cert)?);
            builder.client_key_pem = Some(std::fs::read(key)?);
        }
        Ok(builder)
    }

    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Use a plaintext connection. Secure connections are recommended for
    /// production.
    #[must_use]
    pub const fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Trust this PEM root certificate, e.g. for a self-signed server.
    #[must_use]
    pub fn server_cert_pem(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.server_cert_pem = Some(pem.into());
        self
    }

    /// Present a client certificate for mutual TLS.
    #[must_use]
    pub fn client_cert_pem(mut self, cert: impl Into<Vec<u8>>, key: impl Into<Vec<u8>>) -> Self {
        self.client_cert_pem = Some(cert.into());
        self.client_key_pem = Some(key.into());
        self
    }

    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Deadline for each unary call. Streaming calls are not bounded.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Use a custom transport instead of connecting over gRPC.
    #[must_use]
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    fn build(self) -> Result<ConnectOptions> {
        let address = self
            .address
            .ok_or_else(|| Error::Config("server address required".to_string()))?;
        if self.insecure && (self.server_cert_pem.is_some() || self.client_cert_pem.is_some()) {
            return Err(Error::Config(
                "certificates cannot be used with an insecure connection".to_string(),
            ));
        }
        let client_identity = match (self.client_cert_pem, self.client_key_pem) {
            (Some(cert), Some(key)) => Some((cert, key)),
            (None, None) => None,
            _ => {
                return Err(Error::Config(
                    "client certificate and key must be given together".to_string(),
                ));
            }
        };

        Ok(ConnectOptions {
            address,
            insecure: self.insecure,
            server_cert_pem: self.server_cert_pem,
            client_identity,
            connect_timeout: self.connect_timeout,
            request_timeout: self.request_timeout,
        })
    }

    /// Connect to the server, or wrap the injected transport.
    ///
    /// # Errors
    /// Returns an error if configuration is incomplete or the connection fails.
    pub async fn connect(mut self) -> Result<Client> {
        if let Some(transport) = self.transport.take() {
            return Ok(Client::from_shared(transport));
        }
        let options = self.build()?;
        let transport = grpc::connect(&options).await?;
        Ok(Client::from_transport(transport))
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
