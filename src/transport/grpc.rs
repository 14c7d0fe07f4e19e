use crate::error::{Error, Operation, Result};
use crate::protocol::pb;
use crate::protocol::pb::diatheke_client::DiathekeClient;
use crate::sdk::{BoxFuture, Transport};
use futures::channel::mpsc;
use futures::StreamExt;
use futures::stream::BoxStream;
use std::time::Duration;
use tonic::transport::{Certificate, Channel, ClientTlsConfig, Endpoint, Identity};
use url::Url;

/// How to reach the server. Built by `ClientBuilder`.
#[derive(Clone, Default)]
pub struct ConnectOptions {
    pub address: String,
    /// Plaintext connection, no TLS at all.
    pub insecure: bool,
    /// PEM root certificate for servers with a self-signed certificate.
    pub server_cert_pem: Option<Vec<u8>>,
    /// PEM certificate and key for mutual TLS.
    pub client_identity: Option<(Vec<u8>, Vec<u8>)>,
    pub connect_timeout: Option<Duration>,
    /// Deadline applied to each unary call. Streams are not bounded.
    pub request_timeout: Option<Duration>,
}

impl std::fmt::Debug for ConnectOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("address", &self.address)
            .field("insecure", &self.insecure)
            .field("server_cert", &self.server_cert_pem.is_some())
            .field("client_identity", &self.client_identity.is_some())
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Turn `host:port` or a full URI into the URI tonic expects.
///
/// A missing scheme becomes `http://` for plaintext connections and
/// `https://` otherwise.
///
/// # Errors
/// Returns an error if the address does not parse, has no host, or uses a
/// scheme other than http/https.
pub fn normalize_address(address: &str, insecure: bool) -> Result<String> {
    let address = address.trim();
    if address.is_empty() {
        return Err(Error::Config("server address is required".to_string()));
    }

    let with_scheme = if address.contains("://") {
        address.to_string()
    } else if insecure {
        format!("http://{address}")
    } else {
        format!("https://{address}")
    };

    let url = Url::parse(&with_scheme)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Config(format!("unsupported scheme '{}' in server address", url.scheme())));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(Error::Config(format!("server address '{address}' has no host")));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Open a gRPC channel to the dialog server.
///
/// # Errors
/// Returns an error if the address is invalid, the TLS material is rejected,
/// or the connection cannot be established.
pub async fn connect(options: &ConnectOptions) -> Result<GrpcTransport> {
    let uri = normalize_address(&options.address, options.insecure)?;
    let mut endpoint = Endpoint::from_shared(uri.clone())?;

    if let Some(timeout) = options.connect_timeout {
        endpoint = endpoint.connect_timeout(timeout);
    }

    if !options.insecure {
        let mut tls = ClientTlsConfig::new().with_native_roots();
        if let Some(pem) = &options.server_cert_pem {
            tls = tls.ca_certificate(Certificate::from_pem(pem));
        }
        if let Some((cert, key)) = &options.client_identity {
            tls = tls.identity(Identity::from_pem(cert, key));
        }
        endpoint = endpoint.tls_config(tls)?;
    }

    let channel = endpoint.connect().await?;
    tracing::info!(address = %uri, tls = !options.insecure, "Connected to Diatheke");

    Ok(GrpcTransport::new(channel, options.request_timeout))
}

/// `Transport` backed by the generated tonic client.
#[derive(Debug, Clone)]
pub struct GrpcTransport {
    client: DiathekeClient<Channel>,
    request_timeout: Option<Duration>,
}

impl GrpcTransport {
    #[must_use]
    pub fn new(channel: Channel, request_timeout: Option<Duration>) -> Self {
        Self {
            client: DiathekeClient::new(channel),
            request_timeout,
        }
    }

    /// The generated client, for calls the SDK does not wrap.
    #[must_use]
    pub fn raw_client(&self) -> DiathekeClient<Channel> {
        self.client.clone()
    }

    fn unary<T>(&self, message: T) -> tonic::Request<T> {
        let mut request = tonic::Request::new(message);
        if let Some(timeout) = self.request_timeout {
            request.set_timeout(timeout);
        }
        request
    }
}

impl Transport for GrpcTransport {
    fn version(&self) -> BoxFuture<'_, Result<pb::VersionResponse>> {
        let mut client = self.client.clone();
        let request = self.unary(pb::Empty {});
        Box::pin(async move {
            tracing::debug!(operation = %Operation::Version, "Calling");
            client
                .version(request)
                .await
                .map(tonic::Response::into_inner)
                .map_err(|status| Error::from_status(Operation::Version, status))
        })
    }

    fn list_models(&self) -> BoxFuture<'_, Result<pb::ListModelsResponse>> {
        let mut client = self.client.clone();
        let request = self.unary(pb::Empty {});
        Box::pin(async move {
            tracing::debug!(operation = %Operation::ListModels, "Calling");
            client
                .list_models(request)
                .await
                .map(tonic::Response::into_inner)
                .map_err(|status| Error::from_status(Operation::ListModels, status))
        })
    }

    fn create_session(&self, start: pb::SessionStart) -> BoxFuture<'_, Result<pb::SessionOutput>> {
        let mut client = self.client.clone();
        let model_id = start.model_id.clone();
        let request = self.unary(start);
        Box::pin(async move {
            tracing::debug!(operation = %Operation::CreateSession, model_id = %model_id, "Calling");
            client
                .create_session(request)
                .await
                .map(tonic::Response::into_inner)
                .map_err(|status| match Error::from_status(Operation::CreateSession, status) {
                    Error::ModelNotFound(_) => Error::ModelNotFound(model_id),
                    other => other,
                })
        })
    }

    fn delete_session(&self, token: pb::TokenData) -> BoxFuture<'_, Result<()>> {
        let mut client = self.client.clone();
        let session_id = token.id.clone();
        let request = self.unary(token);
        Box::pin(async move {
            tracing::debug!(operation = %Operation::DeleteSession, session_id = %session_id, "Calling");
            client
                .delete_session(request)
                .await
                .map(|_| ())
                .map_err(|status| Error::from_status(Operation::DeleteSession, status))
        })
    }

    fn update_session(&self, input: pb::SessionInput) -> BoxFuture<'_, Result<pb::SessionOutput>> {
        let mut client = self.client.clone();
        let session_id = input.token.as_ref().map(|token| token.id.clone()).unwrap_or_default();
        let request = self.unary(input);
        Box::pin(async move {
            tracing::debug!(operation = %Operation::UpdateSession, session_id = %session_id, "Calling");
            client
                .update_session(request)
                .await
                .map(tonic::Response::into_inner)
                .map_err(|status| Error::from_status(Operation::UpdateSession, status))
        })
    }

    fn stream_asr(
        &self,
        input: mpsc::Receiver<pb::AsrInput>,
    ) -> BoxFuture<'static, Result<pb::AsrResult>> {
        let mut client = self.client.clone();
        Box::pin(async move {
            tracing::debug!(operation = %Operation::StreamAsr, "Opening stream");
            client
                .stream_asr(tonic::Request::new(input))
                .await
                .map(tonic::Response::into_inner)
                .map_err(|status| Error::from_status(Operation::StreamAsr, status))
        })
    }

    fn stream_tts(
        &self,
        reply: pb::ReplyAction,
    ) -> BoxFuture<'static, Result<BoxStream<'static, Result<pb::TtsAudio>>>> {
        let mut client = self.client.clone();
        Box::pin(async move {
            tracing::debug!(operation = %Operation::StreamTts, model = %reply.luna_model, "Opening stream");
            let audio = client
                .stream_tts(tonic::Request::new(reply))
                .await
                .map_err(|status| Error::from_status(Operation::StreamTts, status))?
                .into_inner();
            Ok(audio
                .map(|chunk| chunk.map_err(|status| Error::from_status(Operation::StreamTts, status)))
                .boxed())
        })
    }

    fn transcribe(
        &self,
        input: mpsc::Receiver<pb::TranscribeInput>,
    ) -> BoxFuture<'static, Result<BoxStream<'static, Result<pb::TranscribeResult>>>> {
        let mut client = self.client.clone();
        Box::pin(async move {
            tracing::debug!(operation = %Operation::Transcribe, "Opening stream");
            let results = client
                .transcribe(tonic::Request::new(input))
                .await
                .map_err(|status| Error::from_status(Operation::Transcribe, status))?
                .into_inner();
            Ok(results
                .map(|result| result.map_err(|status| Error::from_status(Operation::Transcribe, status)))
                .boxed())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_port_gets_scheme_from_tls_setting() {
        assert_eq!(normalize_address("localhost:9000", true).unwrap(), "http://localhost:9000");
        assert_eq!(normalize_address("dialog.example.com:443", false).unwrap(), "https://dialog.example.com");
    }

    #[test]
    fn explicit_scheme_is_kept() {
        assert_eq!(normalize_address("http://10.0.0.2:2727/", false).unwrap(), "http://10.0.0.2:2727");
    }

    #[test]
    fn rejects_bad_addresses() {
        assert!(matches!(normalize_address("", true), Err(Error::Config(_))));
        assert!(matches!(normalize_address("ftp://host:21", true), Err(Error::Config(_))));
        assert!(normalize_address("http://[::1", true).is_err());
    }
}
