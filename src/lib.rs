#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::result_large_err)]

pub mod config;
pub mod error;
pub mod protocol;
pub mod sdk;
pub mod transport;

pub use config::ClientConfig;
pub use error::{Error, Operation, Result};
pub use protocol::models::{
    Action, ActionKind, AsrResult, CommandAction, CommandStatus, InputKind, ModelInfo, Params, ReplyAction,
    SessionInput, SessionOutput, SessionToken, SetStory, StatusCode, TranscribeAction, TranscribeResult,
    VersionInfo, WaitForInput,
};
pub use sdk::{
    ActionHandlers, ClientBuilder, DispatchContext, Dispatcher, RecognitionStream, Session, SessionSnapshot,
    SessionState, StreamState, SynthesisStream, TranscribeStream, Transport,
};

use protocol::pb;
use std::sync::Arc;

const TRACE_TRUNCATE_SUFFIX: &str = "... (truncated)";

/// Client for the Diatheke dialog service.
///
/// Cheap to clone; clones share the underlying channel. Sessions hold a clone
/// and never replace it.
#[derive(Clone)]
#[must_use]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Connect over TLS with the system roots.
    ///
    /// # Errors
    /// Returns an error if the address is invalid or the connection fails.
    pub async fn connect(address: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().address(address).connect().await
    }

    /// Connect using a loaded config file.
    ///
    /// # Errors
    /// Returns an error if the config is invalid or the connection fails.
    pub async fn from_config(config: &ClientConfig) -> Result<Self> {
        ClientBuilder::from_config(config)?.connect().await
    }

    pub fn from_transport(transport: impl Transport + 'static) -> Self {
        Self::from_shared(Arc::new(transport))
    }

    pub(crate) fn from_shared(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// # Errors
    /// Returns an error if the call fails.
    pub async fn version(&self) -> Result<VersionInfo> {
        Ok(self.transport.version().await?.into())
    }

    /// Models the server can run sessions for.
    ///
    /// # Errors
    /// Returns an error if the call fails.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let response = self.transport.list_models().await?;
        Ok(response.models.into_iter().map(ModelInfo::from).collect())
    }

    /// Start a session for `model_id`.
    ///
    /// # Errors
    /// `ModelNotFound` for a model the server does not know, or any transport
    /// failure.
    pub async fn create_session(&self, model_id: &str) -> Result<Session> {
        self.start_session(model_id, None).await
    }

    /// Start a session that only listens after `wakeword`.
    ///
    /// # Errors
    /// See [`Client::create_session`].
    pub async fn create_session_with_wakeword(&self, model_id: &str, wakeword: &str) -> Result<Session> {
        self.start_session(model_id, Some(wakeword)).await
    }

    async fn start_session(&self, model_id: &str, wakeword: Option<&str>) -> Result<Session> {
        if model_id.trim().is_empty() {
            return Err(Error::InvalidInput("model id is required".to_string()));
        }
        let start = pb::SessionStart {
            model_id: model_id.to_string(),
            wakeword: wakeword.unwrap_or_default().to_string(),
        };
        let output = SessionOutput::try_from(self.transport.create_session(start).await?)?;
        Ok(Session::new(self.clone(), model_id.to_string(), output))
    }

    /// Rebuild a session from a snapshot, e.g. one taken in another process.
    pub fn resume_session(&self, snapshot: SessionSnapshot) -> Session {
        Session::from_snapshot(self.clone(), snapshot)
    }

    /// Release server resources for the session `token` belongs to. The
    /// token must not be used afterwards.
    ///
    /// # Errors
    /// Returns an error if the call fails.
    pub async fn delete_session(&self, token: &SessionToken) -> Result<()> {
        self.transport.delete_session(token.into()).await
    }

    /// Advance a session without local tracking. Prefer [`Session::advance`],
    /// which also enforces token freshness and action order.
    ///
    /// # Errors
    /// `InvalidInput` for inputs failing local validation, or server errors.
    pub async fn update_session(&self, token: &SessionToken, input: SessionInput) -> Result<SessionOutput> {
        input.validate()?;
        if let SessionInput::Text { text } = &input {
            tracing::trace!(session_id = %token.id(), text = %safe_truncate(text, TRACE_LOG_MAX_BYTES), "Sending text");
        }
        let output = self.transport.update_session(input.into_pb(token)).await?;
        SessionOutput::try_from(output)
    }

    /// Advance a session with a raw protobuf input.
    ///
    /// # Errors
    /// `InvalidInput` when the token or the input oneof is unset; nothing is
    /// sent in that case.
    pub async fn update_session_pb(&self, raw: pb::SessionInput) -> Result<SessionOutput> {
        let (token, input) = SessionInput::from_pb(raw)?;
        self.update_session(&token, input).await
    }

    /// Open a recognition stream and send `token` as its first message.
    ///
    /// # Errors
    /// Returns an error if the token cannot be sent.
    pub async fn new_session_asr_stream(&self, token: &SessionToken) -> Result<RecognitionStream> {
        let mut stream = self.new_asr_stream();
        stream.send_token(token).await?;
        Ok(stream)
    }

    /// Open a recognition stream with nothing sent. Must be called within a
    /// tokio runtime.
    pub fn new_asr_stream(&self) -> RecognitionStream {
        RecognitionStream::open(self.transport.as_ref())
    }

    /// Synthesize `reply` with the model it names.
    ///
    /// # Errors
    /// Returns an error if the call cannot be opened.
    pub async fn new_tts_stream(&self, reply: &ReplyAction) -> Result<SynthesisStream> {
        SynthesisStream::open(self.transport.as_ref(), reply).await
    }

    /// Open a transcription stream and send `action` as its first message.
    ///
    /// # Errors
    /// Returns an error if the action cannot be sent.
    pub async fn new_transcribe_stream(&self, action: &TranscribeAction) -> Result<TranscribeStream> {
        let mut stream = self.open_transcribe_stream();
        stream.send_action(action).await?;
        Ok(stream)
    }

    /// Open a transcription stream with nothing sent. Must be called within a
    /// tokio runtime.
    pub fn open_transcribe_stream(&self) -> TranscribeStream {
        TranscribeStream::open(self.transport.as_ref())
    }
}

const TRACE_LOG_MAX_BYTES: usize = 1024;

pub(crate) fn safe_truncate(s: &str, max_bytes: usize) -> std::borrow::Cow<'_, str> {
    if s.len() <= max_bytes {
        return std::borrow::Cow::Borrowed(s);
    }

    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    std::borrow::Cow::Owned(format!(
        "{} {} {} bytes",
        &s[..end],
        TRACE_TRUNCATE_SUFFIX,
        s.len() - end
    ))
}

#[cfg(test)]
mod tests {
    use super::safe_truncate;

    #[test]
    fn truncate_respects_char_boundaries() {
        let text = "héllo";
        let out = safe_truncate(text, 2);
        assert!(out.starts_with('h'));
        assert!(out.contains("truncated"));
        assert_eq!(safe_truncate("short", 16), "short");
    }
}
