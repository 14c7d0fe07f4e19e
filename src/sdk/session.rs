use crate::protocol::models::{
    Action, AsrResult, CommandStatus, InputKind, ReplyAction, SessionInput, SessionOutput, SessionToken,
    SetStory, TranscribeAction,
};
use crate::{Client, Error, Result};

use super::streams::{RecognitionStream, SynthesisStream, TranscribeStream};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Created; no input sent yet.
    Created,
    /// At least one input was accepted.
    Active,
    /// Terminal. No further input is accepted.
    Ended,
}

/// One dialog with the server.
///
/// The session owns the current token and the action batch of the last
/// output. Methods that advance the dialog take `&mut self`, so one session
/// has at most one call in flight. Share it across tasks behind a `Mutex`.
pub struct Session {
    client: Client,
    model_id: String,
    token: SessionToken,
    state: SessionState,
    pending: Vec<Action>,
}

/// Serializable state of a session, for handing it to another process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub model_id: String,
    pub token: SessionToken,
    pub state: SessionState,
    pub pending: Vec<Action>,
}

impl SessionSnapshot {
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// # Errors
    /// Returns an error if the JSON is not a snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("model_id", &self.model_id)
            .field("token", &self.token)
            .field("state", &self.state)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub(crate) fn new(client: Client, model_id: String, output: SessionOutput) -> Self {
        let state = if output.is_end() { SessionState::Ended } else { SessionState::Created };
        tracing::info!(session_id = %output.token.id(), model_id = %model_id, "Session created");
        Self {
            client,
            model_id,
            token: output.token,
            state,
            pending: output.actions,
        }
    }

    pub(crate) fn from_snapshot(client: Client, snapshot: SessionSnapshot) -> Self {
        Self {
            client,
            model_id: snapshot.model_id,
            token: snapshot.token,
            state: snapshot.state,
            pending: snapshot.pending,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            model_id: self.model_id.clone(),
            token: self.token.clone(),
            state: self.state,
            pending: self.pending.clone(),
        }
    }

    #[must_use]
    pub const fn token(&self) -> &SessionToken {
        &self.token
    }

    #[must_use]
    pub fn id(&self) -> &str {
        self.token.id()
    }

    #[must_use]
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub const fn is_ended(&self) -> bool {
        matches!(self.state, SessionState::Ended)
    }

    /// Actions of the last output, in execution order.
    #[must_use]
    pub fn pending_actions(&self) -> &[Action] {
        &self.pending
    }

    /// The action the next input has to answer: the first one in the batch
    /// that is not a reply.
    #[must_use]
    pub fn awaiting(&self) -> Option<&Action> {
        self.pending.iter().find(|action| action.is_blocking())
    }

    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// Advance the dialog with `input`, answering the pending batch.
    ///
    /// `token` must be the session's current token. On success it is replaced
    /// by the returned one; on a transport failure nothing changes and the
    /// call may be retried with the same token.
    ///
    /// # Errors
    /// - `SessionEnded` once the session has ended.
    /// - `StaleToken` for any token but the current one (nothing is sent).
    /// - `InvalidInput` when the input fails local validation or a command
    ///   result does not match its action.
    /// - `OutOfOrder` when the input does not answer the pending action.
    /// - Server errors, mapped per `Error::from_status`.
    pub async fn advance(&mut self, token: &SessionToken, input: SessionInput) -> Result<SessionOutput> {
        if self.is_ended() {
            return Err(Error::SessionEnded);
        }
        if *token != self.token {
            tracing::warn!(session_id = %self.token.id(), "Rejected advance with a superseded token");
            return Err(Error::StaleToken);
        }
        input.validate()?;
        self.check_order(&input)?;

        let kind = input.kind();
        match self.client.update_session(&self.token, input).await {
            Ok(output) => {
                tracing::debug!(
                    session_id = %output.token.id(),
                    input = %kind,
                    actions = output.actions.len(),
                    "Session advanced"
                );
                self.token = output.token.clone();
                self.pending = output.actions.clone();
                self.state = if output.is_end() { SessionState::Ended } else { SessionState::Active };
                Ok(output)
            }
            Err(err) => {
                if err.ends_session() {
                    tracing::warn!(session_id = %self.token.id(), error = %err, "Session no longer usable");
                    self.state = SessionState::Ended;
                }
                Err(err)
            }
        }
    }

    /// Check that `input` answers the first blocking action of the batch.
    fn check_order(&self, input: &SessionInput) -> Result<()> {
        let kind = input.kind();
        match self.awaiting() {
            Some(Action::SessionEnd) => Err(Error::SessionEnded),
            Some(Action::Command(action)) => match input {
                SessionInput::Command(status) if status.matches(action) => Ok(()),
                SessionInput::Command(status) => Err(Error::InvalidInput(format!(
                    "command result for '{}' (state '{}') does not match pending command '{}' (state '{}')",
                    status.command_id, status.state_id, action.id, action.state_id
                ))),
                _ => Err(Error::OutOfOrder(format!(
                    "pending command '{}' must be answered before a {kind}",
                    action.id
                ))),
            },
            Some(Action::Transcribe(action)) => match kind {
                InputKind::Text | InputKind::Story => Ok(()),
                _ => Err(Error::OutOfOrder(format!(
                    "pending transcribe action '{}' expects a transcript, got a {kind}",
                    action.id
                ))),
            },
            Some(Action::InputNeeded(_) | Action::Reply(_)) | None => match kind {
                InputKind::Command => Err(Error::OutOfOrder(
                    "no command is pending; the session is waiting for user input".to_string(),
                )),
                _ => Ok(()),
            },
        }
    }

    /// # Errors
    /// See [`Session::advance`].
    pub async fn process_text(&mut self, text: impl Into<String>) -> Result<SessionOutput> {
        let token = self.token.clone();
        self.advance(&token, SessionInput::text(text)).await
    }

    /// # Errors
    /// See [`Session::advance`].
    pub async fn process_asr_result(&mut self, result: AsrResult) -> Result<SessionOutput> {
        let token = self.token.clone();
        self.advance(&token, SessionInput::Recognition(result)).await
    }

    /// # Errors
    /// See [`Session::advance`].
    pub async fn process_command_result(&mut self, status: CommandStatus) -> Result<SessionOutput> {
        let token = self.token.clone();
        self.advance(&token, SessionInput::Command(status)).await
    }

    /// Report a finished command. The returned output acknowledges it and
    /// carries the next actions.
    ///
    /// # Errors
    /// See [`Session::advance`].
    pub async fn report_command_finished(&mut self, status: CommandStatus) -> Result<SessionOutput> {
        self.process_command_result(status).await
    }

    /// # Errors
    /// See [`Session::advance`].
    pub async fn set_story(&mut self, story: SetStory) -> Result<SessionOutput> {
        let token = self.token.clone();
        self.advance(&token, SessionInput::Story(story)).await
    }

    /// Open a recognition stream bound to the current token.
    ///
    /// # Errors
    /// `SessionEnded` after the session ended, or the failure to send the token.
    pub async fn new_asr_stream(&self) -> Result<RecognitionStream> {
        if self.is_ended() {
            return Err(Error::SessionEnded);
        }
        self.client.new_session_asr_stream(&self.token).await
    }

    /// # Errors
    /// Returns an error if the synthesis call cannot be opened.
    pub async fn new_tts_stream(&self, reply: &ReplyAction) -> Result<SynthesisStream> {
        self.client.new_tts_stream(reply).await
    }

    /// # Errors
    /// Returns an error if the action cannot be sent.
    pub async fn new_transcribe_stream(&self, action: &TranscribeAction) -> Result<TranscribeStream> {
        self.client.new_transcribe_stream(action).await
    }

    /// Release the session on the server. A session the server already
    /// dropped ends cleanly.
    ///
    /// # Errors
    /// Transport failures of the delete call.
    pub async fn end(self) -> Result<()> {
        match self.client.delete_session(&self.token).await {
            Ok(()) | Err(Error::SessionEnded) => {
                tracing::info!(session_id = %self.token.id(), "Session ended");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}
