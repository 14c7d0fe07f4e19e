use crate::protocol::models::{
    Action, CommandAction, ReplyAction, SessionInput, SessionToken, TranscribeAction, WaitForInput,
};
use crate::{Client, Error, Result};

use super::handlers::ActionHandlers;
use super::session::Session;
use super::streams::{RecognitionStream, SynthesisStream, TranscribeStream};

/// What a handler gets to work with: the client and the token current when
/// the batch was issued.
#[derive(Clone, Debug)]
pub struct DispatchContext {
    client: Client,
    token: SessionToken,
}

impl DispatchContext {
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    #[must_use]
    pub const fn token(&self) -> &SessionToken {
        &self.token
    }

    /// # Errors
    /// Returns an error if the token cannot be sent.
    pub async fn new_asr_stream(&self) -> Result<RecognitionStream> {
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
}

/// Drives a session by executing each action batch in order.
///
/// Replies run in place and the batch continues. The first input-needed,
/// command or transcribe action produces the single input for the next
/// advance; anything after it in the batch is superseded by the server's
/// next output. A batch of replies only is followed by waiting for input.
pub struct Dispatcher {
    handlers: ActionHandlers,
}

impl Dispatcher {
    #[must_use]
    pub const fn new(handlers: ActionHandlers) -> Self {
        Self { handlers }
    }

    /// Run until the session ends.
    ///
    /// # Errors
    /// The first handler or session failure; nothing is retried.
    pub async fn run(&self, session: &mut Session) -> Result<()> {
        while self.step(session).await? {}
        Ok(())
    }

    /// Execute the pending batch and advance once. Returns `false` when the
    /// session ended.
    ///
    /// # Errors
    /// The first handler or session failure.
    pub async fn step(&self, session: &mut Session) -> Result<bool> {
        let ctx = DispatchContext {
            client: session.client().clone(),
            token: session.token().clone(),
        };
        let batch = session.pending_actions().to_vec();

        let Some(input) = self.execute(&ctx, &batch).await? else {
            return Ok(false);
        };
        session.advance(&ctx.token, input).await?;
        Ok(true)
    }

    /// Execute `actions` in order up to the first blocking one and return the
    /// input it produced, or `None` on session end.
    async fn execute(&self, ctx: &DispatchContext, actions: &[Action]) -> Result<Option<SessionInput>> {
        for action in actions {
            tracing::debug!(session_id = %ctx.token.id(), action = %action.kind(), "Dispatching action");
            match action {
                Action::Reply(reply) => self.reply(ctx, reply).await?,
                Action::InputNeeded(wait) => return self.input(ctx, *wait).await.map(Some),
                Action::Command(cmd) => return self.command(ctx, cmd).await.map(Some),
                Action::Transcribe(transcribe) => return self.transcribe(ctx, transcribe).await.map(Some),
                Action::SessionEnd => {
                    if let Some(handler) = &self.handlers.on_end {
                        handler(ctx.clone()).await?;
                    }
                    return Ok(None);
                }
            }
        }
        self.input(ctx, WaitForInput::default()).await.map(Some)
    }

    async fn reply(&self, ctx: &DispatchContext, reply: &ReplyAction) -> Result<()> {
        match &self.handlers.on_reply {
            Some(handler) => handler(ctx.clone(), reply.clone()).await,
            None => {
                tracing::info!(text = %crate::safe_truncate(&reply.text, 256), "Reply");
                Ok(())
            }
        }
    }

    async fn input(&self, ctx: &DispatchContext, wait: WaitForInput) -> Result<SessionInput> {
        let handler = self
            .handlers
            .on_input
            .as_ref()
            .ok_or_else(|| Error::Handler("no input handler registered".to_string()))?;
        handler(ctx.clone(), wait).await
    }

    async fn command(&self, ctx: &DispatchContext, cmd: &CommandAction) -> Result<SessionInput> {
        let handler = self
            .handlers
            .on_command
            .as_ref()
            .ok_or_else(|| Error::Handler(format!("no command handler registered for '{}'", cmd.id)))?;
        let status = handler(ctx.clone(), cmd.clone()).await?;
        if !status.matches(cmd) {
            return Err(Error::InvalidInput(format!(
                "command handler returned a status for '{}', expected '{}'",
                status.command_id, cmd.id
            )));
        }
        tracing::debug!(command_id = %cmd.id, success = status.is_success(), "Command finished");
        Ok(SessionInput::Command(status))
    }

    async fn transcribe(&self, ctx: &DispatchContext, action: &TranscribeAction) -> Result<SessionInput> {
        let handler = self
            .handlers
            .on_transcribe
            .as_ref()
            .ok_or_else(|| Error::Handler("no transcribe handler registered".to_string()))?;
        let transcript = handler(ctx.clone(), action.clone()).await?;
        Ok(SessionInput::text(transcript))
    }
}
