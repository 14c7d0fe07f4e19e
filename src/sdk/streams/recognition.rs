use super::{SEND_BUFFER, StreamState};
use crate::protocol::models::{AsrResult, SessionToken};
use crate::protocol::pb;
use crate::sdk::Transport;
use crate::{Error, Result};
use futures::SinkExt;
use futures::channel::mpsc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;

/// Streams audio to the recognizer for one session turn.
///
/// A session token must be sent before any audio. Later tokens update the
/// recognition context mid-stream. The server answers with exactly one
/// result, either after `finish` or as soon as it detects the end of the
/// utterance on its own.
pub struct RecognitionStream {
    sender: Option<mpsc::Sender<pb::AsrInput>>,
    call: Option<JoinHandle<Result<pb::AsrResult>>>,
    early: Option<pb::AsrResult>,
    state: StreamState,
    token_sent: bool,
}

impl RecognitionStream {
    /// Open the RPC. Must be called within a tokio runtime.
    pub(crate) fn open(transport: &dyn Transport) -> Self {
        let (sender, receiver) = mpsc::channel(SEND_BUFFER);
        let call = tokio::spawn(transport.stream_asr(receiver));
        Self {
            sender: Some(sender),
            call: Some(call),
            early: None,
            state: StreamState::Open,
            token_sent: false,
        }
    }

    #[must_use]
    pub const fn state(&self) -> StreamState {
        self.state
    }

    /// Bind the stream to the session state `token` represents. May be sent
    /// again between audio chunks to update the context.
    ///
    /// # Errors
    /// `StreamClosed` after `finish` or once the server has finalized, or the
    /// transport failure that ended the call.
    pub async fn send_token(&mut self, token: &SessionToken) -> Result<()> {
        self.send(pb::asr_input::Data::Token(token.into())).await?;
        self.token_sent = true;
        Ok(())
    }

    /// Send a chunk of audio in the encoding the model expects.
    ///
    /// # Errors
    /// `OutOfOrder` before the first token, `StreamClosed` after `finish` or
    /// once the server has finalized early (call `result` in that case), or
    /// the transport failure that ended the call.
    pub async fn send_audio(&mut self, audio: &[u8]) -> Result<()> {
        if !self.state.can_send() {
            return Err(Error::StreamClosed);
        }
        if !self.token_sent {
            return Err(Error::OutOfOrder(
                "the session token must be sent before audio".to_string(),
            ));
        }
        self.send(pb::asr_input::Data::Audio(audio.to_vec())).await
    }

    async fn send(&mut self, data: pb::asr_input::Data) -> Result<()> {
        if !self.state.can_send() {
            return Err(Error::StreamClosed);
        }
        if self.call.as_ref().is_some_and(JoinHandle::is_finished) {
            return Err(self.settle().await);
        }
        let Some(sender) = self.sender.as_mut() else {
            return Err(Error::StreamClosed);
        };
        if sender.send(pb::AsrInput { data: Some(data) }).await.is_err() {
            return Err(self.settle().await);
        }
        self.state = StreamState::Active;
        Ok(())
    }

    /// The call stopped reading input. Keep an early result for `result`;
    /// a failed call closes the stream and its error is returned as is.
    async fn settle(&mut self) -> Error {
        self.sender = None;
        let Some(call) = self.call.take() else {
            self.state = StreamState::Closed;
            return Error::StreamClosed;
        };
        match call.await {
            Ok(Ok(result)) => {
                tracing::debug!("Recognizer finalized before the audio ended");
                self.early = Some(result);
                self.state = StreamState::HalfClosed;
                Error::StreamClosed
            }
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "Recognition stream failed");
                self.state = StreamState::Closed;
                err
            }
            Err(err) => {
                self.state = StreamState::Closed;
                err.into()
            }
        }
    }

    fn half_close(&mut self) {
        self.sender = None;
        if self.state != StreamState::Closed {
            self.state = StreamState::HalfClosed;
        }
    }

    /// Signal the end of audio. The server will finalize its result.
    ///
    /// # Errors
    /// `StreamClosed` once the result has been taken.
    pub fn finish(&mut self) -> Result<()> {
        if self.state == StreamState::Closed {
            return Err(Error::StreamClosed);
        }
        self.half_close();
        Ok(())
    }

    /// Wait for the recognition result. Ends the audio if still open.
    ///
    /// The result is delivered once; later calls fail with `StreamClosed`.
    ///
    /// # Errors
    /// Any transport failure of the call, or `StreamClosed` when the result
    /// was already taken.
    pub async fn result(&mut self) -> Result<AsrResult> {
        self.half_close();
        let result = if let Some(result) = self.early.take() {
            result
        } else {
            let call = self.call.take().ok_or(Error::StreamClosed)?;
            self.state = StreamState::Closed;
            call.await??
        };
        self.state = StreamState::Closed;
        tracing::debug!(confidence = result.confidence, timed_out = result.timed_out, "Recognition finished");
        Ok(result.into())
    }

    /// Pump `reader` into the stream until EOF or early finalization, then
    /// return the result. The token must already have been sent.
    ///
    /// # Errors
    /// Read failures, ordering errors, or the failure of the call.
    pub async fn read_audio<R>(&mut self, reader: &mut R, buf_size: usize) -> Result<AsrResult>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let mut buf = vec![0u8; buf_size.max(1)];
        loop {
            let read = reader.read(&mut buf).await?;
            if read == 0 {
                break;
            }
            match self.send_audio(&buf[..read]).await {
                Ok(()) => {}
                Err(Error::StreamClosed) => break,
                Err(err) => return Err(err),
            }
        }
        self.result().await
    }
}

impl Drop for RecognitionStream {
    fn drop(&mut self) {
        if let Some(call) = self.call.take() {
            call.abort();
        }
    }
}
