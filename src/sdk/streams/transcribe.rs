use super::{SEND_BUFFER, StreamState};
use crate::protocol::models::{TranscribeAction, TranscribeResult};
use crate::protocol::pb;
use crate::sdk::Transport;
use crate::{Error, Result};
use futures::channel::mpsc;
use futures::stream::BoxStream;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;

type ResultStream = BoxStream<'static, Result<pb::TranscribeResult>>;

/// Free-form transcription, unrelated to the session's wakeword.
///
/// The action must be the first message; audio follows. The server sends
/// partial results and then a final one, and ends the stream when the client
/// finishes, after a silence, or when it hears a stop intent.
pub struct TranscribeStream {
    sender: TranscribeSender,
    receiver: TranscribeReceiver,
}

/// Sending half of a split `TranscribeStream`.
pub struct TranscribeSender {
    tx: Option<mpsc::Sender<pb::TranscribeInput>>,
    state: StreamState,
    action_sent: bool,
    refused: bool,
}

/// Receiving half of a split `TranscribeStream`.
pub struct TranscribeReceiver {
    call: Option<JoinHandle<Result<ResultStream>>>,
    results: Option<ResultStream>,
    ended: bool,
}

impl TranscribeStream {
    /// Open the RPC. Must be called within a tokio runtime.
    pub(crate) fn open(transport: &dyn Transport) -> Self {
        let (tx, rx) = mpsc::channel(SEND_BUFFER);
        let call = tokio::spawn(transport.transcribe(rx));
        Self {
            sender: TranscribeSender {
                tx: Some(tx),
                state: StreamState::Open,
                action_sent: false,
                refused: false,
            },
            receiver: TranscribeReceiver {
                call: Some(call),
                results: None,
                ended: false,
            },
        }
    }

    #[must_use]
    pub const fn state(&self) -> StreamState {
        if self.receiver.ended {
            StreamState::Closed
        } else {
            self.sender.state
        }
    }

    /// # Errors
    /// See [`TranscribeSender::send_action`]. When the call failed, its
    /// transport error is returned instead of `StreamClosed`.
    pub async fn send_action(&mut self, action: &TranscribeAction) -> Result<()> {
        let sent = self.sender.send_action(action).await;
        self.surface_failure(sent).await
    }

    /// # Errors
    /// See [`TranscribeSender::send_audio`]. When the call failed, its
    /// transport error is returned instead of `StreamClosed`.
    pub async fn send_audio(&mut self, audio: &[u8]) -> Result<()> {
        let sent = self.sender.send_audio(audio).await;
        self.surface_failure(sent).await
    }

    async fn surface_failure(&mut self, sent: Result<()>) -> Result<()> {
        match sent {
            Err(Error::StreamClosed) if self.sender.refused => {
                match self.receiver.failure().await {
                    Some(err) => {
                        self.sender.close();
                        Err(err)
                    }
                    None => Err(Error::StreamClosed),
                }
            }
            other => other,
        }
    }

    /// # Errors
    /// See [`TranscribeSender::send_finished`].
    pub fn send_finished(&mut self) -> Result<()> {
        self.sender.send_finished()
    }

    /// # Errors
    /// See [`TranscribeReceiver::next_result`].
    pub async fn next_result(&mut self) -> Result<Option<TranscribeResult>> {
        self.receiver.next_result().await
    }

    /// Cancel the stream in both directions.
    pub fn close(&mut self) {
        self.sender.close();
        self.receiver.close();
    }

    /// Separate the halves so audio can be sent while results are read.
    #[must_use]
    pub fn split(self) -> (TranscribeSender, TranscribeReceiver) {
        (self.sender, self.receiver)
    }

    /// Pump `reader` as audio while forwarding every result to `on_result`.
    /// The action must already have been sent. Returns when the server ends
    /// the stream, even if `reader` has more audio.
    ///
    /// # Errors
    /// Read failures, ordering errors, or the failure of the call.
    pub async fn read_audio<R, F>(&mut self, reader: &mut R, buf_size: usize, mut on_result: F) -> Result<()>
    where
        R: AsyncRead + Unpin + ?Sized,
        F: FnMut(TranscribeResult),
    {
        if !self.sender.action_sent {
            return Err(Error::OutOfOrder(
                "the transcribe action must be sent before audio".to_string(),
            ));
        }
        let Self { sender, receiver } = self;

        let received = {
            let send = async {
                let mut buf = vec![0u8; buf_size.max(1)];
                loop {
                    let read = reader.read(&mut buf).await?;
                    if read == 0 {
                        break;
                    }
                    match sender.send_audio(&buf[..read]).await {
                        Ok(()) => {}
                        Err(Error::StreamClosed) => return Ok(()),
                        Err(err) => return Err(err),
                    }
                }
                sender.send_finished()
            };

            let receive = async {
                while let Some(result) = receiver.next_result().await? {
                    on_result(result);
                }
                Ok::<(), Error>(())
            };

            // The server may end the stream while the reader still has audio;
            // sending stops as soon as results do.
            tokio::pin!(send, receive);
            let mut sending = true;
            loop {
                tokio::select! {
                    sent = &mut send, if sending => {
                        sent?;
                        sending = false;
                    }
                    received = &mut receive => break received,
                }
            }
        };
        let _ = sender.send_finished();
        received
    }
}

impl TranscribeSender {
    #[must_use]
    pub const fn state(&self) -> StreamState {
        self.state
    }

    /// Send the action that configures the stream. Must come first.
    ///
    /// # Errors
    /// `OutOfOrder` if an action was already sent, `StreamClosed` if the
    /// stream no longer accepts input.
    pub async fn send_action(&mut self, action: &TranscribeAction) -> Result<()> {
        if self.action_sent {
            return Err(Error::OutOfOrder("the transcribe action was already sent".to_string()));
        }
        self.send(pb::transcribe_input::Data::Action(action.clone().into())).await?;
        self.action_sent = true;
        Ok(())
    }

    /// # Errors
    /// `OutOfOrder` before the action (nothing is sent), `StreamClosed` after
    /// `send_finished` or once the server has ended the stream.
    pub async fn send_audio(&mut self, audio: &[u8]) -> Result<()> {
        if !self.state.can_send() {
            return Err(Error::StreamClosed);
        }
        if !self.action_sent {
            return Err(Error::OutOfOrder(
                "the transcribe action must be sent before audio".to_string(),
            ));
        }
        self.send(pb::transcribe_input::Data::Audio(audio.to_vec())).await
    }

    async fn send(&mut self, data: pb::transcribe_input::Data) -> Result<()> {
        if !self.state.can_send() {
            return Err(Error::StreamClosed);
        }
        let Some(tx) = self.tx.as_mut() else {
            return Err(Error::StreamClosed);
        };
        if tx.send(pb::TranscribeInput { data: Some(data) }).await.is_err() {
            tracing::debug!("Transcriber stopped reading input");
            self.tx = None;
            self.state = StreamState::HalfClosed;
            self.refused = true;
            return Err(Error::StreamClosed);
        }
        self.state = StreamState::Active;
        Ok(())
    }

    /// Signal that no more audio will be sent.
    ///
    /// # Errors
    /// `StreamClosed` if the stream was closed.
    pub fn send_finished(&mut self) -> Result<()> {
        if self.state == StreamState::Closed {
            return Err(Error::StreamClosed);
        }
        self.tx = None;
        self.state = StreamState::HalfClosed;
        Ok(())
    }

    pub fn close(&mut self) {
        self.tx = None;
        self.state = StreamState::Closed;
    }
}

impl TranscribeReceiver {
    /// Next partial or final result; `None` when the server ended the stream.
    ///
    /// # Errors
    /// `StreamClosed` after the end was already reported or after `close`;
    /// otherwise the transport failure that ended the stream.
    pub async fn next_result(&mut self) -> Result<Option<TranscribeResult>> {
        if self.ended {
            return Err(Error::StreamClosed);
        }
        if self.results.is_none() {
            let Some(call) = self.call.take() else {
                self.ended = true;
                return Err(Error::StreamClosed);
            };
            match call.await {
                Ok(Ok(results)) => self.results = Some(results),
                Ok(Err(err)) => {
                    self.ended = true;
                    return Err(err);
                }
                Err(err) => {
                    self.ended = true;
                    return Err(err.into());
                }
            }
        }

        let Some(results) = self.results.as_mut() else {
            return Err(Error::StreamClosed);
        };
        match results.next().await {
            Some(Ok(result)) => Ok(Some(result.into())),
            Some(Err(err)) => {
                self.close();
                Err(err)
            }
            None => {
                self.results = None;
                self.ended = true;
                Ok(None)
            }
        }
    }

    /// After the sending half was refused: wait for the call and report its
    /// failure, if any. A call that succeeded keeps its results for
    /// `next_result`.
    async fn failure(&mut self) -> Option<Error> {
        let call = self.call.take()?;
        match call.await {
            Ok(Ok(results)) => {
                self.results = Some(results);
                None
            }
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "Transcribe stream failed");
                self.ended = true;
                Some(err)
            }
            Err(err) => {
                self.ended = true;
                Some(err.into())
            }
        }
    }

    pub fn close(&mut self) {
        if let Some(call) = self.call.take() {
            call.abort();
        }
        self.results = None;
        self.ended = true;
    }
}

impl Drop for TranscribeReceiver {
    fn drop(&mut self) {
        if let Some(call) = self.call.take() {
            call.abort();
        }
    }
}
