use super::StreamState;
use crate::protocol::models::ReplyAction;
use crate::protocol::pb;
use crate::sdk::Transport;
use crate::{Error, Result};
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Receives synthesized audio for one reply.
///
/// Dropping or closing the stream before the audio ends cancels synthesis;
/// that is not an error.
pub struct SynthesisStream {
    audio: Option<BoxStream<'static, Result<pb::TtsAudio>>>,
    state: StreamState,
}

impl SynthesisStream {
    pub(crate) async fn open(transport: &dyn Transport, reply: &ReplyAction) -> Result<Self> {
        let audio = transport.stream_tts(reply.clone().into()).await?;
        Ok(Self {
            audio: Some(audio),
            state: StreamState::HalfClosed,
        })
    }

    #[must_use]
    pub const fn state(&self) -> StreamState {
        self.state
    }

    /// Next chunk of audio, or `None` once synthesis is complete.
    ///
    /// # Errors
    /// `StreamClosed` after the end was already reported or after `close`;
    /// otherwise the transport failure that ended the stream.
    pub async fn next_audio(&mut self) -> Result<Option<Vec<u8>>> {
        if self.audio.is_none() {
            return Err(Error::StreamClosed);
        }
        self.next().await.transpose()
    }

    /// Stop receiving audio. Cancels synthesis if it is still running.
    pub fn close(&mut self) {
        if self.audio.take().is_some() {
            tracing::debug!("Synthesis stream closed by client");
        }
        self.state = StreamState::Closed;
    }

    /// Write all remaining audio to `writer`. Returns the number of bytes
    /// written.
    ///
    /// # Errors
    /// Write failures or the transport failure that ended the stream.
    pub async fn write_audio<W>(&mut self, writer: &mut W) -> Result<usize>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut written = 0;
        while let Some(chunk) = self.next().await {
            let chunk = chunk?;
            writer.write_all(&chunk).await?;
            written += chunk.len();
        }
        writer.flush().await?;
        Ok(written)
    }
}

impl Stream for SynthesisStream {
    type Item = Result<Vec<u8>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let Some(audio) = self.audio.as_mut() else {
            return Poll::Ready(None);
        };
        match audio.poll_next_unpin(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Some(Ok(chunk))) => Poll::Ready(Some(Ok(chunk.audio))),
            Poll::Ready(Some(Err(err))) => {
                self.audio = None;
                self.state = StreamState::Closed;
                Poll::Ready(Some(Err(err)))
            }
            Poll::Ready(None) => {
                self.audio = None;
                self.state = StreamState::Closed;
                Poll::Ready(None)
            }
        }
    }
}
