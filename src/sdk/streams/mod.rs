//! Streaming adapters: recognition (client streaming), synthesis (server
//! streaming) and transcription (bidirectional).
//!
//! Every stream is one-shot. Once it reaches `Closed` it cannot be reused; a
//! new action needs a new stream.

mod recognition;
mod synthesis;
mod transcribe;

pub use recognition::RecognitionStream;
pub use synthesis::SynthesisStream;
pub use transcribe::{TranscribeReceiver, TranscribeSender, TranscribeStream};

/// Outgoing messages buffered per stream before `send_*` waits.
const SEND_BUFFER: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Created, no data sent yet.
    Open,
    /// Data is flowing.
    Active,
    /// The client finished sending and waits for the server.
    HalfClosed,
    /// Terminal.
    Closed,
}

impl StreamState {
    #[must_use]
    pub const fn can_send(self) -> bool {
        matches!(self, Self::Open | Self::Active)
    }
}
