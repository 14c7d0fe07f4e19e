//! Session-level SDK over the dialog service.
//!
//! `Session` tracks the token and the pending action batch, `Dispatcher`
//! executes batches through application handlers, and `streams` wraps the
//! three audio RPCs. The raw protobuf types stay reachable through
//! `crate::protocol::pb` when you need full control.

mod builder;
mod dispatch;
mod handlers;
mod session;
pub mod streams;
mod transport;

pub use builder::ClientBuilder;
pub use dispatch::{DispatchContext, Dispatcher};
pub use handlers::{
    ActionHandlers, BoxFuture as HandlerFuture, CommandHandler, EndHandler, InputHandler, ReplyHandler,
    TranscribeHandler,
};
pub use session::{Session, SessionSnapshot, SessionState};
pub use streams::{RecognitionStream, StreamState, SynthesisStream, TranscribeStream};
pub use transport::{BoxFuture, Transport};
