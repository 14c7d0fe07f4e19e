use crate::Result;
use crate::protocol::models::{
    CommandAction, CommandStatus, ReplyAction, SessionInput, TranscribeAction, WaitForInput,
};
use std::future::Future;
use std::pin::Pin;

use super::dispatch::DispatchContext;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

pub type InputHandler =
    Box<dyn Fn(DispatchContext, WaitForInput) -> BoxFuture<Result<SessionInput>> + Send + Sync>;
pub type CommandHandler =
    Box<dyn Fn(DispatchContext, CommandAction) -> BoxFuture<Result<CommandStatus>> + Send + Sync>;
pub type ReplyHandler = Box<dyn Fn(DispatchContext, ReplyAction) -> BoxFuture<Result<()>> + Send + Sync>;
pub type TranscribeHandler =
    Box<dyn Fn(DispatchContext, TranscribeAction) -> BoxFuture<Result<String>> + Send + Sync>;
pub type EndHandler = Box<dyn Fn(DispatchContext) -> BoxFuture<Result<()>> + Send + Sync>;

/// Application callbacks, one per action kind.
#[derive(Default)]
pub struct ActionHandlers {
    pub on_input: Option<InputHandler>,
    pub on_command: Option<CommandHandler>,
    pub on_reply: Option<ReplyHandler>,
    pub on_transcribe: Option<TranscribeHandler>,
    pub on_end: Option<EndHandler>,
}

impl ActionHandlers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next user input: text, a recognition result, or a story
    /// change.
    #[must_use]
    pub fn on_input<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(DispatchContext, WaitForInput) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<SessionInput>> + Send + 'static,
    {
        self.on_input = Some(Box::new(move |ctx, wait| Box::pin(handler(ctx, wait))));
        self
    }

    /// Run a command. Start from `CommandStatus::for_action` so the
    /// identifiers match.
    #[must_use]
    pub fn on_command<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(DispatchContext, CommandAction) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CommandStatus>> + Send + 'static,
    {
        self.on_command = Some(Box::new(move |ctx, cmd| Box::pin(handler(ctx, cmd))));
        self
    }

    #[must_use]
    pub fn on_reply<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(DispatchContext, ReplyAction) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.on_reply = Some(Box::new(move |ctx, reply| Box::pin(handler(ctx, reply))));
        self
    }

    /// Produce the final transcript for a transcribe action.
    #[must_use]
    pub fn on_transcribe<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(DispatchContext, TranscribeAction) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        self.on_transcribe = Some(Box::new(move |ctx, action| Box::pin(handler(ctx, action))));
        self
    }

    #[must_use]
    pub fn on_end<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(DispatchContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.on_end = Some(Box::new(move |ctx| Box::pin(handler(ctx))));
        self
    }
}
