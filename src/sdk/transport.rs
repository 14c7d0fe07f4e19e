use crate::Result;
use crate::protocol::pb;
use futures::channel::mpsc;
use futures::stream::BoxStream;
use std::future::Future;
use std::pin::Pin;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The RPC channel the SDK drives. One method per service operation.
///
/// Implementations map transport failures through `Error::from_status` so the
/// session layer sees the same error taxonomy regardless of the channel.
/// Streaming calls return `'static` futures so they can be spawned. Their
/// request side is the receiving end of the stream's outgoing channel.
pub trait Transport: Send + Sync {
    fn version(&self) -> BoxFuture<'_, Result<pb::VersionResponse>>;
    fn list_models(&self) -> BoxFuture<'_, Result<pb::ListModelsResponse>>;
    fn create_session(&self, start: pb::SessionStart) -> BoxFuture<'_, Result<pb::SessionOutput>>;
    fn delete_session(&self, token: pb::TokenData) -> BoxFuture<'_, Result<()>>;
    fn update_session(&self, input: pb::SessionInput) -> BoxFuture<'_, Result<pb::SessionOutput>>;

    fn stream_asr(
        &self,
        input: mpsc::Receiver<pb::AsrInput>,
    ) -> BoxFuture<'static, Result<pb::AsrResult>>;

    fn stream_tts(
        &self,
        reply: pb::ReplyAction,
    ) -> BoxFuture<'static, Result<BoxStream<'static, Result<pb::TtsAudio>>>>;

    fn transcribe(
        &self,
        input: mpsc::Receiver<pb::TranscribeInput>,
    ) -> BoxFuture<'static, Result<BoxStream<'static, Result<pb::TranscribeResult>>>>;
}
