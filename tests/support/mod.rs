#![allow(dead_code)]

use diatheke::error::{Error, Operation};
use diatheke::protocol::pb;
use diatheke::sdk::{BoxFuture, Transport};
use futures::StreamExt;
use futures::channel::mpsc;
use futures::stream::BoxStream;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tonic::Status;

pub const SESSION_ID: &str = "sess-1";

/// In-memory server: issues a fresh token per accepted update and replays
/// scripted action batches.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
pub struct Inner {
    pub models: Vec<String>,
    pub initial: Vec<pb::ActionData>,
    pub script: VecDeque<Vec<pb::ActionData>>,
    pub generation: u8,
    pub starts: Vec<pb::SessionStart>,
    pub updates: Vec<pb::SessionInput>,
    pub deleted: Vec<pb::TokenData>,
    pub fail_next_update: Option<Status>,
    pub asr_inputs: Vec<pb::AsrInput>,
    pub asr_result: pb::AsrResult,
    /// Fail the next recognition call without reading any input.
    pub asr_failure: Option<Status>,
    /// Answer after the first audio chunk and stop reading.
    pub asr_finalizes_early: bool,
    pub tts_audio: Vec<Vec<u8>>,
    pub tts_hangs: bool,
    pub transcribe_inputs: Vec<pb::TranscribeInput>,
    pub transcribe_failure: Option<Status>,
    /// End the results after this many audio chunks but keep the request
    /// side open.
    pub transcribe_stops_after: Option<usize>,
}

pub fn token(generation: u8) -> pb::TokenData {
    pb::TokenData {
        data: vec![generation],
        id: SESSION_ID.to_string(),
        metadata: String::new(),
    }
}

pub fn reply(text: &str) -> pb::ActionData {
    pb::ActionData {
        action: Some(pb::action_data::Action::Reply(pb::ReplyAction {
            text: text.to_string(),
            luna_model: "luna-en".to_string(),
        })),
    }
}

pub fn input_needed() -> pb::ActionData {
    pb::ActionData {
        action: Some(pb::action_data::Action::Input(pb::WaitForUserAction {
            requires_wake_word: false,
            immediate: true,
        })),
    }
}

pub fn command(id: &str, state_id: &str) -> pb::ActionData {
    pb::ActionData {
        action: Some(pb::action_data::Action::Command(pb::CommandAction {
            id: id.to_string(),
            input_parameters: std::collections::HashMap::new(),
            state_id: state_id.to_string(),
        })),
    }
}

pub fn transcribe(id: &str) -> pb::ActionData {
    pb::ActionData {
        action: Some(pb::action_data::Action::Transcribe(pb::TranscribeAction {
            id: id.to_string(),
            cubic_model_id: "cubic-en".to_string(),
            diatheke_model_id: "model-A".to_string(),
        })),
    }
}

impl MockTransport {
    pub fn new() -> Self {
        let mock = Self::default();
        mock.inner().models = vec!["model-A".to_string()];
        mock.inner().initial = vec![input_needed()];
        mock
    }

    pub fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("mock state poisoned")
    }

    /// Queue the action batch returned by the next accepted update.
    pub fn then(&self, actions: Vec<pb::ActionData>) -> &Self {
        self.inner().script.push_back(actions);
        self
    }
}

impl Transport for MockTransport {
    fn version(&self) -> BoxFuture<'_, diatheke::Result<pb::VersionResponse>> {
        Box::pin(async {
            Ok(pb::VersionResponse {
                diatheke: "3.0.0".to_string(),
                chosun: "1.0.0".to_string(),
                cubic: "2.0.0".to_string(),
                luna: "1.1.0".to_string(),
            })
        })
    }

    fn list_models(&self) -> BoxFuture<'_, diatheke::Result<pb::ListModelsResponse>> {
        let models = self
            .inner()
            .models
            .iter()
            .map(|id| pb::ModelInfo {
                id: id.clone(),
                name: format!("{id} model"),
                language: "en_US".to_string(),
                asr_sample_rate: 16_000,
                tts_sample_rate: 22_050,
            })
            .collect();
        Box::pin(async move { Ok(pb::ListModelsResponse { models }) })
    }

    fn create_session(&self, start: pb::SessionStart) -> BoxFuture<'_, diatheke::Result<pb::SessionOutput>> {
        let mut inner = self.inner();
        inner.starts.push(start.clone());
        let result = if inner.models.contains(&start.model_id) {
            inner.generation = 0;
            Ok(pb::SessionOutput {
                token: Some(token(0)),
                action_list: inner.initial.clone(),
            })
        } else {
            Err(Error::from_status(Operation::CreateSession, Status::not_found(start.model_id)))
        };
        Box::pin(async move { result })
    }

    fn delete_session(&self, token: pb::TokenData) -> BoxFuture<'_, diatheke::Result<()>> {
        self.inner().deleted.push(token);
        Box::pin(async { Ok(()) })
    }

    fn update_session(&self, input: pb::SessionInput) -> BoxFuture<'_, diatheke::Result<pb::SessionOutput>> {
        let mut inner = self.inner();
        inner.updates.push(input.clone());
        let result = if let Some(status) = inner.fail_next_update.take() {
            Err(Error::from_status(Operation::UpdateSession, status))
        } else if input.token != Some(token(inner.generation)) {
            Err(Error::from_status(
                Operation::UpdateSession,
                Status::failed_precondition("token superseded"),
            ))
        } else {
            inner.generation += 1;
            Ok(pb::SessionOutput {
                token: Some(token(inner.generation)),
                action_list: inner.script.pop_front().unwrap_or_default(),
            })
        };
        Box::pin(async move { result })
    }

    fn stream_asr(
        &self,
        mut input: mpsc::Receiver<pb::AsrInput>,
    ) -> BoxFuture<'static, diatheke::Result<pb::AsrResult>> {
        let inner = Arc::clone(&self.inner);
        let (failure, early) = {
            let mut state = self.inner();
            (state.asr_failure.take(), state.asr_finalizes_early)
        };
        Box::pin(async move {
            if let Some(status) = failure {
                return Err(Error::from_status(Operation::StreamAsr, status));
            }
            let mut received = Vec::new();
            while let Some(message) = input.next().await {
                let audio = matches!(message.data, Some(pb::asr_input::Data::Audio(_)));
                received.push(message);
                if audio && early {
                    break;
                }
            }
            let mut state = inner.lock().expect("mock state poisoned");
            state.asr_inputs.extend(received);
            Ok(state.asr_result.clone())
        })
    }

    fn stream_tts(
        &self,
        _reply: pb::ReplyAction,
    ) -> BoxFuture<'static, diatheke::Result<BoxStream<'static, diatheke::Result<pb::TtsAudio>>>> {
        let inner = self.inner();
        let chunks: Vec<diatheke::Result<pb::TtsAudio>> = inner
            .tts_audio
            .iter()
            .map(|audio| Ok(pb::TtsAudio { audio: audio.clone() }))
            .collect();
        let hangs = inner.tts_hangs;
        drop(inner);
        Box::pin(async move {
            let audio = futures::stream::iter(chunks);
            if hangs {
                Ok(audio.chain(futures::stream::pending()).boxed())
            } else {
                Ok(audio.boxed())
            }
        })
    }

    fn transcribe(
        &self,
        mut input: mpsc::Receiver<pb::TranscribeInput>,
    ) -> BoxFuture<'static, diatheke::Result<BoxStream<'static, diatheke::Result<pb::TranscribeResult>>>> {
        let inner = Arc::clone(&self.inner);
        let (failure, stops_after) = {
            let mut state = self.inner();
            (state.transcribe_failure.take(), state.transcribe_stops_after)
        };
        Box::pin(async move {
            if let Some(status) = failure {
                return Err(Error::from_status(Operation::Transcribe, status));
            }
            let (tx, rx) = futures::channel::mpsc::unbounded();
            tokio::spawn(async move {
                let mut heard = Vec::new();
                let mut chunks = 0;
                while let Some(message) = input.next().await {
                    if let Some(pb::transcribe_input::Data::Audio(audio)) = &message.data {
                        heard.extend_from_slice(audio);
                        chunks += 1;
                        let _ = tx.unbounded_send(Ok(pb::TranscribeResult {
                            text: format!("partial {}", heard.len()),
                            confidence: 0.5,
                            is_partial: true,
                        }));
                    }
                    inner.lock().expect("mock state poisoned").transcribe_inputs.push(message);
                    if stops_after.is_some_and(|limit| chunks >= limit) {
                        let _ = tx.unbounded_send(Ok(final_transcript(&heard)));
                        drop(tx);
                        std::future::pending::<()>().await;
                        return;
                    }
                }
                let _ = tx.unbounded_send(Ok(final_transcript(&heard)));
            });
            Ok(rx.boxed())
        })
    }
}

fn final_transcript(heard: &[u8]) -> pb::TranscribeResult {
    pb::TranscribeResult {
        text: String::from_utf8_lossy(heard).into_owned(),
        confidence: 0.9,
        is_partial: false,
    }
}
