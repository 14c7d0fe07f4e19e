use crate::protocol::pb;
use serde::{Deserialize, Serialize};

/// Final result of a recognition stream.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AsrResult {
    pub text: String,
    #[serde(default)]
    pub confidence: f64,
    /// The server stopped listening because no speech arrived in time.
    #[serde(default)]
    pub timed_out: bool,
}

impl AsrResult {
    #[must_use]
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            confidence,
            timed_out: false,
        }
    }
}

impl From<pb::AsrResult> for AsrResult {
    fn from(result: pb::AsrResult) -> Self {
        Self {
            text: result.text,
            confidence: result.confidence,
            timed_out: result.timed_out,
        }
    }
}

impl From<AsrResult> for pb::AsrResult {
    fn from(result: AsrResult) -> Self {
        Self {
            text: result.text,
            confidence: result.confidence,
            timed_out: result.timed_out,
        }
    }
}

/// Partial or final result of a transcription stream.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TranscribeResult {
    pub text: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub is_partial: bool,
}

impl From<pb::TranscribeResult> for TranscribeResult {
    fn from(result: pb::TranscribeResult) -> Self {
        Self {
            text: result.text,
            confidence: result.confidence,
            is_partial: result.is_partial,
        }
    }
}
