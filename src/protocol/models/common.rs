use crate::protocol::pb;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Versions of the dialog server and the engines it drives.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VersionInfo {
    pub diatheke: String,
    /// NLU engine.
    #[serde(default)]
    pub chosun: String,
    /// ASR engine.
    #[serde(default)]
    pub cubic: String,
    /// TTS engine.
    #[serde(default)]
    pub luna: String,
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "diatheke {} (chosun {}, cubic {}, luna {})",
            self.diatheke, self.chosun, self.cubic, self.luna
        )
    }
}

impl From<pb::VersionResponse> for VersionInfo {
    fn from(version: pb::VersionResponse) -> Self {
        Self {
            diatheke: version.diatheke,
            chosun: version.chosun,
            cubic: version.cubic,
            luna: version.luna,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub language: String,
    /// Sample rate (Hz) the recognizer expects for this model.
    #[serde(default)]
    pub asr_sample_rate: u32,
    /// Sample rate (Hz) of synthesized audio for this model.
    #[serde(default)]
    pub tts_sample_rate: u32,
}

impl From<pb::ModelInfo> for ModelInfo {
    fn from(model: pb::ModelInfo) -> Self {
        Self {
            id: model.id,
            name: model.name,
            language: model.language,
            asr_sample_rate: model.asr_sample_rate,
            tts_sample_rate: model.tts_sample_rate,
        }
    }
}
