use super::actions::{Action, Params};
use super::audio::AsrResult;
use super::command::CommandStatus;
use super::token::SessionToken;
use crate::protocol::pb;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Switches the session to a named story (sub-flow of the dialog model).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SetStory {
    pub story_id: String,
    #[serde(default)]
    pub params: Params,
}

impl SetStory {
    #[must_use]
    pub fn new(story_id: impl Into<String>) -> Self {
        Self {
            story_id: story_id.into(),
            params: Params::new(),
        }
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// The input that advances a session. Exactly one kind per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionInput {
    Text { text: String },
    Recognition(AsrResult),
    Command(CommandStatus),
    Story(SetStory),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    Text,
    Recognition,
    Command,
    Story,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Recognition => "recognition result",
            Self::Command => "command result",
            Self::Story => "story change",
        };
        f.write_str(name)
    }
}

impl SessionInput {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    #[must_use]
    pub const fn kind(&self) -> InputKind {
        match self {
            Self::Text { .. } => InputKind::Text,
            Self::Recognition(_) => InputKind::Recognition,
            Self::Command(_) => InputKind::Command,
            Self::Story(_) => InputKind::Story,
        }
    }

    /// Local checks that do not depend on session state.
    ///
    /// # Errors
    /// Returns `InvalidInput` for a command result without a command id or a
    /// story change without a story id.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Command(status) if status.command_id.is_empty() => Err(Error::InvalidInput(
                "command result requires the command id of its action".to_string(),
            )),
            Self::Story(story) if story.story_id.is_empty() => {
                Err(Error::InvalidInput("story change requires a story id".to_string()))
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn into_pb(self, token: &SessionToken) -> pb::SessionInput {
        let input = match self {
            Self::Text { text } => pb::session_input::Input::Text(pb::TextInput { text }),
            Self::Recognition(result) => pb::session_input::Input::Asr(result.into()),
            Self::Command(status) => pb::session_input::Input::Cmd(status.into_pb()),
            Self::Story(story) => pb::session_input::Input::Story(pb::SetStory {
                story_id: story.story_id,
                parameters: story.params,
            }),
        };
        pb::SessionInput {
            token: Some(token.into()),
            input: Some(input),
        }
    }

    /// Split a raw protobuf input into its token and typed input.
    ///
    /// # Errors
    /// Returns `InvalidInput` when the token or the input oneof is unset.
    pub fn from_pb(raw: pb::SessionInput) -> Result<(SessionToken, Self)> {
        let token = raw
            .token
            .ok_or_else(|| Error::InvalidInput("session input has no token".to_string()))?;
        let input = match raw.input {
            Some(pb::session_input::Input::Text(text)) => Self::Text { text: text.text },
            Some(pb::session_input::Input::Asr(result)) => Self::Recognition(result.into()),
            Some(pb::session_input::Input::Cmd(result)) => Self::Command(CommandStatus::from_pb(result)),
            Some(pb::session_input::Input::Story(story)) => Self::Story(SetStory {
                story_id: story.story_id,
                params: story.parameters,
            }),
            None => {
                return Err(Error::InvalidInput(
                    "session input must carry exactly one of text, asr, cmd or story".to_string(),
                ));
            }
        };
        Ok((token.into(), input))
    }
}

/// A refreshed token and the ordered actions to perform next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOutput {
    pub token: SessionToken,
    pub actions: Vec<Action>,
}

impl SessionOutput {
    /// Whether this output terminates the session.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.actions.iter().any(|action| matches!(action, Action::SessionEnd))
    }
}

impl TryFrom<pb::SessionOutput> for SessionOutput {
    type Error = Error;

    fn try_from(raw: pb::SessionOutput) -> Result<Self> {
        let token = raw
            .token
            .ok_or_else(|| Error::InvalidInput("server returned a session output without a token".to_string()))?;
        Ok(Self {
            token: token.into(),
            actions: Action::list_from_pb(raw.action_list),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> SessionToken {
        SessionToken::new(vec![9u8], "sess")
    }

    #[test]
    fn raw_input_without_oneof_is_invalid() {
        let raw = pb::SessionInput {
            token: Some(token().into()),
            input: None,
        };
        let err = SessionInput::from_pb(raw).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn raw_input_with_text_converts() {
        let raw = SessionInput::text("hello").into_pb(&token());
        let (tok, input) = SessionInput::from_pb(raw).unwrap();
        assert_eq!(tok, token());
        assert_eq!(input, SessionInput::text("hello"));
    }

    #[test]
    fn empty_story_id_is_invalid() {
        let err = SessionInput::Story(SetStory::new("")).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn output_without_token_is_invalid() {
        let raw = pb::SessionOutput {
            token: None,
            action_list: Vec::new(),
        };
        assert!(SessionOutput::try_from(raw).is_err());
    }

    #[test]
    fn input_serializes_with_type_tag() {
        let json = serde_json::to_value(SessionInput::text("hi")).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "text", "text": "hi" }));
    }
}
