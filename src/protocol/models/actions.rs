use crate::protocol::pb;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// String parameters attached to commands and stories. Order is irrelevant.
pub type Params = HashMap<String, String>;

/// Server-directed instruction for what the client should do next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Wait for the next user input (text, audio or a story change).
    InputNeeded(WaitForInput),
    /// Run an external command and report a `CommandStatus`.
    Command(CommandAction),
    /// Speak or display a reply.
    Reply(ReplyAction),
    /// Transcribe free-form speech and send the transcript back as text.
    Transcribe(TranscribeAction),
    /// Terminal: no further input is accepted.
    SessionEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    InputNeeded,
    Command,
    Reply,
    Transcribe,
    SessionEnd,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InputNeeded => "input-needed",
            Self::Command => "command",
            Self::Reply => "reply",
            Self::Transcribe => "transcribe",
            Self::SessionEnd => "session-end",
        };
        f.write_str(name)
    }
}

impl Action {
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::InputNeeded(_) => ActionKind::InputNeeded,
            Self::Command(_) => ActionKind::Command,
            Self::Reply(_) => ActionKind::Reply,
            Self::Transcribe(_) => ActionKind::Transcribe,
            Self::SessionEnd => ActionKind::SessionEnd,
        }
    }

    /// Replies are executed in place; every other action needs an answer (or
    /// ends the session) before the batch can move on.
    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        !matches!(self, Self::Reply(_))
    }

    /// Convert a wire action list. An empty list means the server ended the
    /// session.
    pub(crate) fn list_from_pb(list: Vec<pb::ActionData>) -> Vec<Self> {
        if list.is_empty() {
            return vec![Self::SessionEnd];
        }
        list.into_iter()
            .filter_map(|data| {
                let action = data.action.map(Self::from);
                if action.is_none() {
                    tracing::warn!("Skipping action with no recognized payload");
                }
                action
            })
            .collect()
    }
}

impl From<pb::action_data::Action> for Action {
    fn from(action: pb::action_data::Action) -> Self {
        match action {
            pb::action_data::Action::Input(wait) => Self::InputNeeded(wait.into()),
            pb::action_data::Action::Command(cmd) => Self::Command(cmd.into()),
            pb::action_data::Action::Reply(reply) => Self::Reply(reply.into()),
            pb::action_data::Action::Transcribe(transcribe) => Self::Transcribe(transcribe.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WaitForInput {
    /// The user must say the session wakeword before the input counts.
    #[serde(default)]
    pub requires_wake_word: bool,
    /// Input should be gathered right away (e.g. a follow-up question)
    /// rather than whenever the user chooses to speak.
    #[serde(default)]
    pub immediate: bool,
}

impl From<pb::WaitForUserAction> for WaitForInput {
    fn from(wait: pb::WaitForUserAction) -> Self {
        Self {
            requires_wake_word: wait.requires_wake_word,
            immediate: wait.immediate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommandAction {
    pub id: String,
    #[serde(default)]
    pub state_id: String,
    #[serde(default)]
    pub params: Params,
}

impl From<pb::CommandAction> for CommandAction {
    fn from(cmd: pb::CommandAction) -> Self {
        Self {
            id: cmd.id,
            state_id: cmd.state_id,
            params: cmd.input_parameters,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReplyAction {
    pub text: String,
    /// Synthesis model to voice the reply with.
    #[serde(default)]
    pub luna_model: String,
}

impl ReplyAction {
    #[must_use]
    pub fn new(text: impl Into<String>, luna_model: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            luna_model: luna_model.into(),
        }
    }
}

impl From<pb::ReplyAction> for ReplyAction {
    fn from(reply: pb::ReplyAction) -> Self {
        Self {
            text: reply.text,
            luna_model: reply.luna_model,
        }
    }
}

impl From<ReplyAction> for pb::ReplyAction {
    fn from(reply: ReplyAction) -> Self {
        Self {
            text: reply.text,
            luna_model: reply.luna_model,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TranscribeAction {
    pub id: String,
    pub cubic_model_id: String,
    #[serde(default)]
    pub diatheke_model_id: String,
}

impl From<pb::TranscribeAction> for TranscribeAction {
    fn from(action: pb::TranscribeAction) -> Self {
        Self {
            id: action.id,
            cubic_model_id: action.cubic_model_id,
            diatheke_model_id: action.diatheke_model_id,
        }
    }
}

impl From<TranscribeAction> for pb::TranscribeAction {
    fn from(action: TranscribeAction) -> Self {
        Self {
            id: action.id,
            cubic_model_id: action.cubic_model_id,
            diatheke_model_id: action.diatheke_model_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_wire_list_is_session_end() {
        assert_eq!(Action::list_from_pb(Vec::new()), vec![Action::SessionEnd]);
    }

    #[test]
    fn wire_list_keeps_order_and_skips_unknown() {
        let list = vec![
            pb::ActionData {
                action: Some(pb::action_data::Action::Reply(pb::ReplyAction {
                    text: "one".to_string(),
                    luna_model: String::new(),
                })),
            },
            pb::ActionData { action: None },
            pb::ActionData {
                action: Some(pb::action_data::Action::Input(pb::WaitForUserAction {
                    requires_wake_word: true,
                    immediate: false,
                })),
            },
        ];

        let actions = Action::list_from_pb(list);
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].kind(), ActionKind::Reply);
        assert_eq!(
            actions[1],
            Action::InputNeeded(WaitForInput { requires_wake_word: true, immediate: false })
        );
    }

    #[test]
    fn action_serializes_with_type_tag() {
        let action = Action::Reply(ReplyAction::new("hi there", "luna-en"));
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "reply", "text": "hi there", "luna_model": "luna-en" })
        );

        let end: Action = serde_json::from_value(serde_json::json!({ "type": "session_end" })).unwrap();
        assert_eq!(end, Action::SessionEnd);
    }
}
