use super::actions::{CommandAction, Params};
use crate::protocol::pb;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
    Success,
    #[default]
    Failure,
}

impl From<StatusCode> for pb::command_result::Status {
    fn from(code: StatusCode) -> Self {
        match code {
            StatusCode::Success => Self::Success,
            StatusCode::Failure => Self::Failure,
        }
    }
}

/// Client report of an executed command, correlated to the `CommandAction`
/// that triggered it.
///
/// `command_id` and `state_id` must be copied unchanged from the action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandStatus {
    pub command_id: String,
    #[serde(default)]
    pub state_id: String,
    #[serde(default)]
    pub status: StatusCode,
    #[serde(default)]
    pub params: Params,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl CommandStatus {
    /// Build a status for `action`. Identifiers and input parameters are copied
    /// from the action; the status stays `Failure` until marked otherwise.
    #[must_use]
    pub fn for_action(action: &CommandAction) -> Self {
        Self {
            command_id: action.id.clone(),
            state_id: action.state_id.clone(),
            status: StatusCode::Failure,
            params: action.params.clone(),
            error_message: None,
        }
    }

    #[must_use]
    pub fn new(command_id: impl Into<String>, state_id: impl Into<String>) -> Self {
        Self {
            command_id: command_id.into(),
            state_id: state_id.into(),
            status: StatusCode::Failure,
            params: Params::new(),
            error_message: None,
        }
    }

    /// Set an output parameter. Integers and floats are stored in their
    /// decimal string form.
    pub fn set_param(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set_param(key, value);
        self
    }

    #[must_use]
    pub fn succeeded(mut self) -> Self {
        self.status = StatusCode::Success;
        self.error_message = None;
        self
    }

    #[must_use]
    pub fn failed(mut self, message: impl Into<String>) -> Self {
        self.status = StatusCode::Failure;
        self.error_message = Some(message.into());
        self
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, StatusCode::Success)
    }

    /// Whether both correlation identifiers equal the action's.
    #[must_use]
    pub fn matches(&self, action: &CommandAction) -> bool {
        self.command_id == action.id && self.state_id == action.state_id
    }

    pub(crate) fn into_pb(self) -> pb::CommandResult {
        let mut result = pb::CommandResult {
            id: self.command_id,
            out_parameters: self.params,
            error: self.error_message.unwrap_or_default(),
            state_id: self.state_id,
            status: 0,
        };
        result.set_status(self.status.into());
        result
    }

    pub(crate) fn from_pb(result: pb::CommandResult) -> Self {
        let status = match result.status() {
            pb::command_result::Status::Success => StatusCode::Success,
            pb::command_result::Status::Failure => StatusCode::Failure,
        };
        Self {
            command_id: result.id,
            state_id: result.state_id,
            status,
            params: result.out_parameters,
            error_message: (!result.error.is_empty()).then_some(result.error),
        }
    }
}
