pub mod actions;
pub mod audio;
pub mod command;
pub mod common;
pub mod session;
pub mod token;

pub use actions::{
    Action, ActionKind, CommandAction, Params, ReplyAction, TranscribeAction, WaitForInput,
};
pub use audio::{AsrResult, TranscribeResult};
pub use command::{CommandStatus, StatusCode};
pub use common::{ModelInfo, VersionInfo};
pub use session::{InputKind, SessionInput, SessionOutput, SetStory};
pub use token::SessionToken;
