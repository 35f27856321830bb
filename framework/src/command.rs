//! Command envelopes carried by queue messages.
//!
//! A message is a JSON object of the shape
//!
//! ```json
//! {
//!   "pattern": { "cmd": "active_user" },
//!   "data": {
//!     "email": "a@b.com",
//!     "activation_code": "123456",
//!     "template_name": "activation.html",
//!     "userName": "Ada"
//!   }
//! }
//! ```
//!
//! Parsing happens in three stages so each shape problem maps to its own
//! failure: the payload must be a JSON object, `pattern` must carry a string
//! `cmd`, and `data` must carry all four string fields. Unknown fields are
//! ignored at every level.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::worker::MessageError;

/// The routing half of an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Pattern {
    pub cmd: String,
}

/// The payload half of an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandData {
    pub email: String,
    pub activation_code: String,
    pub template_name: String,
    #[serde(rename = "userName")]
    pub user_name: String,
}

/// A fully validated command message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEnvelope {
    pub pattern: Pattern,
    pub data: CommandData,
}

impl CommandEnvelope {
    /// Decode and validate a raw payload.
    pub fn parse(payload: &[u8]) -> Result<Self, MessageError> {
        let mut object: serde_json::Map<String, serde_json::Value> =
            serde_json::from_slice(payload).map_err(MessageError::MalformedPayload)?;

        let pattern = object
            .remove("pattern")
            .ok_or_else(|| MessageError::InvalidPattern("missing field `pattern`".into()))
            .and_then(|value| match value {
                // Derived struct deserializers also accept sequences.
                value @ serde_json::Value::Object(_) => serde_json::from_value::<Pattern>(value)
                    .map_err(|e| MessageError::InvalidPattern(e.to_string())),
                _ => Err(MessageError::InvalidPattern("`pattern` must be an object".into())),
            })?;

        let data = object
            .remove("data")
            .ok_or_else(|| MessageError::InvalidData("missing field `data`".into()))
            .and_then(|value| match value {
                value @ serde_json::Value::Object(_) => serde_json::from_value::<CommandData>(value)
                    .map_err(|e| MessageError::InvalidData(e.to_string())),
                _ => Err(MessageError::InvalidData("`data` must be an object".into())),
            })?;

        Ok(Self { pattern, data })
    }

    /// Resolve `pattern.cmd` against the command table.
    pub fn kind(&self) -> Result<CommandKind, MessageError> {
        CommandKind::from_cmd(&self.pattern.cmd)
            .ok_or_else(|| MessageError::UnsupportedCommand(self.pattern.cmd.clone()))
    }

    /// Values exposed to the email template.
    pub fn template_data(&self) -> TemplateData {
        TemplateData {
            activation_code: self.data.activation_code.clone(),
            user_name: self.data.user_name.clone(),
        }
    }
}

/// Commands the worker knows how to turn into emails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    ActivateUser,
    ForgotPassword,
}

impl CommandKind {
    const ALL: [CommandKind; 2] = [CommandKind::ActivateUser, CommandKind::ForgotPassword];

    pub fn all() -> impl Iterator<Item = CommandKind> {
        Self::ALL.into_iter()
    }

    pub fn from_cmd(cmd: &str) -> Option<Self> {
        Self::all().find(|kind| kind.cmd() == cmd)
    }

    /// The `pattern.cmd` value for this command.
    pub fn cmd(self) -> &'static str {
        match self {
            Self::ActivateUser => "active_user",
            Self::ForgotPassword => "forgot_password",
        }
    }

    pub fn subject(self) -> &'static str {
        match self {
            Self::ActivateUser => "Account Activation",
            Self::ForgotPassword => "Password Reset",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cmd())
    }
}

/// View model handed to the template renderer.
///
/// Serializes as `ActivationCode` / `UserName`, the names templates use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateData {
    pub activation_code: String,
    pub user_name: String,
}
