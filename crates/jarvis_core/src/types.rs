use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Argument mapping handed to an action handler.
pub type Arguments = Map<String, Value>;

/// What the caller asked for: an exact intent name or a free-text command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Intent(String),
    Command(String),
}

impl Selector {
    pub fn as_str(&self) -> &str {
        match self {
            Selector::Intent(s) | Selector::Command(s) => s,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Missing 'intent' or 'command' in request.")]
    MissingSelector,

    #[error("'{0}' must be a string")]
    NotAString(&'static str),

    #[error("'args' must be a JSON object")]
    InvalidArguments,
}

/// A single relay request, built per HTTP call and dropped after the response.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandRequest {
    pub selector: Selector,
    pub args: Arguments,
}

impl CommandRequest {
    pub fn intent(name: impl Into<String>, args: Arguments) -> Self {
        Self {
            selector: Selector::Intent(name.into()),
            args,
        }
    }

    pub fn command(text: impl Into<String>, args: Arguments) -> Self {
        Self {
            selector: Selector::Command(text.into()),
            args,
        }
    }

    /// Parse `{"intent": ..., "args": {...}}` or `{"command": ..., "args": {...}}`.
    ///
    /// `intent` takes precedence when both keys are present. A missing or
    /// `null` `args` becomes an empty mapping.
    pub fn from_json(body: &Value) -> Result<Self, RequestError> {
        let args = match body.get("args") {
            None | Some(Value::Null) => Arguments::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(_) => return Err(RequestError::InvalidArguments),
        };

        let selector = match (body.get("intent"), body.get("command")) {
            (Some(v), _) if !v.is_null() => Selector::Intent(
                v.as_str()
                    .ok_or(RequestError::NotAString("intent"))?
                    .to_string(),
            ),
            (_, Some(v)) if !v.is_null() => Selector::Command(
                v.as_str()
                    .ok_or(RequestError::NotAString("command"))?
                    .to_string(),
            ),
            _ => return Err(RequestError::MissingSelector),
        };

        Ok(Self { selector, args })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Succeeded,
    Failed,
    Unknown,
}

/// Outcome of one dispatch attempt. Every dispatch yields one, including
/// unmatched selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    pub status: String,
    pub outcome: Outcome,
}

impl CommandResult {
    pub fn succeeded(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            outcome: Outcome::Succeeded,
        }
    }

    pub fn failed(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            outcome: Outcome::Failed,
        }
    }

    pub fn unknown(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            outcome: Outcome::Unknown,
        }
    }
}

/// One persisted relay interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub from: String,
    pub to: String,
    pub intent: String,
    #[serde(default)]
    pub args: Arguments,
    pub result: CommandResult,
}

impl LogEntry {
    pub fn now(
        from: impl Into<String>,
        to: impl Into<String>,
        intent: impl Into<String>,
        args: Arguments,
        result: CommandResult,
    ) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            from: from.into(),
            to: to.into(),
            intent: intent.into(),
            args,
            result,
        }
    }
}
