//! Request and response bodies for the HTTP surface.
use jarvis_core::CommandResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

pub const RECEIVED: &str = "received";
pub const UPDATED: &str = "updated";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RelayResponse {
    pub status: String,
    pub result: CommandResult,
}

impl RelayResponse {
    pub fn received(result: CommandResult) -> Self {
        Self {
            status: RECEIVED.to_string(),
            result,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct UpdateCodeRequest {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdateCodeResponse {
    pub status: String,
    pub file: String,
    pub redeploy_result: Value,
}

/// Parse a raw body as JSON. An empty body reads as `{}` so that field
/// validation produces the client-facing message.
pub fn parse_json_body(body: &[u8]) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Request body is not valid JSON: {e}")))
}
