pub mod chat_controller;
pub mod logs_controller;
pub mod relay_controller;
pub mod system_controller;
pub mod update_code_controller;

use actix_web::HttpRequest;

pub const REQUESTER_HEADER: &str = "X-Requester";
const DEFAULT_REQUESTER: &str = "controller";
/// Recorded as the `to` side of every log entry.
pub const RELAY_NAME: &str = "jarvis";

/// Who issued the request, for the interaction log.
pub(crate) fn requester(req: &HttpRequest) -> String {
    req.headers()
        .get(REQUESTER_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_REQUESTER)
        .to_string()
}
