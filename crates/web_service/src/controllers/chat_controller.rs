use actix_web::{web, HttpResponse};
use jarvis_core::{Arguments, Outcome};
use jarvis_llm::jarvis_messages;
use serde_json::Value;

use crate::{
    dto::{parse_json_body, ChatResponse},
    error::AppError,
    server::AppState,
};

pub const MISSING_MESSAGE: &str = "Missing 'message' in request.";

async fn chat(body: web::Bytes, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let payload = parse_json_body(&body)?;
    let message = payload
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::Validation(MISSING_MESSAGE.to_string()))?;

    if app_state.config.chat.dispatch_first {
        let result = app_state.router.commands.dispatch(message, &Arguments::new());
        if result.outcome != Outcome::Unknown {
            tracing::info!(outcome = ?result.outcome, "Chat message matched a command");
            return Ok(HttpResponse::Ok().json(ChatResponse {
                response: format!("✅ Executed: {}", result.status),
            }));
        }
    }

    let reply = app_state
        .chat_provider
        .complete(&jarvis_messages(message))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Chat completion failed");
            AppError::chat(e)
        })?;

    Ok(HttpResponse::Ok().json(ChatResponse { response: reply }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/chat").route(web::post().to(chat)));
}
