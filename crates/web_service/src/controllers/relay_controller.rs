use actix_web::{web, HttpRequest, HttpResponse};
use jarvis_core::{CommandRequest, LogEntry};

use super::{requester, RELAY_NAME};
use crate::{
    dto::{parse_json_body, RelayResponse},
    error::AppError,
    middleware::verify_shared_secret,
    server::AppState,
};

/// Authenticate, dispatch, log, respond. The body is read raw so the secret
/// is checked before anything about the payload is.
async fn relay(
    req: HttpRequest,
    body: web::Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    verify_shared_secret(&req, &app_state.config.shared_secret)?;

    let payload = parse_json_body(&body)?;
    let request =
        CommandRequest::from_json(&payload).map_err(|e| AppError::Validation(e.to_string()))?;

    let result = app_state.router.dispatch_request(&request);
    tracing::info!(
        selector = request.selector.as_str(),
        outcome = ?result.outcome,
        "Relay command dispatched"
    );

    app_state
        .record(LogEntry::now(
            requester(&req),
            RELAY_NAME,
            request.selector.as_str(),
            request.args,
            result.clone(),
        ))
        .await;

    Ok(HttpResponse::Ok().json(RelayResponse::received(result)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/relay").route(web::post().to(relay)));
}
