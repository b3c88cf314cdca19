//! `/update-code`: overwrite an allow-listed file, then redeploy.
//!
//! Only mounted when the capability is switched on in configuration.

use actix_web::{web, HttpRequest, HttpResponse};
use jarvis_core::{Arguments, CommandResult, LogEntry};
use serde_json::json;

use super::{requester, RELAY_NAME};
use crate::{
    dto::{parse_json_body, UpdateCodeRequest, UpdateCodeResponse, UPDATED},
    error::AppError,
    middleware::verify_shared_secret,
    server::AppState,
};

pub const UPDATE_CODE_INTENT: &str = "update_code";

async fn update_code(
    req: HttpRequest,
    body: web::Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    verify_shared_secret(&req, &app_state.config.shared_secret)?;

    let (Some(updater), Some(redeploy)) = (&app_state.code_updater, &app_state.redeploy) else {
        return Ok(HttpResponse::NotFound().finish());
    };

    let payload: UpdateCodeRequest = serde_json::from_value(parse_json_body(&body)?)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let file = payload
        .file
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Missing 'file' in request.".to_string()))?;
    let code = payload
        .code
        .ok_or_else(|| AppError::Validation("Missing 'code' in request.".to_string()))?;

    let target = updater.authorize(&file).await?;
    updater.write(&target, &code).await?;

    let mut args = Arguments::new();
    args.insert("file".to_string(), json!(file));
    args.insert("bytes".to_string(), json!(code.len()));
    app_state
        .record(LogEntry::now(
            requester(&req),
            RELAY_NAME,
            UPDATE_CODE_INTENT,
            args,
            CommandResult::succeeded(format!("Updated {}", file)),
        ))
        .await;

    let redeploy_result = redeploy.redeploy().await.map_err(|e| {
        tracing::error!(error = %e, "Redeploy failed after file update");
        AppError::redeploy(e)
    })?;

    Ok(HttpResponse::Ok().json(UpdateCodeResponse {
        status: UPDATED.to_string(),
        file,
        redeploy_result,
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/update-code").route(web::post().to(update_code)));
}
