use actix_web::{web, HttpResponse};
use jarvis_core::LogEntry;

use crate::{error::AppError, server::AppState};

async fn get_logs(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let entries: Vec<LogEntry> = match &app_state.interaction_log {
        Some(log) => log
            .recent()
            .await
            .map_err(|e| AppError::Logging(e.to_string()))?,
        None => Vec::new(),
    };
    Ok(HttpResponse::Ok().json(entries))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/logs").route(web::get().to(get_logs)));
}
