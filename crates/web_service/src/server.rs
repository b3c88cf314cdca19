use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use jarvis_core::{CommandRouter, Config, LogEntry};
use jarvis_llm::{ChatCompletionProvider, OpenAIChatClient};
use log::{error, info};

use crate::controllers::{
    chat_controller, logs_controller, relay_controller, system_controller, update_code_controller,
};
use crate::middleware::TracingMiddleware;
use crate::services::{CodeUpdater, InteractionLog, RailwayRedeployTrigger, RedeployTrigger};

pub struct AppState {
    pub config: Arc<Config>,
    pub router: CommandRouter,
    pub chat_provider: Arc<dyn ChatCompletionProvider>,
    pub interaction_log: Option<Arc<InteractionLog>>,
    pub code_updater: Option<CodeUpdater>,
    pub redeploy: Option<Arc<dyn RedeployTrigger>>,
}

impl AppState {
    /// Wire up the real collaborators described by `config`.
    pub fn from_config(config: Arc<Config>) -> Self {
        let chat_provider: Arc<dyn ChatCompletionProvider> = Arc::new(
            OpenAIChatClient::new(config.chat.api_key.clone())
                .with_base_url(config.chat.api_base.clone())
                .with_model(config.chat.model.clone())
                .with_timeout(config.http_timeout),
        );

        let interaction_log = config
            .interaction_log_path
            .as_ref()
            .map(|path| Arc::new(InteractionLog::new(path)));

        let (code_updater, redeploy) = match &config.update_code {
            Some(update) => {
                let trigger: Arc<dyn RedeployTrigger> = Arc::new(RailwayRedeployTrigger::new(
                    update.redeploy.clone(),
                    config.http_timeout,
                ));
                (
                    Some(CodeUpdater::new(update.writable_paths.clone())),
                    Some(trigger),
                )
            }
            None => (None, None),
        };

        Self {
            config,
            router: CommandRouter::default(),
            chat_provider,
            interaction_log,
            code_updater,
            redeploy,
        }
    }

    pub fn update_code_enabled(&self) -> bool {
        self.code_updater.is_some() && self.redeploy.is_some()
    }

    /// Best-effort append to the interaction log. Failures are reported to the
    /// operator and never reach the caller.
    pub async fn record(&self, entry: LogEntry) {
        let Some(log) = &self.interaction_log else {
            return;
        };
        if let Err(e) = log.append(entry).await {
            tracing::warn!(
                path = %log.path().display(),
                error = %e,
                "Failed to write interaction log entry"
            );
        }
    }
}

const DEFAULT_WORKER_COUNT: usize = 4;

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.configure(relay_controller::config)
        .configure(chat_controller::config)
        .configure(logs_controller::config)
        .configure(system_controller::config);
}

/// Routes that exist only when the file-update capability is switched on.
pub fn update_code_config(cfg: &mut web::ServiceConfig) {
    cfg.configure(update_code_controller::config);
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    let bind_addr = format!("{}:{}", config.host, config.port);
    let app_state = web::Data::new(AppState::from_config(Arc::new(config)));
    let update_enabled = app_state.update_code_enabled();

    if update_enabled {
        log::warn!(
            "/update-code is enabled: callers holding the shared secret can overwrite \
             allow-listed files"
        );
    }
    if app_state.interaction_log.is_none() {
        info!("Interaction log disabled (JARVIS_LOG_FILE not set)");
    }

    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(app_state.clone())
            .wrap(Cors::permissive())
            .wrap(TracingMiddleware)
            .configure(app_config);
        if update_enabled {
            app.configure(update_code_config)
        } else {
            app
        }
    })
    .workers(DEFAULT_WORKER_COUNT)
    .bind(&bind_addr)
    .with_context(|| format!("Failed to bind server to {bind_addr}"))?
    .run();

    info!("Starting Jarvis relay on http://{bind_addr}");

    if let Err(e) = server.await {
        error!("Web server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
