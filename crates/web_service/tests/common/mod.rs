#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use actix_http::Request;
use actix_web::{
    dev::{Service, ServiceResponse},
    test, web, App, Error,
};
use async_trait::async_trait;
use jarvis_core::{CommandRouter, Config};
use jarvis_llm::{ChatCompletionProvider, ChatMessage, LLMError};
use web_service::services::{CodeUpdater, InteractionLog, RedeployTrigger};
use web_service::{app_config, update_code_config, AppState};

pub const SECRET: &str = "test-secret";

pub fn test_config(extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("JARVIS_SECRET".to_string(), SECRET.to_string()),
        ("OPENAI_API_KEY".to_string(), "sk-test".to_string()),
    ]);
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

/// Chat collaborator double that counts calls and records what it was sent.
pub struct MockChatProvider {
    pub calls: AtomicUsize,
    pub last_messages: std::sync::Mutex<Vec<ChatMessage>>,
    reply: Result<String, String>,
}

impl MockChatProvider {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last_messages: std::sync::Mutex::new(Vec::new()),
            reply: Ok(text.to_string()),
        })
    }

    pub fn failing(error: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last_messages: std::sync::Mutex::new(Vec::new()),
            reply: Err(error.to_string()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatCompletionProvider for MockChatProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> jarvis_llm::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_messages.lock().unwrap() = messages.to_vec();
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(e) => Err(LLMError::MalformedResponse(e.clone())),
        }
    }
}

pub fn state_with(config: Config, chat: Arc<MockChatProvider>, log: Option<&Path>) -> AppState {
    AppState {
        config: Arc::new(config),
        router: CommandRouter::default(),
        chat_provider: chat,
        interaction_log: log.map(|p| Arc::new(InteractionLog::new(p))),
        code_updater: None,
        redeploy: None,
    }
}

/// State with the default config, no interaction log and a chat double that
/// is never expected to be reached.
pub fn default_state() -> AppState {
    state_with(test_config(&[]), MockChatProvider::replying("unused"), None)
}

pub fn with_update_code(
    mut state: AppState,
    updater: CodeUpdater,
    trigger: Arc<dyn RedeployTrigger>,
) -> AppState {
    state.code_updater = Some(updater);
    state.redeploy = Some(trigger);
    state
}

pub async fn init_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse, Error = Error> {
    let enabled = state.update_code_enabled();
    let app = App::new()
        .app_data(web::Data::new(state))
        .configure(app_config);
    if enabled {
        test::init_service(app.configure(update_code_config)).await
    } else {
        test::init_service(app).await
    }
}
