use std::time::Duration;

use async_trait::async_trait;
use jarvis_core::config::RedeployCredentials;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RedeployError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("redeploy request timed out")]
    Timeout,

    #[error("redeploy API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("redeploy API rejected the request: {0}")]
    Rejected(String),
}

/// Asks the hosting platform to restart the service.
#[async_trait]
pub trait RedeployTrigger: Send + Sync {
    async fn redeploy(&self) -> Result<Value, RedeployError>;
}

const REDEPLOY_MUTATION: &str = concat!(
    "mutation Redeploy($projectId: String!, $serviceId: String!) { ",
    "serviceInstanceRedeploy(projectId: $projectId, serviceId: $serviceId) }"
);

pub struct RailwayRedeployTrigger {
    client: reqwest::Client,
    credentials: RedeployCredentials,
    timeout: Duration,
}

impl RailwayRedeployTrigger {
    pub fn new(credentials: RedeployCredentials, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            timeout,
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn body(&self) -> Value {
        json!({
            "query": REDEPLOY_MUTATION,
            "variables": {
                "projectId": self.credentials.project_id,
                "serviceId": self.credentials.service_id,
            }
        })
    }
}

fn map_send_error(err: reqwest::Error) -> RedeployError {
    if err.is_timeout() {
        RedeployError::Timeout
    } else {
        RedeployError::Http(err)
    }
}

#[async_trait]
impl RedeployTrigger for RailwayRedeployTrigger {
    async fn redeploy(&self) -> Result<Value, RedeployError> {
        tracing::info!(
            service_id = %self.credentials.service_id,
            "Triggering redeploy"
        );

        let response = self
            .client
            .post(&self.credentials.api_url)
            .bearer_auth(&self.credentials.api_token)
            .timeout(self.timeout)
            .json(&self.body())
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_send_error)?;
        if !status.is_success() {
            return Err(RedeployError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let value: Value = serde_json::from_str(&text).unwrap_or(Value::String(text));
        if let Some(errors) = value.get("errors").filter(|e| !e.is_null()) {
            return Err(RedeployError::Rejected(errors.to_string()));
        }
        Ok(value)
    }
}
