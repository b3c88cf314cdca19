//! Runtime configuration.
//!
//! Built once at startup from environment variables and shared read-only
//! afterwards. Handlers never consult the environment themselves.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_RAILWAY_API_URL: &str = "https://backboard.railway.app/graphql/v2";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("JARVIS_UPDATE_CODE_ENABLED is set but JARVIS_WRITABLE_PATHS is empty")]
    EmptyAllowList,
}

#[derive(Clone)]
pub struct ChatSettings {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    /// Try free-text command routing before calling the chat collaborator.
    pub dispatch_first: bool,
}

#[derive(Clone)]
pub struct RedeployCredentials {
    pub api_url: String,
    pub api_token: String,
    pub project_id: String,
    pub service_id: String,
}

#[derive(Clone)]
pub struct UpdateCodeSettings {
    pub writable_paths: Vec<PathBuf>,
    pub redeploy: RedeployCredentials,
}

#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub shared_secret: String,
    pub chat: ChatSettings,
    pub http_timeout: Duration,
    pub interaction_log_path: Option<PathBuf>,
    /// `None` keeps `/update-code` unmounted.
    pub update_code: Option<UpdateCodeSettings>,
}

// Secrets stay out of debug output.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_base", &self.chat.api_base)
            .field("model", &self.chat.model)
            .field("dispatch_first", &self.chat.dispatch_first)
            .field("http_timeout", &self.http_timeout)
            .field("interaction_log_path", &self.interaction_log_path)
            .field(
                "writable_paths",
                &self.update_code.as_ref().map(|u| &u.writable_paths),
            )
            .finish_non_exhaustive()
    }
}

pub fn parse_bool_env(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let port = match get("APP_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "APP_PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match get("JARVIS_HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "JARVIS_HTTP_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        let chat = ChatSettings {
            api_key: require("OPENAI_API_KEY")?,
            api_base: get("OPENAI_API_BASE")
                .map(|b| b.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_OPENAI_API_BASE.to_string()),
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            dispatch_first: get("JARVIS_CHAT_DISPATCH_FIRST")
                .map(|v| parse_bool_env(&v))
                .unwrap_or(false),
        };

        let update_enabled = get("JARVIS_UPDATE_CODE_ENABLED")
            .map(|v| parse_bool_env(&v))
            .unwrap_or(false);
        let update_code = if update_enabled {
            let writable_paths: Vec<PathBuf> = get("JARVIS_WRITABLE_PATHS")
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
                .collect();
            if writable_paths.is_empty() {
                return Err(ConfigError::EmptyAllowList);
            }
            Some(UpdateCodeSettings {
                writable_paths,
                redeploy: RedeployCredentials {
                    api_url: get("RAILWAY_API_URL")
                        .unwrap_or_else(|| DEFAULT_RAILWAY_API_URL.to_string()),
                    api_token: require("RAILWAY_API_TOKEN")?,
                    project_id: require("RAILWAY_PROJECT_ID")?,
                    service_id: require("RAILWAY_SERVICE_ID")?,
                },
            })
        } else {
            None
        };

        Ok(Config {
            host: get("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            shared_secret: require("JARVIS_SECRET")?,
            chat,
            http_timeout: Duration::from_secs(timeout_secs),
            interaction_log_path: get("JARVIS_LOG_FILE").map(PathBuf::from),
            update_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("JARVIS_SECRET", "s3cret"),
        ("OPENAI_API_KEY", "sk-test"),
    ];

    #[test]
    fn parse_bool_env_values() {
        for value in ["1", "true", "TRUE", " yes ", "Y", "on"] {
            assert!(parse_bool_env(value), "value {value:?} should be true");
        }
        for value in ["0", "false", "no", "off", "", "  "] {
            assert!(!parse_bool_env(value), "value {value:?} should be false");
        }
    }

    #[test]
    fn defaults_apply_when_only_required_values_present() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.shared_secret, "s3cret");
        assert_eq!(config.chat.model, "gpt-4");
        assert_eq!(config.chat.api_base, DEFAULT_OPENAI_API_BASE);
        assert!(!config.chat.dispatch_first);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert!(config.interaction_log_path.is_none());
        assert!(config.update_code.is_none());
    }

    #[test]
    fn missing_secret_fails_fast() {
        let err = Config::from_lookup(lookup(&[("OPENAI_API_KEY", "sk")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JARVIS_SECRET"));

        let err = Config::from_lookup(lookup(&[("JARVIS_SECRET", "  "), ("OPENAI_API_KEY", "sk")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("JARVIS_SECRET"));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("APP_PORT", "eighty"));
        assert!(matches!(
            Config::from_lookup(lookup(&pairs)),
            Err(ConfigError::Invalid { name: "APP_PORT", .. })
        ));
    }

    #[test]
    fn timeout_must_be_a_positive_number() {
        for raw in ["0", "abc", "-5"] {
            let mut pairs = REQUIRED.to_vec();
            pairs.push(("JARVIS_HTTP_TIMEOUT_SECS", raw));
            assert!(
                matches!(
                    Config::from_lookup(lookup(&pairs)),
                    Err(ConfigError::Invalid { name: "JARVIS_HTTP_TIMEOUT_SECS", .. })
                ),
                "timeout {raw:?} should be rejected"
            );
        }

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("JARVIS_HTTP_TIMEOUT_SECS", " 5 "));
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn update_code_requires_allow_list_and_credentials() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("JARVIS_UPDATE_CODE_ENABLED", "true"));
        assert_eq!(
            Config::from_lookup(lookup(&pairs)).unwrap_err(),
            ConfigError::EmptyAllowList
        );

        pairs.push(("JARVIS_WRITABLE_PATHS", "app.rs, static/index.html ,"));
        assert_eq!(
            Config::from_lookup(lookup(&pairs)).unwrap_err(),
            ConfigError::Missing("RAILWAY_API_TOKEN")
        );

        pairs.extend([
            ("RAILWAY_API_TOKEN", "tok"),
            ("RAILWAY_PROJECT_ID", "proj"),
            ("RAILWAY_SERVICE_ID", "svc"),
        ]);
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        let update = config.update_code.unwrap();
        assert_eq!(
            update.writable_paths,
            vec![PathBuf::from("app.rs"), PathBuf::from("static/index.html")]
        );
        assert_eq!(update.redeploy.api_url, DEFAULT_RAILWAY_API_URL);
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("sk-test"));
    }
}
