use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "~/.request-bot/request-bot.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub slack: SlackConfig,
    pub queue: QueueConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8092,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub sqlite_path: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            sqlite_path: "~/.request-bot/state.sqlite".to_string(),
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    pub signing_secret: Option<String>,
    pub bot_token: Option<String>,
    pub signature_header: String,
    pub timestamp_header: String,
    pub post_message_url: String,
    /// Rejects signed requests whose timestamp is older than this. Unset means no freshness check.
    pub max_request_age_secs: Option<u64>,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            signing_secret: None,
            bot_token: None,
            signature_header: "x-slack-signature".to_string(),
            timestamp_header: "x-slack-request-timestamp".to_string(),
            post_message_url: "https://slack.com/api/chat.postMessage".to_string(),
            max_request_age_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub personal_queue_name: String,
    pub max_custom_name_length: u32,
    pub max_request_length: u32,
    /// Names of `default` queues offered on the create-queue form. Seeded at startup.
    pub default_queues: Vec<String>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            personal_queue_name: "My Personal Queue".to_string(),
            max_custom_name_length: 256,
            max_request_length: 250,
            default_queues: Vec::new(),
        }
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn resolve_config_path() -> PathBuf {
    env::var("REQUEST_BOT_CONFIG")
        .ok()
        .map(PathBuf::from)
        .unwrap_or_else(|| expand_tilde(DEFAULT_CONFIG_PATH))
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

pub fn load_config() -> Config {
    let config_path = resolve_config_path();

    let mut cfg = Config::default();

    if config_path.exists() {
        match fs::read_to_string(&config_path) {
            Ok(raw) => match serde_json::from_str::<Config>(&raw) {
                Ok(file_cfg) => cfg = file_cfg,
                Err(err) => {
                    tracing::warn!(
                        path = %config_path.display(),
                        error = %err,
                        "ignoring unparsable config file"
                    )
                }
            },
            Err(err) => {
                tracing::warn!(
                    path = %config_path.display(),
                    error = %err,
                    "ignoring unreadable config file"
                )
            }
        }
    }

    apply_env_overrides(&mut cfg);
    cfg
}

pub fn apply_env_overrides(cfg: &mut Config) {
    if let Some(secret) = non_empty_env("SLACK_SIGNING_SECRET") {
        cfg.slack.signing_secret = Some(secret);
    }

    if let Some(token) = non_empty_env("SLACK_BOT_USER_TOKEN") {
        cfg.slack.bot_token = Some(token);
    }

    if let Some(url) = non_empty_env("REQUEST_BOT_DATABASE_URL") {
        cfg.database.url = Some(url);
    }

    if let Some(path) = non_empty_env("REQUEST_BOT_SQLITE_PATH") {
        cfg.database.sqlite_path = path;
    }

    if let Some(host) = non_empty_env("REQUEST_BOT_HOST") {
        cfg.server.host = host;
    }

    if let Some(port) = non_empty_env("REQUEST_BOT_PORT") {
        match port.trim().parse::<u16>() {
            Ok(port) => cfg.server.port = port,
            Err(_) => tracing::warn!(value = %port, "ignoring invalid REQUEST_BOT_PORT"),
        }
    }
}

pub fn resolve_database_url(cfg: &Config) -> String {
    if let Some(url) = cfg.database.url.as_ref() {
        return url.to_string();
    }

    let path = expand_tilde(&cfg.database.sqlite_path);
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    format!("sqlite://{}?mode=rwc", path.to_string_lossy())
}
