use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use blue_connector::graphql::{ClientSettings, Credentials, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    pub credentials: Option<CredentialsConfig>,
    pub request: Option<RequestConfig>,
    pub log_level: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub token_id: String,
    #[serde(default)]
    pub token_secret: String,
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RequestConfig {
    pub timeout_ms: Option<u64>,
    pub full_response: Option<bool>,
}

pub fn config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".blue")
        .join("config.toml")
}

pub fn load_config() -> Result<AppConfig> {
    let config = load_config_from(&config_path())?;
    Ok(apply_env(config, |key| std::env::var(key).ok()))
}

pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

/// `BLUE_TOKEN_ID`, `BLUE_TOKEN_SECRET` and `BLUE_API_URL` override the file.
pub fn apply_env(mut config: AppConfig, lookup: impl Fn(&str) -> Option<String>) -> AppConfig {
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let token_id = var("BLUE_TOKEN_ID");
    let token_secret = var("BLUE_TOKEN_SECRET");
    let base_url = var("BLUE_API_URL");
    if token_id.is_none() && token_secret.is_none() && base_url.is_none() {
        return config;
    }

    let creds = config.credentials.get_or_insert_with(CredentialsConfig::default);
    if let Some(id) = token_id {
        creds.token_id = id;
    }
    if let Some(secret) = token_secret {
        creds.token_secret = secret;
    }
    if let Some(url) = base_url {
        creds.base_url = Some(url);
    }
    config
}

impl AppConfig {
    pub fn client_settings(&self) -> Result<ClientSettings> {
        let creds = self
            .credentials
            .as_ref()
            .filter(|c| !c.token_id.trim().is_empty() && !c.token_secret.trim().is_empty())
            .with_context(|| {
                format!(
                    "No Blue API credentials configured. Add token_id and token_secret under [credentials] in {} or set BLUE_TOKEN_ID and BLUE_TOKEN_SECRET",
                    config_path().display()
                )
            })?;

        let endpoint = creds
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_ENDPOINT)
            .to_string();
        let request = self.request.as_ref();
        let timeout = request
            .and_then(|r| r.timeout_ms)
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TIMEOUT);

        Ok(ClientSettings {
            endpoint,
            credentials: Credentials {
                token_id: creds.token_id.trim().to_string(),
                token_secret: creds.token_secret.trim().to_string(),
            },
            timeout,
            full_response: request.and_then(|r| r.full_response).unwrap_or(false),
        })
    }
}
