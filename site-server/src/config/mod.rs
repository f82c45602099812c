use crate::error::AppError;
use std::env;

/// Default deadline on the provider call, in seconds.
const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub server: ServerConfig,
    pub google: GoogleConfig,
    pub chat: ChatConfig,
    /// Root of the prebuilt marketing assets (html/, css/, js/, assets/).
    pub static_dir: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Model for the chat concierge (e.g., gemini-2.0-flash).
    pub model: String,
    /// Session id substituted when a caller sends no sessionId. All anonymous
    /// visitors share this one conversation; deliberate cost/simplicity
    /// trade-off, made explicit here.
    pub fallback_session: String,
    /// Deadline on the provider call, in seconds.
    pub timeout_secs: u64,
}

impl SiteConfig {
    pub fn load() -> Result<Self, AppError> {
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(SiteConfig {
            server: ServerConfig {
                host: get_env("APP_HOST", Some("0.0.0.0"), is_prod)?,
                port: get_env("APP_PORT", Some("3000"), is_prod)?
                    .parse()
                    .map_err(|e| {
                        AppError::ConfigError(anyhow::anyhow!(
                            "APP_PORT must be a port number: {}",
                            e
                        ))
                    })?,
            },
            google: GoogleConfig {
                api_key: get_env("GOOGLE_API_KEY", None, is_prod)?,
            },
            chat: ChatConfig {
                model: get_env("CHAT_MODEL", Some("gemini-2.0-flash"), is_prod)?,
                fallback_session: get_env("CHAT_FALLBACK_SESSION", Some("default"), is_prod)?,
                timeout_secs: get_env(
                    "CHAT_TIMEOUT_SECS",
                    Some(&DEFAULT_CHAT_TIMEOUT_SECS.to_string()),
                    is_prod,
                )?
                .parse()
                .unwrap_or(DEFAULT_CHAT_TIMEOUT_SECS),
            },
            static_dir: get_env("STATIC_DIR", Some("site-server/static"), is_prod)?,
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
