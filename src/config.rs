//! Application configuration: JSON file, `TGBOT_*` environment overrides
//! and command line flags, applied in that order.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tgbot_api::{BotApiError, BotConfig, ErrorSink, FileSink, LogSink, ProxyConfig, TelegramBuilder};
use thiserror::Error;

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV: &str = "TGBOT_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no bot token configured (set TGBOT_TOKEN, pass --token or add bot.token to the config file)")]
    MissingToken,
    #[error("invalid value for {name}: '{value}'")]
    InvalidEnv { name: &'static str, value: String },
    #[error(transparent)]
    Api(#[from] BotApiError),
}

/// Top-level config file shape.
///
/// ```json
/// {
///   "bot": { "token": "123:ABC", "logErrors": true, "proxy": { "host": "10.0.0.1" } },
///   "errorLog": "/var/log/tgbot-errors.jsonl",
///   "logLevel": "debug"
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub bot: BotConfig,
    /// File receiving one JSON line per failed Bot API call.
    #[serde(default)]
    pub error_log: Option<PathBuf>,
    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default)]
    pub log_level: Option<String>,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Full resolution: defaults, then the file (`path` or `$TGBOT_CONFIG`),
    /// then the process environment, then `token`. Fails without a token.
    pub fn resolve(path: Option<&Path>, token: Option<&str>) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match path.or(env_path.as_deref()) {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env_from(|name| std::env::var(name).ok())?;
        if let Some(token) = token {
            config.bot.token = token.to_string();
        }
        config.validate()?;
        Ok(config)
    }

    /// Apply `TGBOT_*` overrides read through `lookup`. Empty values are
    /// treated as unset.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(token) = get("TGBOT_TOKEN") {
            self.bot.token = token;
        }
        if let Some(raw) = get("TGBOT_LOG_ERRORS") {
            self.bot.log_errors = parse_flag(&raw).ok_or(ConfigError::InvalidEnv {
                name: "TGBOT_LOG_ERRORS",
                value: raw,
            })?;
        }
        if let Some(base) = get("TGBOT_API_BASE") {
            self.bot.api_base_url = Some(base);
        }
        if let Some(path) = get("TGBOT_ERROR_LOG") {
            self.error_log = Some(PathBuf::from(path));
        }

        let host = get("TGBOT_PROXY_HOST");
        let port = get("TGBOT_PROXY_PORT");
        let scheme = get("TGBOT_PROXY_SCHEME");
        let auth = get("TGBOT_PROXY_AUTH");
        if host.is_some() || port.is_some() || scheme.is_some() || auth.is_some() {
            let proxy = self.bot.proxy.get_or_insert_with(ProxyConfig::default);
            if host.is_some() {
                proxy.host = host;
            }
            if let Some(raw) = port {
                proxy.port = Some(raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    name: "TGBOT_PROXY_PORT",
                    value: raw.clone(),
                })?);
            }
            if let Some(raw) = scheme {
                proxy.scheme = Some(raw.parse().map_err(|_| ConfigError::InvalidEnv {
                    name: "TGBOT_PROXY_SCHEME",
                    value: raw.clone(),
                })?);
            }
            if auth.is_some() {
                proxy.auth = auth;
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        Ok(())
    }

    /// Where failed calls are reported: the error log file when one is
    /// configured, the tracing output otherwise.
    pub fn error_sink(&self) -> Arc<dyn ErrorSink> {
        match &self.error_log {
            Some(path) => Arc::new(FileSink::new(path.clone())),
            None => Arc::new(LogSink),
        }
    }

    /// Client builder carrying this config and its error sink.
    pub fn client_builder(&self) -> TelegramBuilder {
        tgbot_api::Telegram::builder(self.bot.clone()).error_sink(self.error_sink())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tgbot_api::ProxyScheme;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn file_shape_is_camel_case() {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "bot": {"token": "1:abc", "logErrors": false, "apiBaseUrl": "http://localhost:8081"},
                "errorLog": "/tmp/errors.jsonl",
                "logLevel": "debug"
            }"#,
        )
        .unwrap();
        assert_eq!(config.bot.token, "1:abc");
        assert!(!config.bot.log_errors);
        assert_eq!(config.bot.api_base(), "http://localhost:8081");
        assert_eq!(config.error_log, Some(PathBuf::from("/tmp/errors.jsonl")));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert!(config.bot.token.is_empty());
        assert!(config.bot.log_errors);
        assert!(config.error_log.is_none());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config: AppConfig =
            serde_json::from_str(r#"{"bot": {"token": "from-file", "logErrors": true}}"#).unwrap();
        config
            .apply_env_from(env(&[
                ("TGBOT_TOKEN", "from-env"),
                ("TGBOT_LOG_ERRORS", "off"),
                ("TGBOT_ERROR_LOG", "/var/log/tg.jsonl"),
            ]))
            .unwrap();
        assert_eq!(config.bot.token, "from-env");
        assert!(!config.bot.log_errors);
        assert_eq!(config.error_log, Some(PathBuf::from("/var/log/tg.jsonl")));
    }

    #[test]
    fn env_proxy_fields_merge_individually() {
        let mut config: AppConfig =
            serde_json::from_str(r#"{"bot": {"proxy": {"host": "10.0.0.1", "port": 3128}}}"#).unwrap();
        config
            .apply_env_from(env(&[("TGBOT_PROXY_SCHEME", "socks5"), ("TGBOT_PROXY_AUTH", "u:p")]))
            .unwrap();
        let proxy = config.bot.proxy.unwrap();
        assert_eq!(proxy.host.as_deref(), Some("10.0.0.1"));
        assert_eq!(proxy.port, Some(3128));
        assert_eq!(proxy.scheme, Some(ProxyScheme::Socks5));
        assert_eq!(proxy.auth.as_deref(), Some("u:p"));
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = AppConfig::default();
        config.bot.token = "keep".into();
        config
            .apply_env_from(env(&[("TGBOT_TOKEN", ""), ("TGBOT_PROXY_HOST", " ")]))
            .unwrap();
        assert_eq!(config.bot.token, "keep");
        assert!(config.bot.proxy.is_none());
    }

    #[test]
    fn invalid_env_values_are_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env_from(env(&[("TGBOT_PROXY_PORT", "eighty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { name: "TGBOT_PROXY_PORT", .. }));

        let err = config
            .apply_env_from(env(&[("TGBOT_PROXY_SCHEME", "gopher")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { name: "TGBOT_PROXY_SCHEME", .. }));

        let err = config
            .apply_env_from(env(&[("TGBOT_LOG_ERRORS", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { name: "TGBOT_LOG_ERRORS", .. }));
    }

    #[test]
    fn validate_requires_token() {
        assert!(matches!(
            AppConfig::default().validate(),
            Err(ConfigError::MissingToken)
        ));
        let mut config = AppConfig::default();
        config.bot.token = "1:abc".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn debug_output_masks_token() {
        let mut config = AppConfig::default();
        config.bot.token = "123456789:AAHsecretsecretsecret".into();
        let printed = format!("{config:?}");
        assert!(!printed.contains("AAHsecretsecretsecret"));
    }
}
