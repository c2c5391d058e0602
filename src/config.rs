use std::{collections::HashMap, env, path::PathBuf, time::Duration};
use thiserror::Error;
use tracing::warn;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CONTENT_DIR: &str = "public";
const DEFAULT_DATA_PATH: &str = "data/page_views.json";
const DEFAULT_GEO_LOOKUP_URL: &str = "https://ipapi.co";
const DEFAULT_GEO_TIMEOUT_MS: u64 = 3000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} has invalid value {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Runtime settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Prefix every route is served under, e.g. `/portfolio`. Empty for root.
    pub base_path: String,
    pub content_dir: PathBuf,
    pub data_path: PathBuf,
    pub admin_password_hash: Option<String>,
    /// `None` disables country lookups; every record gets "Unknown".
    pub geo_lookup_url: Option<String>,
    pub geo_timeout: Duration,
    pub dark_by_default: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            base_path: String::new(),
            content_dir: PathBuf::from(DEFAULT_CONTENT_DIR),
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            admin_password_hash: None,
            geo_lookup_url: Some(DEFAULT_GEO_LOOKUP_URL.to_string()),
            geo_timeout: Duration::from_millis(DEFAULT_GEO_TIMEOUT_MS),
            dark_by_default: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(env::vars().collect())
    }

    /// Builds a config from a variable map. Bad values are logged and replaced
    /// with their defaults.
    pub fn from_vars(vars: HashMap<String, String>) -> Self {
        let mut config = Config::default();
        let get = |key: &str| {
            vars.get(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(raw) = get("PORT") {
            match parse_port(&raw) {
                Ok(port) => config.port = port,
                Err(err) => warn!("{err}, using {DEFAULT_PORT}"),
            }
        }
        if let Some(raw) = get("BASE_PATH") {
            config.base_path = normalize_base_path(&raw);
        }
        if let Some(raw) = get("CONTENT_DIR") {
            config.content_dir = PathBuf::from(raw);
        }
        if let Some(raw) = get("APP_DATA_PATH") {
            config.data_path = PathBuf::from(raw);
        }
        config.admin_password_hash = get("ADMIN_PASSWORD_HASH");

        // Present-but-empty GEO_LOOKUP_URL switches lookups off.
        match vars.get("GEO_LOOKUP_URL").map(|value| value.trim()) {
            Some("") => config.geo_lookup_url = None,
            Some(url) => config.geo_lookup_url = Some(url.trim_end_matches('/').to_string()),
            None => {}
        }
        if let Some(raw) = get("GEO_TIMEOUT_MS") {
            match raw.parse::<u64>() {
                Ok(ms) => config.geo_timeout = Duration::from_millis(ms),
                Err(_) => warn!(
                    "{}, using {DEFAULT_GEO_TIMEOUT_MS}ms",
                    ConfigError::InvalidValue { key: "GEO_TIMEOUT_MS", value: raw }
                ),
            }
        }
        if let Some(raw) = get("THEME_DEFAULT") {
            match parse_theme(&raw) {
                Ok(dark) => config.dark_by_default = dark,
                Err(err) => warn!("{err}, using dark"),
            }
        }

        config
    }

    /// Joins the base path with an app-relative path for links and redirects.
    pub fn href(&self, path: &str) -> String {
        prefixed(&self.base_path, path)
    }
}

/// Prefixes app-relative paths with `base_path`. Anything not starting with
/// `/` (external links) is returned unchanged.
pub fn prefixed(base_path: &str, path: &str) -> String {
    if !path.starts_with('/') {
        return path.to_string();
    }
    if path == "/" && !base_path.is_empty() {
        return base_path.to_string();
    }
    format!("{base_path}{path}")
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
        key: "PORT",
        value: raw.to_string(),
    })
}

fn parse_theme(raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "dark" => Ok(true),
        "light" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: "THEME_DEFAULT",
            value: raw.to_string(),
        }),
    }
}

fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
