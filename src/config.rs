use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AppError;

/// Environment variable naming an explicit TOML config file.
pub const CONFIG_PATH_ENV: &str = "CLOSET_CONFIG";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "closet.toml";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(s: &str) -> Result<Self, AppError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!("unknown log format: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.into(),
            api_base: DEFAULT_GEMINI_API_BASE.into(),
            timeout_secs: 30,
        }
    }
}

/// Runtime configuration for the server.
///
/// Precedence, lowest first: built-in defaults, the TOML file, then the
/// process environment (which includes anything loaded from `.env`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind_addr: String,
    pub data_dir: PathBuf,
    pub db_pool_size: u32,
    pub cors_origins: Vec<String>,
    pub log_format: LogFormat,
    pub sentry_dsn: Option<String>,
    pub gemini: GeminiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            data_dir: PathBuf::from("data"),
            db_pool_size: 8,
            cors_origins: Vec::new(),
            log_format: LogFormat::Pretty,
            sentry_dsn: None,
            gemini: GeminiConfig::default(),
        }
    }
}

impl Config {
    /// Load `.env`, the optional TOML file and environment overrides.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let explicit = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_toml(raw: &str) -> Result<Self, AppError> {
        let mut config: Self = toml::from_str(raw).map_err(|e| AppError::Config(e.to_string()))?;
        config.gemini.api_key = config.gemini.api_key.filter(|k| !k.trim().is_empty());
        config.sentry_dsn = config.sentry_dsn.filter(|d| !d.trim().is_empty());
        Ok(config)
    }

    /// Apply `KEY=value` overrides from a lookup (the process env in production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CLOSET_BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Some(v) = lookup("CLOSET_DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("CLOSET_DB_POOL_SIZE") {
            self.db_pool_size = v
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("CLOSET_DB_POOL_SIZE is not a number: {v}")))?;
        }
        if let Some(v) = lookup("CLOSET_CORS_ORIGINS") {
            self.cors_origins = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(v) = lookup("CLOSET_LOG_FORMAT") {
            self.log_format = LogFormat::parse(&v)?;
        }
        if let Some(v) = lookup("SENTRY_DSN") {
            self.sentry_dsn = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Some(v) = lookup("GEMINI_API_KEY") {
            self.gemini.api_key = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Some(v) = lookup("GEMINI_MODEL") {
            self.gemini.model = v;
        }
        if let Some(v) = lookup("GEMINI_API_BASE") {
            self.gemini.api_base = v;
        }
        if let Some(v) = lookup("GEMINI_TIMEOUT_SECS") {
            self.gemini.timeout_secs = v
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("GEMINI_TIMEOUT_SECS is not a number: {v}")))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.socket_addr()?;
        if self.db_pool_size == 0 {
            return Err(AppError::Config("db_pool_size must be at least 1".into()));
        }
        if self.gemini.model.trim().is_empty() {
            return Err(AppError::Config("gemini.model cannot be empty".into()));
        }
        if self.gemini.timeout_secs == 0 {
            return Err(AppError::Config("gemini.timeout_secs must be at least 1".into()));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        self.bind_addr
            .parse()
            .map_err(|e| AppError::Config(format!("invalid bind_addr '{}': {e}", self.bind_addr)))
    }
}
