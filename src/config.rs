use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::constants::*;
use crate::error::ConfigError;
use crate::pipeline::normalize::{AdizPolicy, NormalizeOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    #[default]
    Remote,
    Local,
    Synthetic,
}

impl FromStr for SourceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(SourceMode::Remote),
            "local" => Ok(SourceMode::Local),
            "synthetic" | "mock" => Ok(SourceMode::Synthetic),
            other => Err(format!("unknown source mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub mode: SourceMode,
    pub remote_url: String,
    pub local_path: PathBuf,
    pub synthetic_days: u32,
    pub synthetic_seed: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            mode: SourceMode::default(),
            remote_url: DEFAULT_REMOTE_URL.to_string(),
            local_path: PathBuf::from(DEFAULT_LOCAL_PATH),
            synthetic_days: DEFAULT_SYNTHETIC_DAYS,
            synthetic_seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    pub adiz_policy: AdizPolicy,
    pub min_year: i32,
    pub max_year: i32,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            adiz_policy: AdizPolicy::default(),
            min_year: MIN_YEAR,
            max_year: MAX_YEAR,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub cache: CacheConfig,
    pub normalize: NormalizeConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration: TOML file, then `ADIZ_*` environment overrides.
    ///
    /// An explicit `path` must exist; without one, `config.toml` is used when
    /// present and defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Config::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from a key lookup (the process environment in `load`).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup("ADIZ_SOURCE_MODE") {
            self.source.mode = mode.parse().map_err(ConfigError::Invalid)?;
        }
        if let Some(url) = lookup("ADIZ_REMOTE_URL") {
            self.source.remote_url = url;
        }
        if let Some(path) = lookup("ADIZ_LOCAL_PATH") {
            self.source.local_path = PathBuf::from(path);
        }
        if let Some(ttl) = lookup("ADIZ_CACHE_TTL_SECS") {
            self.cache.ttl_secs = ttl
                .trim()
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("ADIZ_CACHE_TTL_SECS: {e}")))?;
        }
        if let Some(policy) = lookup("ADIZ_POLICY") {
            self.normalize.adiz_policy = policy.parse().map_err(ConfigError::Invalid)?;
        }
        if let Some(port) = lookup("ADIZ_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("ADIZ_PORT: {e}")))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.synthetic_days == 0 {
            return Err(ConfigError::Invalid(
                "source.synthetic_days must be greater than zero".into(),
            ));
        }
        if self.normalize.min_year > self.normalize.max_year {
            return Err(ConfigError::Invalid(format!(
                "normalize.min_year ({}) is after normalize.max_year ({})",
                self.normalize.min_year, self.normalize.max_year
            )));
        }
        if self.source.mode == SourceMode::Remote && self.source.remote_url.trim().is_empty() {
            return Err(ConfigError::Invalid("source.remote_url is empty".into()));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            adiz_policy: self.normalize.adiz_policy,
            min_year: self.normalize.min_year,
            max_year: self.normalize.max_year,
        }
    }
}
