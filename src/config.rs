use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use validator::{Validate, ValidationError};

use crate::error::ConfigError;
use crate::runner::{ExecutorKind, ScenarioOptions};

pub const DEFAULT_CONFIG_FILE: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "LOADTEST__";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub target: TargetConfig,
    #[validate(nested)]
    pub scenario: ScenarioConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TargetConfig {
    #[validate(length(min = 1))]
    pub scheme: String,
    #[validate(length(min = 1))]
    pub host: String,
    pub port: u16,
    #[validate(custom(function = "absolute_path"))]
    pub path: String,
    /// Unset means the HTTP client's own default
    #[serde(default)]
    #[validate(range(min = 1))]
    pub request_timeout_seconds: Option<u64>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "3.238.87.0".to_string(),
            port: 7072,
            path: "/send/nt".to_string(),
            request_timeout_seconds: None,
        }
    }
}

impl TargetConfig {
    pub fn url(&self) -> String {
        format!("{}://{}:{}{}", self.scheme, self.host, self.port, self.path)
    }
}

fn absolute_path(path: &str) -> Result<(), ValidationError> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(ValidationError::new("path_must_start_with_slash"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScenarioConfig {
    #[validate(length(min = 1))]
    pub name: String,
    pub executor: ExecutorKind,
    #[validate(range(min = 1))]
    pub vus: u32,
    #[validate(range(min = 1))]
    pub duration_seconds: u64,
    pub graceful_stop_seconds: u64,
    pub exec: String,
    /// Pause after every iteration
    pub think_time_ms: u64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            name: "SendMessage".to_string(),
            executor: ExecutorKind::ConstantVus,
            vus: 10,
            duration_seconds: 20,
            graceful_stop_seconds: 30,
            exec: "sendMessage".to_string(),
            think_time_ms: 1000,
        }
    }
}

impl ScenarioConfig {
    pub fn options(&self) -> ScenarioOptions {
        ScenarioOptions {
            name: self.name.clone(),
            executor: self.executor,
            vus: self.vus,
            duration: Duration::from_secs(self.duration_seconds),
            graceful_stop: Duration::from_secs(self.graceful_stop_seconds),
            exec: self.exec.clone(),
        }
    }

    pub fn think_time(&self) -> Duration {
        Duration::from_millis(self.think_time_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where to write the JSON summary, if anywhere
    #[serde(default)]
    pub summary_export: Option<PathBuf>,
}

impl Config {
    /// Defaults, then `config/default.toml`, then `LOADTEST__*` env vars.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    pub fn figment() -> Figment {
        Self::figment_with_file(DEFAULT_CONFIG_FILE)
    }

    pub fn figment_with_file(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let cfg: Config = figment.extract().map_err(Box::new)?;
        cfg.validate()?;
        Ok(cfg)
    }
}
