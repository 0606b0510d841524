use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CoreError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Upstream REST API root, without trailing slash.
    pub base_url: String,
    /// Image conversion endpoint used by the image variant helper.
    pub image_proxy: String,
    /// Host that relative poster/thumbnail paths are resolved against.
    pub image_cdn: String,
    pub timeout_secs: u64,
    pub latest_version: ApiVersion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive.
    pub filter: String,
}

/// Which family of "latest movies" endpoints to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    /// The legacy, unversioned path.
    V1,
    V2,
    V3,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
            Self::V3 => "v3",
        }
    }
}

impl FromStr for ApiVersion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v1" => Ok(Self::V1),
            "v2" => Ok(Self::V2),
            "v3" => Ok(Self::V3),
            _ => Err(CoreError::Config(format!("unknown API version: {s}"))),
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Load config: user file if it exists, built-in defaults otherwise.
    pub fn load() -> Result<Self, CoreError> {
        let user_path = Self::config_path();
        if user_path.exists() {
            Self::load_from(&user_path)
        } else {
            Self::parse(DEFAULT_CONFIG)
        }
    }

    /// Load and validate a config file at an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self, CoreError> {
        let config: AppConfig =
            toml::from_str(content).map_err(|e| CoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that URLs parse and the timeout is bounded.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (key, value) in [
            ("api.base_url", &self.api.base_url),
            ("api.image_proxy", &self.api.image_proxy),
            ("api.image_cdn", &self.api.image_cdn),
        ] {
            Url::parse(value).map_err(|e| CoreError::Config(format!("{key}: {e}")))?;
        }
        if self.api.timeout_secs == 0 {
            return Err(CoreError::Config(
                "api.timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Save current config to the user config file.
    pub fn save(&self) -> Result<(), CoreError> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, CoreError> {
        toml::to_string_pretty(self).map_err(|e| CoreError::Config(e.to_string()))
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "mika")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}
