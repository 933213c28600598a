use crate::compiler::CompileOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Profile loaded from a TOML file:
///
/// ```toml
/// profile_name = "access-logs"
///
/// [compiler]
/// skip_field = "time"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Free-form label for the loaded profile.
    pub profile_name: String,
    pub compiler: CompileOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile_name: "base".to_string(),
            compiler: CompileOptions::default(),
        }
    }
}

impl AppConfig {
    /// Compiler options after applying command line overrides.
    ///
    /// `--no-skip-field` wins over both the profile and `--skip-field`.
    pub fn compile_options(&self, skip_field: Option<&str>, no_skip_field: bool) -> CompileOptions {
        let mut options = self.compiler.clone();
        if let Some(field) = skip_field {
            options.skip_field = Some(field.to_string());
        }
        if no_skip_field {
            options.skip_field = None;
        }
        options
    }
}

pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    toml::from_str::<AppConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })
}

pub fn default_config() -> &'static AppConfig {
    static DEFAULT_CONFIG: LazyLock<AppConfig> = LazyLock::new(AppConfig::default);
    &DEFAULT_CONFIG
}
