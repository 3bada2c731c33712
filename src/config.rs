//! Config file handling
//!
//! `config.toml` in the config directory may carry a `[defaults]` table
//! with any subset of the generation options:
//!
//! ```toml
//! [defaults]
//! language = "python"
//! framework = "httpx"
//! errorHandling = "comprehensive"
//! indentSize = 4
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::errors::ConvertError;
use crate::models::{ErrorHandling, GenerationOptions, IndentType};

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "CURL2CODE_CONFIG_DIR";

/// Option defaults read from `[defaults]`; unset keys keep the built-in value
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigDefaults {
    pub language: Option<String>,
    pub framework: Option<String>,
    #[serde(alias = "error_handling")]
    pub error_handling: Option<ErrorHandling>,
    #[serde(rename = "async")]
    pub async_style: Option<bool>,
    #[serde(alias = "extract_env_vars")]
    pub extract_env_vars: Option<bool>,
    #[serde(alias = "include_types")]
    pub include_types: Option<bool>,
    #[serde(alias = "include_comments")]
    pub include_comments: Option<bool>,
    #[serde(alias = "retry_logic")]
    pub retry_logic: Option<bool>,
    #[serde(alias = "retry_attempts")]
    pub retry_attempts: Option<u32>,
    #[serde(alias = "indent_size")]
    pub indent_size: Option<usize>,
    #[serde(alias = "indent_type")]
    pub indent_type: Option<IndentType>,
    pub timeout: Option<u64>,
    #[serde(alias = "include_tests")]
    pub include_tests: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    defaults: ConfigDefaults,
}

/// curl2code configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub config_dir: PathBuf,
    pub defaults: ConfigDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: Self::default_config_dir(),
            defaults: ConfigDefaults::default(),
        }
    }
}

impl Config {
    /// Load configuration from the config file (TOML format)
    pub fn load() -> Result<Self, ConvertError> {
        Self::load_from(&Self::default_config_dir())
    }

    /// Load `config.toml` from `config_dir`; a missing file yields defaults
    pub fn load_from(config_dir: &Path) -> Result<Self, ConvertError> {
        let config_file = config_dir.join("config.toml");

        if !config_file.exists() {
            debug!("No config file at {}", config_file.display());
            return Ok(Self {
                config_dir: config_dir.to_path_buf(),
                defaults: ConfigDefaults::default(),
            });
        }

        let content = std::fs::read_to_string(&config_file)
            .map_err(|e| ConvertError::Config(format!("Failed to read config: {}", e)))?;

        let file: ConfigFile = toml::from_str(&content)
            .map_err(|e| ConvertError::Config(format!("Invalid config TOML: {}", e)))?;

        debug!("Loaded config from {}", config_file.display());
        Ok(Self {
            config_dir: config_dir.to_path_buf(),
            defaults: file.defaults,
        })
    }

    /// Built-in defaults overlaid with the configured ones
    pub fn generation_options(&self) -> GenerationOptions {
        let mut options = GenerationOptions::default();
        let d = &self.defaults;

        if let Some(language) = &d.language {
            options.language = language.clone();
        }
        if let Some(framework) = &d.framework {
            options.framework = framework.clone();
        }
        if let Some(v) = d.error_handling {
            options.error_handling = v;
        }
        if let Some(v) = d.async_style {
            options.async_style = v;
        }
        if let Some(v) = d.extract_env_vars {
            options.extract_env_vars = v;
        }
        if let Some(v) = d.include_types {
            options.include_types = v;
        }
        if let Some(v) = d.include_comments {
            options.include_comments = v;
        }
        if let Some(v) = d.retry_logic {
            options.retry_logic = v;
        }
        if let Some(v) = d.retry_attempts {
            options.retry_attempts = v;
        }
        if let Some(v) = d.indent_size {
            options.indent_size = v;
        }
        if let Some(v) = d.indent_type {
            options.indent_type = v;
        }
        if d.timeout.is_some() {
            options.timeout = d.timeout;
        }
        if let Some(v) = d.include_tests {
            options.include_tests = v;
        }
        options
    }

    fn default_config_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            return PathBuf::from(dir);
        }
        dirs::config_dir()
            .map(|p| p.join("curl2code"))
            .unwrap_or_else(|| PathBuf::from(".curl2code"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(content: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), content).unwrap();
        dir
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.defaults, ConfigDefaults::default());
        assert_eq!(config.generation_options(), GenerationOptions::default());
    }

    #[test]
    fn test_defaults_table_overrides() {
        let dir = write_config(
            r#"
[defaults]
language = "python"
framework = "httpx"
errorHandling = "comprehensive"
async = false
indent_size = 4
indentType = "tabs"
timeout = 3000
"#,
        );
        let options = Config::load_from(dir.path()).unwrap().generation_options();
        assert_eq!(options.language, "python");
        assert_eq!(options.framework, "httpx");
        assert_eq!(options.error_handling, ErrorHandling::Comprehensive);
        assert!(!options.async_style);
        assert_eq!(options.indent_size, 4);
        assert_eq!(options.indent_type, IndentType::Tabs);
        assert_eq!(options.timeout, Some(3000));
        assert!(options.include_comments);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = write_config("[defaults\nlanguage = ");
        let err = Config::load_from(dir.path()).unwrap_err();
        assert!(matches!(err, ConvertError::Config(_)));
        assert!(err.to_string().contains("Invalid config TOML"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let dir = write_config("[defaults]\nlanguge = \"go\"\n");
        assert!(matches!(Config::load_from(dir.path()), Err(ConvertError::Config(_))));
    }
}
