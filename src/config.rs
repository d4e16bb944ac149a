use crate::error_reporter::VerbosityLevel;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

const ENV_PREFIX: &str = "XML_CONTENT_MODEL";

/// Trait for abstracting environment variable access
#[cfg_attr(test, mockall::automock)]
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// System environment variable provider for production use
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable error: {0}")]
    Environment(String),

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Library configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub report: ReportConfig,
}

/// How serialized documents are laid out
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Emit `<?xml version="1.0" encoding="UTF-8"?>` before the root element
    pub xml_declaration: bool,
    /// Spaces per nesting level; 0 renders everything on one line
    pub indent: usize,
    /// Render elements without content as `<tag/>`
    pub self_close_empty: bool,
}

/// How validation reports are formatted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ReportConfig {
    pub verbosity: VerbosityLevel,
    /// Stop listing violations after this many
    pub max_violations: Option<usize>,
}

/// Configuration manager for loading and merging configurations
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration with precedence: defaults -> file -> environment
    pub fn load_config(path: Option<&Path>) -> Result<Config> {
        let mut config = Config::default();

        if let Some(config_path) = path {
            let file_config = Self::load_from_file(config_path)?;
            config = Self::merge_configs(config, file_config);
        } else if let Some(found_config) = Self::find_config_file()? {
            config = Self::merge_configs(config, found_config);
        }

        config = Self::apply_environment_overrides(config)?;

        Self::validate_config(&config)?;

        Ok(config)
    }

    /// Load configuration from a file (TOML or JSON)
    pub fn load_from_file(path: &Path) -> Result<Config> {
        debug!("loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => {
                // Try to parse as TOML first, then JSON
                if let Ok(config) = toml::from_str::<Config>(&content) {
                    Ok(config)
                } else {
                    Ok(serde_json::from_str(&content)?)
                }
            }
        }
    }

    /// Find configuration file in standard locations
    pub fn find_config_file() -> Result<Option<Config>> {
        Self::find_config_file_in(Path::new("."))
    }

    /// Look in `dir` first, then in the user configuration directory
    pub fn find_config_file_in(dir: &Path) -> Result<Option<Config>> {
        let config_names = [
            "xml-content-model.toml",
            "xml-content-model.json",
            ".xml-content-model.toml",
            ".xml-content-model.json",
        ];

        for name in &config_names {
            let path = dir.join(name);
            if path.exists() {
                return Ok(Some(Self::load_from_file(&path)?));
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let app_config_dir = config_dir.join("xml-content-model");
            for name in &config_names {
                let path = app_config_dir.join(name);
                if path.exists() {
                    return Ok(Some(Self::load_from_file(&path)?));
                }
            }
        }

        Ok(None)
    }

    /// Apply environment variable overrides using the system environment
    pub fn apply_environment_overrides(config: Config) -> Result<Config> {
        Self::apply_environment_overrides_with(&SystemEnvProvider, config)
    }

    /// Apply environment variable overrides with a custom environment provider
    pub fn apply_environment_overrides_with(
        env: &impl EnvProvider,
        mut config: Config,
    ) -> Result<Config> {
        // Output settings
        if let Some(value) = env.get(&env_key("DECLARATION")) {
            config.output.xml_declaration = parse_env("DECLARATION", &value)?;
        }

        if let Some(value) = env.get(&env_key("INDENT")) {
            config.output.indent = parse_env("INDENT", &value)?;
        }

        if let Some(value) = env.get(&env_key("SELF_CLOSE")) {
            config.output.self_close_empty = parse_env("SELF_CLOSE", &value)?;
        }

        // Report settings
        if let Some(value) = env.get(&env_key("VERBOSITY")) {
            config.report.verbosity = match value.to_lowercase().as_str() {
                "quiet" => VerbosityLevel::Quiet,
                "normal" => VerbosityLevel::Normal,
                "verbose" => VerbosityLevel::Verbose,
                "debug" => VerbosityLevel::Debug,
                _ => {
                    return Err(ConfigError::Environment(format!(
                        "Invalid {} value: {}",
                        env_key("VERBOSITY"),
                        value
                    )));
                }
            };
        }

        if let Some(value) = env.get(&env_key("MAX_VIOLATIONS")) {
            config.report.max_violations = Some(parse_env("MAX_VIOLATIONS", &value)?);
        }

        Ok(config)
    }

    /// Merge two configurations (second takes precedence)
    pub fn merge_configs(mut base: Config, override_config: Config) -> Config {
        base.output = override_config.output;

        base.report.verbosity = override_config.report.verbosity;
        if override_config.report.max_violations.is_some() {
            base.report.max_violations = override_config.report.max_violations;
        }

        base
    }

    /// Validate configuration values
    pub fn validate_config(config: &Config) -> Result<()> {
        if config.output.indent > 16 {
            return Err(ConfigError::Validation(
                "Indent width cannot exceed 16".to_string(),
            ));
        }

        if config.report.max_violations == Some(0) {
            return Err(ConfigError::Validation(
                "max_violations must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn env_key(name: &str) -> String {
    format!("{}_{}", ENV_PREFIX, name)
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        ConfigError::Environment(format!("Invalid {} value: {}", env_key(name), value))
    })
}
