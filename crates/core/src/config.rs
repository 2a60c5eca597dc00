use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Files probed, in order, when no explicit config path is given.
pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["bizpulse.toml", "config/bizpulse.toml"];

pub const MAX_CALCULATION_DELAY_MS: u64 = 10_000;

pub const ENV_CALCULATION_DELAY_MS: &str = "BIZPULSE_PRESENTATION_CALCULATION_DELAY_MS";
pub const ENV_OUTPUT: &str = "BIZPULSE_PRESENTATION_OUTPUT";
pub const ENV_LOGGING_LEVEL: &str = "BIZPULSE_LOGGING_LEVEL";
pub const ENV_LOGGING_LEVEL_ALIAS: &str = "BIZPULSE_LOG_LEVEL";
pub const ENV_LOGGING_FORMAT: &str = "BIZPULSE_LOGGING_FORMAT";
pub const ENV_LOGGING_FORMAT_ALIAS: &str = "BIZPULSE_LOG_FORMAT";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub presentation: PresentationConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresentationConfig {
    /// Pause before results are shown, mirroring the dashboard's loading state.
    pub calculation_delay_ms: u64,
    pub output: OutputFormat,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub calculation_delay_ms: Option<u64>,
    pub output: Option<OutputFormat>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            presentation: PresentationConfig {
                calculation_delay_ms: 0,
                output: OutputFormat::Text,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported output format `{other}` (expected text|json)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_CANDIDATES[0]));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn calculation_delay(&self) -> Duration {
        Duration::from_millis(self.presentation.calculation_delay_ms)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(presentation) = patch.presentation {
            if let Some(calculation_delay_ms) = presentation.calculation_delay_ms {
                self.presentation.calculation_delay_ms = calculation_delay_ms;
            }
            if let Some(output) = presentation.output {
                self.presentation.output = output;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env(ENV_CALCULATION_DELAY_MS) {
            self.presentation.calculation_delay_ms = parse_u64(ENV_CALCULATION_DELAY_MS, &value)?;
        }
        if let Some(value) = read_env(ENV_OUTPUT) {
            self.presentation.output = value.parse()?;
        }

        let log_level = read_env(ENV_LOGGING_LEVEL).or_else(|| read_env(ENV_LOGGING_LEVEL_ALIAS));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env(ENV_LOGGING_FORMAT).or_else(|| read_env(ENV_LOGGING_FORMAT_ALIAS));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(calculation_delay_ms) = overrides.calculation_delay_ms {
            self.presentation.calculation_delay_ms = calculation_delay_ms;
        }
        if let Some(output) = overrides.output {
            self.presentation.output = output;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_presentation(&self.presentation)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// The config file `load` would read: the explicit path when it exists,
/// otherwise the first existing default candidate.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    CONFIG_FILE_CANDIDATES.into_iter().map(PathBuf::from).find(|path| path.exists())
}

/// The config file as a TOML document, after `${VAR}` interpolation.
pub fn read_config_document(path: &Path) -> Result<toml::Value, ConfigError> {
    let interpolated = read_interpolated(path)?;
    toml::from_str::<toml::Value>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let interpolated = read_interpolated(path)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn read_interpolated(path: &Path) -> Result<String, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    interpolate_env_vars(&raw)
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_presentation(presentation: &PresentationConfig) -> Result<(), ConfigError> {
    if presentation.calculation_delay_ms > MAX_CALCULATION_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "presentation.calculation_delay_ms must be in range 0..={MAX_CALCULATION_DELAY_MS}"
        )));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPatch {
    presentation: Option<PresentationPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PresentationPatch {
    calculation_delay_ms: Option<u64>,
    output: Option<OutputFormat>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
