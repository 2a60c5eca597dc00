use std::env;
use std::path::Path;

use bizpulse_core::config::{
    read_config_document, resolve_config_path, AppConfig, LoadOptions, ENV_CALCULATION_DELAY_MS,
    ENV_LOGGING_FORMAT, ENV_LOGGING_FORMAT_ALIAS, ENV_LOGGING_LEVEL, ENV_LOGGING_LEVEL_ALIAS,
    ENV_OUTPUT,
};
use toml::Value;
use uuid::Uuid;

use crate::commands::CommandResult;

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::config_failure("config", error, &Uuid::new_v4().to_string())
        }
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let lines = [
        "effective config (source precedence: env > file > default):".to_string(),
        render_line(
            "presentation.calculation_delay_ms",
            &config.presentation.calculation_delay_ms.to_string(),
            source("presentation.calculation_delay_ms", &[ENV_CALCULATION_DELAY_MS]),
        ),
        render_line(
            "presentation.output",
            config.presentation.output.as_str(),
            source("presentation.output", &[ENV_OUTPUT]),
        ),
        render_line(
            "logging.level",
            &config.logging.level,
            source("logging.level", &[ENV_LOGGING_LEVEL, ENV_LOGGING_LEVEL_ALIAS]),
        ),
        render_line(
            "logging.format",
            config.logging.format.as_str(),
            source("logging.format", &[ENV_LOGGING_FORMAT, ENV_LOGGING_FORMAT_ALIAS]),
        ),
    ];

    CommandResult::output(lines.join("\n"))
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    read_config_document(path?).ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    let from_env = env_keys
        .iter()
        .find(|key| env::var(key).is_ok_and(|value| !value.trim().is_empty()));
    if let Some(env_key) = from_env {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
