pub mod calculate;
pub mod classify;
pub mod config;
pub mod describe;
pub mod doctor;

use bizpulse_core::config::ConfigError;
use bizpulse_core::ApplicationError;
use serde::Serialize;
use tracing::warn;

pub const EXIT_OK: u8 = 0;
pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_INPUT: u8 = 3;
pub const EXIT_RENDERING: u8 = 4;
pub const EXIT_RUNTIME: u8 = 5;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,
}

impl CommandResult {
    pub fn output(output: impl Into<String>) -> Self {
        Self { exit_code: EXIT_OK, output: output.into() }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            hint: None,
            correlation_id: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Failure payload for an application error, tagged with the run's id.
    pub fn from_error(command: &str, error: ApplicationError, correlation_id: &str) -> Self {
        let exit_code = match &error {
            ApplicationError::Domain(_) | ApplicationError::Input(_) => EXIT_INPUT,
            ApplicationError::Configuration(_) => EXIT_CONFIG,
            ApplicationError::Rendering(_) => EXIT_RENDERING,
        };
        let error_class = error.error_class();
        let message = error.to_string();
        let interface = error.into_interface(correlation_id);

        warn!(
            event_name = "cli.command.failed",
            correlation_id = %interface.correlation_id(),
            command,
            error_class,
            error = %message,
            "command failed"
        );

        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message,
            hint: Some(interface.user_message().to_string()),
            correlation_id: Some(interface.correlation_id().to_string()),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn config_failure(command: &str, error: ConfigError, correlation_id: &str) -> Self {
        Self::from_error(command, error.into(), correlation_id)
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            escape_json(&error.to_string())
        )
    })
}

pub(crate) fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
