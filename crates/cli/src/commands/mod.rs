pub mod add;
pub mod config;
pub mod list;
pub mod seed;
pub mod total;

use std::sync::Arc;

use cafeteria_core::config::{AppConfig, LoadOptions};
use cafeteria_core::{CatalogStore, InMemoryNoticeSink, InterfaceError, Notice};
use serde::Serialize;

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
    #[serde(skip_serializing_if = "Vec::is_empty")]
    notices: Vec<String>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>, notices: &[Notice]) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            notices: render_notices(notices),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
        notices: &[Notice],
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            notices: render_notices(notices),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_interface(command: &str, error: &InterfaceError, notices: &[Notice]) -> Self {
        let exit_code = match error {
            InterfaceError::BadRequest { .. } => 3,
            InterfaceError::StorageUnavailable { .. } => 4,
            InterfaceError::Internal { .. } => 5,
        };
        Self::failure(command, error.error_class(), error.to_string(), exit_code, notices)
    }
}

/// Loaded configuration plus an open catalog whose notices are collected for the output.
pub struct Session {
    pub config: AppConfig,
    pub store: CatalogStore,
    pub notices: InMemoryNoticeSink,
}

pub fn open_session(command: &str, options: LoadOptions) -> Result<Session, CommandResult> {
    let config = AppConfig::load(options).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            2,
            &[],
        )
    })?;

    let notices = InMemoryNoticeSink::default();
    let store = CatalogStore::open_json(config.catalog.path.clone(), Arc::new(notices.clone()));
    Ok(Session { config, store, notices })
}

fn render_notices(notices: &[Notice]) -> Vec<String> {
    notices.iter().map(ToString::to_string).collect()
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
