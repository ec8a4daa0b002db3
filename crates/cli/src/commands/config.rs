use std::env;
use std::fs;
use std::path::Path;

use cafeteria_core::config::{resolve_config_path, AppConfig, LoadOptions};
use cafeteria_core::TAX_RATE;
use toml::Value;

use crate::commands::CommandResult;

/// Prints the effective configuration, or a `config_validation` failure (exit code 2).
pub fn run(options: LoadOptions) -> CommandResult {
    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let catalog_overridden = options.overrides.catalog_path.is_some();

    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                2,
                &[],
            )
        }
    };
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_key: &str| {
        field_source(key_path, env_key, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines =
        vec!["effective config (source precedence: flag > env > file > default):".to_string()];

    let catalog_source = if catalog_overridden {
        "flag (--catalog)".to_string()
    } else {
        source("catalog.path", "CAFETERIA_CATALOG_PATH")
    };
    lines.push(render_line(
        "catalog.path",
        &config.catalog.path.display().to_string(),
        catalog_source,
    ));
    lines.push(render_line(
        "display.title",
        &config.display.title,
        source("display.title", "CAFETERIA_DISPLAY_TITLE"),
    ));
    lines.push(render_line(
        "display.currency_symbol",
        &config.display.currency_symbol,
        source("display.currency_symbol", "CAFETERIA_DISPLAY_CURRENCY_SYMBOL"),
    ));
    lines.push(render_line(
        "display.name_width",
        &config.display.name_width.to_string(),
        source("display.name_width", "CAFETERIA_DISPLAY_NAME_WIDTH"),
    ));
    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", "CAFETERIA_LOGGING_LEVEL"),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", "CAFETERIA_LOGGING_FORMAT"),
    ));
    lines.push(render_line("pricing.tax_rate", &TAX_RATE.to_string(), "fixed".to_string()));

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: &str,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if env::var_os(env_key).is_some() {
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

#[cfg(test)]
mod tests {
    use super::{contains_path, render_line};

    #[test]
    fn nested_keys_are_found_in_config_document() {
        let doc: toml::Value = "[display]\nname_width = 30\n".parse().expect("valid toml");

        assert!(contains_path(&doc, "display.name_width"));
        assert!(!contains_path(&doc, "display.title"));
        assert!(!contains_path(&doc, "catalog.path"));
    }

    #[test]
    fn lines_name_their_source() {
        assert_eq!(
            render_line("catalog.path", "menu.json", "default".to_string()),
            "- catalog.path = menu.json (source: default)"
        );
    }
}
