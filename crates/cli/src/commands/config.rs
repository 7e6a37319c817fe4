use std::env;
use std::fs;
use std::path::Path;

use clearance_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

struct FieldSpec {
    key_path: &'static str,
    env_keys: &'static [&'static str],
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec { key_path: "database.url", env_keys: &["CLEARANCE_DATABASE_URL"] },
    FieldSpec {
        key_path: "database.max_connections",
        env_keys: &["CLEARANCE_DATABASE_MAX_CONNECTIONS"],
    },
    FieldSpec { key_path: "database.timeout_secs", env_keys: &["CLEARANCE_DATABASE_TIMEOUT_SECS"] },
    FieldSpec {
        key_path: "storefront.utc_offset_minutes",
        env_keys: &["CLEARANCE_STOREFRONT_UTC_OFFSET_MINUTES"],
    },
    FieldSpec {
        key_path: "storefront.default_sale_label",
        env_keys: &["CLEARANCE_STOREFRONT_DEFAULT_SALE_LABEL"],
    },
    FieldSpec {
        key_path: "logging.level",
        env_keys: &["CLEARANCE_LOGGING_LEVEL", "CLEARANCE_LOG_LEVEL"],
    },
    FieldSpec {
        key_path: "logging.format",
        env_keys: &["CLEARANCE_LOGGING_FORMAT", "CLEARANCE_LOG_FORMAT"],
    },
];

pub fn run(options: &LoadOptions) -> String {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => return format!("config: failed to load effective configuration: {error}"),
    };

    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["Effective configuration:".to_string()];
    for field in FIELDS {
        let value = field_value(&config, field.key_path);
        let source = field_source(
            field.key_path,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key_path, &value, source));
    }

    lines.join("\n")
}

fn field_value(config: &AppConfig, key_path: &str) -> String {
    match key_path {
        "database.url" => config.database.url.clone(),
        "database.max_connections" => config.database.max_connections.to_string(),
        "database.timeout_secs" => config.database.timeout_secs.to_string(),
        "storefront.utc_offset_minutes" => config.storefront.utc_offset_minutes.to_string(),
        "storefront.default_sale_label" => config.storefront.default_sale_label.clone(),
        "logging.level" => config.logging.level.clone(),
        "logging.format" => format!("{:?}", config.logging.format),
        _ => "<unknown>".to_string(),
    }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
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
