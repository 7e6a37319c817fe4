pub mod config;
pub mod evaluate;
pub mod migrate;
pub mod price;
pub mod settings;

use std::future::Future;

use chrono::NaiveDate;
use clearance_core::config::{AppConfig, LoadOptions};
use clearance_core::errors::ApplicationError;
use clearance_db::{
    connect_with_settings, migrations, ClearanceService, SqlConfigStore, SqlProductMetadataStore,
};
use serde::Serialize;
use serde_json::Value;

pub type SqlClearanceService = ClearanceService<SqlConfigStore, SqlProductMetadataStore>;

/// `(error_class, message, exit_code)` for a failed command.
pub type Failure = (&'static str, String, u8);

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
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::success_with(command, message, None)
    }

    pub fn success_with(command: &str, message: impl Into<String>, data: Option<Value>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
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
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

pub fn application_failure(error: ApplicationError) -> Failure {
    let exit_code = match error {
        ApplicationError::Domain(_) => 7,
        ApplicationError::Persistence(_) => 6,
        ApplicationError::Configuration(_) => 2,
    };
    (error.error_class(), error.to_string(), exit_code)
}

/// Loads config, opens and migrates the database, then runs `op` against a
/// SQL-backed service on a current-thread runtime.
pub fn execute<T, F, Fut>(command: &str, options: &LoadOptions, op: F) -> CommandResult
where
    T: Serialize,
    F: FnOnce(SqlClearanceService, AppConfig) -> Fut,
    Fut: Future<Output = Result<(String, T), Failure>>,
{
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                command,
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                command,
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let service = open_service(&config).await?;
        op(service, config).await
    });

    match result {
        Ok((message, data)) => match serde_json::to_value(data) {
            Ok(Value::Null) => CommandResult::success(command, message),
            Ok(value) => CommandResult::success_with(command, message, Some(value)),
            Err(error) => CommandResult::failure(command, "serialization", error.to_string(), 8),
        },
        Err((error_class, message, exit_code)) => {
            CommandResult::failure(command, error_class, message, exit_code)
        }
    }
}

async fn open_service(config: &AppConfig) -> Result<SqlClearanceService, Failure> {
    let pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;
    migrations::run_pending(&pool).await.map_err(|error| ("migration", error.to_string(), 5u8))?;

    let offset = config.storefront.utc_offset().ok_or_else(|| {
        ("config_validation", "storefront.utc_offset_minutes is out of range".to_string(), 2u8)
    })?;

    Ok(ClearanceService::new(
        SqlConfigStore::new(pool.clone()),
        SqlProductMetadataStore::new(pool),
        offset,
    ))
}

pub fn day_or_today(service: &SqlClearanceService, date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| service.today())
}
