use clearance_core::config::LoadOptions;

use crate::commands::{execute, CommandResult, Failure};

pub fn run(options: &LoadOptions) -> CommandResult {
    execute("migrate", options, |_service, config| async move {
        tracing::info!(
            event_name = "system.migrate.completed",
            database_url = %config.database.url,
            "database migrations applied"
        );
        Ok::<_, Failure>((format!("migrations applied to {}", config.database.url), ()))
    })
}
