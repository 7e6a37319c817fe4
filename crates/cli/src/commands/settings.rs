use clearance_core::admin::SettingsForm;
use clearance_core::config::LoadOptions;

use crate::commands::{application_failure, execute, CommandResult, Failure};
use crate::SettingsArgs;

pub fn show(options: &LoadOptions) -> CommandResult {
    execute("settings.show", options, |service, _config| async move {
        let settings = service.settings().await.map_err(application_failure)?;
        let message = if settings.enabled {
            "clearance pricing is enabled"
        } else {
            "clearance pricing is disabled"
        };
        Ok::<_, Failure>((message.to_string(), settings))
    })
}

pub fn save(options: &LoadOptions, args: SettingsArgs) -> CommandResult {
    let form = SettingsForm {
        enabled: args.enabled,
        override_simple: args.override_simple,
        override_variable: args.override_variable,
        from_date: args.from_date,
        to_date: args.to_date,
    };

    execute("settings.save", options, |service, _config| async move {
        let saved = service.submit_settings(form).await.map_err(application_failure)?;
        Ok::<_, Failure>(("clearance settings saved".to_string(), saved))
    })
}

pub fn uninstall(options: &LoadOptions) -> CommandResult {
    execute("uninstall", options, |service, _config| async move {
        service.uninstall().await.map_err(application_failure)?;
        Ok::<_, Failure>(("clearance settings removed".to_string(), ()))
    })
}
