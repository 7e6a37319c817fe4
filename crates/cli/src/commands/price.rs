use clearance_core::config::LoadOptions;
use serde_json::json;

use crate::commands::{application_failure, execute, CommandResult, Failure};

pub fn set(options: &LoadOptions, entity_id: &str, value: &str) -> CommandResult {
    let entity_id = entity_id.to_string();
    let value = value.to_string();

    execute("price.set", options, |service, _config| async move {
        let saved =
            service.save_clearance_price(&entity_id, &value).await.map_err(application_failure)?;
        let message = if saved.is_empty() {
            format!("clearance price cleared for {entity_id}")
        } else {
            format!("clearance price for {entity_id} set to {}", saved.as_str())
        };
        Ok::<_, Failure>((message, json!({ "entity_id": entity_id, "clearance_price": saved })))
    })
}

pub fn get(options: &LoadOptions, entity_id: &str) -> CommandResult {
    let entity_id = entity_id.to_string();

    execute("price.get", options, |service, _config| async move {
        let price = service.clearance_price(&entity_id).await.map_err(application_failure)?;
        let message = match &price {
            Some(price) if !price.is_empty() => format!("{entity_id}: {}", price.as_str()),
            _ => format!("{entity_id}: no clearance price"),
        };
        Ok::<_, Failure>((message, json!({ "entity_id": entity_id, "clearance_price": price })))
    })
}

pub fn column(options: &LoadOptions, entity_id: &str) -> CommandResult {
    let entity_id = entity_id.to_string();

    execute("price.column", options, |service, _config| async move {
        let cell = service.clearance_column(&entity_id).await.map_err(application_failure)?;
        let message = match &cell {
            Some(text) => text.clone(),
            None => "clearance column hidden while clearance pricing is disabled".to_string(),
        };
        Ok::<_, Failure>((message, json!({ "entity_id": entity_id, "column": cell })))
    })
}
