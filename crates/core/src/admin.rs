use serde::{Deserialize, Serialize};

use crate::domain::clearance::ClearancePrice;
use crate::domain::settings::{parse_setting_date, ClearanceSettings, SettingKey};
use crate::errors::DomainError;

pub const CLEARANCE_COLUMN_KEY: &str = "clearance_price";
pub const CLEARANCE_COLUMN_TITLE: &str = "Clearance Price";
pub const NOT_FILLED: &str = "Not filled";

/// Submitted admin settings form. Dates arrive as the raw text of the two
/// date inputs; an empty field means "unset".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub override_simple: bool,
    #[serde(default)]
    pub override_variable: bool,
    #[serde(default)]
    pub from_date: String,
    #[serde(default)]
    pub to_date: String,
}

impl SettingsForm {
    pub fn into_settings(self) -> Result<ClearanceSettings, DomainError> {
        if !self.enabled {
            return Ok(ClearanceSettings::default());
        }

        Ok(ClearanceSettings {
            enabled: true,
            override_simple: self.override_simple,
            override_variable: self.override_variable,
            from_date: form_date(SettingKey::FromDate, &self.from_date)?,
            to_date: form_date(SettingKey::ToDate, &self.to_date)?,
        }
        .normalized())
    }
}

fn form_date(key: SettingKey, raw: &str) -> Result<Option<chrono::NaiveDate>, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse_setting_date(trimmed).map(Some).ok_or_else(|| DomainError::InvalidSetting {
        key: key.as_str().to_string(),
        value: trimmed.to_string(),
    })
}

/// Clearance prices can only be edited while the feature is switched on.
pub fn accept_clearance_edit(
    settings: &ClearanceSettings,
    raw: &str,
) -> Result<ClearancePrice, DomainError> {
    if !settings.enabled {
        return Err(DomainError::ClearanceDisabled);
    }
    Ok(ClearancePrice::new(raw))
}

/// Cell text for the product listing column, or `None` when the column is
/// not shown because clearance pricing is off.
pub fn clearance_column_value(
    settings: &ClearanceSettings,
    price: Option<&ClearancePrice>,
) -> Option<String> {
    if !settings.enabled {
        return None;
    }
    let text = match price {
        Some(price) if !price.is_empty() => price.as_str().to_string(),
        _ => NOT_FILLED.to_string(),
    };
    Some(text)
}

/// Inserts the clearance column right after the price column.
pub fn listing_columns(
    settings: &ClearanceSettings,
    columns: Vec<(String, String)>,
) -> Vec<(String, String)> {
    let mut out = Vec::with_capacity(columns.len() + 1);
    for (key, title) in columns {
        let is_price = key == "price";
        out.push((key, title));
        if is_price && settings.enabled {
            out.push((CLEARANCE_COLUMN_KEY.to_string(), CLEARANCE_COLUMN_TITLE.to_string()));
        }
    }
    out
}
