use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const SETTING_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKey {
    Enabled,
    OverrideSimple,
    OverrideVariable,
    FromDate,
    ToDate,
}

impl SettingKey {
    pub const ALL: [SettingKey; 5] = [
        SettingKey::Enabled,
        SettingKey::OverrideSimple,
        SettingKey::OverrideVariable,
        SettingKey::FromDate,
        SettingKey::ToDate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::Enabled => "clearance_enabled",
            SettingKey::OverrideSimple => "clearance_override_simple",
            SettingKey::OverrideVariable => "clearance_override_variable",
            SettingKey::FromDate => "clearance_from_date",
            SettingKey::ToDate => "clearance_to_date",
        }
    }
}

/// Clearance configuration, passed explicitly into every pricing call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearanceSettings {
    pub enabled: bool,
    pub override_simple: bool,
    pub override_variable: bool,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

impl ClearanceSettings {
    /// A disabled configuration carries no product-type flags and no window.
    pub fn normalized(self) -> Self {
        if self.enabled {
            self
        } else {
            Self::default()
        }
    }

    /// Builds settings from raw stored values. Missing or unreadable values
    /// fall back to off/unset.
    pub fn from_raw<F>(mut get: F) -> Self
    where
        F: FnMut(SettingKey) -> Option<String>,
    {
        Self {
            enabled: parse_flag(get(SettingKey::Enabled).as_deref()),
            override_simple: parse_flag(get(SettingKey::OverrideSimple).as_deref()),
            override_variable: parse_flag(get(SettingKey::OverrideVariable).as_deref()),
            from_date: get(SettingKey::FromDate).as_deref().and_then(parse_setting_date),
            to_date: get(SettingKey::ToDate).as_deref().and_then(parse_setting_date),
        }
    }

    /// Raw key/value pairs in the shape the config store persists them.
    pub fn to_raw(&self) -> Vec<(SettingKey, String)> {
        SettingKey::ALL.iter().map(|key| (*key, self.raw_value(*key))).collect()
    }

    pub fn raw_value(&self, key: SettingKey) -> String {
        match key {
            SettingKey::Enabled => flag_value(self.enabled),
            SettingKey::OverrideSimple => flag_value(self.override_simple),
            SettingKey::OverrideVariable => flag_value(self.override_variable),
            SettingKey::FromDate => date_value(self.from_date),
            SettingKey::ToDate => date_value(self.to_date),
        }
    }
}

pub fn parse_setting_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), SETTING_DATE_FORMAT).ok()
}

fn parse_flag(raw: Option<&str>) -> bool {
    match raw.map(str::trim) {
        Some(value) => value == "1" || value.eq_ignore_ascii_case("true"),
        None => false,
    }
}

fn flag_value(flag: bool) -> String {
    if flag { "1" } else { "0" }.to_string()
}

fn date_value(date: Option<NaiveDate>) -> String {
    date.map(|date| date.format(SETTING_DATE_FORMAT).to_string()).unwrap_or_default()
}
