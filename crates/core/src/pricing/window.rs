use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::domain::settings::ClearanceSettings;

/// Inclusive calendar-day range during which clearance pricing may apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearanceWindow {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ClearanceWindow {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn from_settings(settings: &ClearanceSettings) -> Self {
        Self::new(settings.from_date, settings.to_date)
    }

    pub fn is_active(&self, today: NaiveDate) -> bool {
        is_active(today, self.from, self.to)
    }

    pub fn is_active_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.is_active(now.date_naive())
    }
}

pub fn is_active(today: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    match (from, to) {
        (Some(from), Some(to)) => from <= today && today <= to,
        _ => false,
    }
}

/// Calendar day of the store for a UTC instant, given the store's offset.
pub fn store_today<Tz: TimeZone>(now: &DateTime<Tz>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}
