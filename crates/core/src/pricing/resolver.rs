use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::cart::LineItem;
use crate::domain::clearance::ClearancePrice;
use crate::domain::settings::ClearanceSettings;
use crate::pricing::window::ClearanceWindow;

/// Read access to stored clearance prices, keyed by product or variation id.
pub trait ClearanceLookup {
    fn clearance_price(&self, entity_id: &str) -> Option<ClearancePrice>;
}

impl<T: ClearanceLookup + ?Sized> ClearanceLookup for &T {
    fn clearance_price(&self, entity_id: &str) -> Option<ClearancePrice> {
        (**self).clearance_price(entity_id)
    }
}

/// Clearance prices preloaded for the entities a request touches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClearanceSnapshot {
    prices: HashMap<String, ClearancePrice>,
}

impl ClearanceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity_id: impl Into<String>, price: impl Into<ClearancePrice>) {
        self.prices.insert(entity_id.into(), price.into());
    }

    pub fn with(mut self, entity_id: impl Into<String>, price: impl Into<ClearancePrice>) -> Self {
        self.insert(entity_id, price);
        self
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl FromIterator<(String, ClearancePrice)> for ClearanceSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, ClearancePrice)>>(iter: I) -> Self {
        Self { prices: iter.into_iter().collect() }
    }
}

impl ClearanceLookup for ClearanceSnapshot {
    fn clearance_price(&self, entity_id: &str) -> Option<ClearancePrice> {
        self.prices.get(entity_id).cloned()
    }
}

/// Settings plus the store's current calendar day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PricingContext {
    pub settings: ClearanceSettings,
    pub today: NaiveDate,
}

impl PricingContext {
    pub fn new(settings: ClearanceSettings, today: NaiveDate) -> Self {
        Self { settings, today }
    }

    pub fn window(&self) -> ClearanceWindow {
        ClearanceWindow::from_settings(&self.settings)
    }

    pub fn window_is_open(&self) -> bool {
        self.window().is_active(self.today)
    }

    pub fn clearance_is_live(&self) -> bool {
        self.settings.enabled && self.window_is_open()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideSource {
    None,
    Product,
    Variation,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectivePrice {
    pub price: Decimal,
    pub is_clearance: bool,
    pub source: OverrideSource,
}

impl EffectivePrice {
    fn regular(price: Decimal) -> Self {
        Self { price, is_clearance: false, source: OverrideSource::None }
    }
}

pub fn resolve_price<L>(item: &LineItem, context: &PricingContext, lookup: &L) -> EffectivePrice
where
    L: ClearanceLookup + ?Sized,
{
    let regular = item.regular_price;
    if !context.clearance_is_live() {
        return EffectivePrice::regular(regular);
    }

    let settings = &context.settings;
    let mut effective = EffectivePrice::regular(regular);

    if settings.override_simple {
        if let Some(amount) =
            lookup.clearance_price(&item.product_id.0).and_then(|price| price.simple_override())
        {
            effective.price = amount;
            effective.source = OverrideSource::Product;
        }
    }

    if let Some(variation_id) = &item.variation_id {
        if settings.override_variable {
            if let Some(amount) = lookup
                .clearance_price(&variation_id.0)
                .and_then(|price| price.variation_override())
            {
                effective.price = amount;
                effective.source = OverrideSource::Variation;
            }
        }
    }

    effective.is_clearance = effective.source != OverrideSource::None && effective.price != regular;
    effective
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::domain::cart::LineItem;
    use crate::domain::settings::ClearanceSettings;

    use super::{resolve_price, ClearanceSnapshot, OverrideSource, PricingContext};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn live_settings() -> ClearanceSettings {
        ClearanceSettings {
            enabled: true,
            override_simple: true,
            override_variable: true,
            from_date: Some(date(2026, 10, 1)),
            to_date: Some(date(2026, 10, 31)),
        }
    }

    fn context(settings: ClearanceSettings) -> PricingContext {
        PricingContext::new(settings, date(2026, 10, 17))
    }

    fn regular() -> Decimal {
        Decimal::new(2999, 2)
    }

    #[test]
    fn disabled_settings_keep_regular_price() {
        let lookup = ClearanceSnapshot::new().with("p-1", "19.99").with("v-1", "5");
        let settings = ClearanceSettings { enabled: false, ..live_settings() };
        let ctx = context(settings);

        for item in [
            LineItem::new("p-1", regular()),
            LineItem::new("p-1", regular()).with_variation("v-1"),
        ] {
            let resolved = resolve_price(&item, &ctx, &lookup);
            assert_eq!(resolved.price, regular());
            assert!(!resolved.is_clearance);
        }
    }

    #[test]
    fn closed_window_keeps_regular_price() {
        let lookup = ClearanceSnapshot::new().with("p-1", "19.99").with("v-1", "5");
        let item = LineItem::new("p-1", regular()).with_variation("v-1");

        for today in [date(2026, 9, 30), date(2026, 11, 1), date(2025, 10, 17)] {
            let ctx = PricingContext::new(live_settings(), today);
            let resolved = resolve_price(&item, &ctx, &lookup);
            assert_eq!(resolved.price, regular());
            assert_eq!(resolved.source, OverrideSource::None);
        }
    }

    #[test]
    fn simple_override_applies_inside_window() {
        let lookup = ClearanceSnapshot::new().with("p-1", "19.99");
        let resolved =
            resolve_price(&LineItem::new("p-1", regular()), &context(live_settings()), &lookup);

        assert_eq!(resolved.price, Decimal::new(1999, 2));
        assert!(resolved.is_clearance);
        assert_eq!(resolved.source, OverrideSource::Product);
    }

    #[test]
    fn zero_simple_override_is_ignored() {
        let lookup = ClearanceSnapshot::new().with("p-1", "0");
        let resolved =
            resolve_price(&LineItem::new("p-1", regular()), &context(live_settings()), &lookup);

        assert_eq!(resolved.price, regular());
        assert!(!resolved.is_clearance);
    }

    #[test]
    fn zero_variation_override_is_applied_every_time() {
        let lookup = ClearanceSnapshot::new().with("v-1", "0");
        let item = LineItem::new("p-1", regular()).with_variation("v-1");
        let ctx = context(live_settings());

        let first = resolve_price(&item, &ctx, &lookup);
        let second = resolve_price(&item, &ctx, &lookup);

        assert_eq!(first.price, Decimal::ZERO);
        assert!(first.is_clearance);
        assert_eq!(first, second);
    }

    #[test]
    fn variation_override_wins_over_product_override() {
        let lookup = ClearanceSnapshot::new().with("p-1", "19.99").with("v-1", "14.50");
        let item = LineItem::new("p-1", regular()).with_variation("v-1");

        let resolved = resolve_price(&item, &context(live_settings()), &lookup);

        assert_eq!(resolved.price, Decimal::new(1450, 2));
        assert_eq!(resolved.source, OverrideSource::Variation);
    }

    #[test]
    fn product_override_applies_to_variation_without_its_own_price() {
        let lookup = ClearanceSnapshot::new().with("p-1", "19.99").with("v-1", "");
        let item = LineItem::new("p-1", regular()).with_variation("v-1");

        let resolved = resolve_price(&item, &context(live_settings()), &lookup);

        assert_eq!(resolved.price, Decimal::new(1999, 2));
        assert_eq!(resolved.source, OverrideSource::Product);
    }

    #[test]
    fn product_type_flags_gate_each_lookup() {
        let lookup = ClearanceSnapshot::new().with("p-1", "19.99").with("v-1", "14.50");
        let item = LineItem::new("p-1", regular()).with_variation("v-1");

        let simple_only = ClearanceSettings { override_variable: false, ..live_settings() };
        let resolved = resolve_price(&item, &context(simple_only), &lookup);
        assert_eq!(resolved.price, Decimal::new(1999, 2));

        let variable_only = ClearanceSettings { override_simple: false, ..live_settings() };
        let resolved = resolve_price(&LineItem::new("p-1", regular()), &context(variable_only), &lookup);
        assert_eq!(resolved.price, regular());
    }

    #[test]
    fn override_equal_to_regular_price_is_not_flagged() {
        let lookup = ClearanceSnapshot::new().with("p-1", "29.99");
        let resolved =
            resolve_price(&LineItem::new("p-1", regular()), &context(live_settings()), &lookup);

        assert_eq!(resolved.price, regular());
        assert_eq!(resolved.source, OverrideSource::Product);
        assert!(!resolved.is_clearance);
    }

    #[test]
    fn malformed_clearance_price_degrades_to_regular() {
        let lookup = ClearanceSnapshot::new().with("p-1", "n/a").with("v-1", "cheap");
        let item = LineItem::new("p-1", regular()).with_variation("v-1");

        let resolved = resolve_price(&item, &context(live_settings()), &lookup);

        assert_eq!(resolved.price, regular());
        assert!(!resolved.is_clearance);
    }
}
