pub mod admin;
pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;

pub use admin::{accept_clearance_edit, clearance_column_value, listing_columns, SettingsForm};
pub use domain::cart::{Cart, LineItem};
pub use domain::clearance::{ClearancePrice, CLEARANCE_PRICE_META_KEY};
pub use domain::product::{CatalogProduct, ProductId, ProductKind, VariationId};
pub use domain::settings::{ClearanceSettings, SettingKey};
pub use errors::{ApplicationError, DomainError};
pub use pricing::{
    apply_clearance_prices, choose_sale_label, format_price, resolve_price, rewrite_sale_flash,
    ClearanceLookup, ClearanceSnapshot, ClearanceWindow, EffectivePrice, PricingContext,
    SaleLabel, StripDigitsRenderer,
};
