pub mod cart;
pub mod display;
pub mod label;
pub mod resolver;
pub mod window;

pub use cart::{apply_clearance_prices, CartPricingSummary};
pub use display::{format_price, suppress_variable_price_range, PriceRenderer, StripDigitsRenderer};
pub use label::{choose_sale_label, rewrite_sale_flash, sale_label_for, SaleLabel};
pub use resolver::{
    resolve_price, ClearanceLookup, ClearanceSnapshot, EffectivePrice, OverrideSource,
    PricingContext,
};
pub use window::{is_active, store_today, ClearanceWindow};
