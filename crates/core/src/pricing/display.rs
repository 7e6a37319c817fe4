use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::domain::product::{CatalogProduct, ProductKind};
use crate::pricing::resolver::{ClearanceLookup, PricingContext};

/// Turns the storefront's default price markup plus a clearance amount into
/// the markup shown to shoppers. Currency handling belongs to implementors.
pub trait PriceRenderer {
    fn render(&self, default_html: &str, amount: Decimal) -> String;
}

/// Drops every numeric run from the default markup, keeping the currency
/// symbol and tags, then appends the clearance amount.
#[derive(Clone, Copy, Debug, Default)]
pub struct StripDigitsRenderer;

fn numeric_run() -> &'static Regex {
    static NUMERIC_RUN: OnceLock<Regex> = OnceLock::new();
    NUMERIC_RUN.get_or_init(|| Regex::new(r"[0-9,.]+").expect("numeric run pattern is valid"))
}

impl PriceRenderer for StripDigitsRenderer {
    fn render(&self, default_html: &str, amount: Decimal) -> String {
        let stripped = numeric_run().replace_all(default_html, "");
        format!("{stripped}{amount}")
    }
}

pub fn format_price<L, R>(
    product: &CatalogProduct,
    context: &PricingContext,
    lookup: &L,
    default_html: &str,
    renderer: &R,
) -> String
where
    L: ClearanceLookup + ?Sized,
    R: PriceRenderer + ?Sized,
{
    match product.kind {
        ProductKind::Simple => {
            if !context.clearance_is_live() {
                return default_html.to_string();
            }
            match lookup.clearance_price(&product.id.0).and_then(|price| price.simple_override()) {
                Some(amount) => renderer.render(default_html, amount),
                None => default_html.to_string(),
            }
        }
        ProductKind::Variable { .. } => suppress_variable_price_range(default_html, context),
        ProductKind::Other => default_html.to_string(),
    }
}

/// Variable products show no price range at all while the window is open,
/// whether or not any variation carries an override.
pub fn suppress_variable_price_range(range_html: &str, context: &PricingContext) -> String {
    if context.window_is_open() {
        String::new()
    } else {
        range_html.to_string()
    }
}
