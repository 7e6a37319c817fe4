use serde::{Deserialize, Serialize};

use crate::domain::product::{CatalogProduct, ProductKind};
use crate::pricing::resolver::{ClearanceLookup, PricingContext};

pub const CLEARANCE_LABEL: &str = "Clearance";
pub const SALE_FLASH_TEXT: &str = "Sale!";
pub const CLEARANCE_FLASH_TEXT: &str = "Clearance!";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleLabel {
    Default,
    Clearance,
}

/// Label choice ignores the date window; it only looks at the settings flags
/// and whether a usable (non-zero) clearance price is stored.
pub fn sale_label_for<L>(product: &CatalogProduct, context: &PricingContext, lookup: &L) -> SaleLabel
where
    L: ClearanceLookup + ?Sized,
{
    let settings = &context.settings;
    if !settings.enabled {
        return SaleLabel::Default;
    }

    let has_override = |entity_id: &str| {
        lookup.clearance_price(entity_id).and_then(|price| price.simple_override()).is_some()
    };

    let clearance = match &product.kind {
        ProductKind::Simple => settings.override_simple && has_override(&product.id.0),
        ProductKind::Variable { variations } => {
            settings.override_variable && variations.iter().any(|v| has_override(&v.0))
        }
        ProductKind::Other => false,
    };

    if clearance {
        SaleLabel::Clearance
    } else {
        SaleLabel::Default
    }
}

pub fn choose_sale_label<L>(
    product: &CatalogProduct,
    context: &PricingContext,
    lookup: &L,
    default_label: &str,
) -> String
where
    L: ClearanceLookup + ?Sized,
{
    match sale_label_for(product, context, lookup) {
        SaleLabel::Clearance => CLEARANCE_LABEL.to_string(),
        SaleLabel::Default => default_label.to_string(),
    }
}

/// Swaps the "Sale!" text inside host badge markup when the product is on
/// clearance; any other markup is returned untouched.
pub fn rewrite_sale_flash<L>(
    flash_html: &str,
    product: &CatalogProduct,
    context: &PricingContext,
    lookup: &L,
) -> String
where
    L: ClearanceLookup + ?Sized,
{
    match sale_label_for(product, context, lookup) {
        SaleLabel::Clearance => flash_html.replace(SALE_FLASH_TEXT, CLEARANCE_FLASH_TEXT),
        SaleLabel::Default => flash_html.to_string(),
    }
}
