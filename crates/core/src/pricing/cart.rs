use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::cart::Cart;
use crate::pricing::resolver::{resolve_price, ClearanceLookup, PricingContext};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartPricingSummary {
    pub lines_priced: usize,
    pub lines_on_clearance: usize,
    /// `None` when the cart total overflows `Decimal`; unit prices are still applied.
    pub total: Option<Decimal>,
}

/// Rewrites every line's unit price from its regular price. Prices are always
/// derived from `regular_price`, so repeated calls converge on the same cart.
pub fn apply_clearance_prices<L>(
    cart: &mut Cart,
    context: &PricingContext,
    lookup: &L,
) -> CartPricingSummary
where
    L: ClearanceLookup + ?Sized,
{
    let mut lines_on_clearance = 0;
    for line in &mut cart.lines {
        let resolved = resolve_price(line, context, lookup);
        if resolved.is_clearance {
            lines_on_clearance += 1;
        }
        line.unit_price = Some(resolved.price);
    }

    CartPricingSummary { lines_priced: cart.lines.len(), lines_on_clearance, total: cart.total() }
}
