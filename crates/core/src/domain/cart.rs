use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::{ProductId, VariationId};

/// One cart entry. `unit_price` is the price that will be charged and is
/// rewritten on every total recalculation; `regular_price` never changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    #[serde(default)]
    pub variation_id: Option<VariationId>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub regular_price: Decimal,
    #[serde(default)]
    pub unit_price: Option<Decimal>,
}

fn default_quantity() -> u32 {
    1
}

impl LineItem {
    pub fn new(product_id: impl Into<String>, regular_price: Decimal) -> Self {
        Self {
            product_id: ProductId(product_id.into()),
            variation_id: None,
            quantity: 1,
            regular_price,
            unit_price: None,
        }
    }

    pub fn with_variation(mut self, variation_id: impl Into<String>) -> Self {
        self.variation_id = Some(VariationId(variation_id.into()));
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn effective_unit_price(&self) -> Decimal {
        self.unit_price.unwrap_or(self.regular_price)
    }

    /// `None` when the product does not fit in a `Decimal`.
    pub fn line_total(&self) -> Option<Decimal> {
        self.effective_unit_price().checked_mul(Decimal::from(self.quantity))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub lines: Vec<LineItem>,
}

impl Cart {
    pub fn new(lines: Vec<LineItem>) -> Self {
        Self { lines }
    }

    pub fn total(&self) -> Option<Decimal> {
        self.lines
            .iter()
            .try_fold(Decimal::ZERO, |total, line| total.checked_add(line.line_total()?))
    }
}
