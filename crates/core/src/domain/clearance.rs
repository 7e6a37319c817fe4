use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Metadata key under which a product or variation keeps its clearance price.
pub const CLEARANCE_PRICE_META_KEY: &str = "clearance_price";

/// Raw clearance price as typed by an admin into the product or variation
/// field. Interpretation differs between simple products and variations, so
/// the string is kept as-is and parsed at the point of use.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClearancePrice(String);

impl ClearancePrice {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn amount(&self) -> Option<Decimal> {
        if self.0.is_empty() {
            return None;
        }
        Decimal::from_str(&self.0).or_else(|_| Decimal::from_scientific(&self.0)).ok()
    }

    /// Simple products ignore empty and zero values.
    pub fn simple_override(&self) -> Option<Decimal> {
        self.amount().filter(|amount| !amount.is_zero())
    }

    /// Variations accept zero as a deliberate override; only empty is unset.
    pub fn variation_override(&self) -> Option<Decimal> {
        self.amount()
    }
}

impl From<&str> for ClearancePrice {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ClearancePrice {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::ClearancePrice;

    #[test]
    fn simple_override_skips_empty_and_zero() {
        assert_eq!(ClearancePrice::new("").simple_override(), None);
        assert_eq!(ClearancePrice::new("0").simple_override(), None);
        assert_eq!(ClearancePrice::new("0.00").simple_override(), None);
        assert_eq!(ClearancePrice::new("19.99").simple_override(), Some(Decimal::new(1999, 2)));
    }

    #[test]
    fn variation_override_accepts_zero() {
        assert_eq!(ClearancePrice::new("").variation_override(), None);
        assert_eq!(ClearancePrice::new("0").variation_override(), Some(Decimal::ZERO));
    }

    #[test]
    fn malformed_values_are_treated_as_unset() {
        let price = ClearancePrice::new("ten dollars");

        assert!(!price.is_empty());
        assert_eq!(price.simple_override(), None);
        assert_eq!(price.variation_override(), None);
    }

    #[test]
    fn exponent_notation_is_numeric() {
        assert_eq!(ClearancePrice::new("1e2").simple_override(), Some(Decimal::new(100, 0)));
        assert_eq!(ClearancePrice::new("2.5E1").amount(), Some(Decimal::new(25, 0)));
        assert_eq!(ClearancePrice::new("0e5").simple_override(), None);
        assert_eq!(ClearancePrice::new("0e5").variation_override(), Some(Decimal::ZERO));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let price = ClearancePrice::new("  12.50 \n");

        assert_eq!(price.as_str(), "12.50");
        assert_eq!(price.amount(), Some(Decimal::new(1250, 2)));
    }
}
