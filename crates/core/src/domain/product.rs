use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariationId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProductKind {
    Simple,
    Variable { variations: Vec<VariationId> },
    /// Grouped, external and other catalog types the clearance logic leaves alone.
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub kind: ProductKind,
}

impl CatalogProduct {
    pub fn simple(id: impl Into<String>) -> Self {
        Self { id: ProductId(id.into()), kind: ProductKind::Simple }
    }

    pub fn variable<I, S>(id: impl Into<String>, variations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: ProductId(id.into()),
            kind: ProductKind::Variable {
                variations: variations.into_iter().map(|v| VariationId(v.into())).collect(),
            },
        }
    }

    pub fn is_simple(&self) -> bool {
        matches!(self.kind, ProductKind::Simple)
    }

    pub fn is_variable(&self) -> bool {
        matches!(self.kind, ProductKind::Variable { .. })
    }

    pub fn variations(&self) -> &[VariationId] {
        match &self.kind {
            ProductKind::Variable { variations } => variations,
            ProductKind::Simple | ProductKind::Other => &[],
        }
    }
}
