//! Stock status shown on product cards and the product detail view.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a product can currently be ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Stock above zero and the product is active.
    InStock,
    /// No stock, or the product was deactivated.
    SoldOut,
}

impl StockStatus {
    /// Derive the status from stock and the active flag.
    #[must_use]
    pub const fn from_stock(stock: i64, active: bool) -> Self {
        if stock > 0 && active {
            Self::InStock
        } else {
            Self::SoldOut
        }
    }

    /// Visitor-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InStock => "En Stock",
            Self::SoldOut => "Agotado",
        }
    }

    /// CSS modifier for the stock badge.
    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::InStock => "",
            Self::SoldOut => "out-stock",
        }
    }

    /// Returns `true` for [`StockStatus::InStock`].
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::InStock)
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_stock_requires_stock_and_active() {
        assert_eq!(StockStatus::from_stock(3, true), StockStatus::InStock);
        assert_eq!(StockStatus::from_stock(0, true), StockStatus::SoldOut);
        assert_eq!(StockStatus::from_stock(-1, true), StockStatus::SoldOut);
        assert_eq!(StockStatus::from_stock(3, false), StockStatus::SoldOut);
    }

    #[test]
    fn test_labels() {
        assert_eq!(StockStatus::InStock.to_string(), "En Stock");
        assert_eq!(StockStatus::SoldOut.to_string(), "Agotado");
        assert_eq!(StockStatus::SoldOut.badge_class(), "out-stock");
    }
}
