//! # Domain Types
//!
//! Core domain types used throughout EstoquePlus.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐   ┌──────────────────────┐                   │
//! │  │        Good          │   │   GoodRegistration   │                   │
//! │  │  ──────────────────  │   │  ──────────────────  │                   │
//! │  │  id (business key)   │◄──│  id, name, prices    │                   │
//! │  │  unit prices         │   │  quantity            │                   │
//! │  │  qty purchased/sold  │   │  description         │                   │
//! │  │  totals (derived)    │   │  image (optional)    │                   │
//! │  │  image_reference     │   └──────────────────────┘                   │
//! │  └──────────────────────┘                                              │
//! │             │                                                           │
//! │             ▼                                                           │
//! │  ┌──────────────────────┐                                              │
//! │  │   InventorySummary   │  Totals across a snapshot (reports)          │
//! │  └──────────────────────┘                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Good
// =============================================================================

/// A stocked product (mercadoria).
///
/// ## Invariants
/// - `quantity_sold <= quantity_purchased`
/// - `total_purchase_value == purchase_unit_price × quantity_purchased`
///
/// Both are maintained by the functions in [`crate::stock`]; nothing else
/// should construct a mutated `Good` by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Good {
    /// Unique, user-chosen identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Free-form description.
    pub description: String,

    /// Price paid per unit on the latest purchase.
    pub purchase_unit_price: Money,

    /// Price charged per unit.
    pub sale_unit_price: Money,

    /// Units bought so far.
    pub quantity_purchased: i64,

    /// Units sold so far.
    pub quantity_sold: i64,

    /// `purchase_unit_price × quantity_purchased`.
    pub total_purchase_value: Money,

    /// Sale revenue figure; see [`crate::stock::SaleTotalPolicy`].
    pub total_sale_value: Money,

    /// Handle to the stored artwork, if any.
    pub image_reference: Option<String>,
}

impl Good {
    /// Units still on hand.
    #[inline]
    pub fn remaining_quantity(&self) -> i64 {
        self.quantity_purchased.saturating_sub(self.quantity_sold)
    }

    /// `sale_unit_price - purchase_unit_price`.
    #[inline]
    pub fn profit_per_unit(&self) -> Money {
        Money::from_cents(
            self.sale_unit_price
                .cents()
                .saturating_sub(self.purchase_unit_price.cents()),
        )
    }

    /// `profit_per_unit × quantity_sold`.
    ///
    /// Goods built by [`crate::stock`] always fit; rows read from older
    /// stores clamp instead of overflowing.
    #[inline]
    pub fn profit_estimated_total(&self) -> Money {
        self.profit_per_unit()
            .saturating_mul_quantity(self.quantity_sold)
    }

    /// Checks if `quantity` more units can be sold.
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity <= self.remaining_quantity()
    }

    /// Case-insensitive substring match on id, name and description.
    ///
    /// An absent or empty filter matches everything.
    pub fn matches_filter(&self, filter: Option<&str>) -> bool {
        let needle = match filter {
            Some(f) if !f.is_empty() => f.to_lowercase(),
            _ => return true,
        };

        [&self.id, &self.name, &self.description]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

// =============================================================================
// Good Registration
// =============================================================================

/// A purchase submission: creates a good or merges into an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodRegistration {
    pub id: String,
    pub name: String,
    pub purchase_price: Money,
    pub sale_price: Money,
    pub quantity: i64,
    pub description: String,
    /// Reference returned by the image store, when artwork was supplied.
    pub image_reference: Option<String>,
}

impl GoodRegistration {
    /// Creates a registration with an empty description and no image.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        purchase_price: Money,
        sale_price: Money,
        quantity: i64,
    ) -> Self {
        GoodRegistration {
            id: id.into(),
            name: name.into(),
            purchase_price,
            sale_price,
            quantity,
            description: String::new(),
            image_reference: None,
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the image reference.
    pub fn image_reference(mut self, reference: impl Into<String>) -> Self {
        self.image_reference = Some(reference.into());
        self
    }
}

// =============================================================================
// Inventory Summary
// =============================================================================

/// Aggregate figures over a snapshot of goods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySummary {
    pub goods: usize,
    pub units_purchased: i64,
    pub units_sold: i64,
    pub units_remaining: i64,
    pub total_purchase_value: Money,
    pub total_estimated_profit: Money,
}

impl InventorySummary {
    /// Folds a snapshot into summary totals. Sums clamp at the `i64` bounds.
    pub fn from_goods<'a>(goods: impl IntoIterator<Item = &'a Good>) -> Self {
        goods
            .into_iter()
            .fold(InventorySummary::default(), |mut acc, good| {
                acc.goods += 1;
                acc.units_purchased = acc.units_purchased.saturating_add(good.quantity_purchased);
                acc.units_sold = acc.units_sold.saturating_add(good.quantity_sold);
                acc.units_remaining = acc.units_remaining.saturating_add(good.remaining_quantity());
                acc.total_purchase_value =
                    acc.total_purchase_value.saturating_add(good.total_purchase_value);
                acc.total_estimated_profit = acc
                    .total_estimated_profit
                    .saturating_add(good.profit_estimated_total());
                acc
            })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> Good {
        Good {
            id: "A1".to_string(),
            name: "Widget".to_string(),
            description: "Blue plastic Gadget".to_string(),
            purchase_unit_price: Money::from_cents(1000),
            sale_unit_price: Money::from_cents(1500),
            quantity_purchased: 5,
            quantity_sold: 3,
            total_purchase_value: Money::from_cents(5000),
            total_sale_value: Money::from_cents(4500),
            image_reference: None,
        }
    }

    #[test]
    fn test_profit_figures() {
        let good = widget();
        assert_eq!(good.profit_per_unit(), Money::from_cents(500));
        assert_eq!(good.profit_estimated_total(), Money::from_cents(1500));
        assert_eq!(good.remaining_quantity(), 2);
    }

    #[test]
    fn test_negative_profit() {
        let mut good = widget();
        good.sale_unit_price = Money::from_cents(800);
        assert_eq!(good.profit_per_unit(), Money::from_cents(-200));
        assert_eq!(good.profit_estimated_total(), Money::from_cents(-600));
    }

    #[test]
    fn test_can_sell() {
        let good = widget();
        assert!(good.can_sell(2));
        assert!(!good.can_sell(3));
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let good = widget();
        assert!(good.matches_filter(None));
        assert!(good.matches_filter(Some("")));
        assert!(good.matches_filter(Some("widget")));
        assert!(good.matches_filter(Some("a1")));
        assert!(good.matches_filter(Some("GADGET")));
        assert!(!good.matches_filter(Some("sprocket")));
    }

    #[test]
    fn test_filter_handles_non_ascii() {
        let mut good = widget();
        good.name = "AÇÚCAR Cristal".to_string();
        assert!(good.matches_filter(Some("açúcar")));
    }

    #[test]
    fn test_summary() {
        let a = widget();
        let mut b = widget();
        b.id = "B2".to_string();
        b.quantity_sold = 0;

        let summary = InventorySummary::from_goods([&a, &b]);
        assert_eq!(summary.goods, 2);
        assert_eq!(summary.units_purchased, 10);
        assert_eq!(summary.units_sold, 3);
        assert_eq!(summary.units_remaining, 7);
        assert_eq!(summary.total_purchase_value, Money::from_cents(10000));
        assert_eq!(summary.total_estimated_profit, Money::from_cents(1500));
    }

    #[test]
    fn test_summary_clamps_extreme_rows() {
        let mut a = widget();
        a.sale_unit_price = Money::from_cents(i64::MAX);
        a.purchase_unit_price = Money::from_cents(1);
        a.quantity_purchased = i64::MAX;
        a.quantity_sold = 1_000;
        a.total_purchase_value = Money::from_cents(i64::MAX);
        let b = a.clone();

        assert_eq!(a.profit_estimated_total(), Money::from_cents(i64::MAX));

        let summary = InventorySummary::from_goods([&a, &b]);
        assert_eq!(summary.units_purchased, i64::MAX);
        assert_eq!(summary.total_purchase_value, Money::from_cents(i64::MAX));
        assert_eq!(summary.total_estimated_profit, Money::from_cents(i64::MAX));
    }

    #[test]
    fn test_registration_builder() {
        let reg = GoodRegistration::new("P1", "Pen", Money::from_cents(100), Money::from_cents(250), 4)
            .description("Black ink")
            .image_reference("images/P1_Pen.png");
        assert_eq!(reg.description, "Black ink");
        assert_eq!(reg.image_reference.as_deref(), Some("images/P1_Pen.png"));
    }
}
