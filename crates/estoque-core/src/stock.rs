//! # Stock Rules
//!
//! The ledger arithmetic: merging repeated purchases, restocking and
//! validating sales against remaining stock. Every function takes a `Good`
//! by value and returns the updated `Good`, or an error with the input left
//! untouched in the caller's hands.
//!
//! ## Purchase Merge
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  register_or_merge("P1", purchase=12.00, sale=18.00, qty=4)             │
//! │                                                                         │
//! │  P1 unknown?                                                            │
//! │  ├── YES → new Good                                                     │
//! │  │         purchased = 4, sold = 0                                      │
//! │  │         total_purchase = 12.00 × 4                                   │
//! │  │         total_sale     = 18.00 × 4   (projection, nothing sold yet)  │
//! │  │                                                                      │
//! │  └── NO  → purchased += 4                                               │
//! │            purchase price := 12.00 (latest wins, no averaging)          │
//! │            total_purchase = 12.00 × purchased                           │
//! │            name / sale price / description overwritten                  │
//! │            image overwritten only if a new one was supplied             │
//! │            sold and total_sale untouched                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Good, GoodRegistration};
use crate::validation::{validate_good_id, validate_good_name, validate_price, validate_quantity};

// =============================================================================
// Sale Total Policy
// =============================================================================

/// How `total_sale_value` reacts to a sale.
///
/// ## Modes
/// ```text
/// Good registered with sale price 15.00, qty 5 → total_sale = 75.00
///
///                         sale of 3        then sale of 2
/// ReplaceWithLatestBatch  45.00            30.00   (latest batch only)
/// Accumulate              45.00            75.00   (running revenue)
/// ```
///
/// `ReplaceWithLatestBatch` matches the figures in stores written by earlier
/// releases and is the default. `Accumulate` tracks real revenue; on
/// the first sale it discards the registration-time projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleTotalPolicy {
    /// `total_sale_value = sale_unit_price × qty` of the latest sale.
    #[default]
    ReplaceWithLatestBatch,

    /// `total_sale_value += sale_unit_price × qty`.
    Accumulate,
}

impl fmt::Display for SaleTotalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaleTotalPolicy::ReplaceWithLatestBatch => write!(f, "replace_with_latest_batch"),
            SaleTotalPolicy::Accumulate => write!(f, "accumulate"),
        }
    }
}

impl FromStr for SaleTotalPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "replace_with_latest_batch" | "replace" | "latest" => {
                Ok(SaleTotalPolicy::ReplaceWithLatestBatch)
            }
            "accumulate" | "sum" => Ok(SaleTotalPolicy::Accumulate),
            other => Err(ValidationError::InvalidFormat {
                field: "sale_total_policy".to_string(),
                reason: format!(
                    "unknown policy '{}', expected replace_with_latest_batch or accumulate",
                    other
                ),
            }),
        }
    }
}

// =============================================================================
// Rules
// =============================================================================

fn line_total(field: &str, unit: Money, quantity: i64) -> CoreResult<Money> {
    unit.checked_mul_quantity(quantity).ok_or_else(|| {
        ValidationError::Overflow {
            field: field.to_string(),
        }
        .into()
    })
}

fn add_quantity(current: i64, additional: i64) -> CoreResult<i64> {
    current.checked_add(additional).ok_or_else(|| {
        ValidationError::Overflow {
            field: "quantity".to_string(),
        }
        .into()
    })
}

/// Creates a good from its first registration, or merges a repeat purchase
/// into `existing`.
///
/// ## Errors
/// - `Validation` if id/name are empty, a price is not positive or the
///   quantity is not positive
/// - `Validation(Overflow)` if either unit price times `quantity_purchased`
///   no longer fits
pub fn register_or_merge(existing: Option<Good>, reg: GoodRegistration) -> CoreResult<Good> {
    validate_good_id(&reg.id)?;
    validate_good_name(&reg.name)?;
    validate_price("purchase price", reg.purchase_price)?;
    validate_price("sale price", reg.sale_price)?;
    validate_quantity(reg.quantity)?;

    match existing {
        None => {
            let total_purchase_value =
                line_total("total purchase value", reg.purchase_price, reg.quantity)?;
            let total_sale_value = line_total("total sale value", reg.sale_price, reg.quantity)?;

            Ok(Good {
                id: reg.id,
                name: reg.name,
                description: reg.description,
                purchase_unit_price: reg.purchase_price,
                sale_unit_price: reg.sale_price,
                quantity_purchased: reg.quantity,
                quantity_sold: 0,
                total_purchase_value,
                total_sale_value,
                image_reference: reg.image_reference,
            })
        }
        Some(mut good) => {
            let quantity_purchased = add_quantity(good.quantity_purchased, reg.quantity)?;
            let total_purchase_value =
                line_total("total purchase value", reg.purchase_price, quantity_purchased)?;
            line_total("total sale value", reg.sale_price, quantity_purchased)?;

            good.name = reg.name;
            good.description = reg.description;
            good.purchase_unit_price = reg.purchase_price;
            good.sale_unit_price = reg.sale_price;
            good.quantity_purchased = quantity_purchased;
            good.total_purchase_value = total_purchase_value;
            if reg.image_reference.is_some() {
                good.image_reference = reg.image_reference;
            }

            Ok(good)
        }
    }
}

/// Adds `quantity` units at the good's current purchase price.
///
/// Both unit prices times the new `quantity_purchased` must fit, so every
/// later sale and profit figure stays in range.
pub fn add_stock(mut good: Good, quantity: i64) -> CoreResult<Good> {
    validate_quantity(quantity)?;

    let quantity_purchased = add_quantity(good.quantity_purchased, quantity)?;
    good.total_purchase_value = line_total(
        "total purchase value",
        good.purchase_unit_price,
        quantity_purchased,
    )?;
    line_total("total sale value", good.sale_unit_price, quantity_purchased)?;
    good.quantity_purchased = quantity_purchased;

    Ok(good)
}

/// Records the sale of `quantity` units.
///
/// ## Errors
/// - `InsufficientStock` if `quantity_purchased < quantity_sold + quantity`
/// - `Validation` if `quantity` is not positive
pub fn record_sale(mut good: Good, quantity: i64, policy: SaleTotalPolicy) -> CoreResult<Good> {
    validate_quantity(quantity)?;

    if !good.can_sell(quantity) {
        let available = good.remaining_quantity();
        return Err(CoreError::InsufficientStock {
            id: good.id,
            available,
            requested: quantity,
        });
    }

    let batch = line_total("total sale value", good.sale_unit_price, quantity)?;
    let total_sale_value = match policy {
        SaleTotalPolicy::ReplaceWithLatestBatch => batch,
        SaleTotalPolicy::Accumulate => {
            let base = if good.quantity_sold == 0 {
                Money::zero()
            } else {
                good.total_sale_value
            };
            base.checked_add(batch).ok_or_else(|| ValidationError::Overflow {
                field: "total sale value".to_string(),
            })?
        }
    };

    good.quantity_sold += quantity;
    good.total_sale_value = total_sale_value;

    Ok(good)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_policy_serializes_snake_case() {
        let json = serde_json::to_string(&SaleTotalPolicy::Accumulate).unwrap();
        assert_eq!(json, "\"accumulate\"");

        let parsed: SaleTotalPolicy =
            serde_json::from_str("\"replace_with_latest_batch\"").unwrap();
        assert_eq!(parsed, SaleTotalPolicy::ReplaceWithLatestBatch);
        assert_eq!(parsed.to_string().parse::<SaleTotalPolicy>().unwrap(), parsed);
    }

    fn p1() -> GoodRegistration {
        GoodRegistration::new("P1", "Widget", Money::from_cents(1000), Money::from_cents(1500), 5)
            .description("Blue widget")
    }

    #[test]
    fn test_register_new_good() {
        let good = register_or_merge(None, p1()).unwrap();

        assert_eq!(good.quantity_purchased, 5);
        assert_eq!(good.quantity_sold, 0);
        assert_eq!(good.total_purchase_value, Money::from_cents(5000));
        // Projection: sale price × purchased, before anything is sold
        assert_eq!(good.total_sale_value, Money::from_cents(7500));
        assert_eq!(good.image_reference, None);
    }

    #[test]
    fn test_merge_uses_latest_purchase_price() {
        let good = register_or_merge(None, p1()).unwrap();
        let good = record_sale(good, 2, SaleTotalPolicy::default()).unwrap();

        let again = GoodRegistration::new(
            "P1",
            "Widget v2",
            Money::from_cents(1200),
            Money::from_cents(1800),
            3,
        )
        .description("Updated");
        let merged = register_or_merge(Some(good), again).unwrap();

        assert_eq!(merged.quantity_purchased, 8);
        assert_eq!(merged.purchase_unit_price, Money::from_cents(1200));
        assert_eq!(merged.total_purchase_value, Money::from_cents(9600));
        assert_eq!(merged.name, "Widget v2");
        assert_eq!(merged.description, "Updated");
        assert_eq!(merged.sale_unit_price, Money::from_cents(1800));
        // Sale side untouched by a purchase
        assert_eq!(merged.quantity_sold, 2);
        assert_eq!(merged.total_sale_value, Money::from_cents(3000));
    }

    #[test]
    fn test_merge_sums_quantities() {
        let quantities = [5, 1, 7, 2];
        let mut good: Option<Good> = None;
        for (i, qty) in quantities.iter().enumerate() {
            let price = Money::from_cents(100 + i as i64);
            let reg = GoodRegistration::new("Q", "Q", price, Money::from_cents(999), *qty);
            good = Some(register_or_merge(good, reg).unwrap());
        }

        let good = good.unwrap();
        assert_eq!(good.quantity_purchased, 15);
        assert_eq!(good.total_purchase_value, Money::from_cents(103 * 15));
    }

    #[test]
    fn test_merge_keeps_image_when_none_supplied() {
        let first = p1().image_reference("images/P1_Widget.png");
        let good = register_or_merge(None, first).unwrap();

        let merged = register_or_merge(Some(good), p1()).unwrap();
        assert_eq!(merged.image_reference.as_deref(), Some("images/P1_Widget.png"));

        let replaced = register_or_merge(Some(merged), p1().image_reference("images/new.png"))
            .unwrap();
        assert_eq!(replaced.image_reference.as_deref(), Some("images/new.png"));
    }

    #[test]
    fn test_register_rejects_bad_input() {
        let mut reg = p1();
        reg.quantity = 0;
        assert_eq!(register_or_merge(None, reg).unwrap_err().kind(), ErrorKind::InvalidInput);

        let mut reg = p1();
        reg.purchase_price = Money::zero();
        assert_eq!(register_or_merge(None, reg).unwrap_err().kind(), ErrorKind::InvalidInput);

        let mut reg = p1();
        reg.sale_price = Money::from_cents(-1);
        assert_eq!(register_or_merge(None, reg).unwrap_err().kind(), ErrorKind::InvalidInput);

        let mut reg = p1();
        reg.id = String::new();
        assert_eq!(register_or_merge(None, reg).unwrap_err().kind(), ErrorKind::InvalidInput);

        let mut reg = p1();
        reg.name = "  ".to_string();
        assert_eq!(register_or_merge(None, reg).unwrap_err().kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_add_stock_keeps_purchase_price() {
        let good = register_or_merge(None, p1()).unwrap();
        let good = add_stock(good, 10).unwrap();

        assert_eq!(good.quantity_purchased, 15);
        assert_eq!(good.purchase_unit_price, Money::from_cents(1000));
        assert_eq!(good.total_purchase_value, Money::from_cents(15000));
    }

    #[test]
    fn test_add_stock_rejects_non_positive() {
        let good = register_or_merge(None, p1()).unwrap();
        assert!(add_stock(good.clone(), 0).is_err());
        assert!(add_stock(good, -4).is_err());
    }

    #[test]
    fn test_sale_replaces_total_by_default() {
        let good = register_or_merge(None, p1()).unwrap();

        let good = record_sale(good, 3, SaleTotalPolicy::ReplaceWithLatestBatch).unwrap();
        assert_eq!(good.quantity_sold, 3);
        assert_eq!(good.total_sale_value, Money::from_cents(4500));
        assert_eq!(good.profit_estimated_total(), Money::from_cents(1500));

        let good = record_sale(good, 2, SaleTotalPolicy::ReplaceWithLatestBatch).unwrap();
        assert_eq!(good.quantity_sold, 5);
        assert_eq!(good.total_sale_value, Money::from_cents(3000));
    }

    #[test]
    fn test_sale_accumulates_when_configured() {
        let good = register_or_merge(None, p1()).unwrap();

        let good = record_sale(good, 3, SaleTotalPolicy::Accumulate).unwrap();
        assert_eq!(good.total_sale_value, Money::from_cents(4500));

        let good = record_sale(good, 2, SaleTotalPolicy::Accumulate).unwrap();
        assert_eq!(good.total_sale_value, Money::from_cents(7500));
    }

    #[test]
    fn test_sale_beyond_stock_is_rejected() {
        let good = register_or_merge(None, p1()).unwrap();
        let good = record_sale(good, 3, SaleTotalPolicy::default()).unwrap();

        let err = record_sale(good.clone(), 3, SaleTotalPolicy::default()).unwrap_err();
        match err {
            CoreError::InsufficientStock {
                id,
                available,
                requested,
            } => {
                assert_eq!(id, "P1");
                assert_eq!(available, 2);
                assert_eq!(requested, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // Selling exactly what is left is fine
        let good = record_sale(good, 2, SaleTotalPolicy::default()).unwrap();
        assert_eq!(good.remaining_quantity(), 0);
    }

    #[test]
    fn test_sale_rejects_non_positive_quantity() {
        let good = register_or_merge(None, p1()).unwrap();
        let err = record_sale(good, 0, SaleTotalPolicy::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_overflow_is_invalid_input() {
        let reg = GoodRegistration::new(
            "BIG",
            "Big",
            Money::from_cents(i64::MAX / 2),
            Money::from_cents(1),
            3,
        );
        let err = register_or_merge(None, reg).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_merge_rejects_unbounded_sale_price() {
        let small = GoodRegistration::new("X", "X", Money::from_cents(1), Money::from_cents(1), 1);
        let good = register_or_merge(None, small).unwrap();

        let huge = GoodRegistration::new(
            "X",
            "X",
            Money::from_cents(1),
            Money::from_cents(9_000_000_000_000_000),
            1024,
        );
        let err = register_or_merge(Some(good), huge).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_merge_and_restock_bound_the_sale_projection() {
        let reg = GoodRegistration::new("X", "X", Money::from_cents(1), Money::from_cents(1), 1);
        let mut good = register_or_merge(None, reg).unwrap();
        good.quantity_purchased = i64::MAX / 1_000;
        good.sale_unit_price = Money::from_cents(2_000);

        // Purchase total still fits at 1 cent; the sale projection does not
        let merge = GoodRegistration::new("X", "X", Money::from_cents(1), Money::from_cents(2_000), 1);
        let err = register_or_merge(Some(good.clone()), merge).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Overflow { .. })));

        let err = add_stock(good.clone(), 1).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Overflow { .. })));

        // Selling everything on hand keeps profit in range
        good.sale_unit_price = Money::from_cents(1_000);
        let sold = record_sale(good.clone(), crate::MAX_MOVEMENT_QUANTITY, SaleTotalPolicy::Accumulate)
            .unwrap();
        assert_eq!(
            sold.profit_estimated_total(),
            Money::from_cents(999 * crate::MAX_MOVEMENT_QUANTITY)
        );
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            "accumulate".parse::<SaleTotalPolicy>().unwrap(),
            SaleTotalPolicy::Accumulate
        );
        assert_eq!(
            "Replace".parse::<SaleTotalPolicy>().unwrap(),
            SaleTotalPolicy::ReplaceWithLatestBatch
        );
        assert!("average".parse::<SaleTotalPolicy>().is_err());
        assert_eq!(SaleTotalPolicy::default().to_string(), "replace_with_latest_batch");
    }
}
