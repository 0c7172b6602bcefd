//! # Inventory Ledger
//!
//! The service that owns goods: it applies the stock rules from
//! [`estoque_core::stock`] and persists the result.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ledger.record_sale("P1", 3)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  good::fetch(&mut *tx, "P1") ── None ──► GoodNotFound (rollback)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  stock::record_sale(good, 3, policy) ── Err ──► InsufficientStock      │
//! │       │                                           (rollback)           │
//! │       ▼                                                                 │
//! │  good::update(&mut *tx, &good)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT ──► updated Good returned to the caller                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A dropped transaction rolls back, so every early `?` return leaves the
//! store untouched.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use estoque_core::{stock, CoreError, Good, GoodRegistration, InventorySummary, SaleTotalPolicy};

use crate::error::{DbError, StoreResult};
use crate::repository::good;

/// Inventory ledger over the `mercadorias` table.
///
/// ## Usage
/// ```rust,ignore
/// let ledger = session.ledger();
/// ledger
///     .register_or_merge(GoodRegistration::new("P1", "Widget", pc, pv, 5))
///     .await?;
/// ledger.record_sale("P1", 3).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Ledger {
    pool: SqlitePool,
    policy: SaleTotalPolicy,
}

impl Ledger {
    /// Creates a ledger over `pool` that applies `policy` to sales.
    pub fn new(pool: SqlitePool, policy: SaleTotalPolicy) -> Self {
        Ledger { pool, policy }
    }

    /// The sale-total policy in effect.
    pub fn policy(&self) -> SaleTotalPolicy {
        self.policy
    }

    /// Creates a good or merges a repeat purchase into it.
    ///
    /// Any artwork must already be stored; `reg.image_reference` carries its
    /// reference.
    pub async fn register_or_merge(&self, reg: GoodRegistration) -> StoreResult<Good> {
        let mut tx = self.pool.begin().await?;

        let existing = good::fetch(&mut *tx, &reg.id).await?;
        let is_new = existing.is_none();
        let merged = stock::register_or_merge(existing, reg)?;

        if is_new {
            good::insert(&mut *tx, &merged).await?;
        } else {
            good::update(&mut *tx, &merged).await?;
        }

        tx.commit().await?;

        info!(
            id = %merged.id,
            quantity_purchased = merged.quantity_purchased,
            merged = !is_new,
            "Good registered"
        );
        Ok(merged)
    }

    /// Adds units at the good's current purchase price.
    pub async fn add_stock(&self, id: &str, quantity: i64) -> StoreResult<Good> {
        let mut tx = self.pool.begin().await?;

        let current = load(&mut *tx, id).await?;
        let updated = stock::add_stock(current, quantity)?;
        good::update(&mut *tx, &updated).await?;

        tx.commit().await?;

        info!(
            id = %id,
            quantity,
            quantity_purchased = updated.quantity_purchased,
            "Stock added"
        );
        Ok(updated)
    }

    /// Records a sale of `quantity` units.
    ///
    /// ## Errors
    /// * `InsufficientStock` - the sale exceeds remaining units; nothing changes
    /// * `GoodNotFound` - unknown id
    pub async fn record_sale(&self, id: &str, quantity: i64) -> StoreResult<Good> {
        let mut tx = self.pool.begin().await?;

        let current = load(&mut *tx, id).await?;
        let updated = match stock::record_sale(current, quantity, self.policy) {
            Ok(good) => good,
            Err(err) => {
                if let CoreError::InsufficientStock { available, .. } = &err {
                    warn!(id = %id, requested = quantity, available, "Sale rejected");
                }
                return Err(err.into());
            }
        };
        good::update(&mut *tx, &updated).await?;

        tx.commit().await?;

        info!(
            id = %id,
            quantity,
            quantity_sold = updated.quantity_sold,
            "Sale recorded"
        );
        Ok(updated)
    }

    /// Permanently removes a good.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        good::delete(&mut *tx, id).await.map_err(|e| not_found_as_core(e, id))?;

        tx.commit().await?;

        info!(id = %id, "Good deleted");
        Ok(())
    }

    /// Returns one good.
    pub async fn get(&self, id: &str) -> StoreResult<Good> {
        let mut conn = self.pool.acquire().await?;
        load(&mut conn, id).await
    }

    /// Lists goods whose id, name or description contains `filter`,
    /// ignoring case, in insertion order.
    ///
    /// `None` and `Some("")` both list everything.
    pub async fn list(&self, filter: Option<&str>) -> StoreResult<Vec<Good>> {
        let mut conn = self.pool.acquire().await?;
        let goods = good::fetch_all(&mut conn).await?;

        // Filtering happens here: SQLite's LIKE only folds ASCII case
        let goods: Vec<Good> = goods
            .into_iter()
            .filter(|g| g.matches_filter(filter))
            .collect();

        debug!(filter = ?filter, count = goods.len(), "Listed goods");
        Ok(goods)
    }

    /// Counts stored goods.
    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mercadorias")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Aggregate figures over the current contents.
    pub async fn summary(&self) -> StoreResult<InventorySummary> {
        let goods = self.list(None).await?;
        Ok(InventorySummary::from_goods(&goods))
    }
}

async fn load(conn: &mut SqliteConnection, id: &str) -> StoreResult<Good> {
    good::fetch(conn, id)
        .await?
        .ok_or_else(|| CoreError::GoodNotFound(id.to_string()).into())
}

fn not_found_as_core(err: DbError, id: &str) -> crate::error::StoreError {
    match err {
        DbError::NotFound { .. } => CoreError::GoodNotFound(id.to_string()).into(),
        other => other.into(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use estoque_core::{ErrorKind, Money};

    async fn ledger(policy: SaleTotalPolicy) -> Ledger {
        Database::new(DbConfig::in_memory()).await.unwrap().ledger(policy)
    }

    fn reg(id: &str, pc: i64, pv: i64, qty: i64) -> GoodRegistration {
        GoodRegistration::new(id, "Widget", Money::from_cents(pc), Money::from_cents(pv), qty)
    }

    #[tokio::test]
    async fn test_register_persists() {
        let ledger = ledger(SaleTotalPolicy::default()).await;

        let created = ledger
            .register_or_merge(reg("P1", 1000, 1500, 5).description("Blue"))
            .await
            .unwrap();

        assert_eq!(ledger.get("P1").await.unwrap(), created);
        assert_eq!(created.total_sale_value, Money::from_cents(7500));
        assert_eq!(ledger.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_merge_keeps_image_when_absent() {
        let ledger = ledger(SaleTotalPolicy::default()).await;

        ledger
            .register_or_merge(reg("P1", 1000, 1500, 5).image_reference("imgs/P1_Widget.png"))
            .await
            .unwrap();
        let merged = ledger.register_or_merge(reg("P1", 1200, 1800, 5)).await.unwrap();

        assert_eq!(merged.quantity_purchased, 10);
        assert_eq!(merged.total_purchase_value, Money::from_cents(12000));
        assert_eq!(merged.image_reference.as_deref(), Some("imgs/P1_Widget.png"));
        assert_eq!(ledger.get("P1").await.unwrap(), merged);
    }

    #[tokio::test]
    async fn test_invalid_registration_writes_nothing() {
        let ledger = ledger(SaleTotalPolicy::default()).await;

        let err = ledger.register_or_merge(reg("P1", 0, 1500, 5)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(ledger.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rejected_sale_leaves_state() {
        let ledger = ledger(SaleTotalPolicy::default()).await;
        ledger.register_or_merge(reg("P1", 1000, 1500, 2)).await.unwrap();
        let before = ledger.get("P1").await.unwrap();

        let err = ledger.record_sale("P1", 3).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientStock);
        assert_eq!(ledger.get("P1").await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_missing_ids() {
        let ledger = ledger(SaleTotalPolicy::default()).await;

        for err in [
            ledger.add_stock("nope", 1).await.unwrap_err(),
            ledger.record_sale("nope", 1).await.unwrap_err(),
            ledger.delete("nope").await.unwrap_err(),
            ledger.get("nope").await.unwrap_err(),
        ] {
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }
    }

    #[tokio::test]
    async fn test_accumulate_policy() {
        let ledger = ledger(SaleTotalPolicy::Accumulate).await;
        assert_eq!(ledger.policy(), SaleTotalPolicy::Accumulate);
        ledger.register_or_merge(reg("P1", 1000, 1500, 5)).await.unwrap();

        ledger.record_sale("P1", 2).await.unwrap();
        let good = ledger.record_sale("P1", 1).await.unwrap();

        assert_eq!(good.quantity_sold, 3);
        assert_eq!(good.total_sale_value, Money::from_cents(4500));
    }

    #[tokio::test]
    async fn test_list_filter_unicode_case() {
        let ledger = ledger(SaleTotalPolicy::default()).await;
        ledger
            .register_or_merge(
                GoodRegistration::new("A1", "AÇÚCAR", Money::from_cents(300), Money::from_cents(500), 1)
                    .description("Refinado"),
            )
            .await
            .unwrap();
        ledger.register_or_merge(reg("B2", 100, 200, 1)).await.unwrap();

        let hits = ledger.list(Some("açúcar")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "A1");

        assert_eq!(ledger.list(Some("REFIN")).await.unwrap().len(), 1);
        assert_eq!(ledger.list(Some("b2")).await.unwrap().len(), 1);
        assert!(ledger.list(Some("zzz")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_summary() {
        let ledger = ledger(SaleTotalPolicy::default()).await;
        ledger.register_or_merge(reg("P1", 1000, 1500, 5)).await.unwrap();
        ledger.register_or_merge(reg("P2", 200, 100, 4)).await.unwrap();
        ledger.record_sale("P1", 3).await.unwrap();
        ledger.record_sale("P2", 1).await.unwrap();

        let summary = ledger.summary().await.unwrap();
        assert_eq!(summary.goods, 2);
        assert_eq!(summary.units_purchased, 9);
        assert_eq!(summary.units_sold, 4);
        assert_eq!(summary.units_remaining, 5);
        assert_eq!(summary.total_purchase_value, Money::from_cents(5800));
        assert_eq!(summary.total_estimated_profit, Money::from_cents(1400));
    }
}
