//! # Good Repository
//!
//! Row access for the `mercadorias` table.
//!
//! ## Row Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  mercadorias row                         Good                           │
//! │  ─────────────────                       ──────────────────────         │
//! │  id                TEXT  ─────────────►  id                             │
//! │  nome              TEXT  ─────────────►  name                           │
//! │  preco_compra      REAL  ─(× 100)─────►  purchase_unit_price (cents)    │
//! │  preco_venda       REAL  ─(× 100)─────►  sale_unit_price (cents)        │
//! │  qtd_comprada      INT   ─────────────►  quantity_purchased             │
//! │  qtd_saida         INT   ─────────────►  quantity_sold                  │
//! │  descricao         TEXT  ─────────────►  description                    │
//! │  valor_total_compra REAL ─(× 100)─────►  total_purchase_value           │
//! │  valor_total_venda REAL  ─(× 100)─────►  total_sale_value               │
//! │  imagem_path       TEXT  ─────────────►  image_reference                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every column except `id` is nullable in stores written by older versions;
//! NULL decodes to an empty string or zero.
//!
//! Writes apply no stock rules, so they stay crate-private and are reached
//! only through [`crate::Ledger`]. [`GoodRepository`] is read-only.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use estoque_core::{Good, Money};

/// Column list shared by every SELECT, in table order.
const GOOD_COLUMNS: &str = "id, nome, preco_compra, preco_venda, qtd_comprada, qtd_saida, \
     descricao, valor_total_compra, valor_total_venda, imagem_path";

// =============================================================================
// Typed Row
// =============================================================================

/// One `mercadorias` row as stored.
///
/// Money columns are rounded to whole cents on decode, so a legacy price such
/// as `2.346` reads back as `2.35` and the next merge or restock rewrites
/// `valor_total_compra` from the rounded price.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct GoodRecord {
    pub id: String,
    #[sqlx(rename = "nome")]
    pub name: Option<String>,
    #[sqlx(rename = "preco_compra")]
    pub purchase_unit_price: Option<f64>,
    #[sqlx(rename = "preco_venda")]
    pub sale_unit_price: Option<f64>,
    #[sqlx(rename = "qtd_comprada")]
    pub quantity_purchased: Option<i64>,
    #[sqlx(rename = "qtd_saida")]
    pub quantity_sold: Option<i64>,
    #[sqlx(rename = "descricao")]
    pub description: Option<String>,
    #[sqlx(rename = "valor_total_compra")]
    pub total_purchase_value: Option<f64>,
    #[sqlx(rename = "valor_total_venda")]
    pub total_sale_value: Option<f64>,
    #[sqlx(rename = "imagem_path")]
    pub image_path: Option<String>,
}

fn money(value: Option<f64>) -> Money {
    value.map(Money::from_stored_real).unwrap_or_default()
}

impl From<GoodRecord> for Good {
    fn from(row: GoodRecord) -> Self {
        Good {
            id: row.id,
            name: row.name.unwrap_or_default(),
            description: row.description.unwrap_or_default(),
            purchase_unit_price: money(row.purchase_unit_price),
            sale_unit_price: money(row.sale_unit_price),
            quantity_purchased: row.quantity_purchased.unwrap_or(0),
            quantity_sold: row.quantity_sold.unwrap_or(0),
            total_purchase_value: money(row.total_purchase_value),
            total_sale_value: money(row.total_sale_value),
            // Older stores wrote "" for "no image"
            image_reference: row.image_path.filter(|p| !p.is_empty()),
        }
    }
}

// =============================================================================
// Connection-level Queries
// =============================================================================
//
// These take a bare connection so callers can pass `&mut *tx` and keep a
// read-modify-write sequence inside one transaction.

/// Loads a good by id.
pub(crate) async fn fetch(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Good>> {
    debug!(id = %id, "Fetching good");

    let sql = format!("SELECT {GOOD_COLUMNS} FROM mercadorias WHERE id = ?1");
    let row: Option<GoodRecord> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row.map(Good::from))
}

/// Loads every good in insertion order.
pub(crate) async fn fetch_all(conn: &mut SqliteConnection) -> DbResult<Vec<Good>> {
    let sql = format!("SELECT {GOOD_COLUMNS} FROM mercadorias ORDER BY rowid");
    let rows: Vec<GoodRecord> = sqlx::query_as(&sql).fetch_all(&mut *conn).await?;

    debug!(count = rows.len(), "Fetched goods");
    Ok(rows.into_iter().map(Good::from).collect())
}

/// Inserts a new good.
///
/// ## Returns
/// * `Err(DbError::UniqueViolation)` - id already exists
pub(crate) async fn insert(conn: &mut SqliteConnection, good: &Good) -> DbResult<()> {
    debug!(id = %good.id, "Inserting good");

    sqlx::query(
        r#"
        INSERT INTO mercadorias (
            id, nome, preco_compra, preco_venda, qtd_comprada, qtd_saida,
            descricao, valor_total_compra, valor_total_venda, imagem_path
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
    )
    .bind(&good.id)
    .bind(&good.name)
    .bind(good.purchase_unit_price.to_stored_real())
    .bind(good.sale_unit_price.to_stored_real())
    .bind(good.quantity_purchased)
    .bind(good.quantity_sold)
    .bind(&good.description)
    .bind(good.total_purchase_value.to_stored_real())
    .bind(good.total_sale_value.to_stored_real())
    .bind(good.image_reference.as_deref())
    .execute(&mut *conn)
    .await
    .map_err(|e| match DbError::from(e) {
        DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &good.id),
        other => other,
    })?;

    Ok(())
}

/// Overwrites every column of an existing good.
///
/// ## Returns
/// * `Err(DbError::NotFound)` - no row with that id
pub(crate) async fn update(conn: &mut SqliteConnection, good: &Good) -> DbResult<()> {
    debug!(id = %good.id, "Updating good");

    let result = sqlx::query(
        r#"
        UPDATE mercadorias SET
            nome = ?2,
            preco_compra = ?3,
            preco_venda = ?4,
            qtd_comprada = ?5,
            qtd_saida = ?6,
            descricao = ?7,
            valor_total_compra = ?8,
            valor_total_venda = ?9,
            imagem_path = ?10
        WHERE id = ?1
        "#,
    )
    .bind(&good.id)
    .bind(&good.name)
    .bind(good.purchase_unit_price.to_stored_real())
    .bind(good.sale_unit_price.to_stored_real())
    .bind(good.quantity_purchased)
    .bind(good.quantity_sold)
    .bind(&good.description)
    .bind(good.total_purchase_value.to_stored_real())
    .bind(good.total_sale_value.to_stored_real())
    .bind(good.image_reference.as_deref())
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Good", &good.id));
    }

    Ok(())
}

/// Permanently removes a good.
///
/// ## Returns
/// * `Err(DbError::NotFound)` - no row with that id
pub(crate) async fn delete(conn: &mut SqliteConnection, id: &str) -> DbResult<()> {
    debug!(id = %id, "Deleting good");

    let result = sqlx::query("DELETE FROM mercadorias WHERE id = ?1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Good", id));
    }

    Ok(())
}

// =============================================================================
// Repository
// =============================================================================

/// Read-only access to good rows.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.goods();
/// let all = repo.list().await?;
/// let one = repo.get("P1").await?;
/// ```
#[derive(Debug, Clone)]
pub struct GoodRepository {
    pool: SqlitePool,
}

impl GoodRepository {
    /// Creates a new GoodRepository.
    pub fn new(pool: SqlitePool) -> Self {
        GoodRepository { pool }
    }

    /// Gets a good by id.
    pub async fn get(&self, id: &str) -> DbResult<Option<Good>> {
        let mut conn = self.pool.acquire().await?;
        fetch(&mut conn, id).await
    }

    /// Lists every good in insertion order.
    pub async fn list(&self) -> DbResult<Vec<Good>> {
        let mut conn = self.pool.acquire().await?;
        fetch_all(&mut conn).await
    }

    /// Counts stored goods.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mercadorias")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
