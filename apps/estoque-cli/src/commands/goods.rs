//! # Good Commands
//!
//! One handler per menu action. Each takes raw form text, parses it with the
//! core validators, runs one ledger operation and returns the result.
//!
//! ## Example Flow: Record Sale
//! ```text
//! Menu "Record sale"
//!       │ id = "P1", quantity = "3"
//!       ▼
//! record_sale(ledger, "P1", "3")
//!       │ parse_quantity("3") → 3
//!       ▼
//! ledger.record_sale("P1", 3) ──► Good { quantity_sold: 3, .. }
//! ```

use std::path::PathBuf;
use tracing::debug;

use estoque_core::validation::{parse_price, parse_quantity};
use estoque_core::{Good, GoodRegistration};
use estoque_db::Ledger;

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::images::ImageStore;

/// Raw answers from the registration form.
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub id: String,
    pub name: String,
    pub purchase_price: String,
    pub sale_price: String,
    pub quantity: String,
    pub description: String,
    /// Artwork to copy, if the user gave one.
    pub image_source: Option<PathBuf>,
}

/// Registers a new good or merges a repeat purchase.
///
/// Numbers are parsed before any artwork is copied.
pub async fn register_good(
    ledger: &Ledger,
    images: &ImageStore,
    form: RegisterForm,
) -> AppResult<Good> {
    debug!(id = %form.id, "Registering good");

    let purchase_price = parse_price("purchase price", &form.purchase_price)?;
    let sale_price = parse_price("sale price", &form.sale_price)?;
    let quantity = parse_quantity(&form.quantity)?;

    let id = form.id.trim().to_string();
    let name = form.name.trim().to_string();

    let mut reg = GoodRegistration::new(id, name, purchase_price, sale_price, quantity)
        .description(form.description.trim());

    if let Some(source) = &form.image_source {
        let reference = images.store(source, &reg.id, &reg.name)?;
        reg = reg.image_reference(reference);
    }

    Ok(ledger.register_or_merge(reg).await?)
}

/// Adds units to an existing good.
pub async fn add_stock(ledger: &Ledger, id: &str, quantity: &str) -> AppResult<Good> {
    let quantity = parse_quantity(quantity)?;
    Ok(ledger.add_stock(id.trim(), quantity).await?)
}

/// Records a sale.
pub async fn record_sale(ledger: &Ledger, id: &str, quantity: &str) -> AppResult<Good> {
    let quantity = parse_quantity(quantity)?;
    Ok(ledger.record_sale(id.trim(), quantity).await?)
}

/// Deletes a good.
pub async fn delete_good(ledger: &Ledger, id: &str) -> AppResult<()> {
    Ok(ledger.delete(id.trim()).await?)
}

/// Loads one good.
pub async fn show_good(ledger: &Ledger, id: &str) -> AppResult<Good> {
    Ok(ledger.get(id.trim()).await?)
}

/// Lists goods, filtered when `filter` is non-empty.
pub async fn list_goods(ledger: &Ledger, filter: &str) -> AppResult<Vec<Good>> {
    let filter = filter.trim();
    let filter = (!filter.is_empty()).then_some(filter);
    Ok(ledger.list(filter).await?)
}

// =============================================================================
// Rendering
// =============================================================================

/// Multi-line detail view of one good.
pub fn format_details(good: &Good, config: &AppConfig) -> String {
    let money = |m| config.format_currency(m);

    let mut lines = vec![
        format!("ID:                    {}", good.id),
        format!("Name:                  {}", good.name),
        format!("Description:           {}", good.description),
        format!("Purchase price:        {}", money(good.purchase_unit_price)),
        format!("Sale price:            {}", money(good.sale_unit_price)),
        format!("Quantity purchased:    {}", good.quantity_purchased),
        format!("Quantity sold:         {}", good.quantity_sold),
        format!("Quantity remaining:    {}", good.remaining_quantity()),
        format!("Total purchase value:  {}", money(good.total_purchase_value)),
        format!("Total sale value:      {}", money(good.total_sale_value)),
        format!("Profit per unit:       {}", money(good.profit_per_unit())),
        format!("Estimated profit:      {}", money(good.profit_estimated_total())),
    ];
    if let Some(image) = &good.image_reference {
        lines.push(format!("Image:                 {}", image));
    }

    lines.join("\n")
}

const TABLE_HEADERS: [&str; 8] = [
    "ID", "Name", "Purchase", "Sale", "Bought", "Sold", "Left", "Profit",
];

/// Fixed-width table of goods, one row per good.
pub fn format_table(goods: &[Good], config: &AppConfig) -> String {
    if goods.is_empty() {
        return "No goods found.".to_string();
    }

    let rows: Vec<[String; 8]> = goods
        .iter()
        .map(|g| {
            [
                g.id.clone(),
                g.name.clone(),
                config.format_currency(g.purchase_unit_price),
                config.format_currency(g.sale_unit_price),
                g.quantity_purchased.to_string(),
                g.quantity_sold.to_string(),
                g.remaining_quantity().to_string(),
                config.format_currency(g.profit_estimated_total()),
            ]
        })
        .collect();

    let mut widths = TABLE_HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: &[String]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = TABLE_HEADERS.iter().map(|h| h.to_string()).collect();
    let mut out = vec![render(&header)];
    out.push(widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "));
    out.extend(rows.iter().map(|row| render(row)));

    out.join("\n")
}
