//! # Reports
//!
//! Read-only text renderings of a ledger snapshot.
//!
//! ## Inventory Report
//! ```text
//! INVENTORY REPORT
//! Generated: 19/10/2026 14:30
//! ============================================================
//! Widget - ID: P1 - Purchased: 5, Sold: 3, Profit: R$15.00
//! Gadget - ID: P2 - Purchased: 4, Sold: 1, Profit: -R$1.00
//! ------------------------------------------------------------
//! Goods: 2
//! Units purchased: 9 | sold: 4 | remaining: 5
//! Total purchase value: R$58.00
//! Estimated profit: R$14.00
//! ```
//!
//! ## Profit Chart
//! ```text
//! PROFIT BY GOOD
//! Widget | ########################################  R$15.00
//! Gadget | ---                                      -R$1.00
//! ```
//!
//! Bars are scaled to the largest absolute profit. Negative profit uses `-`.

use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use estoque_core::{Good, InventorySummary};
use estoque_db::Ledger;

use crate::config::format_money;
use crate::error::AppResult;

/// Width of the longest bar in the profit chart.
pub const CHART_WIDTH: usize = 40;

const REPORT_FILE: &str = "inventory_report.txt";
const CHART_FILE: &str = "profit_chart.txt";
const RULE_WIDTH: usize = 60;

/// Renders the inventory report.
pub fn render_inventory_report(goods: &[Good], now: NaiveDateTime, currency: &str) -> String {
    let mut out = String::new();

    out.push_str("INVENTORY REPORT\n");
    out.push_str(&format!("Generated: {}\n", now.format("%d/%m/%Y %H:%M")));
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');

    if goods.is_empty() {
        out.push_str("No goods registered.\n");
    }

    for good in goods {
        out.push_str(&format!(
            "{} - ID: {} - Purchased: {}, Sold: {}, Profit: {}\n",
            good.name,
            good.id,
            good.quantity_purchased,
            good.quantity_sold,
            format_money(currency, good.profit_estimated_total())
        ));
    }

    let summary = InventorySummary::from_goods(goods);
    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');
    out.push_str(&format!("Goods: {}\n", summary.goods));
    out.push_str(&format!(
        "Units purchased: {} | sold: {} | remaining: {}\n",
        summary.units_purchased, summary.units_sold, summary.units_remaining
    ));
    out.push_str(&format!(
        "Total purchase value: {}\n",
        format_money(currency, summary.total_purchase_value)
    ));
    out.push_str(&format!(
        "Estimated profit: {}\n",
        format_money(currency, summary.total_estimated_profit)
    ));

    out
}

/// Renders a horizontal bar chart of estimated profit per good.
pub fn render_profit_chart(goods: &[Good], width: usize, currency: &str) -> String {
    let mut out = String::from("PROFIT BY GOOD\n");

    if goods.is_empty() {
        out.push_str("No goods registered.\n");
        return out;
    }

    let label_width = goods
        .iter()
        .map(|g| g.name.chars().count())
        .max()
        .unwrap_or(0);
    let max_abs = goods
        .iter()
        .map(|g| g.profit_estimated_total().cents().unsigned_abs())
        .max()
        .unwrap_or(0);

    for good in goods {
        let profit = good.profit_estimated_total();
        let len = bar_length(profit.cents().unsigned_abs(), max_abs, width);
        let glyph = if profit.is_negative() { '-' } else { '#' };
        let bar: String = std::iter::repeat(glyph).take(len).collect();

        out.push_str(&format!(
            "{:<label_width$} | {:<width$}  {}\n",
            good.name,
            bar,
            format_money(currency, profit),
        ));
    }

    out
}

/// Scales `value` against `max` onto `0..=width`; non-zero values get at
/// least one cell.
fn bar_length(value: u64, max: u64, width: usize) -> usize {
    if max == 0 || value == 0 {
        return 0;
    }
    let scaled = (value as u128 * width as u128 + max as u128 / 2) / max as u128;
    (scaled as usize).clamp(1, width)
}

/// Paths written by [`export_reports`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedReports {
    pub inventory_report: PathBuf,
    pub profit_chart: PathBuf,
}

/// Writes both reports for the ledger's current contents into `reports_dir`.
pub async fn export_reports(
    ledger: &Ledger,
    reports_dir: &Path,
    now: NaiveDateTime,
    currency: &str,
) -> AppResult<ExportedReports> {
    let goods = ledger.list(None).await?;

    fs::create_dir_all(reports_dir)?;

    let inventory_report = reports_dir.join(REPORT_FILE);
    fs::write(
        &inventory_report,
        render_inventory_report(&goods, now, currency),
    )?;

    let profit_chart = reports_dir.join(CHART_FILE);
    fs::write(&profit_chart, render_profit_chart(&goods, CHART_WIDTH, currency))?;

    info!(dir = %reports_dir.display(), goods = goods.len(), "Reports exported");
    Ok(ExportedReports {
        inventory_report,
        profit_chart,
    })
}
