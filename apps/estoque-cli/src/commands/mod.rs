//! # Menu Commands
//!
//! The main menu loop and the dispatch from a chosen [`MenuAction`] to its
//! handler.
//!
//! ## Module Structure
//! ```text
//! commands/
//! ├── mod.rs    ← Menu loop and dispatch (this file)
//! ├── goods.rs  ← Register, stock, sale, details, delete, list
//! └── store.rs  ← Backup and report export
//! ```
//!
//! ## Error Handling
//! A failed action prints `Error: ...` and returns to the menu. Only a broken
//! terminal ends the loop early.

pub mod goods;
pub mod store;

use std::path::PathBuf;
use tracing::debug;

use estoque_db::Session;

use crate::backup::list_backups;
use crate::config::AppConfig;
use crate::error::{AppResult, ErrorCode};
use crate::images::ImageStore;
use crate::prompt::Prompt;

use goods::RegisterForm;

/// Entries of the main menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Register,
    AddStock,
    Sell,
    Details,
    Delete,
    List,
    Backup,
    Export,
    Quit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 9] = [
        MenuAction::Register,
        MenuAction::AddStock,
        MenuAction::Sell,
        MenuAction::Details,
        MenuAction::Delete,
        MenuAction::List,
        MenuAction::Backup,
        MenuAction::Export,
        MenuAction::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Register => "Register purchase",
            MenuAction::AddStock => "Add stock",
            MenuAction::Sell => "Record sale",
            MenuAction::Details => "Show details",
            MenuAction::Delete => "Delete good",
            MenuAction::List => "List goods",
            MenuAction::Backup => "Back up database",
            MenuAction::Export => "Export reports",
            MenuAction::Quit => "Quit",
        }
    }

    /// Actions after which the goods table is shown again.
    fn changes_goods(self) -> bool {
        matches!(
            self,
            MenuAction::Register | MenuAction::AddStock | MenuAction::Sell | MenuAction::Delete
        )
    }
}

/// Shows the menu until the user quits or backs out.
pub async fn run_menu(
    session: &Session,
    config: &AppConfig,
    prompt: &mut impl Prompt,
) -> AppResult<()> {
    let labels: Vec<String> = MenuAction::ALL
        .iter()
        .map(|action| action.label().to_string())
        .collect();

    loop {
        let action = match prompt.select("What do you want to do?", &labels)? {
            Some(idx) => MenuAction::ALL[idx],
            None => break,
        };
        if action == MenuAction::Quit {
            break;
        }

        debug!(?action, "Menu action");
        match dispatch(action, session, config, prompt).await {
            Ok(()) if action.changes_goods() => {
                let goods = session.ledger().list(None).await?;
                prompt.show(&goods::format_table(&goods, config));
            }
            Ok(()) => {}
            Err(err) if err.code == ErrorCode::Terminal => return Err(err),
            Err(err) => prompt.show(&format!("Error: {}", err)),
        }
    }

    Ok(())
}

/// Collects the answers for `action` and runs it.
pub async fn dispatch(
    action: MenuAction,
    session: &Session,
    config: &AppConfig,
    prompt: &mut impl Prompt,
) -> AppResult<()> {
    let ledger = session.ledger();

    match action {
        MenuAction::Register => {
            let form = RegisterForm {
                id: prompt.input("ID")?,
                name: prompt.input("Name")?,
                description: prompt.input("Description")?,
                purchase_price: prompt.input("Purchase price")?,
                sale_price: prompt.input("Sale price")?,
                quantity: prompt.input("Quantity")?,
                image_source: optional_path(prompt.input("Image file (optional)")?),
            };
            let images = ImageStore::new(config.images_path());
            let good = goods::register_good(ledger, &images, form).await?;
            prompt.show(&format!("Registered {} ({}).", good.name, good.id));
        }
        MenuAction::AddStock => {
            let id = prompt.input("ID")?;
            let quantity = prompt.input("Quantity to add")?;
            let good = goods::add_stock(ledger, &id, &quantity).await?;
            prompt.show(&format!(
                "{} now has {} units in stock.",
                good.id,
                good.remaining_quantity()
            ));
        }
        MenuAction::Sell => {
            let id = prompt.input("ID")?;
            let quantity = prompt.input("Quantity sold")?;
            let good = goods::record_sale(ledger, &id, &quantity).await?;
            prompt.show(&format!(
                "Sale recorded. {} units of {} left.",
                good.remaining_quantity(),
                good.id
            ));
        }
        MenuAction::Details => {
            let id = prompt.input("ID")?;
            let good = goods::show_good(ledger, &id).await?;
            prompt.show(&goods::format_details(&good, config));
        }
        MenuAction::Delete => {
            let id = prompt.input("ID")?;
            let good = goods::show_good(ledger, &id).await?;
            if prompt.confirm(&format!("Delete {} ({})?", good.name, good.id))? {
                goods::delete_good(ledger, &good.id).await?;
                prompt.show(&format!("Deleted {}.", good.id));
            } else {
                prompt.show("Nothing deleted.");
            }
        }
        MenuAction::List => {
            let filter = prompt.input("Filter by ID or name (optional)")?;
            let found = goods::list_goods(ledger, &filter).await?;
            prompt.show(&goods::format_table(&found, config));
        }
        MenuAction::Backup => {
            let target = store::backup(session, config).await?;
            prompt.show(&format!("Backup saved to {}", target.display()));

            let existing = list_backups(&config.backups_path())?;
            prompt.show(&format!("Backups (newest first):\n{}", existing.join("\n")));
        }
        MenuAction::Export => {
            let exported = store::export(session, config).await?;
            prompt.show(&format!(
                "Reports saved to {} and {}",
                exported.inventory_report.display(),
                exported.profit_chart.display()
            ));
        }
        MenuAction::Quit => {}
    }

    Ok(())
}

fn optional_path(answer: String) -> Option<PathBuf> {
    let trimmed = answer.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}
