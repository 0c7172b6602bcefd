//! # Seed Data Generator
//!
//! Populates a store with demo goods and a demo login for development.
//!
//! ## Usage
//! ```bash
//! # Generate 50 goods (default)
//! cargo run -p estoque-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p estoque-db --bin seed -- --count 200
//!
//! # Specify database path
//! cargo run -p estoque-db --bin seed -- --db ./data/stock_control.db
//! ```
//!
//! Goods go through the ledger, so totals obey the same rules as the
//! terminal front end. Each good gets:
//! - Id: `{CATEGORY}-{INDEX:03}`
//! - Purchase price 1.99 - 9.98, sale price 20-60% above it
//! - Purchased 10 - 59 units, with none, a third or two thirds already sold

use std::env;

use estoque_core::{GoodRegistration, Money, SaleTotalPolicy};
use estoque_db::{Database, DbConfig};

/// Good categories for realistic demo data
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "BEB",
        &[
            "Refrigerante Cola",
            "Água Mineral",
            "Suco de Laranja",
            "Café Torrado",
            "Chá Mate",
        ],
    ),
    (
        "MER",
        &[
            "Arroz Branco",
            "Feijão Carioca",
            "Açúcar Refinado",
            "Farinha de Trigo",
            "Macarrão Espaguete",
        ],
    ),
    (
        "LIM",
        &[
            "Detergente",
            "Sabão em Pó",
            "Água Sanitária",
            "Esponja",
            "Desinfetante",
        ],
    ),
    (
        "PAP",
        &["Caderno", "Caneta Azul", "Lápis", "Borracha", "Régua 30cm"],
    ),
];

const DEMO_USER: (&str, &str) = ("admin", "admin");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 50;
    let mut db_path = String::from("./stock_control_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(50);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("EstoquePlus Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of goods to generate (default: 50)");
                println!("  -d, --db <PATH>    Database file path (default: ./stock_control_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 EstoquePlus Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!("Goods:    {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let credentials = db.credentials();
    if !credentials.has_any_user().await? {
        credentials.create_user(DEMO_USER.0, DEMO_USER.1).await?;
        println!("✓ Created login {}/{}", DEMO_USER.0, DEMO_USER.1);
    }

    let existing = db.goods().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} goods", existing);
        println!("  Skipping seed to avoid merging into them.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating goods...");

    let ledger = db.ledger(SaleTotalPolicy::default());
    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: for round in 0.. {
        for (category_code, names) in CATEGORIES {
            for (name_idx, name) in names.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let seed = round * 100 + name_idx;
                let reg = generate_registration(category_code, name, round, seed);
                let id = reg.id.clone();
                let sold = reg.quantity * ((seed % 3) as i64) / 3;

                if let Err(e) = ledger.register_or_merge(reg).await {
                    eprintln!("Failed to register {}: {}", id, e);
                    continue;
                }

                if sold > 0 {
                    if let Err(e) = ledger.record_sale(&id, sold).await {
                        eprintln!("Failed to sell {}: {}", id, e);
                    }
                }

                generated += 1;
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} goods in {:?}", generated, elapsed);

    let summary = ledger.summary().await?;
    println!("  Units purchased: {}", summary.units_purchased);
    println!("  Units sold:      {}", summary.units_sold);
    println!("  Est. profit:     {}", summary.total_estimated_profit);

    db.checkpoint().await?;
    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds a single registration with deterministic demo figures.
fn generate_registration(category: &str, name: &str, round: usize, seed: usize) -> GoodRegistration {
    let id = format!("{}-{:03}", category, seed);

    let display_name = if round == 0 {
        name.to_string()
    } else {
        format!("{} Lote {}", name, round + 1)
    };

    // Purchase price: 1.99 - 9.98
    let purchase_cents = 199 + ((seed * 17) % 800) as i64;

    // Sale price: 20-60% markup
    let markup_pct = 120 + ((seed * 13) % 41) as i64;
    let sale_cents = purchase_cents * markup_pct / 100;

    let quantity = 10 + ((seed * 31) % 50) as i64;

    GoodRegistration::new(
        id,
        display_name,
        Money::from_cents(purchase_cents),
        Money::from_cents(sale_cents),
        quantity,
    )
    .description(format!("Demo {}", category.to_lowercase()))
}
