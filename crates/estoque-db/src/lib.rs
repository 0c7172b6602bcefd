//! # estoque-db: Database Layer for EstoquePlus
//!
//! This crate provides database access for EstoquePlus. It uses SQLite for
//! local storage with sqlx for async operations, and it is where the stock
//! rules from `estoque-core` meet persistence.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        EstoquePlus Data Flow                            │
//! │                                                                         │
//! │  estoque-cli menu action (record sale)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     estoque-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   SessionGate ──unlock──► Session ──► Ledger                    │   │
//! │  │                                         │                       │   │
//! │  │                         BEGIN; load Good; stock::record_sale;   │   │
//! │  │                         write Good; COMMIT                      │   │
//! │  │                                         │                       │   │
//! │  │   ┌───────────────┐    ┌────────────────▼─┐    ┌─────────────┐ │   │
//! │  │   │   Database    │    │  Repositories    │    │ Migrations  │ │   │
//! │  │   │   (pool.rs)   │◄───│  GoodRepository  │    │ (embedded)  │ │   │
//! │  │   │  SqlitePool   │    │  CredentialRepo  │    │ 001_init    │ │   │
//! │  │   └───────────────┘    └──────────────────┘    └─────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (users, mercadorias)                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (goods, credentials)
//! - [`ledger`] - Inventory ledger service
//! - [`session`] - Credential-gated access to the ledger
//!
//! ## Usage
//!
//! ```rust,ignore
//! use estoque_db::{Database, DbConfig, SessionGate};
//!
//! let db = Database::new(DbConfig::new("stock_control.db")).await?;
//! let gate = SessionGate::open(db).await?;
//! if gate.requires_first_user().await? {
//!     gate.create_first_user("admin", "secret").await?;
//! }
//! let session = gate.unlock("admin", "secret").await?.expect("bad credentials");
//! let goods = session.ledger().list(None).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, StoreError, StoreResult};
pub use ledger::Ledger;
pub use pool::{Database, DbConfig};
pub use session::{Session, SessionGate};

// Repository re-exports for convenience
pub use repository::credential::CredentialRepository;
pub use repository::good::GoodRepository;
