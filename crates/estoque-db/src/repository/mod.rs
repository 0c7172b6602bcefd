//! # Repository Module
//!
//! Database repository implementations for EstoquePlus.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Ledger / SessionGate                                                   │
//! │       │                                                                 │
//! │       │  good::fetch(&mut *tx, "P1")                                   │
//! │       ▼                                                                 │
//! │  GoodRepository                  CredentialRepository                  │
//! │  ├── get(&self, id)              ├── ensure_schema(&self)              │
//! │  ├── list(&self)                 ├── has_any_user(&self)               │
//! │  ├── insert(&self, good)         ├── create_user(&self, u, p)          │
//! │  ├── update(&self, good)         └── verify(&self, u, p)               │
//! │  └── delete(&self, id)                                                 │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The good queries are crate-private free functions over a single
//! `SqliteConnection`, so the ledger can run read-modify-write sequences
//! inside one transaction.
//!
//! ## Available Repositories
//!
//! - [`GoodRepository`](good::GoodRepository) - Read-only rows of the `mercadorias` table
//! - [`CredentialRepository`](credential::CredentialRepository) - The `users` table

pub mod credential;
pub mod good;
