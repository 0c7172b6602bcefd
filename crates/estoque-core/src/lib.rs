//! # estoque-core: Pure Business Logic for EstoquePlus
//!
//! This crate holds the inventory rules as pure functions with zero I/O
//! dependencies. The database layer loads a [`Good`], hands it to the rules in
//! [`stock`], and writes back whatever comes out.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        EstoquePlus Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 estoque-cli (terminal front end)                │   │
//! │  │    Login ──► Menu ──► Register / Sell / Add stock / Reports     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            estoque-db (Ledger, Credentials, Session)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ estoque-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   stock   │  │ validation│  │   │
//! │  │   │   Good    │  │   Money   │  │  merge    │  │   rules   │  │   │
//! │  │   │  Summary  │  │           │  │  sale     │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO FILES • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Good, GoodRegistration, InventorySummary)
//! - [`money`] - Money type with integer arithmetic
//! - [`stock`] - Purchase-merge, restock and sale rules
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use estoque_core::money::Money;
//! use estoque_core::stock::{register_or_merge, record_sale, SaleTotalPolicy};
//! use estoque_core::types::GoodRegistration;
//!
//! let registration = GoodRegistration::new(
//!     "P1",
//!     "Widget",
//!     Money::from_cents(1000),
//!     Money::from_cents(1500),
//!     5,
//! );
//! let good = register_or_merge(None, registration).unwrap();
//! assert_eq!(good.total_purchase_value, Money::from_cents(5000));
//!
//! let good = record_sale(good, 3, SaleTotalPolicy::default()).unwrap();
//! assert_eq!(good.profit_estimated_total(), Money::from_cents(1500));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use stock::SaleTotalPolicy;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a good id.
pub const MAX_GOOD_ID_LEN: usize = 64;

/// Maximum length of a good name.
pub const MAX_GOOD_NAME_LEN: usize = 200;

/// Maximum quantity accepted in a single purchase, restock or sale.
///
/// ## Business Reason
/// Catches typos (an extra zero or two) before they land in the ledger.
pub const MAX_MOVEMENT_QUANTITY: i64 = 1_000_000;

/// Largest accepted unit price, in cents (one billion).
pub const MAX_UNIT_PRICE_CENTS: i64 = 100_000_000_000;
