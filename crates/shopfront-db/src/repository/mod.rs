//! # Repository Module
//!
//! Database repository implementations for Shopfront.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Workflow Engine / Transport                                            │
//! │       │                                                                 │
//! │       │  db.inventory().reserve(&mut *tx, "p-1", 3)                     │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  InventoryStore / OrderLedger / ...                                     │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Kinds of Methods
//!
//! Read methods borrow the repository's own pool. Mutating methods that
//! must compose into a larger transaction take `&mut SqliteConnection`
//! instead, so the workflow engine can run several of them between one
//! `BEGIN` and one `COMMIT`.
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product catalog CRUD
//! - [`inventory::InventoryStore`] - Stock reservation and release
//! - [`order::OrderLedger`] - Orders, line items, status transitions
//! - [`user::UserRepository`] - User accounts
//! - [`watchlist::WatchlistRepository`] - Per-user product watchlists

use uuid::Uuid;

pub mod inventory;
pub mod order;
pub mod product;
pub mod user;
pub mod watchlist;

/// Generates a new UUID v4 entity ID.
pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}
