//! # shopfront-db: Database Layer and Order Workflow for Shopfront
//!
//! This crate provides database access for Shopfront and the transactional
//! order workflow built on top of it. It uses SQLite for storage with sqlx
//! for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shopfront Data Flow                              │
//! │                                                                         │
//! │  Transport handler (purchase request)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                   shopfront-db (THIS CRATE)                     │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐    │    │
//! │  │   │ OrderWorkflow │    │  Repositories  │   │  Migrations  │    │    │
//! │  │   │ (workflow.rs) │    │                │   │  (embedded)  │    │    │
//! │  │   │               │    │ InventoryStore │   │              │    │    │
//! │  │   │ purchase      │───►│ OrderLedger    │   │ 001_init.sql │    │    │
//! │  │   │ cancel        │    │ ProductRepo    │   │ ...          │    │    │
//! │  │   │ update_status │    │ UserRepo       │   │              │    │    │
//! │  │   └───────┬───────┘    └───────┬────────┘   └──────────────┘    │    │
//! │  │           │    one BEGIN..COMMIT per workflow call              │    │
//! │  └───────────┼────────────────────┼──────────────────────────────  ┘    │
//! │              ▼                    ▼                                     │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     SQLite Database (WAL)                       │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and workflow error types
//! - [`repository`] - Repositories (product, inventory, order, user, watchlist)
//! - [`workflow`] - The order workflow engine
//! - [`reports`] - Read-only sales aggregates
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shopfront_core::{Caller, PurchaseLine};
//! use shopfront_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/shopfront.db")).await?;
//!
//! let caller = Caller::user("user-uuid");
//! let placed = db
//!     .workflow()
//!     .purchase(&caller, &[PurchaseLine::new("product-uuid", 2)])
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod reports;
pub mod repository;
pub mod workflow;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, ErrorCategory, ErrorPayload, WorkflowError, WorkflowResult};
pub use pool::{Database, DbConfig};
pub use workflow::{OrderWorkflow, PlacedOrder};

// Repository re-exports for convenience
pub use repository::inventory::InventoryStore;
pub use repository::order::OrderLedger;
pub use repository::product::ProductRepository;
pub use repository::user::UserRepository;
pub use repository::watchlist::WatchlistRepository;
