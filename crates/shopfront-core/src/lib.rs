//! # shopfront-core: Pure Business Logic for Shopfront
//!
//! Domain types and rules for an e-commerce order core whose one hard
//! problem is inventory consistency: a purchase reserves stock and creates
//! line items as a single unit, and a cancellation returns exactly what was
//! reserved.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  HTTP transport (out of tree)                                       │
//! │       │  resolved identity (Caller), request DTOs                   │
//! │       ▼                                                             │
//! │  shopfront-db                                                       │
//! │    workflow engine · repositories · reports                         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ★ shopfront-core (THIS CRATE) ★                                    │
//! │    types · money · status rules · validation · view models          │
//! │                                                                     │
//! │    NO I/O · NO DATABASE · NO ASYNC · PURE FUNCTIONS                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities (Product, Order, OrderItem, User, Caller)
//! - [`money`] - Integer-cents Money type (no floating point)
//! - [`status`] - Order status lifecycle and transition table
//! - [`validation`] - Business rule validation
//! - [`view`] - Role-selected product view models
//! - [`error`] - Validation error types
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: deterministic, no side effects
//! 2. **Integer money**: all monetary values are cents (i64)
//! 3. **Explicit identity**: every operation takes a `Caller`, there is no
//!    ambient current-user context
//! 4. **Typed errors**: enum variants, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod status;
pub mod types;
pub mod validation;
pub mod view;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{ValidationError, ValidationResult};
pub use money::Money;
pub use status::{OrderStatus, TransitionError};
pub use types::*;
pub use view::{AdminProductView, ProductView, PublicProductView};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single purchase request.
///
/// Prevents runaway requests; one transaction holds the write path for the
/// duration of the whole purchase, so its size must stay bounded.
pub const MAX_PURCHASE_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// Guards against typo orders (1000 instead of 10) before any stock is
/// touched.
pub const MAX_LINE_QUANTITY: i64 = 999;
