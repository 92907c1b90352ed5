//! # Domain Types
//!
//! Core entities of the Shopfront order system.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Product                Order                  OrderItem            │
//! │  ─────────────          ─────────────          ─────────────        │
//! │  id (UUID)              id (UUID)              id (UUID)            │
//! │  name                   user_id (FK)           order_id (FK, owns)  │
//! │  quantity (stock)       status                 product_id (FK, ref) │
//! │  retail_price_cents     placed_at (immutable)  purchase_price_cents │
//! │  wholesale_price_cents                         wholesale snapshot   │
//! │                                                                     │
//! │  Order 1──* OrderItem      OrderItem *──1 Product (read-only ref)   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Price Pattern
//! An `OrderItem` copies the product's retail and wholesale prices at
//! purchase time. Later product price edits never rewrite history: receipts
//! and profit reports read the snapshots, not the live product row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::status::OrderStatus;

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
///
/// `quantity` is the authoritative stock count and holds the `>= 0`
/// invariant: the workflow engine only ever decrements it through a
/// conditional update that fails closed on insufficient stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Optional long-form description.
    pub description: Option<String>,

    /// Current stock level. Never negative.
    pub quantity: i64,

    /// Customer-facing price in cents.
    pub retail_price_cents: i64,

    /// Acquisition price in cents (admin-only, feeds profit reporting).
    pub wholesale_price_cents: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last edited (stock changes included).
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the retail price as Money.
    #[inline]
    pub fn retail_price(&self) -> Money {
        Money::from_cents(self.retail_price_cents)
    }

    /// Returns the wholesale price as Money.
    #[inline]
    pub fn wholesale_price(&self) -> Money {
        Money::from_cents(self.wholesale_price_cents)
    }

    /// Profit made on a single unit at current prices.
    #[inline]
    pub fn unit_profit(&self) -> Money {
        self.retail_price() - self.wholesale_price()
    }

    /// Checks whether the product shows up in customer listings.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }
}

// =============================================================================
// Order
// =============================================================================

/// A customer order.
///
/// `placed_at` is written once at creation and never updated; `status`
/// moves only along the transition table in [`crate::status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    /// Owning user. Cancellation is allowed for this user or an admin.
    pub user_id: String,
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item belonging to exactly one order.
///
/// Owned by its order (deleted with it); references its product for
/// display only. The item set is fixed at purchase time — there is no
/// post-creation add/remove, only whole-order cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    /// 1-based position within the order; preserves request order.
    pub line_no: i64,
    /// Units purchased. Always positive.
    pub quantity: i64,
    /// Retail price per unit at purchase time (frozen).
    pub purchase_price_cents: i64,
    /// Wholesale price per unit at purchase time (frozen, for reporting).
    pub wholesale_price_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    /// Returns the frozen purchase price as Money.
    #[inline]
    pub fn purchase_price(&self) -> Money {
        Money::from_cents(self.purchase_price_cents)
    }

    /// Line total at the frozen price.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.purchase_price().multiply_quantity(self.quantity)
    }

    /// Profit locked in by this line (purchase minus wholesale snapshot).
    #[inline]
    pub fn line_profit(&self) -> Money {
        (Money::from_cents(self.purchase_price_cents)
            - Money::from_cents(self.wholesale_price_cents))
        .multiply_quantity(self.quantity)
    }
}

// =============================================================================
// User & Caller Identity
// =============================================================================

/// Role attached to a resolved identity.
///
/// Token parsing and verification are an external collaborator's job; this
/// core only ever sees the resolved role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Admin,
}

impl Role {
    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// The resolved identity behind a workflow call.
///
/// Every workflow operation takes a `Caller` explicitly — there is no
/// ambient current-user context to reach into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub role: Role,
}

impl Caller {
    /// Customer-role caller.
    pub fn user(user_id: impl Into<String>) -> Self {
        Caller {
            user_id: user_id.into(),
            role: Role::Customer,
        }
    }

    /// Admin-role caller.
    pub fn admin(user_id: impl Into<String>) -> Self {
        Caller {
            user_id: user_id.into(),
            role: Role::Admin,
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Checks ownership-or-admin authorization for a resource owner id.
    pub fn may_act_on(&self, owner_id: &str) -> bool {
        self.is_admin() || self.user_id == owner_id
    }
}

// =============================================================================
// Purchase Request
// =============================================================================

/// One requested line of a purchase: which product, how many units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseLine {
    pub product_id: String,
    pub quantity: i64,
}

impl PurchaseLine {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        PurchaseLine {
            product_id: product_id.into(),
            quantity,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(retail: i64, wholesale: i64, quantity: i64) -> Product {
        let now = Utc::now();
        Product {
            id: "p-1".to_string(),
            name: "Widget".to_string(),
            description: None,
            quantity,
            retail_price_cents: retail,
            wholesale_price_cents: wholesale,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_unit_profit() {
        let p = product(1099, 750, 4);
        assert_eq!(p.unit_profit().cents(), 349);
    }

    #[test]
    fn test_availability_tracks_stock() {
        assert!(product(100, 50, 1).is_available());
        assert!(!product(100, 50, 0).is_available());
    }

    #[test]
    fn test_line_totals_use_frozen_prices() {
        let item = OrderItem {
            id: "i-1".to_string(),
            order_id: "o-1".to_string(),
            product_id: "p-1".to_string(),
            line_no: 1,
            quantity: 3,
            purchase_price_cents: 500,
            wholesale_price_cents: 300,
            created_at: Utc::now(),
        };
        assert_eq!(item.line_total().cents(), 1500);
        assert_eq!(item.line_profit().cents(), 600);
    }

    #[test]
    fn test_caller_authorization() {
        let owner = Caller::user("u-1");
        let other = Caller::user("u-2");
        let admin = Caller::admin("u-3");

        assert!(owner.may_act_on("u-1"));
        assert!(!other.may_act_on("u-1"));
        assert!(admin.may_act_on("u-1"));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&OrderStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
    }
}
