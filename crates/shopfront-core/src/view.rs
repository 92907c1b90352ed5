//! # Product View Models
//!
//! Role-selected output shapes for the catalog.
//!
//! The legacy behavior was to build one generic payload and strip the
//! wholesale price for non-staff readers. Here each role gets its own
//! explicit struct, selected once at the boundary. No field surgery on a
//! serialized payload, and the admin-only data cannot leak by accident.

use serde::Serialize;

use crate::types::{Product, Role};

/// Catalog entry as customers see it. No wholesale price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicProductView {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i64,
    pub retail_price_cents: i64,
}

impl From<&Product> for PublicProductView {
    fn from(p: &Product) -> Self {
        PublicProductView {
            id: p.id.clone(),
            name: p.name.clone(),
            description: p.description.clone(),
            quantity: p.quantity,
            retail_price_cents: p.retail_price_cents,
        }
    }
}

/// Catalog entry as admins see it: adds wholesale price and unit profit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminProductView {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i64,
    pub retail_price_cents: i64,
    pub wholesale_price_cents: i64,
    pub unit_profit_cents: i64,
}

impl From<&Product> for AdminProductView {
    fn from(p: &Product) -> Self {
        AdminProductView {
            id: p.id.clone(),
            name: p.name.clone(),
            description: p.description.clone(),
            quantity: p.quantity,
            retail_price_cents: p.retail_price_cents,
            wholesale_price_cents: p.wholesale_price_cents,
            unit_profit_cents: p.unit_profit().cents(),
        }
    }
}

/// A product rendered for a particular role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProductView {
    Public(PublicProductView),
    Admin(AdminProductView),
}

impl ProductView {
    /// Selects the output shape for the given role.
    pub fn for_role(product: &Product, role: Role) -> Self {
        match role {
            Role::Admin => ProductView::Admin(AdminProductView::from(product)),
            Role::Customer => ProductView::Public(PublicProductView::from(product)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_product() -> Product {
        let now = Utc::now();
        Product {
            id: "p-1".to_string(),
            name: "Widget".to_string(),
            description: Some("A widget".to_string()),
            quantity: 7,
            retail_price_cents: 1099,
            wholesale_price_cents: 750,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_public_view_hides_wholesale_price() {
        let view = ProductView::for_role(&sample_product(), Role::Customer);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["retail_price_cents"], 1099);
        assert!(json.get("wholesale_price_cents").is_none());
        assert!(json.get("unit_profit_cents").is_none());
    }

    #[test]
    fn test_admin_view_includes_profit() {
        let view = ProductView::for_role(&sample_product(), Role::Admin);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["wholesale_price_cents"], 750);
        assert_eq!(json["unit_profit_cents"], 349);
    }
}
