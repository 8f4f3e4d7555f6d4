//! Slim storefront entity types used as reference consumers of the index.
//!
//! These are entity owners in the sense of the tagging model: they keep their
//! own storage and ids, and none of them carry any tagging fields. Declaring
//! them in a registry is all it takes to make them taggable.
use crate::registry::KindRegistry;
use crate::taggable::Taggable;
use serde::{Deserialize, Serialize};

/// A registry preconfigured with the storefront kinds.
pub fn storefront_registry() -> KindRegistry {
    KindRegistry::new(["product", "collection", "customer", "order"])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub unit_price: f64,
    pub inventory: u32,
}

impl Product {
    pub fn inventory_status(&self) -> &'static str {
        if self.inventory < 10 {
            "LOW"
        } else {
            "OK"
        }
    }
}

impl Taggable for Product {
    fn kind() -> &'static str {
        "product"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: u64,
    pub title: String,
}

impl Taggable for Collection {
    fn kind() -> &'static str {
        "collection"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Taggable for Customer {
    fn kind() -> &'static str {
        "customer"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub customer_id: u64,
}

impl Taggable for Order {
    fn kind() -> &'static str {
        "order"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storefront_registry_declares_all_kinds() {
        let registry = storefront_registry();
        for kind in ["product", "collection", "customer", "order"] {
            assert!(registry.resolve(kind).is_ok());
        }
    }

    #[test]
    fn low_inventory_is_flagged() {
        let product = Product {
            id: 1,
            title: "bread".to_owned(),
            unit_price: 3.5,
            inventory: 4,
        };
        assert_eq!(product.inventory_status(), "LOW");
    }
}
