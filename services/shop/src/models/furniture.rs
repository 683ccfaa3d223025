//! Furniture catalog

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Furniture {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub price: f64,
}

/// Read-only catalog shared by every request.
///
/// Cloning is cheap; entries keep their definition order.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Arc<[Furniture]>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and negative or non-finite prices
    pub fn new(items: Vec<Furniture>) -> Result<Self, String> {
        for (index, item) in items.iter().enumerate() {
            if !item.price.is_finite() || item.price < 0.0 {
                return Err(format!("Invalid price for furniture {}", item.id));
            }
            if items[..index].iter().any(|other| other.id == item.id) {
                return Err(format!("Duplicate furniture id {}", item.id));
            }
        }

        Ok(Self {
            items: items.into(),
        })
    }

    pub fn items(&self) -> &[Furniture] {
        &self.items
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            items: Arc::from(vec![
                Furniture {
                    id: 1,
                    name: "Chair".to_string(),
                    description: "Comfortable chair".to_string(),
                    price: 49.99,
                },
                Furniture {
                    id: 2,
                    name: "Table".to_string(),
                    description: "Sturdy table".to_string(),
                    price: 99.99,
                },
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u32, price: f64) -> Furniture {
        Furniture {
            id,
            name: format!("item {}", id),
            description: String::new(),
            price,
        }
    }

    #[test]
    fn test_default_catalog_order() {
        let catalog = Catalog::default();
        let names: Vec<&str> = catalog.items().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Chair", "Table"]);
        assert_eq!(catalog.items()[0].price, 49.99);
    }

    #[test]
    fn test_new_keeps_definition_order() {
        let catalog = Catalog::new(vec![item(3, 1.0), item(1, 0.0), item(2, 5.5)]).unwrap();
        let ids: Vec<u32> = catalog.items().iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_new_rejects_invalid_entries() {
        assert!(Catalog::new(vec![item(1, -0.01)]).is_err());
        assert!(Catalog::new(vec![item(1, f64::NAN)]).is_err());
        assert!(Catalog::new(vec![item(1, 1.0), item(1, 2.0)]).is_err());
    }
}
