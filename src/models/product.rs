use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Catalog entry mirrored from the backend. The identifier is assigned
/// server-side; the client never fabricates one for products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub unit_of_measure: String,
    pub cost: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reorder_level: Option<Decimal>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Product {
    /// Search-box predicate used by the stock screen: match on name or SKU,
    /// case-insensitive.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.sku.to_lowercase().contains(&query)
    }
}

/// Payload for `POST /products` and `PUT /products/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "sku cannot be empty"))]
    pub sku: String,
    pub category: String,
    pub unit_of_measure: String,
    pub cost: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reorder_level: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use validator::Validate;

    fn sample() -> Product {
        Product {
            id: "p1".into(),
            name: "Executive Desk".into(),
            sku: "DESK001".into(),
            category: "Furniture".into(),
            unit_of_measure: "pcs".into(),
            cost: dec!(450.00),
            description: None,
            reorder_level: Some(dec!(5)),
            is_active: true,
        }
    }

    #[test]
    fn search_matches_name_and_sku_case_insensitive() {
        let product = sample();
        assert!(product.matches_search("desk"));
        assert!(product.matches_search("DESK001"));
        assert!(product.matches_search("desk0"));
        assert!(!product.matches_search("chair"));
    }

    #[test]
    fn empty_name_fails_validation() {
        let input = ProductInput {
            name: "".into(),
            sku: "SKU-1".into(),
            category: "Furniture".into(),
            unit_of_measure: "pcs".into(),
            cost: dec!(10),
            description: None,
            reorder_level: None,
        };
        assert!(input.validate().is_err());
    }
}
