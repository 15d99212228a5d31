use serde::{Deserialize, Serialize};
use validator::Validate;

/// Storage location inside a warehouse.
///
/// Locations have no REST surface yet; they live in a local-only store
/// where newly created records carry a temporary client-generated
/// identifier pending backend confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub name: String,
    pub short_code: String,
    pub warehouse_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LocationInput {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: String,
    #[validate(length(min = 1, max = 20, message = "short code must be 1-20 characters"))]
    pub short_code: String,
}
