use serde::{Deserialize, Serialize};
use validator::Validate;

/// Physical warehouse as returned by `GET /warehouses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub address: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Payload for `POST /warehouses` and `PUT /warehouses/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseInput {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: String,
    #[validate(length(min = 1, max = 20, message = "code must be 1-20 characters"))]
    pub code: String,
    pub address: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}
