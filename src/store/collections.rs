//! Concrete `RemoteCollection` wiring for the REST-backed resources.
//!
//! Each collection validates its input payloads before anything leaves
//! the process, then delegates to the shared `ApiClient`.

use std::sync::Arc;

use async_trait::async_trait;
use validator::Validate;

use crate::api::ApiClient;
use crate::errors::ServiceError;
use crate::models::{Product, ProductInput, Warehouse, WarehouseInput};

use super::{RemoteCollection, Resource};

impl Resource for Product {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }
}

impl Resource for Warehouse {
    type Id = i32;

    fn id(&self) -> i32 {
        self.id
    }
}

/// Products support create and update only; the catalog never shrinks
/// from this client.
#[derive(Clone)]
pub struct ProductCollection {
    client: Arc<ApiClient>,
}

impl ProductCollection {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RemoteCollection for ProductCollection {
    type Item = Product;
    type Create = ProductInput;
    type Update = ProductInput;

    fn resource_name(&self) -> &'static str {
        "product"
    }

    async fn fetch_all(&self) -> Result<Vec<Product>, ServiceError> {
        self.client.list_products().await
    }

    async fn create(&self, input: &ProductInput) -> Result<Product, ServiceError> {
        input.validate()?;
        self.client.create_product(input).await
    }

    async fn update(&self, id: &String, patch: &ProductInput) -> Result<Product, ServiceError> {
        patch.validate()?;
        self.client.update_product(id, patch).await
    }
}

#[derive(Clone)]
pub struct WarehouseCollection {
    client: Arc<ApiClient>,
}

impl WarehouseCollection {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RemoteCollection for WarehouseCollection {
    type Item = Warehouse;
    type Create = WarehouseInput;
    type Update = WarehouseInput;

    fn resource_name(&self) -> &'static str {
        "warehouse"
    }

    async fn fetch_all(&self) -> Result<Vec<Warehouse>, ServiceError> {
        self.client.list_warehouses().await
    }

    async fn create(&self, input: &WarehouseInput) -> Result<Warehouse, ServiceError> {
        input.validate()?;
        self.client.create_warehouse(input).await
    }

    async fn update(&self, id: &i32, patch: &WarehouseInput) -> Result<Warehouse, ServiceError> {
        patch.validate()?;
        self.client.update_warehouse(*id, patch).await
    }

    async fn delete(&self, id: &i32) -> Result<(), ServiceError> {
        self.client.delete_warehouse(*id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn product_deletion_is_refused_without_touching_the_network() {
        // Base URL points nowhere; the default delete must fail before
        // any request is built.
        let client = Arc::new(
            ApiClient::new("http://127.0.0.1:1/api", std::time::Duration::from_secs(1)).unwrap(),
        );
        let collection = ProductCollection::new(client);
        let result = collection.delete(&"p1".to_string()).await;
        assert!(matches!(result, Err(ServiceError::InvalidOperation(_))));
    }

    #[tokio::test]
    async fn invalid_product_input_is_rejected_before_sending() {
        let client = Arc::new(
            ApiClient::new("http://127.0.0.1:1/api", std::time::Duration::from_secs(1)).unwrap(),
        );
        let collection = ProductCollection::new(client);
        let input = ProductInput {
            name: "".into(),
            sku: "SKU-1".into(),
            category: "Furniture".into(),
            unit_of_measure: "pcs".into(),
            cost: dec!(10),
            description: None,
            reorder_level: None,
        };
        let result = collection.create(&input).await;
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }
}
