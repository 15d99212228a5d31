//! Thin REST client for the StockMaster backend.
//!
//! One `ApiClient` owns a `reqwest::Client` and the configured base URL.
//! Response contract: the body is always read as text first; any non-2xx
//! status is a failure carrying the status and body text; a 2xx with an
//! empty body is valid (deletes and adjustments return nothing) and is
//! JSON-parsed only when non-empty.

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ClientConfig;
use crate::errors::ServiceError;
use crate::models::{
    InternalTransfer, Product, ProductInput, StockAdjustment, StockRecord, Warehouse,
    WarehouseInput,
};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        // Parse once so a malformed base URL fails at startup, not on the
        // first request.
        Url::parse(base_url)
            .map_err(|e| ServiceError::ConfigError(format!("invalid API base URL: {}", e)))?;

        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ServiceError> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoints are appended verbatim to the base URL, matching how the
    /// screens build their request paths.
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Core request handler. Returns `None` for an empty 2xx body.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<Option<T>, ServiceError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!(%status, path, "request failed");
            return Err(ServiceError::Api { status, body });
        }

        if body.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&body)?))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        self.execute(self.http.get(self.endpoint(path)), path)
            .await?
            .ok_or_else(|| ServiceError::EmptyResponse(path.to_string()))
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        self.execute(self.http.post(self.endpoint(path)).json(body), path)
            .await?
            .ok_or_else(|| ServiceError::EmptyResponse(path.to_string()))
    }

    async fn post_no_content<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ServiceError> {
        self.execute::<serde_json::Value>(self.http.post(self.endpoint(path)).json(body), path)
            .await?;
        Ok(())
    }

    async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        self.execute(self.http.put(self.endpoint(path)).json(body), path)
            .await?
            .ok_or_else(|| ServiceError::EmptyResponse(path.to_string()))
    }

    async fn delete_no_content(&self, path: &str) -> Result<(), ServiceError> {
        self.execute::<serde_json::Value>(self.http.delete(self.endpoint(path)), path)
            .await?;
        Ok(())
    }

    // --- Products ---

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ServiceError> {
        self.get_json("/products").await
    }

    #[instrument(skip(self, input), fields(sku = %input.sku))]
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, ServiceError> {
        self.post_json("/products", input).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        id: &str,
        input: &ProductInput,
    ) -> Result<Product, ServiceError> {
        self.put_json(&format!("/products/{}", id), input).await
    }

    // --- Stocks ---

    #[instrument(skip(self))]
    pub async fn list_stocks(&self) -> Result<Vec<StockRecord>, ServiceError> {
        self.get_json("/stocks").await
    }

    #[instrument(skip(self, adjustment), fields(product_id = %adjustment.product_id))]
    pub async fn adjust_stock(&self, adjustment: &StockAdjustment) -> Result<(), ServiceError> {
        self.post_no_content("/stocks/adjust", adjustment).await
    }

    // --- Warehouses ---

    #[instrument(skip(self))]
    pub async fn list_warehouses(&self) -> Result<Vec<Warehouse>, ServiceError> {
        self.get_json("/warehouses").await
    }

    #[instrument(skip(self, input), fields(code = %input.code))]
    pub async fn create_warehouse(
        &self,
        input: &WarehouseInput,
    ) -> Result<Warehouse, ServiceError> {
        self.post_json("/warehouses", input).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_warehouse(
        &self,
        id: i32,
        input: &WarehouseInput,
    ) -> Result<Warehouse, ServiceError> {
        self.put_json(&format!("/warehouses/{}", id), input).await
    }

    #[instrument(skip(self))]
    pub async fn delete_warehouse(&self, id: i32) -> Result<(), ServiceError> {
        self.delete_no_content(&format!("/warehouses/{}", id)).await
    }

    // --- Internal transfers ---

    #[instrument(skip(self))]
    pub async fn list_transfers(&self) -> Result<Vec<InternalTransfer>, ServiceError> {
        self.get_json("/internal-transfer").await
    }
}
