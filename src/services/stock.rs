//! Stock levels and adjustments.
//!
//! The service mirrors `GET /stocks` into a cache, posts adjustments,
//! and keeps a local movement ledger for the history screen. Removals
//! are clamped to the on-hand quantity before anything is sent; a
//! removal against a product/warehouse pair with no cached record fails
//! locally without a network round trip.

use std::sync::{Arc, RwLock};

use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use crate::api::ApiClient;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::{AdjustmentDirection, StockAdjustment, StockLedgerEntry, StockRecord};
use crate::notifications::NotificationBus;

/// Per-product aggregate across warehouses, feeding the stock overview.
#[derive(Debug, Clone, PartialEq)]
pub struct StockSummary {
    pub product_id: String,
    pub total_on_hand: Decimal,
    pub total_reserved: Decimal,
    pub total_free: Decimal,
    pub warehouse_count: usize,
}

pub struct StockService {
    client: Arc<ApiClient>,
    records: RwLock<Vec<StockRecord>>,
    ledger: RwLock<Vec<StockLedgerEntry>>,
    notifier: NotificationBus,
    events: EventSender,
}

impl StockService {
    pub fn new(client: Arc<ApiClient>, notifier: NotificationBus, events: EventSender) -> Self {
        Self {
            client,
            records: RwLock::new(Vec::new()),
            ledger: RwLock::new(Vec::new()),
            notifier,
            events,
        }
    }

    /// Fetches all stock rows. On failure the previous snapshot stays
    /// untouched and one error toast is raised.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<usize, ServiceError> {
        match self.client.list_stocks().await {
            Ok(records) => {
                let count = records.len();
                *self.records.write().expect("stock lock poisoned") = records;
                info!(count, "stock cache reloaded");
                Ok(count)
            }
            Err(err) => {
                self.notifier.error("Failed to load stock data");
                Err(err)
            }
        }
    }

    pub fn snapshot(&self) -> Vec<StockRecord> {
        self.records.read().expect("stock lock poisoned").clone()
    }

    pub fn ledger(&self) -> Vec<StockLedgerEntry> {
        self.ledger.read().expect("ledger lock poisoned").clone()
    }

    pub fn find(&self, product_id: &str, warehouse_id: i32) -> Option<StockRecord> {
        self.records
            .read()
            .expect("stock lock poisoned")
            .iter()
            .find(|r| r.product_id == product_id && r.warehouse_id == warehouse_id)
            .cloned()
    }

    /// Rows for one product across warehouses, for the detail pane.
    pub fn for_product(&self, product_id: &str) -> Vec<StockRecord> {
        self.records
            .read()
            .expect("stock lock poisoned")
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect()
    }

    /// Applies an adjustment and returns the quantity actually sent,
    /// which for removals may be clamped below the requested amount.
    ///
    /// A clamp all the way to zero short-circuits: nothing is sent and
    /// nothing is recorded.
    #[instrument(skip(self))]
    pub async fn adjust(
        &self,
        product_id: &str,
        warehouse_id: i32,
        quantity: Decimal,
        direction: AdjustmentDirection,
    ) -> Result<Decimal, ServiceError> {
        if quantity <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Adjustment quantity must be positive".to_string(),
            ));
        }

        let effective = match direction {
            AdjustmentDirection::Add => quantity,
            AdjustmentDirection::Remove => {
                let record = self.find(product_id, warehouse_id).ok_or_else(|| {
                    ServiceError::NotFound(format!(
                        "No stock record for product {} in warehouse {}",
                        product_id, warehouse_id
                    ))
                })?;
                quantity.min(record.quantity)
            }
        };

        if effective.is_zero() {
            info!(product_id, warehouse_id, "removal clamped to zero, nothing to do");
            return Ok(Decimal::ZERO);
        }

        let body = StockAdjustment {
            product_id: product_id.to_string(),
            warehouse_id,
            quantity: effective,
            operation: direction,
        };

        if let Err(err) = self.client.adjust_stock(&body).await {
            self.notifier.error("Failed to adjust stock");
            return Err(err);
        }

        // The backend confirmed: the movement is committed no matter what
        // happens below.
        let entry = StockLedgerEntry::for_adjustment(product_id, warehouse_id, effective, direction);
        self.ledger
            .write()
            .expect("ledger lock poisoned")
            .push(entry.clone());
        self.notifier.success("Stock adjusted");

        if let Err(err) = self
            .events
            .send(Event::StockAdjusted {
                product_id: product_id.to_string(),
                warehouse_id,
                quantity_change: entry.quantity_change,
            })
            .await
        {
            warn!(product_id, warehouse_id, error = %err, "no event listener, dropping stock event");
        }

        // The backend owns the resulting quantities; refresh rather than
        // patching the cached row locally. A failed refresh only leaves
        // the snapshot stale (load raises its own toast), it must not
        // turn the confirmed adjustment into an error.
        if let Err(err) = self.load().await {
            warn!(product_id, warehouse_id, error = %err, "stock refresh after adjustment failed");
        }

        Ok(effective)
    }

    /// Aggregates the cached rows per product, in first-seen order.
    pub fn summarize(&self) -> Vec<StockSummary> {
        let records = self.records.read().expect("stock lock poisoned");
        let mut summaries: Vec<StockSummary> = Vec::new();
        for record in records.iter() {
            match summaries
                .iter_mut()
                .find(|s| s.product_id == record.product_id)
            {
                Some(summary) => {
                    summary.total_on_hand += record.quantity;
                    summary.total_reserved += record.reserved;
                    summary.total_free += record.free_to_use();
                    summary.warehouse_count += 1;
                }
                None => summaries.push(StockSummary {
                    product_id: record.product_id.clone(),
                    total_on_hand: record.quantity,
                    total_reserved: record.reserved,
                    total_free: record.free_to_use(),
                    warehouse_count: 1,
                }),
            }
        }
        summaries
    }
}
