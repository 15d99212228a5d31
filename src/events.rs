use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::models::DeliveryStatus;

/// Events emitted after a confirmed state change. This is the seam where
/// backend confirmation, audit logging or cache invalidation listeners
/// attach.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    DeliveryStatusChanged {
        order_id: i64,
        old_status: DeliveryStatus,
        new_status: DeliveryStatus,
    },
    StockAdjusted {
        product_id: String,
        warehouse_id: i32,
        quantity_change: Decimal,
    },
    ProductCreated(String),
    ProductUpdated(String),
    WarehouseCreated(i32),
    WarehouseUpdated(i32),
    WarehouseDeleted(i32),
    LocationCreated(String),
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Channel pair for tests and the CLI, where the receiver is drained by a
/// background task.
pub fn channel(buffer: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(buffer);
    (EventSender::new(tx), rx)
}
