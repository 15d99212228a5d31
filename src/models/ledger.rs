use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AdjustmentDirection;

/// Immutable movement record appended whenever a stock adjustment is
/// confirmed. Backs the Move History screen. The id is local-only; the
/// backend keeps its own ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLedgerEntry {
    pub id: Uuid,
    pub product_id: String,
    pub warehouse_id: i32,
    /// Positive for incoming stock, negative for outgoing.
    pub quantity_change: Decimal,
    pub reference: String,
    pub recorded_at: DateTime<Utc>,
}

impl StockLedgerEntry {
    pub fn for_adjustment(
        product_id: &str,
        warehouse_id: i32,
        quantity: Decimal,
        direction: AdjustmentDirection,
    ) -> Self {
        let quantity_change = match direction {
            AdjustmentDirection::Add => quantity,
            AdjustmentDirection::Remove => -quantity,
        };
        Self {
            id: Uuid::new_v4(),
            product_id: product_id.to_string(),
            warehouse_id,
            quantity_change,
            reference: format!("ADJ/{}/{}", warehouse_id, product_id),
            recorded_at: Utc::now(),
        }
    }
}
