use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One product/warehouse stock row as returned by `GET /stocks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    pub product_id: String,
    pub warehouse_id: i32,
    pub warehouse_name: String,
    /// Total physical stock recorded at the warehouse.
    pub quantity: Decimal,
    /// Portion of on-hand stock already allocated to pending operations.
    pub reserved: Decimal,
}

impl StockRecord {
    /// On-hand minus reserved, clamped at zero.
    ///
    /// Reserved can transiently exceed on-hand when the backend races a
    /// delivery against an adjustment; the display value never goes
    /// negative.
    pub fn free_to_use(&self) -> Decimal {
        (self.quantity - self.reserved).max(Decimal::ZERO)
    }
}

/// Direction of a stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AdjustmentDirection {
    Add,
    Remove,
}

/// Body of `POST /stocks/adjust`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustment {
    pub product_id: String,
    pub warehouse_id: i32,
    pub quantity: Decimal,
    pub operation: AdjustmentDirection,
}
