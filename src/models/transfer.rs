use serde::{Deserialize, Serialize};

use super::{DeliveryStatus, Warehouse};

/// Stock movement between two warehouses, returned by
/// `GET /internal-transfer`. Shares the delivery lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalTransfer {
    pub id: i32,
    pub from: Warehouse,
    pub to: Warehouse,
    pub status: DeliveryStatus,
}
