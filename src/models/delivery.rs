use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Lifecycle of a delivery order.
///
/// The flow is linear: Draft -> Waiting -> Ready -> Done, with Canceled as
/// a side exit reachable from any non-Done state. Done and Canceled are
/// terminal. The authoritative state lives in the backend; this enum
/// drives which actions the client offers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum DeliveryStatus {
    Draft,
    Waiting,
    Ready,
    Done,
    Canceled,
}

impl DeliveryStatus {
    /// The status `advance` would move to, or `None` from a terminal state.
    pub fn advance_target(&self) -> Option<DeliveryStatus> {
        match self {
            DeliveryStatus::Draft => Some(DeliveryStatus::Waiting),
            DeliveryStatus::Waiting => Some(DeliveryStatus::Ready),
            DeliveryStatus::Ready => Some(DeliveryStatus::Done),
            DeliveryStatus::Done | DeliveryStatus::Canceled => None,
        }
    }

    /// Cancel is allowed from every state except Done. Canceling a
    /// Canceled order is a no-op handled by the caller.
    pub fn can_cancel(&self) -> bool {
        !matches!(self, DeliveryStatus::Done)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DeliveryStatus::Done | DeliveryStatus::Canceled)
    }

    /// Position along Draft -> Waiting -> Ready -> Done, used by the
    /// progress widget. Canceled sits outside the linear path.
    pub fn step_index(&self) -> Option<usize> {
        match self {
            DeliveryStatus::Draft => Some(0),
            DeliveryStatus::Waiting => Some(1),
            DeliveryStatus::Ready => Some(2),
            DeliveryStatus::Done => Some(3),
            DeliveryStatus::Canceled => None,
        }
    }
}

/// One product line on a delivery order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryLineItem {
    pub product_code: String,
    pub product_name: String,
    pub quantity: Decimal,
    /// False when the backend reports insufficient stock for the line.
    pub available: bool,
}

/// Delivery order header plus its lines, mirrored from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOrder {
    pub id: i64,
    /// Operation number, e.g. `WH/OUT/0001`.
    pub reference: String,
    pub origin: String,
    pub destination: String,
    pub contact: String,
    pub scheduled_date: NaiveDate,
    pub status: DeliveryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub lines: Vec<DeliveryLineItem>,
}

impl DeliveryOrder {
    /// List-screen search: match on reference or contact, case-insensitive.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.reference.to_lowercase().contains(&query)
            || self.contact.to_lowercase().contains(&query)
    }

    /// Lines that cannot be fulfilled from current stock.
    pub fn unavailable_lines(&self) -> impl Iterator<Item = &DeliveryLineItem> {
        self.lines.iter().filter(|line| !line.available)
    }
}
