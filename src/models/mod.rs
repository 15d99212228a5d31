pub mod delivery;
pub mod ledger;
pub mod location;
pub mod product;
pub mod stock;
pub mod transfer;
pub mod warehouse;

pub use delivery::{DeliveryLineItem, DeliveryOrder, DeliveryStatus};
pub use ledger::StockLedgerEntry;
pub use location::{Location, LocationInput};
pub use product::{Product, ProductInput};
pub use stock::{AdjustmentDirection, StockAdjustment, StockRecord};
pub use transfer::InternalTransfer;
pub use warehouse::{Warehouse, WarehouseInput};
