//! Domain services layered on top of the API client and the resource
//! stores: the delivery-order lifecycle, stock adjustments with their
//! ledger, and the local-only location directory.

pub mod delivery;
pub mod locations;
pub mod stock;

pub use delivery::DeliveryService;
pub use locations::LocationDirectory;
pub use stock::{StockService, StockSummary};
