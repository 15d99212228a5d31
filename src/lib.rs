//! Client-side core of the StockMaster warehouse management front-end.
//!
//! The crate mirrors backend-owned collections (products, warehouses,
//! stock rows, internal transfers) into in-memory caches, drives the
//! delivery-order lifecycle, and posts stock adjustments. Caches mutate
//! only after the backend confirms; every failure collapses into a
//! transient error notification.

pub mod api;
pub mod config;
pub mod errors;
pub mod events;
pub mod models;
pub mod notifications;
pub mod services;
pub mod store;

pub use api::ApiClient;
pub use errors::ServiceError;
pub use events::{Event, EventSender};
pub use notifications::{Notification, NotificationBus, NotificationLevel};
pub use store::{RemoteCollection, Resource, ResourceStore};
