//! Delivery-order lifecycle.
//!
//! Orders move along Draft -> Waiting -> Ready -> Done, with Canceled as
//! a side exit from any non-Done state. Done and Canceled are terminal:
//! an advance or validate from either fails without touching the cache.
//! Canceling an already-Canceled order is the one idempotent case and
//! returns the order unchanged.

use std::sync::RwLock;

use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::{DeliveryOrder, DeliveryStatus};
use crate::notifications::NotificationBus;

pub struct DeliveryService {
    orders: RwLock<Vec<DeliveryOrder>>,
    notifier: NotificationBus,
    events: EventSender,
}

impl DeliveryService {
    pub fn new(notifier: NotificationBus, events: EventSender) -> Self {
        Self {
            orders: RwLock::new(Vec::new()),
            notifier,
            events,
        }
    }

    /// Replaces the cached order list wholesale, preserving the given
    /// order. Deliveries have no list endpoint yet, so the caller seeds
    /// the cache.
    pub fn replace_all(&self, orders: Vec<DeliveryOrder>) {
        *self.orders.write().expect("delivery lock poisoned") = orders;
    }

    pub fn list(&self) -> Vec<DeliveryOrder> {
        self.orders.read().expect("delivery lock poisoned").clone()
    }

    pub fn get(&self, id: i64) -> Option<DeliveryOrder> {
        self.orders
            .read()
            .expect("delivery lock poisoned")
            .iter()
            .find(|order| order.id == id)
            .cloned()
    }

    /// Case-insensitive filter on reference or contact. An empty query
    /// returns everything.
    pub fn search(&self, query: &str) -> Vec<DeliveryOrder> {
        let query = query.trim();
        let orders = self.orders.read().expect("delivery lock poisoned");
        if query.is_empty() {
            return orders.clone();
        }
        orders
            .iter()
            .filter(|order| order.matches_search(query))
            .cloned()
            .collect()
    }

    /// Moves an order one step along the linear path.
    #[instrument(skip(self))]
    pub async fn advance(&self, id: i64) -> Result<DeliveryOrder, ServiceError> {
        let (old_status, target) = {
            let orders = self.orders.read().expect("delivery lock poisoned");
            let order = orders
                .iter()
                .find(|order| order.id == id)
                .ok_or_else(|| ServiceError::NotFound(format!("Delivery order {} not found", id)))?;
            (order.status, order.status.advance_target())
        };

        let Some(new_status) = target else {
            warn!(order_id = id, status = %old_status, "advance refused from terminal status");
            return Err(ServiceError::InvalidStatus(format!(
                "Cannot advance order {} from {}",
                id, old_status
            )));
        };

        self.transition(id, old_status, new_status).await
    }

    /// Confirms a delivery. Only Ready orders can be validated; this is
    /// stricter than `advance`, which also accepts Draft and Waiting.
    #[instrument(skip(self))]
    pub async fn validate(&self, id: i64) -> Result<DeliveryOrder, ServiceError> {
        let old_status = self
            .get(id)
            .ok_or_else(|| ServiceError::NotFound(format!("Delivery order {} not found", id)))?
            .status;

        if old_status != DeliveryStatus::Ready {
            warn!(order_id = id, status = %old_status, "validate refused");
            return Err(ServiceError::InvalidStatus(format!(
                "Order {} must be Ready to validate, found {}",
                id, old_status
            )));
        }

        self.transition(id, old_status, DeliveryStatus::Done).await
    }

    /// Cancels an order. Allowed from every state except Done; canceling
    /// a Canceled order is a no-op.
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: i64) -> Result<DeliveryOrder, ServiceError> {
        let order = self
            .get(id)
            .ok_or_else(|| ServiceError::NotFound(format!("Delivery order {} not found", id)))?;

        if order.status == DeliveryStatus::Canceled {
            return Ok(order);
        }
        if !order.status.can_cancel() {
            warn!(order_id = id, status = %order.status, "cancel refused");
            return Err(ServiceError::InvalidStatus(format!(
                "Cannot cancel order {} once it is {}",
                id, order.status
            )));
        }

        self.transition(id, order.status, DeliveryStatus::Canceled)
            .await
    }

    async fn transition(
        &self,
        id: i64,
        old_status: DeliveryStatus,
        new_status: DeliveryStatus,
    ) -> Result<DeliveryOrder, ServiceError> {
        let updated = {
            let mut orders = self.orders.write().expect("delivery lock poisoned");
            let order = orders
                .iter_mut()
                .find(|order| order.id == id)
                .ok_or_else(|| ServiceError::NotFound(format!("Delivery order {} not found", id)))?;
            order.status = new_status;
            order.clone()
        };

        info!(order_id = id, from = %old_status, to = %new_status, "delivery status changed");
        self.notifier.success(format!(
            "Delivery {} moved to {}",
            updated.reference, new_status
        ));

        // The transition is already committed; a closed event channel must
        // not turn it into an error.
        if let Err(err) = self
            .events
            .send(Event::DeliveryStatusChanged {
                order_id: id,
                old_status,
                new_status,
            })
            .await
        {
            warn!(order_id = id, error = %err, "no event listener, dropping status event");
        }

        Ok(updated)
    }
}
