//! Local-only directory of storage locations.
//!
//! Locations have no REST surface yet, so the directory keeps everything
//! in process. New records carry a client-generated `loc-` identifier
//! until a backend endpoint exists to assign real ones.

use std::sync::RwLock;

use tracing::{instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::{Location, LocationInput};
use crate::notifications::NotificationBus;

pub struct LocationDirectory {
    locations: RwLock<Vec<Location>>,
    notifier: NotificationBus,
    events: EventSender,
}

impl LocationDirectory {
    pub fn new(notifier: NotificationBus, events: EventSender) -> Self {
        Self {
            locations: RwLock::new(Vec::new()),
            notifier,
            events,
        }
    }

    pub fn seed(&self, locations: Vec<Location>) {
        *self.locations.write().expect("location lock poisoned") = locations;
    }

    pub fn list(&self) -> Vec<Location> {
        self.locations.read().expect("location lock poisoned").clone()
    }

    pub fn for_warehouse(&self, warehouse_id: i32) -> Vec<Location> {
        self.locations
            .read()
            .expect("location lock poisoned")
            .iter()
            .filter(|loc| loc.warehouse_id == warehouse_id)
            .cloned()
            .collect()
    }

    #[instrument(skip(self, input), fields(short_code = %input.short_code))]
    pub async fn create(
        &self,
        warehouse_id: i32,
        input: LocationInput,
    ) -> Result<Location, ServiceError> {
        input.validate()?;

        let location = Location {
            id: format!("loc-{}", Uuid::new_v4()),
            name: input.name,
            short_code: input.short_code,
            warehouse_id,
        };
        self.locations
            .write()
            .expect("location lock poisoned")
            .push(location.clone());

        self.notifier.success("Location created");
        if let Err(err) = self
            .events
            .send(Event::LocationCreated(location.id.clone()))
            .await
        {
            warn!(location_id = %location.id, error = %err, "no event listener, dropping event");
        }

        Ok(location)
    }
}
