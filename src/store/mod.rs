//! Remote resource cache: the in-memory mirror every screen keeps of one
//! backend-owned collection.
//!
//! The synchronization contract is pessimistic: the cache mutates only
//! after the backend confirms. A success response is trusted completely;
//! a failure leaves the cache exactly as it was before the call and
//! raises one error toast. Concurrent calls for the same identifier are
//! not coordinated; the last response applied wins.

use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::errors::ServiceError;
use crate::notifications::NotificationBus;

mod collections;

pub use collections::{ProductCollection, WarehouseCollection};

/// A cached entity with a backend-assigned identifier.
pub trait Resource: Clone + Send + Sync {
    type Id: Clone + PartialEq + Display + Send + Sync;

    fn id(&self) -> Self::Id;
}

/// The remote side of one resource collection. Implemented by the
/// `ApiClient` wrappers per resource; tests substitute programmable
/// stubs.
#[async_trait]
pub trait RemoteCollection: Send + Sync {
    type Item: Resource;
    type Create: Send + Sync;
    type Update: Send + Sync;

    /// Singular, lowercase name used in toast messages and logs.
    fn resource_name(&self) -> &'static str;

    async fn fetch_all(&self) -> Result<Vec<Self::Item>, ServiceError>;

    async fn create(&self, input: &Self::Create) -> Result<Self::Item, ServiceError>;

    async fn update(
        &self,
        id: &<Self::Item as Resource>::Id,
        patch: &Self::Update,
    ) -> Result<Self::Item, ServiceError>;

    /// Not every collection supports deletion; the default refuses.
    async fn delete(&self, id: &<Self::Item as Resource>::Id) -> Result<(), ServiceError> {
        Err(ServiceError::InvalidOperation(format!(
            "{} {} cannot be deleted from the client",
            self.resource_name(),
            id
        )))
    }
}

/// In-memory mirror of one backend collection for a screen's lifetime.
pub struct ResourceStore<R: RemoteCollection> {
    remote: R,
    items: RwLock<Vec<R::Item>>,
    loading: AtomicBool,
    notifier: NotificationBus,
}

impl<R: RemoteCollection> ResourceStore<R> {
    pub fn new(remote: R, notifier: NotificationBus) -> Self {
        Self {
            remote,
            items: RwLock::new(Vec::new()),
            loading: AtomicBool::new(false),
            notifier,
        }
    }

    /// Requests the full collection. On success the entire cache is
    /// replaced; on failure the previous contents stay untouched.
    pub async fn load(&self) -> Result<usize, ServiceError> {
        self.loading.store(true, Ordering::SeqCst);
        let result = self.remote.fetch_all().await;
        self.loading.store(false, Ordering::SeqCst);

        match result {
            Ok(fetched) => {
                let count = fetched.len();
                *self.items.write().expect("store lock poisoned") = fetched;
                info!(resource = self.remote.resource_name(), count, "cache reloaded");
                Ok(count)
            }
            Err(err) => {
                warn!(resource = self.remote.resource_name(), error = %err, "load failed");
                self.notifier
                    .error(format!("Failed to load {} data", self.remote.resource_name()));
                Err(err)
            }
        }
    }

    /// Sends a creation request; the backend-assigned entity is appended
    /// on success.
    pub async fn create(&self, input: &R::Create) -> Result<R::Item, ServiceError> {
        match self.remote.create(input).await {
            Ok(created) => {
                self.items
                    .write()
                    .expect("store lock poisoned")
                    .push(created.clone());
                self.notifier
                    .success(format!("Created {}", self.remote.resource_name()));
                Ok(created)
            }
            Err(err) => {
                self.notifier
                    .error(format!("Failed to save {}", self.remote.resource_name()));
                Err(err)
            }
        }
    }

    /// Sends an update request; on success the matching cached entity is
    /// replaced in place. An update for an identifier that is no longer
    /// cached leaves the cache unchanged (last response wins).
    pub async fn update(
        &self,
        id: &<R::Item as Resource>::Id,
        patch: &R::Update,
    ) -> Result<R::Item, ServiceError> {
        match self.remote.update(id, patch).await {
            Ok(updated) => {
                let mut items = self.items.write().expect("store lock poisoned");
                if let Some(slot) = items.iter_mut().find(|item| item.id() == *id) {
                    *slot = updated.clone();
                }
                self.notifier
                    .success(format!("Updated {}", self.remote.resource_name()));
                Ok(updated)
            }
            Err(err) => {
                self.notifier
                    .error(format!("Failed to save {}", self.remote.resource_name()));
                Err(err)
            }
        }
    }

    /// Sends a deletion request; on success the entity is removed from
    /// the cache by identifier.
    pub async fn delete(&self, id: &<R::Item as Resource>::Id) -> Result<(), ServiceError> {
        match self.remote.delete(id).await {
            Ok(()) => {
                self.items
                    .write()
                    .expect("store lock poisoned")
                    .retain(|item| item.id() != *id);
                self.notifier
                    .success(format!("Deleted {}", self.remote.resource_name()));
                Ok(())
            }
            Err(err) => {
                self.notifier
                    .error(format!("Failed to delete {}", self.remote.resource_name()));
                Err(err)
            }
        }
    }

    pub fn get(&self, id: &<R::Item as Resource>::Id) -> Option<R::Item> {
        self.items
            .read()
            .expect("store lock poisoned")
            .iter()
            .find(|item| item.id() == *id)
            .cloned()
    }

    pub fn snapshot(&self) -> Vec<R::Item> {
        self.items.read().expect("store lock poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.items.read().expect("store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Loading flag the screens key their spinner off.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }
}
