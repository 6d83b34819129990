use serde::de::DeserializeOwned;
use serde::Serialize;

use super::shared::{Shared, Snapshot};
use crate::error::{StoreError, ValidationError};
use crate::models::Keyed;
use crate::AdminClient;

/// Error messages a CRUD store exposes to the UI.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Messages {
    pub fetch: &'static str,
    pub add: &'static str,
    pub update: &'static str,
    pub delete: &'static str,
    pub invalid: &'static str,
}

/// An entity served by a `/{endpoint}/list|create|update|delete` resource.
pub(crate) trait CrudResource: Keyed + DeserializeOwned + Clone + Send + Sync {
    const ENDPOINT: &'static str;
    const MESSAGES: Messages;
}

/// Fetch/create/update/delete against one resource, mirrored into a keyed cache.
///
/// Calls are independent: nothing is queued or deduplicated, and a response from a request
/// superseded by a newer one for the same id is dropped instead of overwriting it.
#[derive(Debug, Clone)]
pub(crate) struct CrudStore<T> {
    client: AdminClient,
    shared: Shared<T>,
}

impl<T: CrudResource> CrudStore<T> {
    pub fn new(client: AdminClient) -> Self {
        Self {
            client,
            shared: Shared::new(),
        }
    }

    pub async fn snapshot(&self) -> Snapshot<T> {
        self.shared.snapshot().await
    }

    pub async fn get(&self, id: &str) -> Option<T> {
        self.shared.get(id).await
    }

    pub async fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.shared.filter(predicate).await
    }

    pub async fn reject(&self, error: ValidationError) -> StoreError {
        self.shared.reject(error, T::MESSAGES.invalid).await
    }

    pub async fn fetch(&self) -> Result<(), StoreError> {
        let pending = self.shared.begin().await;

        let result = self.client.endpoint(T::ENDPOINT).list::<T>().await;

        self.shared
            .settle(pending, result, T::MESSAGES.fetch, |cache, ticket, items| {
                if !cache.replace_all(ticket, items) {
                    tracing::warn!(
                        endpoint = T::ENDPOINT,
                        "Discarded listing superseded by a newer one"
                    );
                }
            })
            .await
    }

    pub async fn add<B: Serialize + Sync + ?Sized>(&self, draft: &B) -> Result<T, StoreError> {
        let pending = self.shared.begin().await;

        let result = self.client.endpoint(T::ENDPOINT).create::<B, T>(draft).await;

        self.shared
            .settle(pending, result, T::MESSAGES.add, |cache, ticket, created| {
                tracing::info!(endpoint = T::ENDPOINT, id = created.key(), "Created record");
                cache.upsert(ticket, created.clone());
                created
            })
            .await
    }

    pub async fn update<B: Serialize + Sync + ?Sized>(
        &self,
        id: &str,
        draft: &B,
    ) -> Result<T, StoreError> {
        let pending = self.shared.begin().await;

        let result = self.client.endpoint(T::ENDPOINT).update::<B, T>(id, draft).await;

        self.shared
            .settle(pending, result, T::MESSAGES.update, |cache, ticket, updated| {
                if !cache.replace(ticket, id, updated.clone()) {
                    tracing::warn!(
                        endpoint = T::ENDPOINT,
                        id,
                        "Update not applied to the cache: record not cached or superseded"
                    );
                }
                updated
            })
            .await
    }

    /// Sets the store's error message, for failures that span several requests.
    pub async fn fail(&self, message: &'static str) {
        self.shared.fail(message).await;
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let pending = self.shared.begin().await;

        let result = self.client.endpoint(T::ENDPOINT).delete(id).await;

        self.shared
            .settle(pending, result, T::MESSAGES.delete, |cache, ticket, ()| {
                tracing::info!(endpoint = T::ENDPOINT, id, "Deleted record");
                cache.remove(ticket, id);
            })
            .await
    }
}
