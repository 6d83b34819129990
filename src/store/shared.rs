use std::fmt::Display;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::{KeyedCache, Ticket};
use crate::error::{StoreError, ValidationError};
use crate::models::Keyed;

/// A request that has been handed a ticket and not settled yet.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Pending {
    ticket: Ticket,
    counted: bool,
}

#[derive(Debug)]
struct Inner<T> {
    cache: KeyedCache<T>,
    in_flight: usize,
    error: Option<String>,
}

/// Point-in-time copy of a store.
#[derive(Debug)]
pub(crate) struct Snapshot<T> {
    pub items: Vec<T>,
    pub scope: Option<String>,
    pub busy: bool,
    pub error: Option<String>,
}

/// Cache, in-flight counter and error message of one store, shared by its clones.
///
/// The lock is only taken to hand out tickets and to apply results, never across a request.
#[derive(Debug, Clone)]
pub(crate) struct Shared<T> {
    inner: Arc<RwLock<Inner<T>>>,
}

impl<T: Keyed + Clone> Shared<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                cache: KeyedCache::new(),
                in_flight: 0,
                error: None,
            })),
        }
    }

    /// Tickets a request that counts towards the store's loading flag.
    pub async fn begin(&self) -> Pending {
        let mut inner = self.inner.write().await;
        inner.in_flight += 1;

        Pending {
            ticket: inner.cache.issue(),
            counted: true,
        }
    }

    /// Tickets a request that leaves the loading flag alone.
    pub async fn issue(&self) -> Pending {
        let mut inner = self.inner.write().await;

        Pending {
            ticket: inner.cache.issue(),
            counted: false,
        }
    }

    /// Applies the outcome of a request.
    ///
    /// On success `apply` updates the cache and the error message is cleared. On failure the
    /// cache is left alone and `message` becomes the store's error.
    pub async fn settle<R, E, O>(
        &self,
        pending: Pending,
        result: Result<R, E>,
        message: &'static str,
        apply: impl FnOnce(&mut KeyedCache<T>, Ticket, R) -> O,
    ) -> Result<O, StoreError>
    where
        E: Into<StoreError> + Display,
    {
        let mut inner = self.inner.write().await;
        if pending.counted {
            inner.in_flight = inner.in_flight.saturating_sub(1);
        }

        let outcome = match result {
            Ok(value) => {
                let output = apply(&mut inner.cache, pending.ticket, value);
                inner.error = None;
                Ok(output)
            }
            Err(error) => {
                tracing::error!(%error, "{message}");
                inner.error = Some(message.to_string());
                Err(error.into())
            }
        };
        inner.cache.release(pending.ticket);

        outcome
    }

    /// Sets the store's error message without touching the cache.
    pub async fn fail(&self, message: &'static str) {
        self.inner.write().await.error = Some(message.to_string());
    }

    /// Records a validation failure caught before any request was sent.
    pub async fn reject(&self, error: ValidationError, message: &'static str) -> StoreError {
        tracing::error!(%error, "{message}");
        self.inner.write().await.error = Some(message.to_string());

        StoreError::Validation(error)
    }

    pub async fn snapshot(&self) -> Snapshot<T> {
        let inner = self.inner.read().await;

        Snapshot {
            items: inner.cache.values(),
            scope: inner.cache.scope().map(ToOwned::to_owned),
            busy: inner.in_flight > 0,
            error: inner.error.clone(),
        }
    }

    pub async fn get(&self, key: &str) -> Option<T> {
        self.inner.read().await.cache.get(key).cloned()
    }

    pub async fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.inner
            .read()
            .await
            .cache
            .iter()
            .filter(|item| predicate(item))
            .cloned()
            .collect()
    }
}
