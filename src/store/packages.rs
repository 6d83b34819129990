use super::crud::{CrudResource, CrudStore, Messages};
use crate::error::StoreError;
use crate::models::{Package, PackageDraft};
use crate::AdminClient;

impl CrudResource for Package {
    const ENDPOINT: &'static str = "question-package";
    const MESSAGES: Messages = Messages {
        fetch: "Failed to fetch packages.",
        add: "Failed to add package.",
        update: "Failed to update package.",
        delete: "Failed to delete package.",
        invalid: "Invalid package data.",
    };
}

/// Snapshot of the [`PackageStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageState {
    /// Cached packages, in server order.
    pub packages: Vec<Package>,
    /// A request of this store is in flight.
    pub loading: bool,
    /// Message describing the last failure, cleared by the next success.
    pub error: Option<String>,
}

/// Cache of question packages.
///
/// # Example
/// ```rust,ignore
/// let packages = PackageStore::new(client);
///
/// packages.fetch_packages().await?;
/// let created = packages.add_package(&PackageDraft::new("Backend", questions)).await?;
/// packages.delete_package(&created.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct PackageStore {
    store: CrudStore<Package>,
}

impl PackageStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(client: AdminClient) -> Self {
        Self {
            store: CrudStore::new(client),
        }
    }

    /// Current state.
    pub async fn state(&self) -> PackageState {
        let snapshot = self.store.snapshot().await;

        PackageState {
            packages: snapshot.items,
            loading: snapshot.busy,
            error: snapshot.error,
        }
    }

    /// Replaces the cache with the backend's package list.
    pub async fn fetch_packages(&self) -> Result<(), StoreError> {
        self.store.fetch().await
    }

    /// Creates a package and appends the stored version to the cache.
    pub async fn add_package(&self, draft: &PackageDraft) -> Result<Package, StoreError> {
        if let Err(error) = draft.validate() {
            return Err(self.store.reject(error).await);
        }

        self.store.add(draft).await
    }

    /// Updates a package and replaces its cache entry.
    pub async fn update_package(
        &self,
        id: &str,
        draft: &PackageDraft,
    ) -> Result<Package, StoreError> {
        if let Err(error) = draft.validate() {
            return Err(self.store.reject(error).await);
        }

        self.store.update(id, draft).await
    }

    /// Deletes a package and drops it from the cache.
    pub async fn delete_package(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(id).await
    }

    /// The cached package with this id.
    pub async fn package(&self, id: &str) -> Option<Package> {
        self.store.get(id).await
    }

    /// Cached packages whose name contains `term`, ignoring case.
    pub async fn search(&self, term: &str) -> Vec<Package> {
        self.store.filter(|package| package.matches(term)).await
    }
}
