use chrono::Utc;

use super::crud::{CrudResource, CrudStore, Messages};
use crate::error::{BulkDeleteError, StoreError};
use crate::models::{Interview, InterviewDraft, InterviewQuestion};
use crate::AdminClient;

impl CrudResource for Interview {
    const ENDPOINT: &'static str = "interviews";
    const MESSAGES: Messages = Messages {
        fetch: "Failed to fetch interviews.",
        add: "Failed to add interview.",
        update: "Failed to update interview.",
        delete: "Failed to delete interview.",
        invalid: "Invalid interview data.",
    };
}

/// Snapshot of the [`InterviewStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterviewState {
    /// Cached interviews, in server order.
    pub interviews: Vec<Interview>,
    /// A request of this store is in flight.
    pub loading: bool,
    /// Message describing the last failure, cleared by the next success.
    pub error: Option<String>,
}

/// Cache of interviews.
#[derive(Debug, Clone)]
pub struct InterviewStore {
    client: AdminClient,
    store: CrudStore<Interview>,
}

impl InterviewStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(client: AdminClient) -> Self {
        Self {
            store: CrudStore::new(client.clone()),
            client,
        }
    }

    /// Current state.
    pub async fn state(&self) -> InterviewState {
        let snapshot = self.store.snapshot().await;

        InterviewState {
            interviews: snapshot.items,
            loading: snapshot.busy,
            error: snapshot.error,
        }
    }

    /// Replaces the cache with the backend's interview list.
    pub async fn fetch_interviews(&self) -> Result<(), StoreError> {
        self.store.fetch().await
    }

    /// Creates an interview and appends the stored version to the cache.
    ///
    /// Package ids and the expiry date are checked by the backend.
    pub async fn add_interview(&self, draft: &InterviewDraft) -> Result<Interview, StoreError> {
        if let Err(error) = draft.validate() {
            return Err(self.store.reject(error).await);
        }

        self.store.add(draft).await
    }

    /// Updates an interview and replaces its cache entry.
    pub async fn update_interview(
        &self,
        id: &str,
        draft: &InterviewDraft,
    ) -> Result<Interview, StoreError> {
        if let Err(error) = draft.validate() {
            return Err(self.store.reject(error).await);
        }

        self.store.update(id, draft).await
    }

    /// Deletes an interview and drops it from the cache.
    pub async fn delete_interview(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(id).await
    }

    /// Deletes each of `ids`, one after the other, dropping the deleted ones from the cache.
    ///
    /// A failure does not stop the remaining deletions. When any failed, the store's error
    /// is set and the returned [`BulkDeleteError`] lists the failed ids.
    pub async fn delete_interviews(&self, ids: &[&str]) -> Result<(), StoreError> {
        let mut failed = Vec::new();

        for id in ids {
            if let Err(error) = self.store.delete(id).await {
                failed.push(((*id).to_string(), error));
            }
        }

        if failed.is_empty() {
            return Ok(());
        }

        self.store.fail(Interview::MESSAGES.delete).await;
        Err(BulkDeleteError {
            attempted: ids.len(),
            failed,
        }
        .into())
    }

    /// The link candidates open to take the cached interview `id`.
    ///
    /// `None` when no user URL is configured or the interview isn't cached.
    pub async fn interview_link(&self, id: &str) -> Option<String> {
        let user_url = self.client.user_url()?;

        self.store.get(id).await.map(|interview| interview.link(user_url))
    }

    /// The cached interview with this id.
    pub async fn interview(&self, id: &str) -> Option<Interview> {
        self.store.get(id).await
    }

    /// Cached interviews whose title contains `term`, ignoring case.
    pub async fn search(&self, term: &str) -> Vec<Interview> {
        self.store.filter(|interview| interview.matches(term)).await
    }

    /// Cached interviews that have not expired yet.
    pub async fn published(&self) -> Vec<Interview> {
        let now = Utc::now();

        self.store.filter(|interview| interview.is_published_at(now)).await
    }

    /// Fetches the questions of an interview. The result is not cached.
    pub async fn fetch_questions(&self, id: &str) -> Result<Vec<InterviewQuestion>, StoreError> {
        self.client.interview_questions(id).await.map_err(|error| {
            tracing::error!(%error, interview = id, "Failed to fetch interview questions.");
            error.into()
        })
    }
}
