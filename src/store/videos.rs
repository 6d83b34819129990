use super::shared::Shared;
use crate::error::{DeleteCandidateError, DeletionStep, RequestError, StoreError};
use crate::models::{AnswerTiming, CandidateReview, PersonalForm};
use crate::AdminClient;

const FETCH_FAILED: &str = "Failed to fetch personal forms.";
const DELETE_FAILED: &str = "Failed to delete the user or their video.";
const WATCH_STATUS_FAILED: &str = "Failed to update the video watch status.";
const REVIEW_FAILED: &str = "Failed to save the review.";

/// Snapshot of the [`VideoStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoState {
    /// Candidates of the last fetched interview.
    pub personal_forms: Vec<PersonalForm>,
    /// The interview `personal_forms` belongs to.
    pub interview_id: Option<String>,
    /// A fetch is in flight.
    pub is_fetching: bool,
    /// Message describing the last failure, cleared by the next success.
    pub error: Option<String>,
}

/// A candidate paired with the playable URL of their video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateVideo {
    /// The candidate.
    pub form: PersonalForm,
    /// `None` when the candidate has no video or it could not be resolved.
    pub video_url: Option<String>,
}

/// Candidate submissions of one interview and their videos.
#[derive(Debug, Clone)]
pub struct VideoStore {
    client: AdminClient,
    shared: Shared<PersonalForm>,
}

impl VideoStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(client: AdminClient) -> Self {
        Self {
            client,
            shared: Shared::new(),
        }
    }

    /// Current state.
    pub async fn state(&self) -> VideoState {
        let snapshot = self.shared.snapshot().await;

        VideoState {
            personal_forms: snapshot.items,
            interview_id: snapshot.scope,
            is_fetching: snapshot.busy,
            error: snapshot.error,
        }
    }

    /// Replaces the cache with the candidates of `interview_id`.
    ///
    /// Nothing outside the fetched list survives, including candidates of a previously
    /// fetched interview that were patched while this fetch was in flight.
    pub async fn fetch_personal_forms_by_interview(
        &self,
        interview_id: &str,
    ) -> Result<(), StoreError> {
        let pending = self.shared.begin().await;

        let result = self.client.personal_forms(interview_id).await;

        self.shared
            .settle(pending, result, FETCH_FAILED, |cache, ticket, forms| {
                if !cache.replace_scoped(ticket, interview_id, forms) {
                    tracing::warn!(
                        interview = interview_id,
                        "Discarded personal forms superseded by a newer fetch"
                    );
                }
            })
            .await
    }

    /// Resolves a video id to a playable URL, or `None` if that fails.
    pub async fn get_video_url(&self, video_id: &str) -> Option<String> {
        match self.client.video_url(video_id).await {
            Ok(url) => Some(url),
            Err(error) => {
                tracing::warn!(%error, video = video_id, "Failed to resolve video URL");
                None
            }
        }
    }

    /// Resolves the video of every cached candidate, one after the other.
    pub async fn resolve_video_urls(&self) -> Vec<CandidateVideo> {
        let forms = self.shared.snapshot().await.items;
        let mut videos = Vec::with_capacity(forms.len());

        for form in forms {
            let video_url = match form.video_id.as_deref() {
                Some(video_id) => self.get_video_url(video_id).await,
                None => None,
            };
            videos.push(CandidateVideo { form, video_url });
        }

        videos
    }

    /// Deletes a candidate: their video (if any), their user record, then their reference
    /// in the interview, each step waiting for the previous one.
    ///
    /// The cache is only updated once all steps succeeded. A failing step stops the
    /// sequence; steps that already succeeded are not undone, and the returned
    /// [`DeleteCandidateError`] lists them.
    pub async fn delete_user_and_video(
        &self,
        user_id: &str,
        video_id: Option<&str>,
        interview_id: &str,
    ) -> Result<(), StoreError> {
        let pending = self.shared.issue().await;

        let result = self.delete_candidate(user_id, video_id, interview_id).await;

        self.shared
            .settle(pending, result, DELETE_FAILED, |cache, ticket, ()| {
                tracing::info!(user = user_id, interview = interview_id, "Deleted candidate");
                cache.remove(ticket, user_id);
            })
            .await
    }

    async fn delete_candidate(
        &self,
        user_id: &str,
        video_id: Option<&str>,
        interview_id: &str,
    ) -> Result<(), DeleteCandidateError> {
        let mut completed = Vec::with_capacity(3);

        if let Some(video_id) = video_id.filter(|id| !id.is_empty()) {
            self.client
                .delete_video(video_id)
                .await
                .map_err(|source| step_failed(DeletionStep::Video, &completed, source))?;
            completed.push(DeletionStep::Video);
        } else {
            tracing::debug!(user = user_id, "No video to delete, deleting the user only");
        }

        self.client
            .delete_user(user_id)
            .await
            .map_err(|source| step_failed(DeletionStep::User, &completed, source))?;
        completed.push(DeletionStep::User);

        self.client
            .remove_user_from_interview(interview_id, user_id)
            .await
            .map_err(|source| step_failed(DeletionStep::Unlink, &completed, source))?;

        Ok(())
    }

    /// Marks a video as watched and flags every cached candidate with that video.
    pub async fn update_video_watch_status(&self, video_id: &str) -> Result<(), StoreError> {
        let pending = self.shared.issue().await;

        let result = self.client.mark_video_watched(video_id).await;

        self.shared
            .settle(pending, result, WATCH_STATUS_FAILED, |cache, ticket, ()| {
                cache.patch_where(
                    ticket,
                    |form| form.video_id.as_deref() == Some(video_id),
                    |form| form.watched = true,
                );
            })
            .await
    }

    /// Saves a reviewer's notes and verdict and applies them to the cached candidate.
    pub async fn update_review(
        &self,
        user_id: &str,
        review: &CandidateReview,
    ) -> Result<(), StoreError> {
        let pending = self.shared.issue().await;

        let result = self.client.update_user(user_id, review).await;

        self.shared
            .settle(pending, result, REVIEW_FAILED, |cache, ticket, ()| {
                cache.patch(ticket, user_id, |form| {
                    form.notes = Some(review.notes.clone());
                    form.status = review.status;
                });
            })
            .await
    }

    /// Fetches when the candidate answered each question. The result is not cached.
    pub async fn fetch_question_times(
        &self,
        interview_id: &str,
        user_id: &str,
    ) -> Result<Vec<AnswerTiming>, StoreError> {
        self.client
            .question_times(interview_id, user_id)
            .await
            .map_err(|error| {
                tracing::error!(
                    %error,
                    interview = interview_id,
                    user = user_id,
                    "Failed to fetch question times"
                );
                error.into()
            })
    }

    /// Cached candidates whose name contains `term`, ignoring case.
    pub async fn search(&self, term: &str) -> Vec<PersonalForm> {
        self.shared.filter(|form| form.matches(term)).await
    }
}

fn step_failed(
    failed: DeletionStep,
    completed: &[DeletionStep],
    source: RequestError,
) -> DeleteCandidateError {
    DeleteCandidateError {
        failed,
        completed: completed.to_vec(),
        source,
    }
}
