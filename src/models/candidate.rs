use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{contains_ignore_case, Keyed};

/// Outcome of a candidate's review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewStatus {
    /// The candidate passed.
    Passed,
    /// The candidate failed.
    Failed,
    /// Not reviewed yet.
    #[default]
    Pending,
}

fn status_or_pending<'de, D>(deserializer: D) -> Result<ReviewStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<ReviewStatus>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A candidate's submission for an interview.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalForm {
    /// Backend id of the candidate (user) record.
    #[serde(rename = "_id")]
    pub id: String,
    /// First name.
    #[serde(default)]
    pub first_name: String,
    /// Last name.
    #[serde(default)]
    pub last_name: String,
    /// Id of the recorded video, if the candidate uploaded one.
    #[serde(default)]
    pub video_id: Option<String>,
    /// Review outcome. A missing or `null` status reads as pending.
    #[serde(default, deserialize_with = "status_or_pending")]
    pub status: ReviewStatus,
    /// Reviewer notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Flagged for attention.
    #[serde(default)]
    pub alert: bool,
    /// The video has been watched by a reviewer.
    #[serde(default)]
    pub watched: bool,
}

impl Keyed for PersonalForm {
    fn key(&self) -> &str {
        &self.id
    }
}

impl PersonalForm {
    /// `"First Last"`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Case-insensitive search on the full name. A blank term matches everything.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        contains_ignore_case(&self.full_name(), term)
    }
}

/// Body of a review update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CandidateReview {
    /// Reviewer notes.
    pub notes: String,
    /// Review outcome.
    pub status: ReviewStatus,
}

/// When a candidate answered one question, relative to the recording.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerTiming {
    /// The answered question.
    #[serde(default)]
    pub question_id: Option<String>,
    /// When the answer started.
    pub start_time: DateTime<Utc>,
    /// When the answer ended.
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

/// Position in the recording where the answer at `index` starts.
///
/// The recording starts with the first answer, so offsets are measured from it.
/// Returns `None` if `index` is out of range or the answer starts before the first one.
#[must_use]
pub fn seek_offset(timings: &[AnswerTiming], index: usize) -> Option<Duration> {
    let first = timings.first()?;
    let answer = timings.get(index)?;

    (answer.start_time - first.start_time).to_std().ok()
}
