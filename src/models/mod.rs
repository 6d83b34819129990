//! Entities exchanged with the backend and the payloads sent to it.

pub mod candidate;
pub mod interview;
pub mod package;

pub use candidate::{seek_offset, AnswerTiming, CandidateReview, PersonalForm, ReviewStatus};
pub use interview::{Interview, InterviewDraft, InterviewQuestion, PackageRef};
pub use package::{Package, PackageDraft, Question, QuestionTime};

/// An entity identified by a backend-assigned id.
pub trait Keyed {
    /// The entity id (`_id` on the wire).
    fn key(&self) -> &str;
}

/// Case-insensitive substring match used by the list searches.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}
