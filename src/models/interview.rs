use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{contains_ignore_case, Keyed, Package, QuestionTime};
use crate::error::ValidationError;

/// A package referenced by an interview.
///
/// The backend answers with bare ids or with the populated packages depending on the route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PackageRef {
    /// Only the package id.
    Id(String),
    /// The full package.
    Expanded(Box<Package>),
}

impl PackageRef {
    /// The referenced package id.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Expanded(package) => &package.id,
        }
    }
}

/// A scheduled assessment made of one or more packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    /// Backend id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Display title.
    pub title: String,
    /// Referenced packages, in order.
    #[serde(default)]
    pub packages: Vec<PackageRef>,
    /// The interview is published until this instant.
    pub expire_date: DateTime<Utc>,
    /// Candidates may skip questions.
    #[serde(default)]
    pub can_skip: bool,
    /// All questions are shown at once.
    #[serde(default)]
    pub show_at_once: bool,
    /// Number of recorded videos.
    #[serde(default)]
    pub total_videos: u32,
    /// Number of submissions awaiting review.
    #[serde(default)]
    pub on_hold: u32,
}

impl Keyed for Interview {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Interview {
    /// Whether the interview is still open at `now`.
    #[must_use]
    pub fn is_published_at(&self, now: DateTime<Utc>) -> bool {
        self.expire_date > now
    }

    /// Whether the interview is still open.
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.is_published_at(Utc::now())
    }

    /// Ids of the referenced packages, in order.
    #[must_use]
    pub fn package_ids(&self) -> Vec<&str> {
        self.packages.iter().map(PackageRef::id).collect()
    }

    /// Case-insensitive search on the title. A blank term matches everything.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        contains_ignore_case(&self.title, term)
    }

    /// The link candidates open to take this interview, on the site at `user_url`.
    #[must_use]
    pub fn link(&self, user_url: &str) -> String {
        format!("{}/user-form/{}", user_url.trim_end_matches('/'), self.id)
    }
}

/// A question as served for a specific interview.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewQuestion {
    /// Backend id, when the route provides one.
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    /// What the candidate is asked.
    #[serde(alias = "question")]
    pub question_text: String,
    /// Time allotted to answer.
    #[serde(rename = "question_time", default)]
    pub question_time: QuestionTime,
}

/// Body sent to create or update an interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewDraft {
    /// Display title.
    pub title: String,
    /// Ids of the packages to include.
    pub packages: Vec<String>,
    /// End of the publication window.
    pub expire_date: DateTime<Utc>,
    /// Candidates may skip questions.
    pub can_skip: bool,
    /// All questions are shown at once.
    pub show_at_once: bool,
}

impl InterviewDraft {
    /// Creates a draft with both flags off.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        packages: Vec<String>,
        expire_date: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            packages,
            expire_date,
            can_skip: false,
            show_at_once: false,
        }
    }

    /// Sets the expiry to midnight UTC at the start of `date`, as picked in a date field.
    #[must_use]
    pub fn expire_on(mut self, date: NaiveDate) -> Self {
        self.expire_date = date.and_time(chrono::NaiveTime::MIN).and_utc();
        self
    }

    /// Sets whether candidates may skip questions.
    #[must_use]
    pub const fn can_skip(mut self, can_skip: bool) -> Self {
        self.can_skip = can_skip;
        self
    }

    /// Sets whether all questions are shown at once.
    #[must_use]
    pub const fn show_at_once(mut self, show_at_once: bool) -> Self {
        self.show_at_once = show_at_once;
        self
    }

    /// Checks the title and that at least one package is referenced.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.packages.is_empty() {
            return Err(ValidationError::NoPackages);
        }

        Ok(())
    }
}

impl From<&Interview> for InterviewDraft {
    fn from(interview: &Interview) -> Self {
        Self {
            title: interview.title.clone(),
            packages: interview.package_ids().into_iter().map(ToOwned::to_owned).collect(),
            expire_date: interview.expire_date,
            can_skip: interview.can_skip,
            show_at_once: interview.show_at_once,
        }
    }
}
