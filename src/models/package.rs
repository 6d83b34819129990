use serde::{Deserialize, Serialize};

use super::{contains_ignore_case, Keyed};
use crate::error::ValidationError;

/// Time allotted to answer a question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionTime {
    /// Whole hours.
    #[serde(default)]
    pub hours: u32,
    /// Whole minutes.
    #[serde(default)]
    pub minutes: u32,
    /// Seconds, below 60 once normalized.
    #[serde(default)]
    pub seconds: u32,
}

impl QuestionTime {
    /// Builds a time from form input, clamping negatives to zero and normalizing the result.
    ///
    /// # Example
    /// ```rust
    /// use interview_admin::QuestionTime;
    ///
    /// let time = QuestionTime::from_minutes_seconds(2, 75);
    /// assert_eq!((time.minutes, time.seconds), (3, 15));
    /// ```
    #[must_use]
    pub fn from_minutes_seconds(minutes: i64, seconds: i64) -> Self {
        let clamp = |value: i64| u32::try_from(value.max(0)).unwrap_or(u32::MAX);

        Self {
            hours: 0,
            minutes: clamp(minutes),
            seconds: clamp(seconds),
        }
        .normalized()
    }

    /// Splits a number of seconds into hours, minutes and seconds.
    #[must_use]
    pub const fn from_total_seconds(total: u32) -> Self {
        Self {
            hours: total / 3600,
            minutes: total % 3600 / 60,
            seconds: total % 60,
        }
    }

    /// Total length in seconds.
    #[must_use]
    pub const fn total_seconds(&self) -> u32 {
        self.hours
            .saturating_mul(3600)
            .saturating_add(self.minutes.saturating_mul(60))
            .saturating_add(self.seconds)
    }

    /// Carries overflowing seconds into minutes and overflowing minutes into hours.
    #[must_use]
    pub const fn normalized(self) -> Self {
        let minutes = self.minutes.saturating_add(self.seconds / 60);

        Self {
            hours: self.hours.saturating_add(minutes / 60),
            minutes: minutes % 60,
            seconds: self.seconds % 60,
        }
    }

    /// Whether no time at all is allotted.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }
}

/// A single interview question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// What the candidate is asked.
    #[serde(rename = "questionText")]
    pub question_text: String,
    /// Time allotted to answer.
    #[serde(default)]
    pub question_time: QuestionTime,
}

impl Question {
    /// Creates a question with a normalized time.
    #[must_use]
    pub fn new(question_text: impl Into<String>, question_time: QuestionTime) -> Self {
        Self {
            question_text: question_text.into(),
            question_time: question_time.normalized(),
        }
    }
}

/// A named, ordered list of questions.
///
/// Question order is the position in [`Package::questions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    /// Backend id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name.
    pub package_name: String,
    /// Questions in the order they are asked.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Keyed for Package {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Package {
    /// Case-insensitive search on the package name. A blank term matches everything.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        contains_ignore_case(&self.package_name, term)
    }

    /// Sum of all question times.
    #[must_use]
    pub fn total_time(&self) -> QuestionTime {
        let total = self
            .questions
            .iter()
            .fold(0u32, |acc, question| acc.saturating_add(question.question_time.total_seconds()));

        QuestionTime::from_total_seconds(total)
    }
}

/// Body sent to create or update a package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDraft {
    /// Display name.
    pub package_name: String,
    /// Questions in order.
    pub questions: Vec<Question>,
}

impl PackageDraft {
    /// Creates a draft.
    #[must_use]
    pub fn new(package_name: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            package_name: package_name.into(),
            questions,
        }
    }

    /// Checks the name and every question. An empty question list is accepted here,
    /// [`PackageEditor::finish`](crate::PackageEditor::finish) is stricter.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.package_name.trim().is_empty() {
            return Err(ValidationError::EmptyPackageName);
        }

        for (position, question) in self.questions.iter().enumerate() {
            if question.question_text.trim().is_empty() {
                return Err(ValidationError::EmptyQuestion(position + 1));
            }
            if question.question_time.is_zero() {
                return Err(ValidationError::ZeroQuestionTime(position + 1));
            }
        }

        Ok(())
    }
}

impl From<&Package> for PackageDraft {
    fn from(package: &Package) -> Self {
        Self {
            package_name: package.package_name.clone(),
            questions: package.questions.clone(),
        }
    }
}
