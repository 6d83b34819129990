//! Form state for composing a package's question list.

use crate::error::ValidationError;
use crate::models::{Package, PackageDraft, Question, QuestionTime};

/// A question as shown in the editor, with its 1-based display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorQuestion {
    /// 1-based position in the list.
    pub order: usize,
    /// Question text.
    pub text: String,
    /// Allotted time, normalized.
    pub time: QuestionTime,
}

/// Builds or edits a package: name plus an ordered, drag-reorderable question list.
///
/// # Example
/// ```rust
/// use interview_admin::PackageEditor;
///
/// let mut editor = PackageEditor::new("Backend");
/// editor.add_question("Tell us about yourself", 2, 0)?;
/// editor.add_question("Why Rust?", 1, 75)?;
/// editor.move_question(1, 0)?;
///
/// let draft = editor.finish()?;
/// assert_eq!(draft.questions[0].question_text, "Why Rust?");
/// assert_eq!(draft.questions[0].question_time.minutes, 2);
/// assert_eq!(draft.questions[0].question_time.seconds, 15);
/// # Ok::<(), interview_admin::ValidationError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageEditor {
    name: String,
    questions: Vec<(String, QuestionTime)>,
}

impl PackageEditor {
    /// Starts an empty package.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            questions: Vec::new(),
        }
    }

    /// Loads an existing package for editing.
    #[must_use]
    pub fn from_package(package: &Package) -> Self {
        Self {
            name: package.package_name.clone(),
            questions: package
                .questions
                .iter()
                .map(|question| {
                    (
                        question.question_text.clone(),
                        question.question_time.normalized(),
                    )
                })
                .collect(),
        }
    }

    /// The package name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the package.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Number of questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the list has no questions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The questions in order.
    #[must_use]
    pub fn questions(&self) -> Vec<EditorQuestion> {
        self.questions
            .iter()
            .enumerate()
            .map(|(index, (text, time))| EditorQuestion {
                order: index + 1,
                text: text.clone(),
                time: *time,
            })
            .collect()
    }

    /// Appends a question.
    pub fn add_question(
        &mut self,
        text: impl Into<String>,
        minutes: i64,
        seconds: i64,
    ) -> Result<(), ValidationError> {
        let entry = checked_entry(text.into(), minutes, seconds, self.questions.len() + 1)?;
        self.questions.push(entry);
        Ok(())
    }

    /// Replaces the question at `index`.
    pub fn edit_question(
        &mut self,
        index: usize,
        text: impl Into<String>,
        minutes: i64,
        seconds: i64,
    ) -> Result<(), ValidationError> {
        self.check_index(index)?;
        self.questions[index] = checked_entry(text.into(), minutes, seconds, index + 1)?;
        Ok(())
    }

    /// Changes only the time of the question at `index`. Zero is allowed while typing,
    /// [`PackageEditor::finish`] rejects it.
    pub fn set_time(
        &mut self,
        index: usize,
        minutes: i64,
        seconds: i64,
    ) -> Result<QuestionTime, ValidationError> {
        self.check_index(index)?;
        let time = QuestionTime::from_minutes_seconds(minutes, seconds);
        self.questions[index].1 = time;
        Ok(time)
    }

    /// Removes the question at `index`; later questions move up one position.
    pub fn remove_question(&mut self, index: usize) -> Result<(), ValidationError> {
        self.check_index(index)?;
        self.questions.remove(index);
        Ok(())
    }

    /// Moves the question at `from` so it ends up at position `to`, shifting the questions
    /// in between.
    pub fn move_question(&mut self, from: usize, to: usize) -> Result<(), ValidationError> {
        self.check_index(from)?;
        self.check_index(to)?;

        if from != to {
            let entry = self.questions.remove(from);
            self.questions.insert(to, entry);
        }

        Ok(())
    }

    /// Produces the payload to save, requiring a name and at least one valid question.
    pub fn finish(&self) -> Result<PackageDraft, ValidationError> {
        if self.questions.is_empty() {
            if self.name.trim().is_empty() {
                return Err(ValidationError::EmptyPackageName);
            }
            return Err(ValidationError::NoQuestions);
        }

        let questions = self
            .questions
            .iter()
            .map(|(text, time)| Question {
                question_text: text.clone(),
                question_time: QuestionTime::from_total_seconds(time.total_seconds()),
            })
            .collect();

        let draft = PackageDraft::new(self.name.trim(), questions);
        draft.validate()?;

        Ok(draft)
    }

    fn check_index(&self, index: usize) -> Result<(), ValidationError> {
        if index < self.questions.len() {
            Ok(())
        } else {
            Err(ValidationError::QuestionOutOfRange {
                index,
                len: self.questions.len(),
            })
        }
    }
}

fn checked_entry(
    text: String,
    minutes: i64,
    seconds: i64,
    position: usize,
) -> Result<(String, QuestionTime), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyQuestion(position));
    }

    let time = QuestionTime::from_minutes_seconds(minutes, seconds);
    if time.is_zero() {
        return Err(ValidationError::ZeroQuestionTime(position));
    }

    Ok((text, time))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor_with(texts: &[&str]) -> PackageEditor {
        let mut editor = PackageEditor::new("P1");
        for text in texts {
            editor.add_question(*text, 1, 0).unwrap();
        }
        editor
    }

    fn texts(editor: &PackageEditor) -> Vec<String> {
        editor.questions().into_iter().map(|question| question.text).collect()
    }

    #[test]
    fn move_down_and_up() {
        let mut editor = editor_with(&["a", "b", "c", "d"]);

        editor.move_question(0, 2).unwrap();
        assert_eq!(texts(&editor), ["b", "c", "a", "d"]);

        editor.move_question(3, 0).unwrap();
        assert_eq!(texts(&editor), ["d", "b", "c", "a"]);

        editor.move_question(1, 1).unwrap();
        assert_eq!(texts(&editor), ["d", "b", "c", "a"]);
    }

    #[test]
    fn orders_follow_positions() {
        let mut editor = editor_with(&["a", "b", "c"]);
        editor.remove_question(0).unwrap();

        let orders: Vec<usize> = editor.questions().iter().map(|question| question.order).collect();
        assert_eq!(orders, [1, 2]);
        assert_eq!(texts(&editor), ["b", "c"]);
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let mut editor = editor_with(&["a"]);

        assert_eq!(
            editor.move_question(0, 1),
            Err(ValidationError::QuestionOutOfRange { index: 1, len: 1 })
        );
        assert!(editor.remove_question(3).is_err());
        assert!(editor.edit_question(1, "x", 1, 0).is_err());
    }

    #[test]
    fn time_edits_are_normalized() {
        let mut editor = editor_with(&["a"]);

        let time = editor.set_time(0, 2, 75).unwrap();
        assert_eq!((time.minutes, time.seconds), (3, 15));
        assert_eq!(editor.questions()[0].time, time);
    }

    #[test]
    fn empty_text_or_zero_time_is_rejected() {
        let mut editor = PackageEditor::new("P1");

        assert_eq!(editor.add_question("  ", 1, 0), Err(ValidationError::EmptyQuestion(1)));
        assert_eq!(editor.add_question("a", 0, 0), Err(ValidationError::ZeroQuestionTime(1)));
        assert!(editor.is_empty());
    }

    #[test]
    fn finish_requires_name_and_questions() {
        assert_eq!(PackageEditor::new("").finish(), Err(ValidationError::EmptyPackageName));
        assert_eq!(PackageEditor::new("P1").finish(), Err(ValidationError::NoQuestions));

        let mut editor = editor_with(&["a"]);
        editor.set_time(0, 0, 0).unwrap();
        assert_eq!(editor.finish(), Err(ValidationError::ZeroQuestionTime(1)));
    }

    #[test]
    fn loads_existing_package() {
        let package = Package {
            id: "p1".to_string(),
            package_name: "Backend".to_string(),
            questions: vec![Question::new("a", QuestionTime::from_total_seconds(125))],
        };

        let mut editor = PackageEditor::from_package(&package);
        editor.add_question("b", 0, 30).unwrap();
        let draft = editor.finish().unwrap();

        assert_eq!(draft.package_name, "Backend");
        assert_eq!(
            draft.questions[0].question_time,
            QuestionTime {
                hours: 0,
                minutes: 2,
                seconds: 5
            }
        );
        assert_eq!(draft.questions[1].question_time.total_seconds(), 30);
    }
}
