//! Core data model types for quizsmith.
//!
//! Questions come out of the parser; feedback reports come out of the
//! grader. Both are plain values that can be cloned and serialized freely.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Sentinel stored as `your_answer` when a question was left unanswered.
pub const NO_ANSWER_SELECTED: &str = "No answer selected";

/// Option labels recognised by the parser, in presentation order.
pub const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

/// Selected option text keyed by 1-based question number.
///
/// A missing key means the question was not answered.
pub type Selections = BTreeMap<usize, String>;

/// A single multiple-choice question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The question prompt.
    pub text: String,
    /// Answer choices in presentation order, labels stripped.
    #[serde(default)]
    pub options: Vec<String>,
    /// Text of the correct option, labels stripped. Empty if unknown.
    #[serde(default)]
    pub answer: String,
}

impl Question {
    /// Create a question with no options and no answer yet.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: Vec::new(),
            answer: String::new(),
        }
    }

    /// Position of the correct answer within `options`, if it matches one.
    pub fn correct_option_index(&self) -> Option<usize> {
        let answer = self.answer.trim();
        if answer.is_empty() {
            return None;
        }
        self.options.iter().position(|o| o.trim() == answer)
    }

    /// Whether the answer matches one of the options.
    pub fn is_answerable(&self) -> bool {
        self.correct_option_index().is_some()
    }
}

/// Display label for the option at `index` ("A", "B", ...).
///
/// Options beyond the fourth keep counting up the alphabet so that a
/// hand-built question with extra choices still renders.
pub fn option_label(index: usize) -> String {
    match OPTION_LABELS.get(index) {
        Some(c) => c.to_string(),
        None => char::from_u32('A' as u32 + index as u32)
            .filter(char::is_ascii_uppercase)
            .map(|c| c.to_string())
            .unwrap_or_else(|| format!("#{}", index + 1)),
    }
}

/// Outcome of grading one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl Verdict {
    pub fn is_correct(self) -> bool {
        self == Verdict::Correct
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Correct => write!(f, "Correct"),
            Verdict::Incorrect => write!(f, "Incorrect"),
        }
    }
}

/// Grading detail for a single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionFeedback {
    /// 1-based question number.
    pub question_number: usize,
    /// The selected option text, or [`NO_ANSWER_SELECTED`].
    pub your_answer: String,
    /// The canonical answer text.
    pub correct_answer: String,
    pub result: Verdict,
}

/// Aggregate grading result for a whole quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReport {
    /// Number of correct answers.
    pub score: usize,
    /// Number of graded questions.
    pub total: usize,
    /// `100 * score / total`, rounded to two decimals.
    pub percentage: f64,
    /// Per-question feedback keyed by question number.
    pub items: BTreeMap<usize, QuestionFeedback>,
}

impl FeedbackReport {
    /// Score formatted as `"score/total"`.
    pub fn score_label(&self) -> String {
        format!("{}/{}", self.score, self.total)
    }

    /// Percentage formatted with two decimals and a percent sign.
    pub fn percentage_label(&self) -> String {
        format!("{:.2}%", self.percentage)
    }

    /// Feedback for questions that were not answered correctly.
    pub fn incorrect(&self) -> impl Iterator<Item = &QuestionFeedback> {
        self.items.values().filter(|f| !f.result.is_correct())
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("failed to serialize feedback report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write feedback report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read feedback report from {}", path.display()))?;
        let report: FeedbackReport =
            serde_json::from_str(&content).context("failed to parse feedback report JSON")?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capital_question() -> Question {
        Question {
            text: "Capital of Italy?".into(),
            options: vec!["Paris".into(), "Rome".into(), "Madrid".into()],
            answer: "Rome".into(),
        }
    }

    #[test]
    fn correct_option_index_matches_trimmed_text() {
        let mut q = capital_question();
        assert_eq!(q.correct_option_index(), Some(1));

        q.answer = "  Rome ".into();
        assert_eq!(q.correct_option_index(), Some(1));

        q.answer = "rome".into();
        assert_eq!(q.correct_option_index(), None);
        assert!(!q.is_answerable());
    }

    #[test]
    fn empty_answer_is_never_answerable() {
        let q = Question::new("Unanswered?");
        assert_eq!(q.correct_option_index(), None);
    }

    #[test]
    fn option_labels() {
        assert_eq!(option_label(0), "A");
        assert_eq!(option_label(3), "D");
        assert_eq!(option_label(4), "E");
        assert_eq!(option_label(30), "#31");
    }

    #[test]
    fn verdict_display() {
        assert_eq!(Verdict::Correct.to_string(), "Correct");
        assert_eq!(Verdict::Incorrect.to_string(), "Incorrect");
    }

    #[test]
    fn verdict_serializes_as_word() {
        let json = serde_json::to_string(&Verdict::Incorrect).unwrap();
        assert_eq!(json, "\"Incorrect\"");
    }

    #[test]
    fn question_serde_defaults() {
        let q: Question = serde_json::from_str(r#"{"text": "Only text"}"#).unwrap();
        assert!(q.options.is_empty());
        assert!(q.answer.is_empty());
    }

    #[test]
    fn feedback_report_json_roundtrip() {
        let mut items = BTreeMap::new();
        items.insert(
            1,
            QuestionFeedback {
                question_number: 1,
                your_answer: NO_ANSWER_SELECTED.into(),
                correct_answer: "Rome".into(),
                result: Verdict::Incorrect,
            },
        );
        let report = FeedbackReport {
            score: 0,
            total: 1,
            percentage: 0.0,
            items,
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("feedback.json");
        report.save_json(&path).unwrap();
        let loaded = FeedbackReport::load_json(&path).unwrap();

        assert_eq!(loaded, report);
        assert_eq!(loaded.score_label(), "0/1");
        assert_eq!(loaded.percentage_label(), "0.00%");
        assert_eq!(loaded.incorrect().count(), 1);
    }
}
