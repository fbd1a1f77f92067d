//! Answer sheet for one quiz attempt.
//!
//! The sheet records selections as they are made and is submitted through
//! [`AnswerSheet::submit`] whether the user finishes or a countdown expires.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GradeError;
use crate::grader::grade;
use crate::model::{FeedbackReport, Question, Selections};

/// What caused a sheet to be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitTrigger {
    /// The quiz taker submitted explicitly.
    User,
    /// The countdown reached zero.
    Timer,
}

impl fmt::Display for SubmitTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitTrigger::User => write!(f, "user"),
            SubmitTrigger::Timer => write!(f, "timer"),
        }
    }
}

/// A graded attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Unique submission identifier.
    pub id: Uuid,
    /// When the sheet was submitted.
    pub submitted_at: DateTime<Utc>,
    pub trigger: SubmitTrigger,
    /// Number of questions that had a selection at submit time.
    pub answered: usize,
    pub report: FeedbackReport,
}

impl Submission {
    /// Save the submission as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize submission")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write submission to {}", path.display()))?;
        Ok(())
    }
}

/// Selections recorded against a fixed set of questions.
#[derive(Debug, Clone)]
pub struct AnswerSheet {
    questions: Vec<Question>,
    selections: Selections,
}

impl AnswerSheet {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            selections: Selections::new(),
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    /// Number of questions with a recorded selection.
    pub fn answered(&self) -> usize {
        self.selections.len()
    }

    fn question(&self, number: usize) -> Result<&Question, GradeError> {
        number
            .checked_sub(1)
            .and_then(|idx| self.questions.get(idx))
            .ok_or(GradeError::UnknownQuestion {
                number,
                total: self.questions.len(),
            })
    }

    /// Select the option at `option_index` (0-based) for question `number`
    /// (1-based). Replaces any earlier selection and returns the option text.
    pub fn select_option(
        &mut self,
        number: usize,
        option_index: usize,
    ) -> Result<&str, GradeError> {
        let text = self
            .question(number)?
            .options
            .get(option_index)
            .cloned()
            .ok_or_else(|| GradeError::UnknownOption {
                number,
                option: format!("#{}", option_index + 1),
            })?;

        let slot = self.selections.entry(number).or_default();
        *slot = text;
        Ok(slot.as_str())
    }

    /// Select an option by its letter label (`"B"`, `"b"`, or `"B."`).
    pub fn select_label(&mut self, number: usize, label: &str) -> Result<&str, GradeError> {
        let unknown = || GradeError::UnknownOption {
            number,
            option: label.trim().to_string(),
        };

        let mut chars = label.trim().trim_end_matches('.').chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => c.to_ascii_uppercase(),
            _ => return Err(unknown()),
        };
        let index = (letter as u8 - b'A') as usize;

        // Check the question first so an unknown question wins over an unknown label.
        if self.question(number)?.options.len() <= index {
            return Err(unknown());
        }
        self.select_option(number, index)
    }

    /// Remove the selection for question `number`, returning it.
    pub fn clear(&mut self, number: usize) -> Option<String> {
        self.selections.remove(&number)
    }

    /// Grade the sheet as it stands. Unanswered questions count as incorrect.
    pub fn submit(&self, trigger: SubmitTrigger) -> Result<Submission, GradeError> {
        let report = grade(&self.questions, &self.selections)?;
        tracing::info!(
            %trigger,
            answered = self.answered(),
            score = report.score,
            total = report.total,
            "quiz submitted"
        );
        Ok(Submission {
            id: Uuid::new_v4(),
            submitted_at: Utc::now(),
            trigger,
            answered: self.answered(),
            report,
        })
    }
}

/// Load selections from a JSON object such as `{"1": "Rome", "2": null}`.
///
/// `null` values are treated as unanswered.
pub fn load_selections(path: &Path) -> Result<Selections> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers file: {}", path.display()))?;
    parse_selections(&content)
        .with_context(|| format!("failed to parse answers file: {}", path.display()))
}

/// Parse selections from a JSON string.
pub fn parse_selections(json: &str) -> Result<Selections> {
    let raw: BTreeMap<usize, Option<String>> =
        serde_json::from_str(json).context("answers must map question numbers to option text")?;
    Ok(raw
        .into_iter()
        .filter_map(|(number, text)| text.map(|t| (number, t)))
        .collect())
}
