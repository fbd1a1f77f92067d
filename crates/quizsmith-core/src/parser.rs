//! Tolerant quiz text parser.
//!
//! Turns the loosely formatted text an LLM produces for a multiple-choice
//! quiz into [`Question`] records:
//!
//! ```text
//! 1. What is the capital of Italy?
//! A. Paris
//! B. Rome
//! Answer: B. Rome
//! ```
//!
//! Each non-blank line is classified as a question marker, an option
//! marker, an answer marker, or noise. Noise and out-of-order lines are
//! skipped; parsing never fails.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::{option_label, Question, OPTION_LABELS};

const ANSWER_PREFIX: &str = "Answer:";

/// What a single trimmed, non-blank line means to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind<'a> {
    /// `3. Some question` with the number stripped.
    QuestionMarker(&'a str),
    /// `B. Some option` with the label stripped.
    OptionMarker(&'a str),
    /// `Answer: B. Some option` with both prefixes stripped.
    AnswerMarker(&'a str),
    Other,
}

fn classify(line: &str) -> LineKind<'_> {
    if let Some(rest) = strip_question_number(line) {
        return LineKind::QuestionMarker(rest.trim());
    }
    if let Some(rest) = strip_option_label(line) {
        return LineKind::OptionMarker(rest.trim());
    }
    if let Some(rest) = line.strip_prefix(ANSWER_PREFIX) {
        let rest = rest.trim();
        let answer = strip_option_label(rest).map(str::trim).unwrap_or(rest);
        return LineKind::AnswerMarker(answer);
    }
    LineKind::Other
}

/// Strip a leading `<digits>.` marker.
fn strip_question_number(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix('.')
}

/// Strip a leading `A.`-`D.` label. The label must be followed by whitespace
/// or end the line, so a trimmed `B. ` still counts as an empty option.
fn strip_option_label(line: &str) -> Option<&str> {
    let mut chars = line.chars();
    let label = chars.next()?;
    if !OPTION_LABELS.contains(&label) {
        return None;
    }
    let rest = chars.as_str().strip_prefix('.')?;
    (rest.is_empty() || rest.starts_with(char::is_whitespace)).then_some(rest)
}

/// Parser state: either before the first question or accumulating one.
#[derive(Debug)]
enum ParseState {
    NoQuestion,
    InQuestion(Question),
}

impl ParseState {
    /// Apply one line. A question finished by this line is returned
    /// alongside the next state.
    fn step(self, line: LineKind<'_>) -> (ParseState, Option<Question>) {
        match (self, line) {
            (ParseState::NoQuestion, LineKind::QuestionMarker(text)) => {
                (ParseState::InQuestion(Question::new(text)), None)
            }
            (ParseState::InQuestion(done), LineKind::QuestionMarker(text)) => {
                (ParseState::InQuestion(Question::new(text)), Some(done))
            }
            (ParseState::InQuestion(mut current), LineKind::OptionMarker(text)) => {
                current.options.push(text.to_string());
                (ParseState::InQuestion(current), None)
            }
            (ParseState::InQuestion(mut current), LineKind::AnswerMarker(text)) => {
                current.answer = text.to_string();
                (ParseState::InQuestion(current), None)
            }
            (
                ParseState::NoQuestion,
                LineKind::OptionMarker(text) | LineKind::AnswerMarker(text),
            ) => {
                tracing::trace!(line = text, "dropping line outside of a question");
                (ParseState::NoQuestion, None)
            }
            (state, LineKind::Other) => (state, None),
        }
    }
}

/// Parse raw quiz text into questions, in the order they appear.
///
/// Questions without options or without an `Answer:` line are kept; it is
/// up to the caller to decide whether they are usable (see
/// [`validate_quiz`]).
pub fn parse_quiz(raw: &str) -> Vec<Question> {
    // Editors on Windows like to save a BOM; `trim` keeps it.
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut questions = Vec::new();
    let mut state = ParseState::NoQuestion;

    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let (next, finished) = state.step(classify(line));
        questions.extend(finished);
        state = next;
    }

    if let ParseState::InQuestion(last) = state {
        questions.push(last);
    }

    tracing::debug!(questions = questions.len(), "parsed quiz text");
    questions
}

/// Read a quiz text file and parse it.
pub fn parse_quiz_file(path: &Path) -> Result<Vec<Question>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;
    Ok(parse_quiz(&content))
}

/// Render questions back into the text format the parser reads.
///
/// An answer that matches one of the first four options is written with
/// that option's label, as in `Answer: B. Rome`. Parsing the output gives
/// back the same questions as long as no field spans several lines, every
/// question has at most four options, and any answer that itself starts
/// with an option label matches one of those options.
pub fn render_quiz_text(questions: &[Question]) -> String {
    let mut out = String::new();
    for (idx, q) in questions.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}. {}", idx + 1, q.text);
        for (i, option) in q.options.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", option_label(i), option);
        }
        match q.correct_option_index() {
            Some(i) if i < OPTION_LABELS.len() => {
                let _ = writeln!(out, "{ANSWER_PREFIX} {}. {}", option_label(i), q.answer);
            }
            _ if !q.answer.is_empty() => {
                let _ = writeln!(out, "{ANSWER_PREFIX} {}", q.answer);
            }
            _ => {}
        }
    }
    out
}

/// A warning from quiz validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The 1-based question number (if applicable).
    pub question_number: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Check parsed questions for shape problems a quiz taker would notice.
///
/// Nothing here is fatal: the grader copes with every case reported.
pub fn validate_quiz(questions: &[Question]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if questions.is_empty() {
        warnings.push(ValidationWarning {
            question_number: None,
            message: "no questions found".into(),
        });
        return warnings;
    }

    for (idx, q) in questions.iter().enumerate() {
        let number = idx + 1;
        let mut warn = |message: String| {
            warnings.push(ValidationWarning {
                question_number: Some(number),
                message,
            })
        };

        if q.text.trim().is_empty() {
            warn("question text is empty".into());
        }

        if q.options.len() < 2 {
            warn(format!("only {} option(s)", q.options.len()));
        } else if q.options.len() > OPTION_LABELS.len() {
            warn(format!(
                "{} options; only {} are supported",
                q.options.len(),
                OPTION_LABELS.len()
            ));
        }

        let mut seen = HashSet::new();
        for option in &q.options {
            if !seen.insert(option.as_str()) {
                warn(format!("duplicate option: {option}"));
            }
        }

        if q.answer.trim().is_empty() {
            warn("no answer given".into());
        } else if !q.is_answerable() {
            warn(format!("answer '{}' does not match any option", q.answer));
        }
    }

    warnings
}
