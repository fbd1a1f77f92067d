//! Quiz grading.
//!
//! Grading is a pure function of the parsed questions and the user's
//! selections. Highlighting and other presentation concerns belong to the
//! caller, driven by each item's [`Verdict`].

use std::collections::BTreeMap;

use crate::error::GradeError;
use crate::model::{
    FeedbackReport, Question, QuestionFeedback, Selections, Verdict, NO_ANSWER_SELECTED,
};

/// Grade one question against an optional selection.
fn grade_question(
    number: usize,
    question: &Question,
    selected: Option<&str>,
) -> QuestionFeedback {
    let correct_answer = question.answer.trim();

    let (your_answer, result) = match selected.map(str::trim) {
        Some(chosen) if !correct_answer.is_empty() && chosen == correct_answer => {
            (chosen.to_string(), Verdict::Correct)
        }
        Some(chosen) => (chosen.to_string(), Verdict::Incorrect),
        None => (NO_ANSWER_SELECTED.to_string(), Verdict::Incorrect),
    };

    QuestionFeedback {
        question_number: number,
        your_answer,
        correct_answer: correct_answer.to_string(),
        result,
    }
}

/// Round to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Grade `selections` (keyed by 1-based question number) against `questions`.
///
/// Matching is exact and case-sensitive after trimming both sides. A
/// question whose answer matches none of its options can never be answered
/// correctly. Selections for question numbers outside the quiz are ignored.
///
/// Fails with [`GradeError::NoQuestions`] for an empty quiz instead of
/// producing a NaN percentage.
pub fn grade(
    questions: &[Question],
    selections: &Selections,
) -> Result<FeedbackReport, GradeError> {
    if questions.is_empty() {
        return Err(GradeError::NoQuestions);
    }

    let total = questions.len();
    let stray = selections.keys().filter(|&&n| n == 0 || n > total).count();
    if stray > 0 {
        tracing::warn!(stray, total, "ignoring selections for unknown questions");
    }

    let items: BTreeMap<usize, QuestionFeedback> = questions
        .iter()
        .enumerate()
        .map(|(idx, question)| {
            let number = idx + 1;
            let selected = selections.get(&number).map(String::as_str);
            (number, grade_question(number, question, selected))
        })
        .collect();

    let score = items.values().filter(|f| f.result.is_correct()).count();
    let percentage = round2(100.0 * score as f64 / total as f64);

    tracing::debug!(score, total, percentage, "graded quiz");

    Ok(FeedbackReport {
        score,
        total,
        percentage,
        items,
    })
}
