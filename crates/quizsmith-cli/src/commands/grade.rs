//! The `quizsmith grade` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizsmith_core::grader::grade;
use quizsmith_core::model::FeedbackReport;
use quizsmith_core::parser::parse_quiz_file;
use quizsmith_core::sheet::load_selections;
use quizsmith_report::html::write_feedback_html;

pub fn execute(
    quiz_path: PathBuf,
    answers_path: PathBuf,
    format: String,
    output: PathBuf,
    save: Option<PathBuf>,
) -> Result<()> {
    let questions = parse_quiz_file(&quiz_path)?;
    let selections = load_selections(&answers_path)?;
    let report = grade(&questions, &selections)?;

    if let Some(path) = &save {
        report.save_json(path)?;
        tracing::info!(path = %path.display(), "feedback report saved");
    }

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "html" => {
            write_feedback_html(&questions, &report, &output)?;
            println!("Feedback report: {}", output.display());
        }
        "text" => print_feedback(&report),
        other => anyhow::bail!("unknown format: {other} (expected text, json or html)"),
    }

    Ok(())
}

/// Print per-question feedback as a table, followed by the score line.
pub(crate) fn print_feedback(report: &FeedbackReport) {
    let mut table = Table::new();
    table.set_header(vec!["#", "Result", "Your answer", "Correct answer"]);

    for item in report.items.values() {
        table.add_row(vec![
            Cell::new(item.question_number),
            Cell::new(item.result),
            Cell::new(&item.your_answer),
            Cell::new(&item.correct_answer),
        ]);
    }

    println!("{table}");
    println!(
        "Score: {} ({})",
        report.score_label(),
        report.percentage_label()
    );

    let missed: Vec<String> = report
        .incorrect()
        .map(|item| item.question_number.to_string())
        .collect();
    if !missed.is_empty() {
        println!("Review question(s): {}", missed.join(", "));
    }
}
