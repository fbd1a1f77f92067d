//! The `quizsmith review` command.

use std::path::PathBuf;

use anyhow::Result;

use quizsmith_core::model::FeedbackReport;

use super::grade::print_feedback;

pub fn execute(report_path: PathBuf) -> Result<()> {
    let report = FeedbackReport::load_json(&report_path)?;
    print_feedback(&report);
    Ok(())
}
