//! The `quizsmith validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizsmith_core::parser::{parse_quiz_file, validate_quiz};

pub fn execute(quiz_path: PathBuf) -> Result<()> {
    let questions = parse_quiz_file(&quiz_path)?;
    println!(
        "Quiz: {} ({} questions)",
        quiz_path.display(),
        questions.len()
    );

    let warnings = validate_quiz(&questions);
    for w in &warnings {
        let prefix = w
            .question_number
            .map(|n| format!("  [Q{n}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Quiz valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
