//! The `quizsmith parse` command.

use std::path::PathBuf;

use anyhow::Result;

use quizsmith_core::parser::{parse_quiz_file, render_quiz_text};

pub fn execute(quiz_path: PathBuf, format: String) -> Result<()> {
    let questions = parse_quiz_file(&quiz_path)?;

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&questions)?);
        }
        "text" => {
            print!("{}", render_quiz_text(&questions));
            println!("\nParsed {} question(s).", questions.len());
        }
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}
