//! Plain-text export of a generated summary.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::Path;

/// Column at which summary paragraphs are wrapped.
pub const WRAP_WIDTH: usize = 90;

/// Greedy word wrap; a word longer than `width` gets a line of its own.
fn wrap_paragraph(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in paragraph.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Render `summary` as a titled, dated text document.
///
/// Paragraphs (separated by blank lines) are re-flowed to [`WRAP_WIDTH`]
/// columns.
pub fn export_summary(summary: &str, title: &str, generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&"=".repeat(title.chars().count().max(1)));
    out.push('\n');
    out.push_str(&format!(
        "Generated: {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    let paragraphs: Vec<Vec<String>> = summary
        .split("\n\n")
        .map(|p| wrap_paragraph(p, WRAP_WIDTH))
        .filter(|lines| !lines.is_empty())
        .collect();

    for (idx, lines) in paragraphs.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        for line in lines {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

/// Write the exported summary to `path`, stamped with the current time.
pub fn write_summary(summary: &str, title: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, export_summary(summary, title, Utc::now()))
        .with_context(|| format!("failed to write summary to {}", path.display()))?;
    Ok(())
}
