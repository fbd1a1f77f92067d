//! The `quizsmith take` command.
//!
//! Answers are read from stdin on a plain thread and forwarded over a
//! channel, so the session can race each prompt against the countdown.
//! Whichever ends the session, the sheet goes through
//! [`AnswerSheet::submit`].

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

use quizsmith_core::error::GradeError;
use quizsmith_core::model::option_label;
use quizsmith_core::parser::parse_quiz_file;
use quizsmith_core::sheet::{AnswerSheet, SubmitTrigger};

use super::grade::print_feedback;

pub async fn execute(
    quiz_path: PathBuf,
    time_limit: Option<u64>,
    save: Option<PathBuf>,
) -> Result<()> {
    let questions = parse_quiz_file(&quiz_path)?;
    if questions.is_empty() {
        return Err(GradeError::NoQuestions.into());
    }

    let mut sheet = AnswerSheet::new(questions);
    let (tx, mut rx) = mpsc::unbounded_channel();
    spawn_stdin_reader(tx);

    let deadline = time_limit.map(|secs| Instant::now() + Duration::from_secs(secs));
    if let Some(secs) = time_limit {
        println!("Time limit: {}:{:02}", secs / 60, secs % 60);
    }

    let mut stdout = std::io::stdout();
    let trigger = run_session(&mut sheet, &mut rx, deadline, &mut stdout).await?;
    let submission = sheet.submit(trigger)?;

    println!();
    print_feedback(&submission.report);

    if let Some(path) = save {
        submission.save_json(&path)?;
        println!("Submission saved to: {}", path.display());
    }

    Ok(())
}

/// Forward stdin lines until EOF. The thread is detached; it may still be
/// blocked on a read when the process exits after a timed submission.
fn spawn_stdin_reader(tx: mpsc::UnboundedSender<String>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
}

enum Input {
    Line(String),
    Closed,
    TimeUp,
}

async fn next_input(
    rx: &mut mpsc::UnboundedReceiver<String>,
    deadline: Option<Instant>,
) -> Input {
    let recv = async { rx.recv().await.map_or(Input::Closed, Input::Line) };
    match deadline {
        Some(deadline) if deadline <= Instant::now() => Input::TimeUp,
        Some(deadline) => tokio::select! {
            // An expired countdown wins over input that arrived at the same time.
            biased;
            _ = sleep_until(deadline) => Input::TimeUp,
            input = recv => input,
        },
        None => recv.await,
    }
}

/// Walk the quiz question by question, recording selections on `sheet`.
///
/// Besides a label, the user may enter `-` to clear the current answer or
/// `<` to return to the previous question. Returns what ended the session:
/// the countdown, or the user reaching the end of the quiz (or closing
/// stdin).
async fn run_session<W: Write>(
    sheet: &mut AnswerSheet,
    rx: &mut mpsc::UnboundedReceiver<String>,
    deadline: Option<Instant>,
    out: &mut W,
) -> Result<SubmitTrigger> {
    let total = sheet.questions().len();
    let mut idx = 0;

    while idx < total {
        let number = idx + 1;
        let question = sheet.questions()[idx].clone();
        writeln!(out, "\n{number}/{total}. {}", question.text)?;
        for (i, option) in question.options.iter().enumerate() {
            writeln!(out, "  {}. {option}", option_label(i))?;
        }
        if question.options.is_empty() {
            writeln!(out, "  (no options, skipped)")?;
            idx += 1;
            continue;
        }
        if let Some(current) = sheet.selections().get(&number) {
            writeln!(out, "  (current answer: {current})")?;
        }

        let last = option_label(question.options.len() - 1);
        loop {
            write!(out, "Answer [A-{last}], blank to skip, - to clear, < to go back: ")?;
            out.flush()?;

            match next_input(rx, deadline).await {
                Input::TimeUp => {
                    writeln!(out, "\nTime's up! Submitting your answers.")?;
                    return Ok(SubmitTrigger::Timer);
                }
                Input::Closed => return Ok(SubmitTrigger::User),
                Input::Line(line) => match line.trim() {
                    "" => {
                        idx += 1;
                        break;
                    }
                    "<" => {
                        idx = idx.saturating_sub(1);
                        break;
                    }
                    "-" => {
                        sheet.clear(number);
                        idx += 1;
                        break;
                    }
                    label => match sheet.select_label(number, label) {
                        Ok(_) => {
                            idx += 1;
                            break;
                        }
                        Err(e) => writeln!(out, "{e}")?,
                    },
                },
            }
        }
    }

    Ok(SubmitTrigger::User)
}
