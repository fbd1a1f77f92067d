//! HTML quiz form and feedback view.
//!
//! Both pages are self-contained files with all CSS/JS inlined.

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;

use quizsmith_core::model::{option_label, FeedbackReport, Question, Verdict};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn push_head(html: &mut String, title: &str) {
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", html_escape(title)));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");
}

/// Generate the interactive quiz form.
///
/// Each question becomes a radio group named `q{number}` whose values are
/// the option texts, in parsed order. With a `time_limit`, a countdown
/// submits the form when it reaches zero, through the same handler as the
/// submit button. Submitting shows the selections as an answers JSON object
/// accepted by `quizsmith grade --answers`.
pub fn generate_quiz_html(questions: &[Question], time_limit: Option<Duration>) -> String {
    let mut html = String::new();
    push_head(&mut html, "quizsmith quiz");

    html.push_str("<header>\n<h1>Quiz</h1>\n");
    if let Some(limit) = time_limit {
        html.push_str(&format!(
            "<p class=\"meta\">Time left: <span id=\"timer\">{}</span></p>\n",
            format_countdown(limit.as_secs())
        ));
    }
    html.push_str("</header>\n");

    if questions.is_empty() {
        html.push_str("<p>No quiz questions available.</p>\n");
        html.push_str("</body>\n</html>");
        return html;
    }

    html.push_str("<form id=\"quiz\">\n");
    for (idx, question) in questions.iter().enumerate() {
        let number = idx + 1;
        html.push_str(&format!(
            "<div class=\"quiz-question\" data-number=\"{number}\">\n<p><strong>{number}. {}</strong></p>\n",
            html_escape(&question.text)
        ));
        for (opt_idx, option) in question.options.iter().enumerate() {
            let value = html_escape(option.trim());
            html.push_str(&format!(
                "<label><input type=\"radio\" name=\"q{number}\" value=\"{value}\"> {}. {value}</label><br>\n",
                option_label(opt_idx)
            ));
        }
        html.push_str("</div>\n");
    }
    html.push_str("<button type=\"submit\" id=\"submit-quiz\">Submit Quiz</button>\n");
    html.push_str("</form>\n");
    html.push_str("<section id=\"submitted\" class=\"hidden\">\n<h2>Your answers</h2>\n");
    html.push_str("<p class=\"meta\">Grade with: <code>quizsmith grade QUIZ --answers answers.json</code></p>\n");
    html.push_str("<pre id=\"answers\"></pre>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(&format!(
        "const QUIZ_TIME_LIMIT = {};\n",
        time_limit.map_or("null".to_string(), |d| d.as_secs().to_string())
    ));
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Generate the feedback view for a graded quiz.
///
/// Questions are highlighted by verdict; within each question the correct
/// option and a wrong selection are marked.
pub fn generate_feedback_html(questions: &[Question], report: &FeedbackReport) -> String {
    let mut html = String::new();
    push_head(&mut html, "quizsmith results");

    html.push_str("<header>\n<h1>Quiz Results</h1>\n");
    html.push_str(&format!(
        "<p class=\"score\"><strong>Score:</strong> {} ({})</p>\n",
        report.score_label(),
        report.percentage_label()
    ));
    html.push_str("</header>\n");

    for (number, item) in &report.items {
        let class = match item.result {
            Verdict::Correct => "correct",
            Verdict::Incorrect => "incorrect",
        };
        html.push_str(&format!("<div class=\"feedback-item {class}\">\n"));

        let question = number.checked_sub(1).and_then(|idx| questions.get(idx));
        match question {
            Some(q) => html.push_str(&format!(
                "<p><strong>{number}. {}</strong> {}</p>\n",
                html_escape(&q.text),
                item.result
            )),
            None => html.push_str(&format!(
                "<p><strong>Question {number}:</strong> {}</p>\n",
                item.result
            )),
        }

        if let Some(q) = question {
            html.push_str("<ul class=\"options\">\n");
            for (opt_idx, option) in q.options.iter().enumerate() {
                let option = option.trim();
                let mark = if option == item.correct_answer {
                    " class=\"correct-option\""
                } else if option == item.your_answer {
                    " class=\"wrong-option\""
                } else {
                    ""
                };
                html.push_str(&format!(
                    "<li{mark}>{}. {}</li>\n",
                    option_label(opt_idx),
                    html_escape(option)
                ));
            }
            html.push_str("</ul>\n");
        }

        if item.result == Verdict::Incorrect {
            html.push_str(&format!(
                "<p>Your Answer: {}</p>\n<p>Correct Answer: {}</p>\n",
                html_escape(&item.your_answer),
                html_escape(&item.correct_answer)
            ));
        }
        html.push_str("</div>\n");
    }

    html.push_str("</body>\n</html>");
    html
}

/// Write the quiz form to a file.
pub fn write_quiz_html(
    questions: &[Question],
    time_limit: Option<Duration>,
    path: &Path,
) -> Result<()> {
    write_page(&generate_quiz_html(questions, time_limit), path)
}

/// Write the feedback view to a file.
pub fn write_feedback_html(
    questions: &[Question],
    report: &FeedbackReport,
    path: &Path,
) -> Result<()> {
    write_page(&generate_feedback_html(questions, report), path)
}

fn write_page(html: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// `m:ss`, as shown by the countdown.
fn format_countdown(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #d4edda; --fail: #f8d7da; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.quiz-question, .feedback-item { border: 1px solid var(--border); border-radius: 8px; padding: 0.5rem 1rem; margin: 1rem 0; }
.correct { background: var(--pass); }
.incorrect { background: var(--fail); }
.correct-option { font-weight: bold; }
.wrong-option { text-decoration: line-through; }
.hidden { display: none; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
"#;

const JS: &str = r#"
const form = document.getElementById('quiz');
let submitted = false;

function submitQuiz(trigger) {
  if (submitted) return;
  submitted = true;
  const answers = {};
  form.querySelectorAll('.quiz-question').forEach(div => {
    const checked = div.querySelector("input[type='radio']:checked");
    answers[div.dataset.number] = checked ? checked.value : null;
  });
  form.querySelectorAll('input').forEach(i => { i.disabled = true; });
  document.getElementById('answers').textContent = JSON.stringify(answers, null, 2);
  document.getElementById('submitted').classList.remove('hidden');
  console.log('quiz submitted by', trigger);
}

form.addEventListener('submit', e => { e.preventDefault(); submitQuiz('user'); });

function startTimer(duration, display, onTimeUp) {
  let timer = duration;
  const interval = setInterval(() => {
    const minutes = Math.floor(timer / 60);
    const seconds = timer % 60;
    display.textContent = `${minutes}:${seconds < 10 ? '0' : ''}${seconds}`;
    if (submitted) { clearInterval(interval); return; }
    if (--timer < 0) {
      clearInterval(interval);
      onTimeUp();
    }
  }, 1000);
}

if (QUIZ_TIME_LIMIT !== null) {
  startTimer(QUIZ_TIME_LIMIT, document.getElementById('timer'), () => submitQuiz('timer'));
}
"#;
