//! quizsmith-report: Rendering for quizzes, feedback, and study summaries.

pub mod html;
pub mod summary;

pub use html::{generate_feedback_html, generate_quiz_html};
pub use summary::export_summary;
