//! quizsmith-core: Quiz text parsing, grading, and the study pipeline.
//!
//! This crate defines the question model, the tolerant quiz text parser,
//! the grader that turns selections into a feedback report, and the
//! generator trait the study pipeline drives.

pub mod error;
pub mod grader;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod sheet;
pub mod traits;

pub use error::{GradeError, ProviderError};
pub use grader::grade;
pub use model::{FeedbackReport, Question, QuestionFeedback, Selections, Verdict};
pub use parser::parse_quiz;
