//! quizsmith-providers: Text generator backends and configuration.
//!
//! Implements the `QuizGenerator` trait for a local Ollama server and for
//! tests, and loads the `quizsmith.toml` configuration.

pub mod config;
pub mod mock;
pub mod ollama;

pub use config::{create_generator, load_config, QuizsmithConfig};
pub use quizsmith_core::error::ProviderError;
