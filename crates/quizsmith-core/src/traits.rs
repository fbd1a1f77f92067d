//! Trait definition for the text generators behind the study pipeline.
//!
//! Implemented by the `quizsmith-providers` crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A backend that turns a prompt into text (summaries or quiz text).
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    /// Human-readable backend name (e.g. "ollama").
    fn name(&self) -> &str;

    /// Complete a single prompt.
    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<CompletionResponse>;
}

/// Request for a single completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier (e.g. "llama3.2:latest").
    pub model: String,
    /// The user prompt.
    pub prompt: String,
    /// Optional system prompt.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Sampling temperature.
    pub temperature: f64,
}

/// Response from a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The generated text.
    pub content: String,
    /// Model that actually produced the response.
    pub model: String,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Default system prompt for study-material generation.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a study assistant. Follow the requested output format exactly. Do not add introductions, explanations, or closing remarks.";
