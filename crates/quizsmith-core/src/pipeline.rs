//! Study-material pipeline.
//!
//! Cleans source text, splits it into chunks, summarizes the chunks and
//! generates quiz text from the summary, spreading the requested number of
//! questions across chunks. Chunks are processed concurrently with bounded
//! parallelism and reassembled in their original order.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::error::ProviderError;
use crate::traits::{CompletionRequest, QuizGenerator, DEFAULT_SYSTEM_PROMPT};

/// Default maximum chunk length, in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 2000;

/// Upper bound on the wait between two attempts.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Separator placed between per-chunk outputs.
const CHUNK_SEPARATOR: &str = "\n\n";

/// Remove NUL characters and surrounding whitespace.
pub fn clean_text(text: &str) -> String {
    text.replace('\0', "").trim().to_string()
}

/// Pack whitespace-separated words greedily into chunks of at most
/// `max_len` characters, counting one separator character per word.
///
/// A word longer than `max_len` becomes a chunk of its own. Never returns
/// empty chunks.
pub fn chunk_text(text: &str, max_len: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let cost = word.chars().count() + 1;
        if !current.is_empty() && current_len + cost > max_len {
            chunks.push(current.join(" "));
            current.clear();
            current_len = 0;
        }
        current.push(word);
        current_len += cost;
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}

/// Spread `total` questions across `chunks` as evenly as possible; earlier
/// chunks receive the remainder.
pub fn distribute_questions(total: usize, chunks: usize) -> Vec<usize> {
    if chunks == 0 {
        return Vec::new();
    }
    let base = total / chunks;
    let remainder = total % chunks;
    (0..chunks)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

fn summary_prompt(chunk: &str) -> String {
    format!("Summarize the following text into structured paragraphs:\n\n{chunk}")
}

const QUIZ_FORMAT: &str = "1. Question\nA. Option 1\nB. Option 2\nC. Option 3\nD. Option 4\nAnswer: Correct Option";

fn quiz_prompt(chunk: &str, num_questions: usize) -> String {
    format!(
        "Generate {num_questions} multiple-choice questions (MCQs) based on the following text. \
         Return the questions and answers in the format:\n{QUIZ_FORMAT}\n\n\
         Ensure clarity and relevance to the given content.\n\n{chunk}"
    )
}

fn topic_prompt(topic: &str, num_questions: usize) -> String {
    format!(
        "Generate {num_questions} multiple-choice questions (MCQs) on the topic '{topic}'. \
         Ensure each question has 4 options labeled A, B, C, and D, and provide the correct \
         answer after each question. Format:\n{QUIZ_FORMAT}"
    )
}

/// Summary plus quiz text produced from one source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyMaterial {
    pub summary: String,
    pub quiz: String,
}

/// Configuration for the study pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Model passed to the generator.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Maximum concurrent generator calls.
    pub parallelism: usize,
    /// Retries on transient generator errors.
    pub max_retries: u32,
    /// Delay between retries.
    pub retry_delay: Duration,
    /// Optional system prompt override.
    pub system_prompt_override: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: "llama3.2:latest".to_string(),
            temperature: 0.2,
            chunk_size: DEFAULT_CHUNK_SIZE,
            parallelism: 4,
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            system_prompt_override: None,
        }
    }
}

/// Drives a [`QuizGenerator`] to produce summaries and quiz text.
pub struct StudyPipeline {
    generator: Arc<dyn QuizGenerator>,
    config: PipelineConfig,
}

impl StudyPipeline {
    pub fn new(generator: Arc<dyn QuizGenerator>, config: PipelineConfig) -> Self {
        Self { generator, config }
    }

    /// Summarize `text` chunk by chunk.
    pub async fn summarize(&self, text: &str) -> Result<String> {
        let cleaned = clean_text(text);
        anyhow::ensure!(
            !cleaned.is_empty(),
            "the source text is empty or contains no readable text"
        );

        let chunks = chunk_text(&cleaned, self.config.chunk_size);
        anyhow::ensure!(!chunks.is_empty(), "no valid text chunks found for summarization");
        tracing::info!(chunks = chunks.len(), chars = cleaned.len(), "summarizing text");

        let prompts = chunks.iter().map(|c| summary_prompt(c)).collect();
        let summaries = self.complete_all(prompts).await?;
        Ok(summaries.join(CHUNK_SEPARATOR))
    }

    /// Generate quiz text for `summary`, asking for `num_questions` in total.
    pub async fn generate_quiz(&self, summary: &str, num_questions: usize) -> Result<String> {
        anyhow::ensure!(num_questions >= 1, "number of questions must be at least 1");

        let chunks = chunk_text(summary, self.config.chunk_size);
        anyhow::ensure!(!chunks.is_empty(), "summary is empty; nothing to build a quiz from");

        let distribution = distribute_questions(num_questions, chunks.len());
        tracing::info!(?distribution, "question distribution across chunks");

        let prompts = chunks
            .iter()
            .zip(&distribution)
            .filter(|&(_, &count)| count > 0)
            .map(|(chunk, &count)| quiz_prompt(chunk, count))
            .collect();
        let quizzes = self.complete_all(prompts).await?;
        Ok(quizzes.join(CHUNK_SEPARATOR))
    }

    /// Summarize `text`, then build a quiz from the summary.
    pub async fn process(&self, text: &str, num_questions: usize) -> Result<StudyMaterial> {
        let summary = self.summarize(text).await.context("summarization failed")?;
        let quiz = self
            .generate_quiz(&summary, num_questions)
            .await
            .context("quiz generation failed")?;
        Ok(StudyMaterial { summary, quiz })
    }

    /// Generate quiz text on a topic without any source document.
    pub async fn topic_quiz(&self, topic: &str, num_questions: usize) -> Result<String> {
        anyhow::ensure!(num_questions >= 1, "number of questions must be at least 1");
        tracing::info!(topic, num_questions, "generating topic quiz");
        self.complete_with_retry(topic_prompt(topic, num_questions)).await
    }

    /// Run every prompt with bounded concurrency, returning outputs in
    /// prompt order.
    async fn complete_all(&self, prompts: Vec<String>) -> Result<Vec<String>> {
        let semaphore = Semaphore::new(self.config.parallelism.max(1));
        let mut outputs: Vec<Option<String>> = vec![None; prompts.len()];
        let mut pending = FuturesUnordered::new();

        for (idx, prompt) in prompts.into_iter().enumerate() {
            let semaphore = &semaphore;
            pending.push(async move {
                let result = match semaphore.acquire().await {
                    Ok(_permit) => self.complete_with_retry(prompt).await,
                    Err(e) => Err(anyhow::anyhow!("generator pool closed: {e}")),
                };
                (idx, result)
            });
        }

        while let Some((idx, result)) = pending.next().await {
            let content = result.with_context(|| format!("chunk {} failed", idx + 1))?;
            tracing::debug!(chunk = idx + 1, chars = content.len(), "chunk complete");
            outputs[idx] = Some(content);
        }

        Ok(outputs.into_iter().flatten().collect())
    }

    /// Complete one prompt, retrying transient provider errors.
    async fn complete_with_retry(&self, prompt: String) -> Result<String> {
        let request = CompletionRequest {
            model: self.config.model.clone(),
            prompt,
            system_prompt: Some(
                self.config
                    .system_prompt_override
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            ),
            temperature: self.config.temperature,
        };

        // Doubles after every retry. A rate-limit hint replaces only the next wait.
        let mut backoff = self.config.retry_delay;
        let mut retry_delay = backoff;
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tracing::warn!(
                    generator = self.generator.name(),
                    attempt,
                    "retrying after {}ms",
                    retry_delay.as_millis()
                );
                tokio::time::sleep(retry_delay).await;
                backoff = (backoff * 2).min(MAX_RETRY_DELAY);
                retry_delay = backoff;
            }

            match self.generator.complete(&request).await {
                Ok(response) => return Ok(response.content.trim().to_string()),
                Err(e) => {
                    if let Some(provider_err) = e.downcast_ref::<ProviderError>() {
                        if provider_err.is_permanent() {
                            return Err(e);
                        }
                        if let Some(ms) = provider_err.retry_after_ms() {
                            retry_delay = Duration::from_millis(ms);
                        }
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("generator returned no response")))
    }
}
