//! Mock generator for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizsmith_core::traits::{CompletionRequest, CompletionResponse, QuizGenerator};

/// A canned-response generator for exercising the pipeline offline.
///
/// Responses are chosen by prompt-substring matching, falling back to a
/// default.
pub struct MockGenerator {
    /// Map of prompt substring → response text.
    responses: HashMap<String, String>,
    default_response: String,
    call_count: AtomicU32,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl MockGenerator {
    pub fn new(responses: HashMap<String, String>) -> Self {
        Self {
            responses,
            default_response: "1. Placeholder question?\nA. Yes\nB. No\nAnswer: A. Yes"
                .to_string(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same response.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            default_response: response.to_string(),
            ..Self::new(HashMap::new())
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// The last request received, if any.
    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl QuizGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<CompletionResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        let content = self
            .responses
            .iter()
            .find(|(key, _)| request.prompt.contains(key.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_response.clone());

        Ok(CompletionResponse {
            content,
            model: request.model.clone(),
            latency_ms: 1,
        })
    }
}
