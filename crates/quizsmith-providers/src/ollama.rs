//! Ollama (local LLM) generator.

use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use quizsmith_core::error::ProviderError;
use quizsmith_core::traits::{
    CompletionRequest, CompletionResponse, QuizGenerator, DEFAULT_SYSTEM_PROMPT,
};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_TIMEOUT_SECS: u64 = 300; // summaries of long chunks are slow on CPU

/// Generator backed by an Ollama server's chat endpoint.
pub struct OllamaGenerator {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaGenerator {
    /// Create a generator for `base_url`. An empty URL selects the local default.
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: base.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn unreachable(&self) -> ProviderError {
        ProviderError::NetworkError(format!(
            "Ollama not reachable at {}. Is it running? Start with: ollama serve",
            self.base_url
        ))
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
    model: String,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    models: Vec<LocalModel>,
}

/// A model installed on the Ollama server.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalModel {
    pub name: String,
    #[serde(default)]
    pub size: u64,
}

#[async_trait]
impl QuizGenerator for OllamaGenerator {
    fn name(&self) -> &str {
        "ollama"
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<CompletionResponse> {
        let start = Instant::now();

        let system_prompt = request
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        let body = ChatRequest {
            model: request.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: request.prompt.clone(),
                },
            ],
            stream: false,
            options: ChatOptions {
                temperature: request.temperature,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else if e.is_connect() {
                    self.unreachable()
                } else {
                    ProviderError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(ProviderError::ModelNotFound(format!(
                "Model '{}' not found locally. Pull it with: ollama pull {}",
                request.model, request.model
            ))
            .into());
        }
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(1)
                * 1000;
            return Err(ProviderError::RateLimited {
                retry_after_ms: retry_after,
            }
            .into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status,
                message: body,
            }
            .into());
        }

        let api_response: ChatResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        let latency_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(
            latency_ms,
            chars = api_response.message.content.len(),
            "completion received"
        );

        Ok(CompletionResponse {
            content: api_response.message.content,
            model: api_response.model,
            latency_ms,
        })
    }
}

impl OllamaGenerator {
    /// Fetch the models installed on the Ollama instance.
    pub async fn list_models_async(&self) -> anyhow::Result<Vec<LocalModel>> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(|_| self.unreachable())?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status,
                message: body,
            }
            .into());
        }

        let tags: TagsResponse = response.json().await.map_err(|e| ProviderError::ApiError {
            status: 0,
            message: format!("failed to parse tags response: {e}"),
        })?;

        Ok(tags.models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(model: &str) -> CompletionRequest {
        CompletionRequest {
            model: model.into(),
            prompt: "Summarize the following text into structured paragraphs:\n\nRust".into(),
            system_prompt: None,
            temperature: 0.2,
        }
    }

    #[tokio::test]
    async fn successful_completion() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "message": {"role": "assistant", "content": "1. What is Rust?\nA. A language\nAnswer: A. A language"},
            "model": "llama3.2:latest",
            "done": true
        });

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(serde_json::json!({
                "model": "llama3.2:latest",
                "stream": false,
                "options": {"temperature": 0.2}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .expect(1)
            .mount(&server)
            .await;

        let generator = OllamaGenerator::new(&server.uri()).unwrap();
        let response = generator.complete(&request("llama3.2:latest")).await.unwrap();
        assert!(response.content.starts_with("1. What is Rust?"));
        assert_eq!(response.model, "llama3.2:latest");
    }

    #[tokio::test]
    async fn sends_system_and_user_messages() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(serde_json::json!({
                "messages": [
                    {"role": "system", "content": DEFAULT_SYSTEM_PROMPT},
                    {"role": "user"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": {"content": "ok"},
                "model": "llama3.2:latest"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let generator = OllamaGenerator::new(&server.uri()).unwrap();
        generator.complete(&request("llama3.2:latest")).await.unwrap();
    }

    #[tokio::test]
    async fn model_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
            .mount(&server)
            .await;

        let generator = OllamaGenerator::new(&server.uri()).unwrap();
        let err = generator.complete(&request("nonexistent")).await.unwrap_err();
        let provider_err = err.downcast_ref::<ProviderError>().unwrap();
        assert!(provider_err.is_permanent());
        assert!(err.to_string().contains("ollama pull nonexistent"));
    }

    #[tokio::test]
    async fn server_error_is_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("out of memory"))
            .mount(&server)
            .await;

        let generator = OllamaGenerator::new(&server.uri()).unwrap();
        let err = generator.complete(&request("llama3.2:latest")).await.unwrap_err();
        match err.downcast_ref::<ProviderError>() {
            Some(ProviderError::ApiError { status, message }) => {
                assert_eq!(*status, 500);
                assert_eq!(message, "out of memory");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn busy_server_is_rate_limited() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "3"))
            .mount(&server)
            .await;

        let generator = OllamaGenerator::new(&server.uri()).unwrap();
        let err = generator.complete(&request("llama3.2:latest")).await.unwrap_err();
        let provider_err = err.downcast_ref::<ProviderError>().unwrap();
        assert_eq!(provider_err.retry_after_ms(), Some(3000));
        assert!(!provider_err.is_permanent());
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        // Nothing listens on the discard port.
        let generator = OllamaGenerator::new("http://127.0.0.1:9").unwrap();
        let err = generator.complete(&request("llama3.2:latest")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProviderError>(),
            Some(ProviderError::NetworkError(_))
        ));
    }

    #[tokio::test]
    async fn dynamic_model_listing() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "models": [
                {"name": "llama3.2:latest", "size": 2000000000_u64},
                {"name": "mistral:7b", "size": 4100000000_u64}
            ]
        });

        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let generator = OllamaGenerator::new(&format!("{}/", server.uri())).unwrap();
        let models = generator.list_models_async().await.unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].name, "llama3.2:latest");
        assert_eq!(models[1].size, 4_100_000_000);
    }

    #[test]
    fn empty_url_uses_default() {
        let generator = OllamaGenerator::new("").unwrap();
        assert_eq!(generator.base_url(), DEFAULT_BASE_URL);
    }
}
