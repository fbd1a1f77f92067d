//! Configuration loading and generator factory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizsmith_core::pipeline::{PipelineConfig, DEFAULT_CHUNK_SIZE};
use quizsmith_core::traits::QuizGenerator;

use crate::ollama::OllamaGenerator;

/// Connection settings for the Ollama server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_url(),
            model: default_model(),
        }
    }
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}
fn default_model() -> String {
    "llama3.2:latest".to_string()
}

/// Top-level quizsmith configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizsmithConfig {
    /// Ollama connection.
    #[serde(default)]
    pub ollama: OllamaConfig,
    /// Sampling temperature for generation.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Questions to generate when none are requested explicitly.
    #[serde(default = "default_num_questions")]
    pub num_questions: usize,
    /// Maximum chunk length in characters.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Max concurrent generator calls.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Max retries on generator errors.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Delay between retries in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Output directory for generated material and results.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_temperature() -> f64 {
    0.2
}
fn default_num_questions() -> usize {
    10
}
fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}
fn default_parallelism() -> usize {
    4
}
fn default_retries() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    1000
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizsmith-output")
}

impl Default for QuizsmithConfig {
    fn default() -> Self {
        Self {
            ollama: OllamaConfig::default(),
            temperature: default_temperature(),
            num_questions: default_num_questions(),
            chunk_size: default_chunk_size(),
            parallelism: default_parallelism(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            output_dir: default_output_dir(),
        }
    }
}

impl QuizsmithConfig {
    /// Pipeline settings derived from this configuration.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            model: self.ollama.model.clone(),
            temperature: self.temperature,
            chunk_size: self.chunk_size,
            parallelism: self.parallelism,
            max_retries: self.max_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            system_prompt_override: None,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    // Substituted values are copied as-is and never scanned again.
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Apply `QUIZSMITH_OLLAMA_URL` / `QUIZSMITH_MODEL` style overrides.
fn apply_overrides(config: &mut QuizsmithConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup("QUIZSMITH_OLLAMA_URL") {
        config.ollama.base_url = url;
    }
    if let Some(model) = lookup("QUIZSMITH_MODEL") {
        config.ollama.model = model;
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizsmith.toml` in the current directory
/// 2. `~/.config/quizsmith/config.toml`
///
/// Environment variable overrides: `QUIZSMITH_OLLAMA_URL`, `QUIZSMITH_MODEL`.
pub fn load_config() -> Result<QuizsmithConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizsmithConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizsmith.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            toml::from_str::<QuizsmithConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizsmithConfig::default(),
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok());
    config.ollama.base_url = resolve_env_vars(&config.ollama.base_url);
    config.ollama.model = resolve_env_vars(&config.ollama.model);

    anyhow::ensure!(config.parallelism >= 1, "parallelism must be at least 1");
    anyhow::ensure!(config.chunk_size >= 1, "chunk_size must be at least 1");

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizsmith"))
}

/// Create the generator described by the configuration.
pub fn create_generator(config: &QuizsmithConfig) -> Result<Box<dyn QuizGenerator>> {
    Ok(Box::new(OllamaGenerator::new(&config.ollama.base_url)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZSMITH_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZSMITH_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QUIZSMITH_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no vars"), "no vars");
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_QUIZSMITH_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_expand_values() {
        std::env::set_var("_QUIZSMITH_SELF_REF", "${_QUIZSMITH_SELF_REF}");
        assert_eq!(
            resolve_env_vars("a=${_QUIZSMITH_SELF_REF};b=${_QUIZSMITH_SELF_REF}"),
            "a=${_QUIZSMITH_SELF_REF};b=${_QUIZSMITH_SELF_REF}"
        );
        std::env::remove_var("_QUIZSMITH_SELF_REF");
    }

    #[test]
    fn default_config() {
        let config = QuizsmithConfig::default();
        assert_eq!(config.ollama.base_url, "http://localhost:11434");
        assert_eq!(config.num_questions, 10);
        assert_eq!(config.chunk_size, 2000);
        assert_eq!(config.parallelism, 4);
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
temperature = 0.5
num_questions = 5

[ollama]
model = "mistral:7b"
"#;
        let config: QuizsmithConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.ollama.model, "mistral:7b");
        assert_eq!(config.ollama.base_url, "http://localhost:11434");
        assert_eq!(config.num_questions, 5);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn pipeline_config_mirrors_settings() {
        let config = QuizsmithConfig {
            retry_delay_ms: 250,
            chunk_size: 800,
            ..Default::default()
        };
        let pipeline = config.pipeline_config();
        assert_eq!(pipeline.retry_delay, Duration::from_millis(250));
        assert_eq!(pipeline.chunk_size, 800);
        assert_eq!(pipeline.model, "llama3.2:latest");
    }

    #[test]
    fn overrides_take_precedence() {
        let mut config = QuizsmithConfig::default();
        apply_overrides(&mut config, |key| match key {
            "QUIZSMITH_MODEL" => Some("phi3:mini".to_string()),
            _ => None,
        });
        assert_eq!(config.ollama.model, "phi3:mini");
        assert_eq!(config.ollama.base_url, "http://localhost:11434");
    }

    #[test]
    fn load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizsmith.toml");
        std::fs::write(&path, "parallelism = 2\n[ollama]\nbase_url = \"http://gpu-box:11434\"\n")
            .unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.parallelism, 2);
    }

    #[test]
    fn load_missing_path_fails() {
        let err = load_config_from(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn invalid_parallelism_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "parallelism = 0\n").unwrap();
        assert!(load_config_from(Some(&path)).is_err());
    }
}
