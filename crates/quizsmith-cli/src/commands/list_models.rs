//! The `quizsmith list-models` command.

use std::path::PathBuf;

use anyhow::Result;

use quizsmith_providers::config::load_config_from;
use quizsmith_providers::ollama::OllamaGenerator;

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let generator = OllamaGenerator::new(&config.ollama.base_url)?;
    let models = generator.list_models_async().await?;

    if models.is_empty() {
        println!(
            "No models installed at {}. Pull one with: ollama pull {}",
            generator.base_url(),
            config.ollama.model
        );
        return Ok(());
    }

    println!("Models at {}:", generator.base_url());
    for model in &models {
        let marker = if model.name == config.ollama.model {
            " (configured)"
        } else {
            ""
        };
        println!(
            "  {} ({:.1} GB){marker}",
            model.name,
            model.size as f64 / 1e9
        );
    }

    Ok(())
}
