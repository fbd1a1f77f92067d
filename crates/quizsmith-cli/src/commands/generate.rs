//! The `quizsmith generate` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use quizsmith_core::parser::{parse_quiz, validate_quiz};
use quizsmith_core::pipeline::StudyPipeline;
use quizsmith_core::traits::QuizGenerator;
use quizsmith_providers::config::load_config_from;
use quizsmith_providers::create_generator;
use quizsmith_report::html::write_quiz_html;
use quizsmith_report::summary::write_summary;

pub struct GenerateArgs {
    pub input: Option<PathBuf>,
    pub topic: Option<String>,
    pub num_questions: Option<usize>,
    pub model: Option<String>,
    pub time_limit: Option<u64>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub async fn execute(args: GenerateArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;

    let mut pipeline_config = config.pipeline_config();
    if let Some(model) = args.model {
        pipeline_config.model = model;
    }
    let num_questions = args.num_questions.unwrap_or(config.num_questions);
    let output_dir = args.output.unwrap_or_else(|| config.output_dir.clone());

    let generator: Arc<dyn QuizGenerator> = Arc::from(create_generator(&config)?);
    eprintln!(
        "Using {} model {} at {}",
        generator.name(),
        pipeline_config.model,
        config.ollama.base_url
    );
    let pipeline = StudyPipeline::new(generator, pipeline_config);

    std::fs::create_dir_all(&output_dir).with_context(|| {
        format!("failed to create output directory: {}", output_dir.display())
    })?;

    let quiz_text = match (&args.input, &args.topic) {
        (Some(input), _) => {
            let text = std::fs::read_to_string(input)
                .with_context(|| format!("failed to read input: {}", input.display()))?;
            let material = pipeline.process(&text, num_questions).await?;

            let title = input
                .file_stem()
                .map(|s| format!("Summary of {}", s.to_string_lossy()))
                .unwrap_or_else(|| "Summary".to_string());
            let summary_path = output_dir.join("summary.txt");
            write_summary(&material.summary, &title, &summary_path)?;
            eprintln!("Summary: {}", summary_path.display());
            material.quiz
        }
        (None, Some(topic)) => pipeline.topic_quiz(topic, num_questions).await?,
        (None, None) => anyhow::bail!("either --input or --topic is required"),
    };

    let quiz_path = output_dir.join("quiz.txt");
    std::fs::write(&quiz_path, &quiz_text)
        .with_context(|| format!("failed to write {}", quiz_path.display()))?;
    eprintln!("Quiz text: {}", quiz_path.display());

    let questions = parse_quiz(&quiz_text);
    let html_path = output_dir.join("quiz.html");
    write_quiz_html(
        &questions,
        args.time_limit.map(Duration::from_secs),
        &html_path,
    )?;
    eprintln!("Quiz page: {}", html_path.display());

    let warnings = validate_quiz(&questions);
    println!(
        "Generated {} question(s) ({} requested), {} warning(s).",
        questions.len(),
        num_questions,
        warnings.len()
    );
    for w in &warnings {
        if let Some(n) = w.question_number {
            println!("  [Q{n}] WARNING: {}", w.message);
        } else {
            println!("  WARNING: {}", w.message);
        }
    }

    Ok(())
}
