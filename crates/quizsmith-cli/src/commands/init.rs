//! The `quizsmith init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("quizsmith.toml"), SAMPLE_CONFIG)?;
    write_if_missing(Path::new("sample-quiz.txt"), SAMPLE_QUIZ)?;
    write_if_missing(Path::new("sample-answers.json"), SAMPLE_ANSWERS)?;

    println!("\nNext steps:");
    println!("  1. Run: quizsmith validate sample-quiz.txt");
    println!("  2. Run: quizsmith take sample-quiz.txt --time-limit 120");
    println!("  3. Run: quizsmith grade sample-quiz.txt --answers sample-answers.json");
    println!("  4. Start Ollama and run: quizsmith generate --topic \"photosynthesis\"");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizsmith configuration

temperature = 0.2
num_questions = 10
chunk_size = 2000
parallelism = 4
max_retries = 3
retry_delay_ms = 1000
output_dir = "./quizsmith-output"

[ollama]
base_url = "http://localhost:11434"
model = "llama3.2:latest"
"#;

const SAMPLE_QUIZ: &str = "\
1. What is the capital of Italy?
A. Paris
B. Rome
C. Madrid
D. Berlin
Answer: B. Rome

2. Which planet is known as the red planet?
A. Venus
B. Mars
C. Jupiter
D. Saturn
Answer: B. Mars

3. What gas do plants absorb during photosynthesis?
A. Oxygen
B. Nitrogen
C. Carbon dioxide
D. Helium
Answer: C. Carbon dioxide
";

const SAMPLE_ANSWERS: &str = r#"{
  "1": "Rome",
  "2": "Venus",
  "3": null
}
"#;
