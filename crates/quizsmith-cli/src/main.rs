//! quizsmith CLI: parse, take, and grade multiple-choice quizzes.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "quizsmith",
    version,
    about = "Turn generated quiz text into a graded multiple-choice quiz"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse quiz text and print the structured questions
    Parse {
        /// Path to the quiz text file
        quiz: PathBuf,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Check quiz text for questions that cannot be graded properly
    Validate {
        /// Path to the quiz text file
        quiz: PathBuf,
    },

    /// Grade a saved answers file against a quiz
    Grade {
        /// Path to the quiz text file
        quiz: PathBuf,

        /// JSON object mapping question numbers to selected option text
        #[arg(long)]
        answers: PathBuf,

        /// Output format: text, json, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Output file for the html format
        #[arg(long, default_value = "feedback.html")]
        output: PathBuf,

        /// Also save the feedback report as JSON
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Show a feedback report saved by `grade --save`
    Review {
        /// Path to the feedback report JSON
        report: PathBuf,
    },

    /// Take a quiz interactively in the terminal
    Take {
        /// Path to the quiz text file
        quiz: PathBuf,

        /// Submit automatically after this many seconds
        #[arg(long)]
        time_limit: Option<u64>,

        /// Save the graded submission as JSON
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Generate a summary and quiz with a local Ollama model
    Generate {
        /// Plain-text source document
        #[arg(long, conflicts_with = "topic", required_unless_present = "topic")]
        input: Option<PathBuf>,

        /// Generate a quiz on a topic instead of from a document
        #[arg(long)]
        topic: Option<String>,

        /// Number of questions (default: from config)
        #[arg(long)]
        num_questions: Option<usize>,

        /// Model override
        #[arg(long)]
        model: Option<String>,

        /// Countdown for the generated quiz page, in seconds
        #[arg(long)]
        time_limit: Option<u64>,

        /// Output directory (default: from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List models installed on the Ollama server
    ListModels {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and a sample quiz
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("quizsmith=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { quiz, format } => commands::parse::execute(quiz, format),
        Commands::Validate { quiz } => commands::validate::execute(quiz),
        Commands::Grade {
            quiz,
            answers,
            format,
            output,
            save,
        } => commands::grade::execute(quiz, answers, format, output, save),
        Commands::Review { report } => commands::review::execute(report),
        Commands::Take {
            quiz,
            time_limit,
            save,
        } => commands::take::execute(quiz, time_limit, save).await,
        Commands::Generate {
            input,
            topic,
            num_questions,
            model,
            time_limit,
            output,
            config,
        } => {
            commands::generate::execute(commands::generate::GenerateArgs {
                input,
                topic,
                num_questions,
                model,
                time_limit,
                output,
                config,
            })
            .await
        }
        Commands::ListModels { config } => commands::list_models::execute(config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
