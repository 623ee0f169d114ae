//! Quiz generation CLI.
//!
//! Reads a context passage from a file and prints generated questions as
//! JSON on stdout. All failures are reported as `{"error": "..."}` on
//! stdout with a non-zero exit code so callers can treat stdout as the
//! single machine-readable channel. Logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use mimalloc::MiMalloc;
use serde_json::json;

use quizmill::context::{normalize_context, read_context};
use quizmill::inference::generator::{GeneratorConfig, QuestionGenerator};
use quizmill::quiz::{QuestionKind, QuizBuilder};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, Parser)]
#[command(
    name = "quizgen",
    version,
    about = "Generate quiz questions from a context file"
)]
struct Args {
    /// Path to the context file (UTF-8 or base64-encoded text).
    context_file: PathBuf,

    /// Number of questions to generate.
    count: usize,

    /// Kind of quiz to build.
    #[arg(value_enum)]
    kind: QuestionKind,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        // Help and version are requested output, not failures.
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{}", err);
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            print_error(&format!("Invalid arguments: {}", err.kind()));
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(message) => {
            print_error(&message);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<String, String> {
    let raw = read_context(&args.context_file).map_err(|e| e.to_string())?;
    let context = normalize_context(&raw);

    let generator = QuestionGenerator::load(GeneratorConfig::from_env())
        .map_err(|e| e.to_string())?;
    let builder = QuizBuilder::new(generator);

    let quiz = builder
        .build(&context, args.count, args.kind)
        .map_err(|e| e.to_string())?;

    serde_json::to_string(&quiz).map_err(|e| format!("Failed to serialize quiz: {}", e))
}

fn print_error(message: &str) {
    println!("{}", json!({ "error": message }));
}
