//! Article Summarizer - LLM bullet-point summaries for a CSV of articles
//!
//! This is the CLI entry point for the article-summarizer tool.
//! Run with: cargo run --bin article-summarizer

use anyhow::Context;
use article_summarizer::config::{
    load_model_config, parse_delay, ConfigError, DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH,
    DEFAULT_SUMMARY_COLUMN, DEFAULT_TEXT_COLUMN,
};
use article_summarizer::{RetryingCaller, Summarizer};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "article-summarizer",
    about = "Add LLM-generated bullet-point summaries to a CSV of articles",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// CSV file to read
    #[arg(short, long, default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// CSV file to write
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Column holding the article text
    #[arg(long, default_value = DEFAULT_TEXT_COLUMN)]
    text_column: String,

    /// Column to write summaries to
    #[arg(long, default_value = DEFAULT_SUMMARY_COLUMN)]
    summary_column: String,

    /// Calls per article before giving up (overrides LLM_MAX_ATTEMPTS)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_attempts: Option<u32>,

    /// Seconds to wait between attempts (overrides LLM_RETRY_DELAY)
    #[arg(long, value_parser = retry_delay_flag)]
    retry_delay: Option<Duration>,
}

fn retry_delay_flag(value: &str) -> Result<Duration, ConfigError> {
    parse_delay("--retry-delay", value)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut model_config = load_model_config().context("Invalid model configuration")?;
    if let Some(max_attempts) = cli.max_attempts {
        model_config = model_config.with_max_attempts(max_attempts);
    }
    if let Some(delay) = cli.retry_delay {
        model_config = model_config.with_retry_delay(delay);
    }

    println!("📰 Article Summarizer");
    println!("================================================");
    println!("Model: {} @ {}", model_config.model_name, model_config.base_url);
    println!(
        "Retry: max {} attempts, {:.1}s delay",
        model_config.max_attempts,
        model_config.retry_delay.as_secs_f64()
    );
    println!("Input: {}", cli.input.display());
    println!("Output: {}", cli.output.display());
    println!("================================================\n");

    let caller =
        RetryingCaller::from_config(model_config).context("Failed to create model client")?;
    let summarizer = Summarizer::new(caller)
        .with_text_column(&cli.text_column)
        .with_summary_column(&cli.summary_column);

    let rows = summarizer
        .run(&cli.input, &cli.output)
        .await
        .with_context(|| format!("Failed to summarize {}", cli.input.display()))?;

    println!("\n✅ {} summaries saved to {}", rows, cli.output.display());
    Ok(())
}
