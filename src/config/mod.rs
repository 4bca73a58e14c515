//! Configuration module for the article summarizer.

mod env;
mod prompts;

pub use env::{
    load_model_config, load_model_config_with, parse_delay, ConfigError, ENV_API_KEY,
    ENV_BASE_URL, ENV_MAX_ATTEMPTS, ENV_MAX_TOKENS, ENV_MODEL, ENV_RETRY_DELAY, ENV_TEMPERATURE,
};
pub use prompts::{
    build_summary_prompt, MAX_SUMMARY_BULLETS, SUMMARY_PROMPT_TEMPLATE, SUMMARY_SYSTEM_PROMPT,
};

/// Input file read when no path is given.
pub const DEFAULT_INPUT_PATH: &str = "articles.csv";

/// Output file written when no path is given.
pub const DEFAULT_OUTPUT_PATH: &str = "articles_with_summary.csv";

/// Column holding the article text.
pub const DEFAULT_TEXT_COLUMN: &str = "ARTICLE_TEXT";

/// Column the generated summaries are written to.
pub const DEFAULT_SUMMARY_COLUMN: &str = "summary";
