// Copyright 2025 ModerRAS
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Article Summarizer
//!
//! Reads a CSV of news articles, asks an OpenAI-compatible model for a
//! bullet-point summary of each `ARTICLE_TEXT`, and writes the table back out
//! with a `summary` column.
//!
//! Every model call goes through [`RetryingCaller`], which makes at most
//! `max_attempts` calls with a fixed delay in between and only reports an
//! error once all attempts have failed.
//!
//! ## Example
//!
//! ```rust,no_run
//! use article_summarizer::{ModelConfig, RetryingCaller, Summarizer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let model_config = ModelConfig::default()
//!         .with_api_key("sk-...")
//!         .with_model_name("gpt-4o-mini");
//!
//!     let summarizer = Summarizer::new(RetryingCaller::from_config(model_config)?);
//!     let rows = summarizer
//!         .run("articles.csv", "articles_with_summary.csv")
//!         .await?;
//!
//!     println!("Summarized {} articles", rows);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod model;
pub mod pipeline;

pub use config::{load_model_config, ConfigError};
pub use model::{
    CallOutcome, CompletionBackend, CompletionRequest, ModelClient, ModelConfig, ModelError,
    RetryPolicy, RetryingCaller,
};
pub use pipeline::{ArticleTable, PipelineError, Summarizer};
