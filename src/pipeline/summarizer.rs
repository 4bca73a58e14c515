//! Row-by-row summarization of an article table.

use std::path::Path;

use super::table::{ArticleTable, PipelineError};
use crate::config::{
    build_summary_prompt, DEFAULT_SUMMARY_COLUMN, DEFAULT_TEXT_COLUMN, SUMMARY_SYSTEM_PROMPT,
};
use crate::model::{CompletionBackend, ModelError, RetryingCaller};

/// Adds an LLM-generated summary column to an article table.
///
/// Rows are summarized one at a time, in order. The first row whose call
/// exhausts its retries aborts the run and nothing is written.
pub struct Summarizer<B> {
    caller: RetryingCaller<B>,
    text_column: String,
    summary_column: String,
}

impl<B: CompletionBackend> Summarizer<B> {
    pub fn new(caller: RetryingCaller<B>) -> Self {
        Self {
            caller,
            text_column: DEFAULT_TEXT_COLUMN.to_string(),
            summary_column: DEFAULT_SUMMARY_COLUMN.to_string(),
        }
    }

    /// Read article text from `column` instead of `ARTICLE_TEXT`.
    pub fn with_text_column(mut self, column: impl Into<String>) -> Self {
        self.text_column = column.into();
        self
    }

    /// Write summaries to `column` instead of `summary`.
    pub fn with_summary_column(mut self, column: impl Into<String>) -> Self {
        self.summary_column = column.into();
        self
    }

    pub fn caller(&self) -> &RetryingCaller<B> {
        &self.caller
    }

    /// Summarize a single article.
    pub async fn summarize(&self, article: &str) -> Result<String, ModelError> {
        let prompt = build_summary_prompt(article);
        self.caller.call(SUMMARY_SYSTEM_PROMPT, &prompt).await
    }

    /// Summarize every row and return the table with the summary column set.
    pub async fn add_summaries(&self, table: ArticleTable) -> Result<ArticleTable, PipelineError> {
        let text_idx = table.require_column(&self.text_column)?;
        let total = table.len();
        let mut summaries = Vec::with_capacity(total);

        for (i, row) in table.rows().iter().enumerate() {
            tracing::info!("Generating summary for article {}/{}", i + 1, total);
            let summary = self
                .summarize(&row[text_idx])
                .await
                .map_err(|source| PipelineError::Summary { row: i + 1, source })?;
            summaries.push(summary);
        }

        table.with_column(&self.summary_column, summaries)
    }

    /// Load `input`, summarize every row and write the result to `output`.
    ///
    /// Returns the number of summarized rows.
    pub async fn run(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<usize, PipelineError> {
        let table = ArticleTable::from_path(input)?;
        table.require_column(&self.text_column)?;
        tracing::info!("Loaded {} articles", table.len());

        let table = self.add_summaries(table).await?;
        table.write_path(output.as_ref())?;
        tracing::info!("Summaries saved to {}", output.as_ref().display());

        Ok(table.len())
    }
}
