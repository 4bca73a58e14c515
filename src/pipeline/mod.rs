//! Article table pipeline: load, summarize, save.

mod summarizer;
mod table;

pub use summarizer::Summarizer;
pub use table::{ArticleTable, PipelineError};
