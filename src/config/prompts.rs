//! Prompts sent to the model.

/// System prompt for summary requests. The instructions live in the user prompt.
pub const SUMMARY_SYSTEM_PROMPT: &str = "";

/// Maximum number of bullet points requested per summary.
pub const MAX_SUMMARY_BULLETS: usize = 5;

/// Summary instructions (`{max_bullets}` and `{article}` are filled in by
/// [`build_summary_prompt`])
pub static SUMMARY_PROMPT_TEMPLATE: &str = r#"You are tasked with summarizing a news article in a concise and informative manner. Here's the article you need to summarize:

<article>
{article}
</article>

Please read the article carefully and create a summary following these guidelines:

1. Identify the main points and key information from the article.
2. Summarize the article using a maximum of {max_bullets} bullet points.
3. Each bullet point should be a single sentence that captures an important aspect of the article.
4. Ensure that the bullet points cover the most crucial information and provide a comprehensive overview of the article's content.
5. Focus on facts and avoid including personal opinions or interpretations.

Provide your summary within <summary> tags, with each bullet point enclosed in <bullet> tags.
"#;

/// Build the user prompt asking for a bullet-point summary of `article`.
pub fn build_summary_prompt(article: &str) -> String {
    SUMMARY_PROMPT_TEMPLATE
        .replacen("{max_bullets}", &MAX_SUMMARY_BULLETS.to_string(), 1)
        .replacen("{article}", article, 1)
}
