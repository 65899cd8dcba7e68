//! # Insights Module
//!
//! Turns fetched listening data into natural-language answers.
//!
//! - [`context`] serializes arbitrary data into the text block placed in the
//!   prompt. It never fails; the parts of a value JSON cannot express (tuple
//!   map keys, NaN, a failing field) become strings in place.
//! - [`gemini`] is the HTTP client for the `generateContent` endpoint, with
//!   the fixed sampling configuration and permissive safety thresholds.
//! - [`stats`] derives the aggregate figures (averages, genre counts, hour
//!   distribution) that accompany raw records in a context.
//! - [`topics`] and [`chat`] decide which data a question needs.
//!
//! [`InsightGenerator::analyze`] returns a plain `String` in every case. A
//! failed generation yields an error sentence in place of the insight so the
//! page still has something to show.

pub mod chat;
pub mod context;
pub mod gemini;
mod lossy;
pub mod stats;
pub mod topics;

pub use context::{InsightContext, to_context_text};
pub use gemini::GeminiClient;
pub use topics::{InsightParams, InsightTopic};

use crate::warning;

/// Prefix of the text returned when Gemini cannot be reached or answers
/// with an error.
pub const GENERATION_ERROR_PREFIX: &str = "Error while generating insights";

/// Builds the full prompt sent to Gemini.
pub fn compose_prompt(question: &str, context: &InsightContext) -> String {
    format!(
        "As a music analysis expert, analyse the Spotify data below and answer the user's question.

USER QUESTION: {question}

AVAILABLE DATA:
{data}

Guidelines:
1. Be concise but informative
2. Highlight interesting patterns
3. Offer personal insights
4. Suggest recommendations when appropriate
5. Use a friendly, enthusiastic tone

ANSWER:
",
        data = context.to_text()
    )
}

#[derive(Debug, Clone)]
pub struct InsightGenerator {
    gemini: GeminiClient,
}

impl InsightGenerator {
    pub fn new(gemini: GeminiClient) -> Self {
        Self { gemini }
    }

    /// Model answer for `question` over `context`, or an error sentence.
    pub async fn analyze(&self, question: &str, context: &InsightContext) -> String {
        let prompt = compose_prompt(question, context);
        match self.gemini.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warning!("Gemini request failed: {}", e);
                format!("{GENERATION_ERROR_PREFIX}: {e}")
            }
        }
    }
}
