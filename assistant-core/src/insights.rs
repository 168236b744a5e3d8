//! Insight generation: prompt the model with a weather summary and split the
//! returned prose into a recommendation and a longer insights body.

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    error::ComposeError,
    llm::{GenerationOptions, LanguageModel},
    model::{Insights, WeatherRecord},
    parser,
};

const MAX_OUTPUT_TOKENS: u32 = 1024;
const TEMPERATURE: f32 = 0.7;
const LABELS: [&str; 2] = ["Recommendation:", "Insights:"];

#[derive(Debug, Clone)]
pub struct InsightComposer {
    model: Arc<dyn LanguageModel>,
    system_prompt: String,
}

impl InsightComposer {
    pub fn new(model: Arc<dyn LanguageModel>, system_prompt: impl Into<String>) -> Self {
        Self {
            model,
            system_prompt: system_prompt.into(),
        }
    }

    pub async fn compose(&self, record: &WeatherRecord) -> Result<Insights, ComposeError> {
        let prompt = build_prompt(record);
        let options = GenerationOptions::new(MAX_OUTPUT_TOKENS, TEMPERATURE)
            .with_system_instruction(self.system_prompt.as_str());

        info!(city = ?record.city, "Requesting weather insights");
        let text = self.model.generate(&prompt, &options).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ComposeError::EmptyGeneration);
        }

        debug!(text, "Insight text received");
        Ok(split_insights(text))
    }
}

pub fn build_prompt(record: &WeatherRecord) -> String {
    format!(
        "Here is the current weather data:\n{}\n\
         Write 3 to 5 short, complete sentences for someone about to head out in this weather. \
         Cover, in this order: what to wear or bring, how comfortable it feels overall, \
         activities that suit the conditions, one safety or health note, \
         and what to expect for the rest of the day.\n\
         Do not use labels, headings, bullet points, numbering or any markdown. \
         Write plain prose only.",
        parser::format_for_prompt(record)
    )
}

/// Deterministically split generated prose into recommendation and insights.
///
/// One sentence (or none) becomes the whole recommendation; otherwise the
/// first sentence is the recommendation and the rest form the insights.
pub fn split_insights(text: &str) -> Insights {
    let cleaned = clean(text);

    let (recommendation, insights) = match split_sentences(&cleaned).as_slice() {
        [first, rest @ ..] if !rest.is_empty() => (first.to_string(), rest.join(" ")),
        _ => (cleaned.clone(), String::new()),
    };

    Insights {
        recommendation,
        insights,
    }
}

fn clean(text: &str) -> String {
    let mut unlabelled = text.to_string();
    for label in LABELS {
        unlabelled = unlabelled.replace(label, "");
    }
    // Collapsing last also squeezes the gaps left by removed labels.
    unlabelled.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split after `.`, `!` or `?` when followed by whitespace. Empty fragments are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev_terminal = false;

    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() && prev_terminal {
            sentences.push(&text[start..idx]);
            start = idx;
        }
        prev_terminal = matches!(ch, '.' | '!' | '?');
    }
    sentences.push(&text[start..]);

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
