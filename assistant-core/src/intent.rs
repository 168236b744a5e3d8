use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    error::ModelError,
    llm::{GenerationOptions, LanguageModel},
    model::{IntentResult, ParsedIntent},
};

const WEATHER_PREFIX: &str = "WEATHER:";
const CHAT_PREFIX: &str = "CHAT:";
const MAX_OUTPUT_TOKENS: u32 = 512;

/// Utterances with at most this many tokens are retried as a city name when
/// the classifier output cannot be parsed.
pub const CITY_FALLBACK_MAX_TOKENS: usize = 3;

/// Classifies an utterance and, for chat, answers it in the same model call.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    model: Arc<dyn LanguageModel>,
}

impl IntentClassifier {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub async fn classify(&self, utterance: &str) -> Result<ParsedIntent, ModelError> {
        let options = GenerationOptions::new(MAX_OUTPUT_TOKENS, 0.0);
        let raw = self.model.generate(&build_prompt(utterance), &options).await?;
        debug!(raw = %raw, "Classifier output");
        if raw.trim().is_empty() {
            return Err(ModelError::EmptyOutput);
        }

        let parsed = parse_intent(&raw);
        if let ParsedIntent::Unparsed(_) = parsed {
            warn!(utterance, "Classifier output matched neither WEATHER: nor CHAT:");
        }
        Ok(parsed)
    }
}

pub fn build_prompt(utterance: &str) -> String {
    format!(
        "You are a friendly assistant who specialises in weather but can also help with \
         general questions.\n\
         Decide what the user wants and reply in EXACTLY one of these two formats:\n\
         WEATHER: <city or place name>\n\
         CHAT: <your full answer>\n\
         \n\
         Use WEATHER only when the user's ENTIRE input is a city or place name given to get a \
         weather report. Use CHAT for everything else. When you use CHAT, answer the question \
         helpfully and fully. If the question is directly about weather or climate, answer \
         normally. For any other question, finish with one short, natural sentence reminding \
         the user that you are primarily a weather assistant and that they can type any city \
         name to get a live weather report with personalised recommendations.\n\
         \n\
         Examples:\n\
         User: London\n\
         WEATHER: London\n\
         User: New York\n\
         WEATHER: New York\n\
         User: What is humidity?\n\
         CHAT: Humidity is the amount of water vapour in the air, usually given as a percentage \
         of the most the air could hold at that temperature.\n\
         User: Suggest me a restaurant in Kolkata\n\
         CHAT: Peter Cat on Park Street is a long-time favourite for its chelo kebab. \
         I'm mainly a weather assistant, so type any city name whenever you'd like a live \
         weather report.\n\
         \n\
         User: {utterance}\n"
    )
}

/// Parse classifier output by literal, case-sensitive prefix.
pub fn parse_intent(raw: &str) -> ParsedIntent {
    let text = raw.trim();

    if let Some(city) = text.strip_prefix(WEATHER_PREFIX) {
        let city = city.trim();
        if !city.is_empty() {
            return ParsedIntent::Intent(IntentResult::Weather {
                city_name: city.to_string(),
            });
        }
    } else if let Some(reply) = text.strip_prefix(CHAT_PREFIX) {
        return ParsedIntent::Intent(IntentResult::Chat {
            reply: reply.trim().to_string(),
        });
    }

    ParsedIntent::Unparsed(text.to_string())
}

/// Resolve unparsed classifier output: short utterances are treated as a
/// city name, anything longer gets the raw model text as a chat reply.
pub fn fallback_intent(utterance: &str, raw_output: &str) -> IntentResult {
    let utterance = utterance.trim();
    if utterance.split_whitespace().count() <= CITY_FALLBACK_MAX_TOKENS {
        IntentResult::Weather {
            city_name: utterance.to_string(),
        }
    } else {
        IntentResult::Chat {
            reply: raw_output.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather(city: &str) -> ParsedIntent {
        ParsedIntent::Intent(IntentResult::Weather {
            city_name: city.into(),
        })
    }

    #[test]
    fn weather_prefix_yields_trimmed_city() {
        assert_eq!(parse_intent("WEATHER: London"), weather("London"));
        assert_eq!(parse_intent("  WEATHER:   New York  \n"), weather("New York"));
        assert_eq!(parse_intent("WEATHER:Tokyo"), weather("Tokyo"));
    }

    #[test]
    fn chat_prefix_yields_reply() {
        assert_eq!(
            parse_intent("CHAT: Rain is condensed water vapour.\nIt falls."),
            ParsedIntent::Intent(IntentResult::Chat {
                reply: "Rain is condensed water vapour.\nIt falls.".into()
            })
        );
    }

    #[test]
    fn prefixes_are_case_sensitive() {
        assert_eq!(
            parse_intent("weather: London"),
            ParsedIntent::Unparsed("weather: London".into())
        );
        assert_eq!(parse_intent("Chat: hi"), ParsedIntent::Unparsed("Chat: hi".into()));
    }

    #[test]
    fn weather_prefix_wins_over_chat() {
        assert_eq!(parse_intent("WEATHER: CHAT: Paris"), weather("CHAT: Paris"));
    }

    #[test]
    fn empty_city_is_unparsed() {
        assert_eq!(parse_intent("WEATHER:  "), ParsedIntent::Unparsed("WEATHER:".into()));
    }

    #[test]
    fn fallback_uses_short_utterance_as_city() {
        assert_eq!(
            fallback_intent(" Rio de Janeiro ", "I think so"),
            IntentResult::Weather {
                city_name: "Rio de Janeiro".into()
            }
        );
    }

    #[test]
    fn fallback_uses_raw_output_for_longer_utterances() {
        assert_eq!(
            fallback_intent("what should I wear today", "Something warm."),
            IntentResult::Chat {
                reply: "Something warm.".into()
            }
        );
    }

    #[test]
    fn prompt_contains_utterance_and_grammar() {
        let prompt = build_prompt("Kyoto");
        assert!(prompt.contains("User: Kyoto\n"));
        assert!(prompt.contains("WEATHER: <city or place name>"));
        assert!(prompt.contains("CHAT: <your full answer>"));
    }
}
