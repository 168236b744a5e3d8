use std::sync::Arc;

use tracing::{error, info, warn};

use crate::{
    Config,
    error::{AssistantError, InputError},
    insights::InsightComposer,
    intent::{IntentClassifier, fallback_intent},
    llm::{LanguageModel, model_from_config},
    model::{AssistantResult, IntentResult, ParsedIntent},
    parser,
    provider::{WeatherProvider, provider_from_config},
};

/// Substituted for the insights body when generation fails.
pub const INSIGHTS_UNAVAILABLE: &str = "Insights unavailable at this time.";

/// Drives one user turn from raw text to an [`AssistantResult`].
///
/// Holds no per-request state; a single instance can serve concurrent turns.
#[derive(Debug, Clone)]
pub struct Assistant {
    provider: Arc<dyn WeatherProvider>,
    classifier: IntentClassifier,
    composer: InsightComposer,
}

impl Assistant {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        model: Arc<dyn LanguageModel>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            classifier: IntentClassifier::new(Arc::clone(&model)),
            composer: InsightComposer::new(model, system_prompt),
        }
    }

    /// Build real clients from `config`. Fails if either API key is missing.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let creds = config.credentials()?;
        let provider = provider_from_config(&creds.weather_api_key, config)?;
        let model = model_from_config(&creds.gemini_api_key, config)?;

        info!(model = %config.gemini_model, "Weather assistant is ready");
        Ok(Self::new(
            Arc::from(provider),
            Arc::from(model),
            config.system_prompt(),
        ))
    }

    pub async fn handle(&self, utterance: &str) -> Result<AssistantResult, AssistantError> {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return Err(InputError::EmptyMessage.into());
        }

        let intent = match self.classifier.classify(utterance).await? {
            ParsedIntent::Intent(intent) => intent,
            ParsedIntent::Unparsed(raw) => fallback_intent(utterance, &raw),
        };

        match intent {
            IntentResult::Weather { city_name } => {
                info!(city = %city_name, "Detected city name");
                Ok(self.weather_insights(&city_name).await)
            }
            IntentResult::Chat { reply } => {
                info!("Treating as general question");
                Ok(AssistantResult::Chat { reply })
            }
        }
    }

    /// Fetch, normalize and narrate the weather for `city`.
    ///
    /// Provider and parse failures become [`AssistantResult::Error`]; a failed
    /// insight generation keeps the weather fields and uses a placeholder.
    pub async fn weather_insights(&self, city: &str) -> AssistantResult {
        let raw = match self.provider.fetch(city).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(city, error = %e, "Weather fetch failed");
                return AssistantResult::Error {
                    city_or_message: city.to_string(),
                    error: e.to_string(),
                };
            }
        };

        let record = match parser::parse(&raw) {
            Ok(record) => record,
            Err(e) => {
                error!(city, error = %e, "Parsing failed");
                return AssistantResult::Error {
                    city_or_message: city.to_string(),
                    error: format!("Failed to parse weather data: {e}"),
                };
            }
        };
        parser::validate(&record);

        let (recommendation, insights) = match self.composer.compose(&record).await {
            Ok(split) => (split.recommendation, split.insights),
            Err(e) => {
                warn!(city, error = %e, "Insight generation failed");
                (String::new(), INSIGHTS_UNAVAILABLE.to_string())
            }
        };

        info!(city, "Weather insights complete");
        AssistantResult::Weather {
            record,
            recommendation,
            insights,
        }
    }
}
