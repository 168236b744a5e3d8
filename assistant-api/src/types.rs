use serde::{Deserialize, Serialize};
use weather_assistant_core::AssistantResult;

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// City name or free-text question.
    pub message: String,
}

/// Body of a successful `POST /chat`. Fields that don't apply are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub user_message: String,
    /// `"weather"` or `"chat"`.
    pub bot_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feels_like: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    pub fn from_result(user_message: &str, result: AssistantResult) -> Self {
        let mut response = Self {
            user_message: user_message.to_string(),
            bot_type: result.kind().to_string(),
            ..Self::default()
        };

        match result {
            AssistantResult::Weather {
                record,
                recommendation,
                insights,
            } => {
                response.city = record.city;
                response.country = record.country;
                response.temperature = record.temperature;
                response.feels_like = record.feels_like;
                response.description = record.description;
                response.humidity = record.humidity;
                response.wind_speed = record.wind_speed;
                response.recommendation = Some(recommendation);
                response.insights = Some(insights);
            }
            AssistantResult::Chat { reply } => response.reply = Some(reply),
            AssistantResult::Error {
                city_or_message,
                error,
            } => {
                response.city = Some(city_or_message);
                response.error = Some(error);
            }
        }

        response
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub assistant_ready: bool,
}
