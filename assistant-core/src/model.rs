use serde::{Deserialize, Serialize};

/// Normalized snapshot of provider data for one city.
///
/// Every field is optional: a value the provider omitted stays `None` and is
/// only replaced by a placeholder when rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city: Option<String>,
    pub country: Option<String>,
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub pressure: Option<i64>,
    pub humidity: Option<i64>,
    pub description: Option<String>,
    pub weather_main: Option<String>,
    pub wind_speed: Option<f64>,
    pub wind_deg: Option<i64>,
}

/// Outcome of intent classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentResult {
    Weather { city_name: String },
    Chat { reply: String },
}

/// Raw classifier output after prefix parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedIntent {
    Intent(IntentResult),
    /// Neither `WEATHER:` nor `CHAT:` matched; carries the raw model text.
    Unparsed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    pub recommendation: String,
    pub insights: String,
}

/// Final output of one assistant turn.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantResult {
    Weather {
        record: WeatherRecord,
        recommendation: String,
        insights: String,
    },
    Chat {
        reply: String,
    },
    Error {
        city_or_message: String,
        error: String,
    },
}

impl AssistantResult {
    pub fn kind(&self) -> &'static str {
        match self {
            AssistantResult::Chat { .. } => "chat",
            AssistantResult::Weather { .. } | AssistantResult::Error { .. } => "weather",
        }
    }
}
