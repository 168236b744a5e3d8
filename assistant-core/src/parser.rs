//! Normalization of raw OpenWeatherMap payloads into [`WeatherRecord`].

use std::fmt::Display;

use serde_json::Value;
use tracing::{error, info, warn};

use crate::{error::ParseError, model::WeatherRecord};

const PLACEHOLDER: &str = "N/A";

/// Extract a flat record from the provider's nested response.
///
/// Only a wholly absent payload is an error; any missing path becomes `None`.
pub fn parse(raw: &Value) -> Result<WeatherRecord, ParseError> {
    if is_empty(raw) {
        return Err(ParseError::EmptyInput);
    }

    let main = raw.get("main");
    let wind = raw.get("wind");
    let condition = raw
        .get("weather")
        .and_then(Value::as_array)
        .and_then(|list| list.first());

    let record = WeatherRecord {
        city: string_at(Some(raw), "name"),
        country: string_at(raw.get("sys"), "country"),
        temperature: float_at(main, "temp"),
        feels_like: float_at(main, "feels_like"),
        temp_min: float_at(main, "temp_min"),
        temp_max: float_at(main, "temp_max"),
        pressure: int_at(main, "pressure"),
        humidity: int_at(main, "humidity"),
        description: string_at(condition, "description"),
        weather_main: string_at(condition, "main"),
        wind_speed: float_at(wind, "speed"),
        wind_deg: int_at(wind, "deg"),
    };

    info!(city = ?record.city, "Parsed weather data");
    Ok(record)
}

/// Names of the required fields that are absent from `record`.
pub fn missing_required_fields(record: &WeatherRecord) -> Vec<&'static str> {
    let checks = [
        ("city", record.city.is_some()),
        ("temperature", record.temperature.is_some()),
        ("description", record.description.is_some()),
        ("humidity", record.humidity.is_some()),
        ("wind_speed", record.wind_speed.is_some()),
    ];

    checks
        .into_iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| name)
        .collect()
}

/// Stricter check than [`parse`]: city, temperature, description, humidity
/// and wind speed must all be present.
pub fn validate(record: &WeatherRecord) -> bool {
    let missing = missing_required_fields(record);
    if missing.is_empty() {
        info!("Weather data validation passed");
        return true;
    }

    for field in &missing {
        warn!(field, "Validation failed: missing required field");
    }
    error!(?missing, "Weather data is missing required fields");
    false
}

/// Fixed-layout summary used inside model prompts.
pub fn format_for_prompt(record: &WeatherRecord) -> String {
    format!(
        "Current Weather Report\n\
         ======================\n\
         Location    : {}, {}\n\
         Condition   : {}\n\
         Temperature : {}°C (feels like {}°C)\n\
         Range       : {}°C – {}°C\n\
         Humidity    : {}%\n\
         Wind Speed  : {} m/s\n",
        or_na(&record.city),
        or_na(&record.country),
        or_na(&record.description),
        or_na(&record.temperature),
        or_na(&record.feels_like),
        or_na(&record.temp_min),
        or_na(&record.temp_max),
        or_na(&record.humidity),
        or_na(&record.wind_speed),
    )
}

/// Render an optional value, substituting the placeholder for `None`.
pub fn or_na<T: Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn is_empty(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn string_at(parent: Option<&Value>, key: &str) -> Option<String> {
    parent?.get(key)?.as_str().map(str::to_owned)
}

fn float_at(parent: Option<&Value>, key: &str) -> Option<f64> {
    parent?.get(key)?.as_f64()
}

fn int_at(parent: Option<&Value>, key: &str) -> Option<i64> {
    let value = parent?.get(key)?;
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    })
}
