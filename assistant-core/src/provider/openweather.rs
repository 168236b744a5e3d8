use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{error, info};

use crate::error::{ProviderError, truncate_body};

use super::WeatherProvider;

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        let url = format!("{}{CURRENT_WEATHER_PATH}", base_url.trim_end_matches('/'));

        Ok(Self { api_key, url, http })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(&self, city: &str) -> Result<Value, ProviderError> {
        info!(city, "Fetching weather data");

        let res = self
            .http
            .get(&self.url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| transport_error(&e, city))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| transport_error(&e, city))?;

        if let Some(err) = status_error(status, &body, city) {
            error!(city, %status, "OpenWeather request failed");
            return Err(err);
        }

        let data = decode_body(&body).inspect_err(|_| {
            error!(city, "Failed to parse OpenWeather response");
        })?;

        info!(city, "Weather data fetched");
        Ok(data)
    }
}

/// Map a non-success HTTP status to the provider error taxonomy.
fn status_error(status: StatusCode, body: &str, city: &str) -> Option<ProviderError> {
    match status {
        s if s.is_success() => None,
        StatusCode::UNAUTHORIZED => Some(ProviderError::Unauthorized),
        StatusCode::NOT_FOUND => Some(ProviderError::NotFound(city.to_string())),
        StatusCode::TOO_MANY_REQUESTS => Some(ProviderError::RateLimited),
        other => Some(ProviderError::UnexpectedStatus {
            code: other.as_u16(),
            body: truncate_body(body),
        }),
    }
}

fn transport_error(err: &reqwest::Error, city: &str) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(city.to_string())
    } else if err.is_connect() {
        ProviderError::ConnectionError(city.to_string())
    } else {
        ProviderError::Network(err.to_string())
    }
}

fn decode_body(body: &str) -> Result<Value, ProviderError> {
    serde_json::from_str(body).map_err(|_| ProviderError::MalformedResponse)
}
