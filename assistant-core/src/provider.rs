use crate::{Config, error::ProviderError, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of raw current-weather payloads.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, city: &str) -> Result<serde_json::Value, ProviderError>;
}

/// Construct the OpenWeatherMap provider from the shared settings.
pub fn provider_from_config(
    api_key: &str,
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider = OpenWeatherProvider::new(
        api_key.to_owned(),
        config.weather_base_url.clone(),
        config.request_timeout(),
    )?;
    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_default_config_builds() {
        let cfg = Config::default();
        let provider = provider_from_config("KEY", &cfg);
        assert!(provider.is_ok());
    }
}
