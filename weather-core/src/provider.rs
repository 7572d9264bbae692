use crate::{Config, FetchError, WeatherData, provider::open_weather13::OpenWeather13Provider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod open_weather13;

/// One call, one outbound request: resolve a city name into [`WeatherData`].
///
/// Implementations do not retry or cache.
#[async_trait]
pub trait WeatherFetcher: Send + Sync + Debug {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherData, FetchError>;
}

/// Construct the provider from config.
pub fn fetcher_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherFetcher>> {
    let api_key = config.require_api_key()?;
    let provider = OpenWeather13Provider::new(&config.provider, api_key.to_owned())?;
    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetcher_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = fetcher_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn fetcher_from_config_rejects_bad_base_url() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.provider.base_url = "not a url".into();

        let err = fetcher_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("Invalid base URL"));
    }

    #[test]
    fn fetcher_from_config_works_when_key_is_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());

        assert!(fetcher_from_config(&cfg).is_ok());
    }
}
