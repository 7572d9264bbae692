//! RapidAPI "open-weather13" provider.
//!
//! `GET {base_url}/city/{city}/{language}` with the RapidAPI host and key
//! headers. The body is OpenWeatherMap's current-weather document.

use async_trait::async_trait;
use chrono::{Local, Locale, TimeZone};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::{fmt::Display, time::Duration};
use tracing::{debug, instrument};

use crate::{
    config::ProviderConfig,
    error::{FetchError, truncate_body},
    model::{Condition, CurrentObservation, Location, WeatherData},
};

use super::WeatherFetcher;

const HOST_HEADER: &str = "X-RapidAPI-Host";
const KEY_HEADER: &str = "X-RapidAPI-Key";

#[derive(Clone)]
pub struct OpenWeather13Provider {
    http: Client,
    base_url: Url,
    host: String,
    api_key: String,
    language: String,
    locale: Locale,
}

impl std::fmt::Debug for OpenWeather13Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeather13Provider")
            .field("base_url", &self.base_url.as_str())
            .field("host", &self.host)
            .field("language", &self.language)
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

impl OpenWeather13Provider {
    pub fn new(config: &ProviderConfig, api_key: String) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| FetchError::Client(format!("Invalid base URL '{}'", config.base_url)))?;

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            host: config.host.clone(),
            api_key,
            language: config.language.clone(),
            locale: crate::locale::caller_locale(),
        })
    }

    /// `{base_url}/city/{city}/{language}`, city percent-encoded as one segment.
    fn city_url(&self, city: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["city", city, self.language.as_str()]);
        }
        url
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeather13Provider {
    #[instrument(skip(self), fields(host = %self.host))]
    async fn fetch_weather(&self, city: &str) -> Result<WeatherData, FetchError> {
        if city.trim().is_empty() {
            return Err(FetchError::EmptyCity);
        }

        let url = self.city_url(city);
        debug!(%url, "requesting current weather");

        let res = self
            .http
            .get(url)
            .header(HOST_HEADER, self.host.as_str())
            .header(KEY_HEADER, self.api_key.as_str())
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| FetchError::Network(format!("Failed to read response body: {e}")))?;
        debug!(%status, bytes = body.len(), "provider responded");

        if !status.is_success() {
            return Err(FetchError::Provider { status, body: truncate_body(&body) });
        }

        parse_weather(&body, &Local, self.locale)
    }
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

/// Map a provider body onto [`WeatherData`], rendering sunrise and sunset in
/// `tz` with the time format of `locale`.
///
/// Either every field is present and valid or the whole body is rejected.
pub fn parse_weather<Tz>(body: &str, tz: &Tz, locale: Locale) -> Result<WeatherData, FetchError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let parsed: OwResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Shape(e.to_string()))?;

    let weather = parsed
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::Shape("`weather` array is empty".to_string()))?;

    let out_of_range = |field: &str, value: i64| {
        FetchError::Shape(format!("{field} {value} is out of range"))
    };
    let sunrise = format_time_of_day(parsed.sys.sunrise, tz, locale)
        .ok_or_else(|| out_of_range("sunrise", parsed.sys.sunrise))?;
    let sunset = format_time_of_day(parsed.sys.sunset, tz, locale)
        .ok_or_else(|| out_of_range("sunset", parsed.sys.sunset))?;

    Ok(WeatherData {
        location: Location {
            city: parsed.name,
            // The provider has no region; the country code fills both.
            region: parsed.sys.country.clone(),
            country: parsed.sys.country,
        },
        current_observation: CurrentObservation {
            condition: Condition {
                temperature_celsius: parsed.main.temp,
                description: weather.description,
                icon_code: weather.icon,
            },
            humidity_percent: parsed.main.humidity,
            wind_speed_kmh: parsed.wind.speed,
            sunrise,
            sunset,
        },
    })
}

/// Epoch seconds as the locale's time-of-day representation (`%X`) in `tz`.
pub fn format_time_of_day<Tz>(epoch_secs: i64, tz: &Tz, locale: Locale) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    tz.timestamp_opt(epoch_secs, 0)
        .single()
        .map(|dt| dt.format_localized("%X", locale).to_string())
}
