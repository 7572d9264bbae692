use serde::{Deserialize, Serialize};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Normalized weather record the front end renders from.
///
/// Only ever built in one piece by the provider transform; there are no
/// optional fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    pub location: Location,
    pub current_observation: CurrentObservation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub region: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentObservation {
    pub condition: Condition,
    pub humidity_percent: f64,
    /// Provider wind value, passed through unconverted.
    pub wind_speed_kmh: f64,
    /// Localized time of day.
    pub sunrise: String,
    pub sunset: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Provider temperature, passed through unconverted.
    pub temperature_celsius: f64,
    pub description: String,
    pub icon_code: String,
}

impl WeatherData {
    /// Image URL for the condition icon.
    pub fn icon_url(&self) -> String {
        format!("{ICON_BASE_URL}/{}.png", self.current_observation.condition.icon_code)
    }
}
