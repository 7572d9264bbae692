use cityweather_core::{DisplayConfig, View, WeatherData};

pub const LOADING_TEXT: &str = "Loading weather data...";

/// Text for one view. `Empty` renders nothing.
pub fn render_view(view: View<'_>, display: &DisplayConfig) -> String {
    match view {
        View::Empty => String::new(),
        View::Loading => LOADING_TEXT.to_string(),
        View::Error(message) => message.to_string(),
        View::Success(data) => render_card(data, display),
    }
}

pub fn render_card(data: &WeatherData, display: &DisplayConfig) -> String {
    let location = &data.location;
    let obs = &data.current_observation;

    let mut out = String::new();
    out.push_str(&format!("{}\n", location.city));
    out.push_str(&format!("{}, {}\n\n", location.region, location.country));
    out.push_str(&format!(
        "{}{}  {}\n",
        obs.condition.temperature_celsius, display.temperature_unit, obs.condition.description
    ));
    out.push_str(&format!("icon: {}\n\n", data.icon_url()));
    out.push_str(&format!("{:<10}{}%\n", "Humidity:", obs.humidity_percent));
    out.push_str(&format!("{:<10}{} {}\n", "Wind:", obs.wind_speed_kmh, display.wind_unit));
    out.push_str(&format!("{:<10}{}\n", "Sunrise:", obs.sunrise));
    out.push_str(&format!("{:<10}{}", "Sunset:", obs.sunset));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cityweather_core::{Condition, CurrentObservation, Location, app::FETCH_ERROR_MESSAGE};

    fn paris() -> WeatherData {
        WeatherData {
            location: Location {
                city: "Paris".into(),
                region: "FR".into(),
                country: "FR".into(),
            },
            current_observation: CurrentObservation {
                condition: Condition {
                    temperature_celsius: 15.0,
                    description: "clear sky".into(),
                    icon_code: "01d".into(),
                },
                humidity_percent: 60.0,
                wind_speed_kmh: 10.5,
                sunrise: "7:45:10 AM".into(),
                sunset: "4:58:02 PM".into(),
            },
        }
    }

    #[test]
    fn card_lists_every_field() {
        let card = render_card(&paris(), &DisplayConfig::default());

        assert!(card.starts_with("Paris\nFR, FR\n"));
        assert!(card.contains("15°C  clear sky"));
        assert!(card.contains("https://openweathermap.org/img/wn/01d.png"));
        assert!(card.contains("Humidity: 60%"));
        assert!(card.contains("Wind:     10.5 km/h"));
        assert!(card.contains("Sunrise:  7:45:10 AM"));
        assert!(card.contains("Sunset:   4:58:02 PM"));
    }

    #[test]
    fn card_uses_configured_unit_labels() {
        let display = DisplayConfig {
            temperature_unit: "K".into(),
            wind_unit: "m/s".into(),
        };
        let card = render_card(&paris(), &display);

        assert!(card.contains("15K"));
        assert!(card.contains("10.5 m/s"));
    }

    #[test]
    fn views_render_as_expected() {
        let display = DisplayConfig::default();

        assert_eq!(render_view(View::Empty, &display), "");
        assert_eq!(render_view(View::Loading, &display), LOADING_TEXT);
        assert_eq!(render_view(View::Error(FETCH_ERROR_MESSAGE), &display), FETCH_ERROR_MESSAGE);
        assert!(render_view(View::Success(&paris()), &display).starts_with("Paris"));
    }
}
