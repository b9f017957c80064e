pub mod errors;

use std::time::Duration;
use chrono::{DateTime, Local};
use log::error;
use ureq::Agent;
use crate::config::OpenWeather;
use crate::manager_weather::errors::WeatherError;
use crate::models::openweather::{CurrentConditions, Forecast};
use crate::models::views::{Cell, ForecastSlot, WeatherView};

/// Number of forecast entries shown in the dashboard strip
const FORECAST_SLOTS: usize = 8;

/// Struct for managing weather retrieval from OpenWeatherMap
pub struct Weather {
    agent: Agent,
    api_key: String,
    base_url: String,
}

impl Weather {
    /// Returns a Weather struct ready for fetching current conditions and
    /// forecasts from OpenWeatherMap
    ///
    /// # Arguments
    ///
    /// * 'config' - the OpenWeather section of the configuration
    pub fn new(config: &OpenWeather) -> Weather {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .build();

        let agent = agent_config.into();

        Weather {
            agent,
            api_key: config.api_key.to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Retrieves current conditions plus the 5 day / 3 hour forecast and
    /// folds them into a single weather view.
    ///
    /// This never fails: any transport, status or document error is logged
    /// and replaced by the placeholder view, so callers render whatever
    /// comes back without error handling of their own.
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude of the farm location
    /// * 'lon' - longitude of the farm location
    pub fn current_and_forecast(&self, lat: f64, lon: f64) -> WeatherView {
        match self.fetch(lat, lon) {
            Ok(view) => view,
            Err(e) => {
                error!("OpenWeather API error: {}", e);
                WeatherView::unavailable()
            }
        }
    }

    /// Issues the two GET calls and builds the view
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude of the farm location
    /// * 'lon' - longitude of the farm location
    fn fetch(&self, lat: f64, lon: f64) -> Result<WeatherView, WeatherError> {
        let url = format!("{}/weather?lat={}&lon={}&appid={}&units=metric",
                          self.base_url, lat, lon, self.api_key);
        let json = self.agent
            .get(url)
            .call()?
            .body_mut()
            .read_to_string()?;
        let current: CurrentConditions = serde_json::from_str(&json)?;

        let url = format!("{}/forecast?lat={}&lon={}&appid={}&units=metric",
                          self.base_url, lat, lon, self.api_key);
        let json = self.agent
            .get(url)
            .call()?
            .body_mut()
            .read_to_string()?;
        let forecast: Forecast = serde_json::from_str(&json)?;

        build_view(current, forecast)
    }
}

/// Folds the two response documents into a weather view.
///
/// Wind speed arrives in m/s and is converted to km/h. The short-term
/// prediction is taken from the second forecast entry, i.e. roughly six
/// hours ahead, and the display strip keeps the first eight entries.
///
/// # Arguments
///
/// * 'current' - the current conditions document
/// * 'forecast' - the 5 day / 3 hour forecast document
pub fn build_view(current: CurrentConditions, forecast: Forecast) -> Result<WeatherView, WeatherError> {
    let summary = current.weather.first()
        .ok_or(WeatherError::Shape("current conditions carry no weather summary".to_string()))?;

    let ahead = forecast.list.get(1)
        .ok_or(WeatherError::Shape("forecast shorter than 2 entries".to_string()))?;
    let ahead_summary = ahead.weather.first()
        .ok_or(WeatherError::Shape("forecast entry carries no weather summary".to_string()))?;
    let prediction = format!("{} expected in next 6 hours", ahead_summary.description);

    let mut slots: Vec<ForecastSlot> = Vec::with_capacity(FORECAST_SLOTS);
    for entry in forecast.list.iter().take(FORECAST_SLOTS) {
        let condition = entry.weather.first()
            .ok_or(WeatherError::Shape("forecast entry carries no weather summary".to_string()))?
            .description.to_string();

        slots.push(ForecastSlot {
            time: slot_label(entry.dt)?,
            temp: entry.main.temp.round() as i32,
            condition,
            rain: entry.rain.as_ref().and_then(|r| r.three_h).unwrap_or(0.0),
        });
    }

    Ok(WeatherView {
        temperature: Cell::Num(current.main.temp),
        condition: summary.description.to_string(),
        humidity: Cell::Num(current.main.humidity),
        wind_speed: Cell::Num(current.wind.speed * 3.6),
        rainfall: Cell::Num(current.rain.as_ref().and_then(|r| r.one_h).unwrap_or(0.0)),
        // UV index requires a separate One Call request and is not fetched
        uv: Cell::Num(0.0),
        prediction,
        icon: Some(summary.icon.to_string()),
        forecast: slots,
    })
}

/// Formats a forecast step timestamp as a local HH:MM label
///
/// # Arguments
///
/// * 'dt' - unix timestamp of the forecast step
fn slot_label(dt: i64) -> Result<String, WeatherError> {
    let utc = DateTime::from_timestamp(dt, 0)
        .ok_or(WeatherError::Shape(format!("illegal forecast timestamp [{}]", dt)))?;

    Ok(utc.with_timezone(&Local).format("%H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn current_fixture() -> CurrentConditions {
        serde_json::from_value(json!({
            "main": {"temp": 28.5, "humidity": 70},
            "wind": {"speed": 3},
            "weather": [{"description": "clear sky", "icon": "01d"}]
        })).unwrap()
    }

    fn forecast_fixture(entries: usize) -> Forecast {
        let list: Vec<serde_json::Value> = (0..entries).map(|i| json!({
            "dt": 1_700_000_000 + i as i64 * 10_800,
            "main": {"temp": 23.4 + i as f64, "humidity": 60},
            "weather": [{"description": format!("entry {}", i), "icon": "02d"}],
            "rain": {"3h": 0.4}
        })).collect();

        serde_json::from_value(json!({"list": list})).unwrap()
    }

    #[test]
    fn builds_view_from_kerala_scenario() {
        let view = build_view(current_fixture(), forecast_fixture(4)).unwrap();

        assert_eq!(view.temperature, Cell::Num(28.5));
        assert_eq!(view.humidity, Cell::Num(70.0));
        assert_eq!(view.condition, "clear sky");
        assert_eq!(view.icon.as_deref(), Some("01d"));
        assert!(view.prediction.contains("entry 1"));
    }

    #[test]
    fn converts_wind_speed_to_kmh() {
        let view = build_view(current_fixture(), forecast_fixture(2)).unwrap();

        assert_eq!(view.wind_speed, Cell::Num(3.0 * 3.6));
        assert_eq!(view.wind_speed, Cell::Num(10.8));
    }

    #[test]
    fn missing_rain_defaults_to_zero() {
        let view = build_view(current_fixture(), forecast_fixture(2)).unwrap();

        assert_eq!(view.rainfall, Cell::Num(0.0));
        assert_eq!(view.uv, Cell::Num(0.0));
    }

    #[test]
    fn rain_last_hour_is_picked_up() {
        let current: CurrentConditions = serde_json::from_value(json!({
            "main": {"temp": 21.0, "humidity": 88},
            "wind": {"speed": 5.5},
            "rain": {"1h": 2.3},
            "weather": [{"description": "light rain", "icon": "10d"}]
        })).unwrap();

        let view = build_view(current, forecast_fixture(2)).unwrap();

        assert_eq!(view.rainfall, Cell::Num(2.3));
    }

    #[test]
    fn display_strip_keeps_first_eight_entries() {
        let view = build_view(current_fixture(), forecast_fixture(12)).unwrap();

        assert_eq!(view.forecast.len(), 8);
        assert_eq!(view.forecast[0].temp, 23);
        assert_eq!(view.forecast[3].temp, 26);
        assert_eq!(view.forecast[0].rain, 0.4);
        assert_eq!(view.forecast[7].condition, "entry 7");
    }

    #[test]
    fn short_forecast_is_a_shape_error() {
        let result = build_view(current_fixture(), forecast_fixture(1));

        assert!(matches!(result, Err(WeatherError::Shape(_))));
    }

    #[test]
    fn failed_request_maps_to_the_placeholder_view() {
        let weather = Weather::new(&OpenWeather {
            api_key: "test-key".to_string(),
            base_url: "http://127.0.0.1:9/data/2.5".to_string(),
        });

        let view = weather.current_and_forecast(10.0889, 76.0795);

        assert_eq!(view, WeatherView::unavailable());
    }

    #[test]
    fn unavailable_view_is_fully_populated() {
        let view = WeatherView::unavailable();

        assert_eq!(view.temperature, Cell::dashes());
        assert_eq!(view.humidity, Cell::dashes());
        assert_eq!(view.wind_speed, Cell::dashes());
        assert_eq!(view.rainfall, Cell::dashes());
        assert_eq!(view.condition, "Unable to fetch weather data");
        assert_eq!(view.prediction, "Please check your API key and connection");
        assert!(view.forecast.is_empty());
    }
}
