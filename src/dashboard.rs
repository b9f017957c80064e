use std::fmt;
use std::fmt::Formatter;
use chrono::{DateTime, Local};
use log::info;
use crate::config::GeoRef;
use crate::initialization::Mgr;
use crate::models::views::{ChatMessage, NdviView, SoilView, WeatherView};

const GREETING: &str = "Hello! I'm your Gemini AI farming assistant with access to \
live weather and soil data. How can I help you today?";

/// The three always-populated view objects plus the running chat log.
/// Each refresh recomputes every view from scratch and wholly replaces
/// the previous one, old and new data are never merged.
pub struct Dashboard {
    pub weather: WeatherView,
    pub soil: SoilView,
    pub ndvi: NdviView,
    pub chat: Vec<ChatMessage>,
    pub refreshed_at: Option<DateTime<Local>>,
}

impl Dashboard {
    pub fn new() -> Dashboard {
        Dashboard {
            weather: WeatherView::loading(),
            soil: SoilView::loading(),
            ndvi: NdviView::loading(),
            chat: vec![ChatMessage::ai(GREETING, "Gemini AI")],
            refreshed_at: None,
        }
    }

    /// Re-runs the full aggregation sequence, weather then soil then NDVI,
    /// each awaited in turn. Running inside the single worker thread makes
    /// the refresh single-flight, a new one cannot start while one is in
    /// progress.
    ///
    /// # Arguments
    ///
    /// * 'mgr' - the provider manager bundle
    /// * 'geo_ref' - the farm location
    pub fn refresh(&mut self, mgr: &Mgr, geo_ref: &GeoRef) {
        info!("loading live data from APIs");

        self.weather = mgr.weather.current_and_forecast(geo_ref.lat, geo_ref.long);
        self.soil = mgr.agro.soil(geo_ref.lat, geo_ref.long);
        self.ndvi = mgr.agro.ndvi(geo_ref.lat, geo_ref.long);
        self.refreshed_at = Some(Local::now());
    }

    /// Assembles the free text context blob the chat bridge embeds into
    /// its prompt, from the current weather and soil snapshots
    pub fn context(&self) -> String {
        format!(
            "Current Weather: {}°C, {}, Humidity: {}%\n\
             Soil Data: pH {}, Nitrogen {}, Phosphorus {}, Potassium {}\n\
             Farm Location: User's registered farm location",
            self.weather.temperature, self.weather.condition, self.weather.humidity,
            self.soil.ph, self.soil.nitrogen, self.soil.phosphorus, self.soil.potassium,
        )
    }
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "weather: {}", self.weather)?;
        writeln!(f, "soil:    {}", self.soil)?;
        write!(f, "ndvi:    {}", self.ndvi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::views::Cell;

    #[test]
    fn starts_with_loading_views_and_greeting() {
        let dashboard = Dashboard::new();

        assert_eq!(dashboard.weather.temperature, Cell::dashes());
        assert_eq!(dashboard.soil.ph, Cell::dashes());
        assert_eq!(dashboard.ndvi.date, "--");
        assert_eq!(dashboard.chat.len(), 1);
        assert_eq!(dashboard.chat[0].model.as_deref(), Some("Gemini AI"));
        assert!(dashboard.refreshed_at.is_none());
    }

    #[test]
    fn context_carries_weather_and_soil_snapshot() {
        let mut dashboard = Dashboard::new();
        dashboard.weather.temperature = Cell::Num(28.5);
        dashboard.weather.condition = "clear sky".to_string();
        dashboard.soil.ph = Cell::Text("6.8".to_string());
        dashboard.soil.nitrogen = Cell::Num(45.0);

        let context = dashboard.context();

        assert!(context.contains("Current Weather: 28.5°C, clear sky"));
        assert!(context.contains("pH 6.8"));
        assert!(context.contains("Nitrogen 45"));
    }

    #[test]
    fn context_degrades_to_sentinels() {
        let mut dashboard = Dashboard::new();
        dashboard.weather = WeatherView::unavailable();
        dashboard.soil = SoilView::unavailable();

        let context = dashboard.context();

        assert!(context.contains("Current Weather: --°C"));
        assert!(context.contains("pH N/A"));
    }
}
