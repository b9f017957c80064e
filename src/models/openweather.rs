use serde::Deserialize;

#[derive(Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub humidity: f64,
}

#[derive(Deserialize)]
pub struct Wind {
    pub speed: f64,
}

/// Rain volume over the last hour, reported by the current conditions endpoint
#[derive(Deserialize)]
pub struct RainLastHour {
    #[serde(rename = "1h")]
    pub one_h: Option<f64>,
}

#[derive(Deserialize)]
pub struct ConditionSummary {
    pub description: String,
    pub icon: String,
}

#[derive(Deserialize)]
pub struct CurrentConditions {
    pub main: MainReadings,
    pub wind: Wind,
    pub rain: Option<RainLastHour>,
    pub weather: Vec<ConditionSummary>,
}

/// Rain volume over a three hour forecast step
#[derive(Deserialize)]
pub struct RainThreeHours {
    #[serde(rename = "3h")]
    pub three_h: Option<f64>,
}

#[derive(Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: MainReadings,
    pub weather: Vec<ConditionSummary>,
    pub rain: Option<RainThreeHours>,
}

/// The 5 day / 3 hour forecast document
#[derive(Deserialize)]
pub struct Forecast {
    pub list: Vec<ForecastEntry>,
}
