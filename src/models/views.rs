use std::fmt;
use std::fmt::Formatter;
use serde::Serialize;

/// A single dashboard cell, either a numeric reading or a sentinel text
/// such as "--" or "N/A". Every view object is always fully populated,
/// so a cell never goes missing, it only degrades to a sentinel.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum Cell {
    Num(f64),
    Text(String),
}

impl Cell {
    pub fn na() -> Cell {
        Cell::Text("N/A".to_string())
    }

    pub fn dashes() -> Cell {
        Cell::Text("--".to_string())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Cell::Num(v) => write!(f, "{}", v),
            Cell::Text(t) => write!(f, "{}", t),
        }
    }
}

/// One entry of the short-term forecast strip shown under the weather card
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ForecastSlot {
    pub time: String,
    pub temp: i32,
    pub condition: String,
    pub rain: f64,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct WeatherView {
    pub temperature: Cell,
    pub condition: String,
    pub humidity: Cell,
    pub wind_speed: Cell,
    pub rainfall: Cell,
    pub uv: Cell,
    pub prediction: String,
    pub icon: Option<String>,
    pub forecast: Vec<ForecastSlot>,
}

impl WeatherView {
    /// The shape returned whenever the weather provider cannot be read
    pub fn unavailable() -> WeatherView {
        WeatherView {
            temperature: Cell::dashes(),
            condition: "Unable to fetch weather data".to_string(),
            humidity: Cell::dashes(),
            wind_speed: Cell::dashes(),
            rainfall: Cell::dashes(),
            uv: Cell::dashes(),
            prediction: "Please check your API key and connection".to_string(),
            icon: None,
            forecast: Vec::new(),
        }
    }

    /// The shape shown before the first refresh has completed
    pub fn loading() -> WeatherView {
        WeatherView {
            temperature: Cell::dashes(),
            condition: "Loading...".to_string(),
            humidity: Cell::dashes(),
            wind_speed: Cell::dashes(),
            rainfall: Cell::dashes(),
            uv: Cell::dashes(),
            prediction: "Fetching weather data...".to_string(),
            icon: None,
            forecast: Vec::new(),
        }
    }
}

impl fmt::Display for WeatherView {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}°C {} | humidity {}% | wind {} km/h | rain {} mm | {}",
               self.temperature, self.condition, self.humidity,
               self.wind_speed, self.rainfall, self.prediction)
    }
}

/// Soil metrics for the registered field polygon.
/// ph and organic are delivered pre-formatted to one decimal, the way the
/// dashboard renders them.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SoilView {
    pub ph: Cell,
    pub nitrogen: Cell,
    pub phosphorus: Cell,
    pub potassium: Cell,
    pub organic: Cell,
    pub moisture: Cell,
    pub temperature: Cell,
}

impl SoilView {
    pub fn unavailable() -> SoilView {
        SoilView {
            ph: Cell::na(),
            nitrogen: Cell::na(),
            phosphorus: Cell::na(),
            potassium: Cell::na(),
            organic: Cell::na(),
            moisture: Cell::na(),
            temperature: Cell::na(),
        }
    }

    pub fn loading() -> SoilView {
        SoilView {
            ph: Cell::dashes(),
            nitrogen: Cell::dashes(),
            phosphorus: Cell::dashes(),
            potassium: Cell::dashes(),
            organic: Cell::dashes(),
            moisture: Cell::dashes(),
            temperature: Cell::dashes(),
        }
    }
}

impl fmt::Display for SoilView {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "pH {} | N {} | P {} | K {} | organic {}% | moisture {}% | soil temp {}°C",
               self.ph, self.nitrogen, self.phosphorus, self.potassium,
               self.organic, self.moisture, self.temperature)
    }
}

/// Vegetation index from the most recent satellite scene.
///
/// Two distinct degraded shapes exist on purpose: a search that succeeds
/// with zero scenes keeps the plausible default index, while a failed call
/// blanks the index as well. Callers can tell them apart.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct NdviView {
    pub ndvi: Cell,
    pub date: String,
    pub cloud_coverage: Cell,
}

impl NdviView {
    /// Search succeeded but no scene exists in the window
    pub fn empty() -> NdviView {
        NdviView {
            ndvi: Cell::Num(0.75),
            date: "N/A".to_string(),
            cloud_coverage: Cell::na(),
        }
    }

    /// The provider could not be read at all
    pub fn unavailable() -> NdviView {
        NdviView {
            ndvi: Cell::na(),
            date: "N/A".to_string(),
            cloud_coverage: Cell::na(),
        }
    }

    pub fn loading() -> NdviView {
        NdviView {
            ndvi: Cell::dashes(),
            date: "--".to_string(),
            cloud_coverage: Cell::dashes(),
        }
    }
}

impl fmt::Display for NdviView {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "NDVI {} | scene date {} | cloud coverage {}%",
               self.ndvi, self.date, self.cloud_coverage)
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub enum ChatRole {
    User,
    Ai,
}

/// One message of the assistant conversation, held only in memory
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub model: Option<String>,
}

impl ChatMessage {
    pub fn user(text: &str) -> ChatMessage {
        ChatMessage { role: ChatRole::User, text: text.to_string(), model: None }
    }

    pub fn ai(text: &str, model: &str) -> ChatMessage {
        ChatMessage { role: ChatRole::Ai, text: text.to_string(), model: Some(model.to_string()) }
    }
}

/// Structured fields extracted from the free-text disease analysis
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DiagnosisView {
    pub disease: String,
    pub confidence: u8,
    pub severity: String,
    pub treatment: String,
}

impl fmt::Display for DiagnosisView {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "Disease: {}", self.disease)?;
        writeln!(f, "Confidence: {}", self.confidence)?;
        writeln!(f, "Severity: {}", self.severity)?;
        write!(f, "Treatment: {}", self.treatment)
    }
}
