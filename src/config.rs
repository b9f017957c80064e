use std::fs;
use log::LevelFilter;
use serde::Deserialize;
use crate::errors::ConfigError;

fn default_refresh_minutes() -> i64 { 10 }

fn default_openweather_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_agro_url() -> String {
    "http://api.agromonitoring.com/agro/1.0".to_string()
}

fn default_gemini_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent".to_string()
}

/// The farm location all provider queries are anchored on
#[derive(Deserialize)]
pub struct GeoRef {
    pub lat: f64,
    pub long: f64,
}

#[derive(Deserialize)]
pub struct OpenWeather {
    pub api_key: String,
    #[serde(default = "default_openweather_url")]
    pub base_url: String,
}

#[derive(Deserialize)]
pub struct Agro {
    pub api_key: String,
    #[serde(default = "default_agro_url")]
    pub base_url: String,
}

#[derive(Deserialize)]
pub struct Gemini {
    pub api_key: String,
    #[serde(default = "default_gemini_url")]
    pub base_url: String,
}

/// Directories scanned for file driven chat and image analysis requests
#[derive(Deserialize)]
pub struct Files {
    pub chat_dir: String,
    pub detect_dir: String,
}

#[derive(Deserialize)]
pub struct General {
    pub log_path: String,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
    #[serde(default = "default_refresh_minutes")]
    pub refresh_minutes: i64,
}

#[derive(Deserialize)]
pub struct Config {
    pub geo_ref: GeoRef,
    pub open_weather: OpenWeather,
    pub agro: Agro,
    pub gemini: Gemini,
    pub files: Files,
    pub general: General,
}

/// Loads the configuration file and returns a struct with all configuration items
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, ConfigError> {

    let toml = fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&toml)?;

    Ok(config)
}
