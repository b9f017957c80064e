use std::fs;
use crate::config::Config;
use crate::errors::LeafInitError;
use crate::manager_agro::Agro;
use crate::manager_gemini::Gemini;
use crate::manager_weather::Weather;

/// Bundle of the provider manager structs
pub struct Mgr {
    pub weather: Weather,
    pub agro: Agro,
    pub gemini: Gemini,
}

/// Instantiates the provider managers and makes sure the inbox directories
/// exist
///
/// # Arguments
///
/// * 'config' - the loaded configuration
pub fn init(config: &Config) -> Result<Mgr, LeafInitError> {
    fs::create_dir_all(&config.files.chat_dir)?;
    fs::create_dir_all(&config.files.detect_dir)?;

    let weather = Weather::new(&config.open_weather);
    let agro = Agro::new(&config.agro);
    let gemini = Gemini::new(&config.gemini);

    Ok(Mgr { weather, agro, gemini })
}
