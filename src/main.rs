use std::env;
use anyhow::{anyhow, Result};
use log::{error, info};
use crate::config::load_config;
use crate::logging::setup_logger;
use crate::worker::run;

mod config;
mod logging;
mod errors;
mod initialization;
mod worker;
mod dashboard;
mod detection;
mod inbox;
mod manager_weather;
mod manager_agro;
mod manager_gemini;
mod models;

const DEFAULT_CONFIG_PATH: &str = "leafnet.toml";

fn main() -> Result<()> {
    let config_path = env::args().nth(1).unwrap_or(DEFAULT_CONFIG_PATH.to_string());

    let config = load_config(&config_path)
        .map_err(|e| anyhow!("{}", e))?;

    let _handle = setup_logger(&config.general)
        .map_err(|e| anyhow!("{}", e))?;

    info!("leafnet version: {}", env!("CARGO_PKG_VERSION"));
    info!("farm location: lat {}, long {}", config.geo_ref.lat, config.geo_ref.long);

    let mgr = initialization::init(&config)
        .map_err(|e| anyhow!("{}", e))?;

    match run(config, &mgr) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("{}", e);
            Err(anyhow!("worker terminated: {}", e))
        }
    }
}
