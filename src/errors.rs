use std::fmt;
use std::fmt::Formatter;
use std::io;
use chrono::Local;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("error in configuration: {0}")]
pub struct ConfigError(pub String);
impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> ConfigError {
        ConfigError(format!("file error: {}", e))
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> ConfigError {
        ConfigError(format!("toml document error: {}", e))
    }
}
pub struct LeafInitError(pub String);

impl fmt::Display for LeafInitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "LeafInitError: {}", self.0)
    }
}
impl From<io::Error> for LeafInitError {
    fn from(e: io::Error) -> Self {
        LeafInitError(e.to_string())
    }
}

pub struct LeafWorkerError {
    msg: String,
}
impl LeafWorkerError {
    pub fn new(msg: String) -> LeafWorkerError {
        LeafWorkerError { msg }
    }
}
impl fmt::Display for LeafWorkerError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let report_time = format!("{}", Local::now().format("%Y-%m-%d %H:%M:%S"));
        let caption = format!("{} LeafWorkerError ", report_time);
        write!(f, "{:=<137}\n", caption)?;
        write!(f, "{}", self.msg)
    }
}
impl From<io::Error> for LeafWorkerError {
    fn from(e: io::Error) -> Self {
        LeafWorkerError { msg: e.to_string() }
    }
}
impl From<glob::PatternError> for LeafWorkerError {
    fn from(e: glob::PatternError) -> Self {
        LeafWorkerError { msg: e.to_string() }
    }
}
