use log4rs::Handle;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use crate::config::General;
use crate::errors::ConfigError;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l})} {t} - {m}{n}";

/// Wires up log4rs with a file appender and, when configured, a stdout
/// appender. Level comes straight from the configuration file.
///
/// # Arguments
///
/// * 'general' - the general section of the configuration
pub fn setup_logger(general: &General) -> Result<Handle, ConfigError> {
    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(&general.log_path)?;

    let mut builder = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file)));
    let mut root = Root::builder().appender("file");

    if general.log_to_stdout {
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build();
        builder = builder.appender(Appender::builder().build("stdout", Box::new(stdout)));
        root = root.appender("stdout");
    }

    let config = builder
        .build(root.build(general.log_level))
        .map_err(|e| ConfigError(format!("log config error: {}", e)))?;

    let handle = log4rs::init_config(config)
        .map_err(|e| ConfigError(format!("logger init error: {}", e)))?;

    Ok(handle)
}
