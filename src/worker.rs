use std::thread;
use chrono::{DateTime, Local, TimeDelta};
use log::{info, warn};
use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::errors::LeafWorkerError;
use crate::inbox::{check_chat, check_detections};
use crate::initialization::Mgr;

/// Runs the aggregation loop: a tick every 10 seconds, a full view refresh
/// every refresh interval, and an inbox scan on every tick.
///
/// The loop owns the dashboard and is the only writer of its views, so
/// refreshes are single-flight: a refresh that outlives the interval simply
/// delays the next one instead of overlapping it.
///
/// # Arguments
///
/// * 'config' - the loaded configuration
/// * 'mgr' - the provider manager bundle
pub fn run(config: Config, mgr: &Mgr) -> Result<(), LeafWorkerError> {

    let mut dashboard = Dashboard::new();
    let mut local_now: DateTime<Local>;

    loop {
        local_now = Local::now();

        // Recompute all three views whenever the previous refresh has aged out
        if is_refresh_due(dashboard.refreshed_at, local_now, config.general.refresh_minutes) {
            dashboard.refresh(mgr, &config.geo_ref);
            info!("dashboard refreshed\n{}", dashboard);
        }

        // Interactive requests arrive as files and are checked every tick
        if let Err(e) = check_chat(&config.files.chat_dir, &mgr.gemini, &mut dashboard) {
            warn!("chat inbox error: {}", e);
        }
        if let Err(e) = check_detections(&config.files.detect_dir, &mgr.gemini) {
            warn!("detect inbox error: {}", e);
        }

        thread::sleep(std::time::Duration::from_secs(10));
    }
}

/// Returns true when no refresh has run yet or the last one is older than
/// the configured interval
///
/// # Arguments
///
/// * 'refreshed_at' - time of the last completed refresh
/// * 'date_time' - the current date and time
/// * 'refresh_minutes' - the configured refresh interval
fn is_refresh_due(refreshed_at: Option<DateTime<Local>>, date_time: DateTime<Local>,
                  refresh_minutes: i64) -> bool {
    match refreshed_at {
        None => true,
        Some(last) => date_time - last >= TimeDelta::minutes(refresh_minutes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_refresh_is_always_due() {
        assert!(is_refresh_due(None, Local::now(), 10));
    }

    #[test]
    fn refresh_waits_for_the_interval() {
        let now = Local::now();

        assert!(!is_refresh_due(Some(now - TimeDelta::minutes(9)), now, 10));
        assert!(is_refresh_due(Some(now - TimeDelta::minutes(10)), now, 10));
        assert!(is_refresh_due(Some(now - TimeDelta::minutes(25)), now, 10));
    }
}
