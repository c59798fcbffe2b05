use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Install the global subscriber. Logs go to stderr so stdout carries
/// only command output. Safe to call more than once; later calls are
/// ignored.
pub fn init(config: &AppConfig) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|e| {
        eprintln!("Ignoring invalid log filter '{}': {e}", config.log_filter);
        EnvFilter::new("warn")
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
