use crate::camera::dummy::DummyBackend;

const DEFAULT_LOG_FILTER: &str = "warn";

/// Process configuration, read once from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Use the in-memory simulated camera instead of a native backend.
    pub dummy_backend: bool,
    /// `tracing` filter directive, from `RUST_LOG`.
    pub log_filter: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            dummy_backend: DummyBackend::is_enabled(),
            log_filter: std::env::var("RUST_LOG")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dummy_backend: false,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}
