use thiserror::Error;

use crate::camera::error::CameraError;
use crate::settings::store::SettingsError;

/// Errors surfaced by a CLI run. All of them end the process with a
/// non-zero exit code.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Argument(String),

    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, CliError>;
