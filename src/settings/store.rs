use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::settings::types::CameraDto;

/// Settings file errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} could not be read as camera settings: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, SettingsError>;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> SettingsError + '_ {
    move |source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Load a JSON array of camera snapshots.
pub fn load_cameras(path: &Path) -> Result<Vec<CameraDto>> {
    let contents = std::fs::read_to_string(path).map_err(io_error(path))?;
    serde_json::from_str(&contents).map_err(|source| SettingsError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Save camera snapshots as an indented JSON array, replacing the file
/// atomically (write .tmp then rename).
pub fn save_cameras(path: &Path, cameras: &[CameraDto]) -> Result<()> {
    let json = serde_json::to_string_pretty(cameras).map_err(|source| SettingsError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error(parent))?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);
    std::fs::write(&tmp_path, &json).map_err(io_error(&tmp_path))?;
    std::fs::rename(&tmp_path, path).map_err(io_error(path))?;

    tracing::debug!("Saved {} camera(s) to {}", cameras.len(), path.display());
    Ok(())
}
