use thiserror::Error;

/// Camera subsystem errors.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("property {0} is not supported")]
    PropertyNotSupported(String),

    #[error("device binding failed: {0}")]
    DeviceBinding(String),

    #[error("Camera {0} not found.")]
    DeviceNotFound(String),

    #[error("No camera device found.")]
    NoDevices,

    #[error("Property {property} not found for device {device}.")]
    PropertyNotFound { device: String, property: String },

    #[error("invalid settings data: {0}")]
    InvalidSettingsData(String),

    #[error("{0} can not adapt automatically")]
    UnsupportedAutoAdapt(String),

    #[error("COM initialisation failed: {0}")]
    ComInit(String),

    #[error("device enumeration failed: {0}")]
    Enumeration(String),

    #[error("control query failed: {0}")]
    ControlQuery(String),

    #[error("control write failed: {0}")]
    ControlWrite(String),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, CameraError>;
