use tracing::{info, warn};

use crate::camera::backend::CameraBackend;
use crate::camera::device::CameraDevice;
use crate::camera::error::{CameraError, Result};

/// Entry point for device access.
///
/// Every call re-enumerates and builds fresh [`CameraDevice`] values;
/// nothing is cached between calls.
pub struct CameraManager {
    backend: Box<dyn CameraBackend>,
}

impl CameraManager {
    pub fn new(backend: Box<dyn CameraBackend>) -> Self {
        Self { backend }
    }

    /// Names of all enumerable cameras, in native order.
    pub fn camera_names(&self) -> Result<Vec<String>> {
        self.backend.device_names()
    }

    /// Bind every enumerable camera. Devices that do not expose the camera
    /// control interfaces are skipped.
    pub fn cameras(&self) -> Result<Vec<CameraDevice>> {
        let mut cameras = Vec::new();
        for name in self.backend.device_names()? {
            match self.camera_by_name(&name) {
                Ok(camera) => cameras.push(camera),
                Err(e @ CameraError::DeviceBinding(_)) => {
                    warn!("Skipping '{name}': {e}");
                }
                Err(e) => return Err(e),
            }
        }
        info!("Bound {} camera device(s)", cameras.len());
        Ok(cameras)
    }

    /// Bind one camera by exact name.
    pub fn camera_by_name(&self, name: &str) -> Result<CameraDevice> {
        let controls = self.backend.bind(name)?;
        Ok(CameraDevice::discover(name, controls.into_adapters()))
    }
}
