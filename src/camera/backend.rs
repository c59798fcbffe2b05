use crate::camera::adapter::{ControlAccessor, ControlAdapter};
use crate::camera::error::Result;
use crate::camera::types::ControlGroup;

/// Native control interfaces bound for one device.
pub struct DeviceControls {
    pub camera_control: Box<dyn ControlAccessor>,
    pub video_proc_amp: Box<dyn ControlAccessor>,
}

impl DeviceControls {
    /// Wrap both accessors in adapters, camera control first.
    pub fn into_adapters(self) -> Vec<ControlAdapter> {
        vec![
            ControlAdapter::new(ControlGroup::CameraControl, self.camera_control),
            ControlAdapter::new(ControlGroup::VideoProcAmp, self.video_proc_amp),
        ]
    }
}

/// Platform-agnostic camera backend trait.
///
/// Implemented per platform (DirectShow on Windows) and by the simulated
/// backend. Bound controls are used only on the thread that bound them.
pub trait CameraBackend {
    /// Names of all video input devices, in native enumeration order.
    fn device_names(&self) -> Result<Vec<String>>;

    /// Bind the control interfaces of the first device with this exact name.
    ///
    /// Fails with `DeviceNotFound` when no such device is enumerated, and
    /// with `DeviceBinding` when it lacks either control interface.
    fn bind(&self, name: &str) -> Result<DeviceControls>;
}

/// Backend used on platforms without a native camera backend.
pub struct NullBackend;

impl CameraBackend for NullBackend {
    fn device_names(&self) -> Result<Vec<String>> {
        Ok(vec![])
    }

    fn bind(&self, name: &str) -> Result<DeviceControls> {
        Err(crate::camera::error::CameraError::DeviceNotFound(
            name.to_string(),
        ))
    }
}
