use std::sync::Arc;

use parking_lot::Mutex;

use crate::camera::adapter::ControlAccessor;
use crate::camera::backend::{CameraBackend, DeviceControls};
use crate::camera::error::{CameraError, Result};
use crate::camera::types::{ControlGroup, RawRange, FLAGS_AUTO, FLAGS_MANUAL};

const DUMMY_DEVICE_NAME: &str = "Dummy Test Camera";

/// One simulated control with its range and live state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedControl {
    pub group: ControlGroup,
    pub id: i32,
    pub min: i32,
    pub max: i32,
    pub step: i32,
    pub default: i32,
    pub supports_auto: bool,
    pub value: i32,
    pub is_auto: bool,
}

impl SimulatedControl {
    /// A manual-only control sitting at its default value.
    pub fn new(group: ControlGroup, id: i32, min: i32, max: i32, step: i32, default: i32) -> Self {
        Self {
            group,
            id,
            min,
            max,
            step,
            default,
            supports_auto: false,
            value: default,
            is_auto: false,
        }
    }

    /// Give the control auto capability, starting in the given mode.
    pub fn with_auto(mut self, is_auto: bool) -> Self {
        self.supports_auto = true;
        self.is_auto = is_auto;
        self
    }

    pub fn with_value(mut self, value: i32) -> Self {
        self.value = value;
        self
    }

    fn range(&self) -> RawRange {
        RawRange {
            min: self.min,
            max: self.max,
            step: self.step,
            default: self.default,
            caps_flags: if self.supports_auto {
                FLAGS_AUTO | FLAGS_MANUAL
            } else {
                FLAGS_MANUAL
            },
        }
    }

    fn flags(&self) -> i32 {
        if self.is_auto {
            FLAGS_AUTO
        } else {
            FLAGS_MANUAL
        }
    }
}

/// A simulated video input device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedCamera {
    pub name: String,
    pub bindable: bool,
    pub controls: Vec<SimulatedControl>,
}

impl SimulatedCamera {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bindable: true,
            controls: Vec::new(),
        }
    }

    pub fn with_control(mut self, control: SimulatedControl) -> Self {
        self.controls.push(control);
        self
    }

    /// Listed by enumeration but without camera control interfaces, like a
    /// capture card or virtual source.
    pub fn unbindable(mut self) -> Self {
        self.bindable = false;
        self
    }
}

/// A fake camera backend for running without real hardware.
///
/// Control state lives in memory and is shared by every device bound from
/// the same backend, so writes survive re-enumeration the way they would
/// on hardware. Writes outside the range, or auto writes on controls
/// without auto capability, are rejected.
///
/// Enable via `DUMMY_CAMERA=1` environment variable.
#[derive(Clone)]
pub struct DummyBackend {
    cameras: Arc<Mutex<Vec<SimulatedCamera>>>,
    bind_log: Arc<Mutex<Vec<String>>>,
}

impl DummyBackend {
    /// Create a backend with one simulated webcam.
    pub fn new() -> Self {
        let camera = SimulatedCamera::new(DUMMY_DEVICE_NAME)
            .with_control(SimulatedControl::new(ControlGroup::CameraControl, 3, 100, 500, 1, 100))
            .with_control(
                SimulatedControl::new(ControlGroup::CameraControl, 4, -11, -2, 1, -6).with_auto(true),
            )
            .with_control(
                SimulatedControl::new(ControlGroup::CameraControl, 6, 0, 255, 5, 0).with_auto(true),
            )
            .with_control(SimulatedControl::new(ControlGroup::VideoProcAmp, 0, 0, 255, 1, 128))
            .with_control(SimulatedControl::new(ControlGroup::VideoProcAmp, 1, 0, 100, 1, 50))
            .with_control(SimulatedControl::new(ControlGroup::VideoProcAmp, 3, 0, 200, 1, 100))
            .with_control(SimulatedControl::new(ControlGroup::VideoProcAmp, 4, 0, 10, 1, 5))
            .with_control(
                SimulatedControl::new(ControlGroup::VideoProcAmp, 7, 2000, 9000, 10, 6500)
                    .with_auto(true),
            )
            .with_control(SimulatedControl::new(ControlGroup::VideoProcAmp, 13, 0, 2, 1, 2));
        Self::with_cameras(vec![camera])
    }

    pub fn with_cameras(cameras: Vec<SimulatedCamera>) -> Self {
        Self {
            cameras: Arc::new(Mutex::new(cameras)),
            bind_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Whether the dummy camera is enabled via environment variable.
    pub fn is_enabled() -> bool {
        std::env::var("DUMMY_CAMERA").is_ok_and(|v| v == "1" || v == "true")
    }

    /// Names passed to `bind`, in call order.
    pub fn bound_devices(&self) -> Vec<String> {
        self.bind_log.lock().clone()
    }

    /// Current state of one simulated control.
    pub fn control(&self, camera: &str, group: ControlGroup, id: i32) -> Option<SimulatedControl> {
        self.cameras
            .lock()
            .iter()
            .find(|c| c.name == camera)?
            .controls
            .iter()
            .find(|c| c.group == group && c.id == id)
            .cloned()
    }
}

impl Default for DummyBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraBackend for DummyBackend {
    fn device_names(&self) -> Result<Vec<String>> {
        Ok(self.cameras.lock().iter().map(|c| c.name.clone()).collect())
    }

    fn bind(&self, name: &str) -> Result<DeviceControls> {
        self.bind_log.lock().push(name.to_string());

        let cameras = self.cameras.lock();
        let camera = cameras
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| CameraError::DeviceNotFound(name.to_string()))?;
        if !camera.bindable {
            return Err(CameraError::DeviceBinding(format!(
                "could not handle {name} as camera"
            )));
        }

        let accessor = |group| -> Box<dyn ControlAccessor> {
            Box::new(DummyAccessor {
                cameras: Arc::clone(&self.cameras),
                camera: name.to_string(),
                group,
            })
        };
        Ok(DeviceControls {
            camera_control: accessor(ControlGroup::CameraControl),
            video_proc_amp: accessor(ControlGroup::VideoProcAmp),
        })
    }
}

/// Accessor over one control group of one simulated camera.
struct DummyAccessor {
    cameras: Arc<Mutex<Vec<SimulatedCamera>>>,
    camera: String,
    group: ControlGroup,
}

impl DummyAccessor {
    fn with_control<T>(
        &self,
        property_id: i32,
        f: impl FnOnce(&mut SimulatedControl) -> Result<T>,
    ) -> Result<T> {
        let mut cameras = self.cameras.lock();
        let camera = cameras
            .iter_mut()
            .find(|c| c.name == self.camera)
            .ok_or_else(|| CameraError::DeviceNotFound(self.camera.clone()))?;
        let control = camera
            .controls
            .iter_mut()
            .find(|c| c.group == self.group && c.id == property_id)
            .ok_or_else(|| {
                CameraError::ControlQuery(format!(
                    "{} property {property_id} not supported",
                    self.group
                ))
            })?;
        f(control)
    }
}

impl ControlAccessor for DummyAccessor {
    fn get_range(&self, property_id: i32) -> Result<RawRange> {
        self.with_control(property_id, |c| Ok(c.range()))
    }

    fn get(&self, property_id: i32) -> Result<(i32, i32)> {
        self.with_control(property_id, |c| Ok((c.value, c.flags())))
    }

    fn set(&self, property_id: i32, value: i32, flags: i32) -> Result<()> {
        self.with_control(property_id, |c| {
            if value < c.min || value > c.max {
                return Err(CameraError::ControlWrite(format!(
                    "value {value} outside [{}, {}]",
                    c.min, c.max
                )));
            }
            let is_auto = flags & FLAGS_AUTO != 0;
            if is_auto && !c.supports_auto {
                return Err(CameraError::ControlWrite(
                    "auto mode not supported".to_string(),
                ));
            }
            c.value = value;
            c.is_auto = is_auto;
            Ok(())
        })
    }
}
