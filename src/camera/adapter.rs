use crate::camera::error::{CameraError, Result};
use crate::camera::types::{mode_flags, ControlGroup, PropertyMetadata, PropertyState, RawRange};

/// Native calls bound to one control interface of one device.
///
/// Implemented once per platform interface (`IAMCameraControl`,
/// `IAMVideoProcAmp`) and by the simulated backend. Values and flags are
/// passed through untouched.
pub trait ControlAccessor {
    /// Query min/max/step/default and capability flags for a property.
    fn get_range(&self, property_id: i32) -> Result<RawRange>;

    /// Read the current `(value, flags)` of a property.
    fn get(&self, property_id: i32) -> Result<(i32, i32)>;

    /// Write a value together with mode flags.
    fn set(&self, property_id: i32, value: i32, flags: i32) -> Result<()>;
}

/// Uniform accessor over one native control group.
///
/// The group supplies the property name table; the accessor supplies the
/// bound native calls.
pub struct ControlAdapter {
    group: ControlGroup,
    accessor: Box<dyn ControlAccessor>,
}

impl ControlAdapter {
    pub fn new(group: ControlGroup, accessor: Box<dyn ControlAccessor>) -> Self {
        Self { group, accessor }
    }

    pub fn group(&self) -> ControlGroup {
        self.group
    }

    pub fn property_name(&self, property_id: i32) -> String {
        self.group.property_name(property_id)
    }

    /// Fetch static metadata. Any native failure means the property is not
    /// supported by this device.
    pub fn metadata(&self, property_id: i32) -> Result<PropertyMetadata> {
        self.accessor
            .get_range(property_id)
            .map(PropertyMetadata::from)
            .map_err(|e| {
                CameraError::PropertyNotSupported(format!(
                    "{} ({e})",
                    self.property_name(property_id)
                ))
            })
    }

    /// Read the live value and auto state.
    pub fn read(&self, property_id: i32) -> Result<PropertyState> {
        let (value, flags) = self.accessor.get(property_id).map_err(|e| {
            CameraError::ControlQuery(format!(
                "Failed to get state of {}: {e}",
                self.property_name(property_id)
            ))
        })?;
        Ok(PropertyState::from_raw(value, flags))
    }

    /// Write a value in automatic or manual mode.
    pub fn write(&self, property_id: i32, value: i32, auto_adapt: bool) -> Result<()> {
        self.accessor
            .set(property_id, value, mode_flags(auto_adapt))
            .map_err(|e| {
                CameraError::ControlWrite(format!(
                    "Failed to change state of {}: {e}",
                    self.property_name(property_id)
                ))
            })
    }
}
