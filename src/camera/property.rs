use std::fmt;
use std::rc::Rc;

use crate::camera::adapter::ControlAdapter;
use crate::camera::error::{CameraError, Result};
use crate::camera::types::{ControlGroup, PropertyMetadata, PropertyState};
use crate::settings::types::CameraPropertyDto;

/// One supported property of one device.
///
/// Static metadata is cached at construction. Value and auto state are
/// never cached: every accessor re-reads them from the device.
pub struct DeviceProperty {
    adapter: Rc<ControlAdapter>,
    property_id: i32,
    name: String,
    metadata: PropertyMetadata,
}

impl DeviceProperty {
    /// Probe a property id. Fails with `PropertyNotSupported` when the
    /// device rejects the range query.
    pub fn probe(adapter: Rc<ControlAdapter>, property_id: i32) -> Result<Self> {
        let metadata = adapter.metadata(property_id)?;
        let name = adapter.property_name(property_id);
        Ok(Self {
            adapter,
            property_id,
            name,
            metadata,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> ControlGroup {
        self.adapter.group()
    }

    pub fn property_id(&self) -> i32 {
        self.property_id
    }

    fn live_state(&self) -> Result<PropertyState> {
        self.adapter.read(self.property_id)
    }

    /// Current value, read from the device.
    pub fn value(&self) -> Result<i32> {
        Ok(self.live_state()?.value)
    }

    /// Write a value, keeping whatever auto/manual mode the device is in.
    pub fn set_value(&self, value: i32) -> Result<()> {
        let state = self.live_state()?;
        self.adapter.write(self.property_id, value, state.is_auto)
    }

    /// Whether the device is currently adapting this property itself.
    pub fn is_auto_adapt(&self) -> Result<bool> {
        Ok(self.live_state()?.is_auto)
    }

    /// Switch between automatic and manual mode, keeping the current value.
    ///
    /// Enabling auto on a property without that capability fails; disabling
    /// it is always accepted and leaves the device untouched.
    pub fn set_auto_adapt(&self, auto_adapt: bool) -> Result<()> {
        if !self.metadata.can_auto_adapt {
            if auto_adapt {
                return Err(CameraError::UnsupportedAutoAdapt(self.name.clone()));
            }
            return Ok(());
        }
        let state = self.live_state()?;
        self.adapter.write(self.property_id, state.value, auto_adapt)
    }

    pub fn has_auto_adapt_capability(&self) -> bool {
        self.metadata.can_auto_adapt
    }

    pub fn min_value(&self) -> i32 {
        self.metadata.min
    }

    pub fn max_value(&self) -> i32 {
        self.metadata.max
    }

    pub fn default_value(&self) -> i32 {
        self.metadata.default
    }

    pub fn increment_size(&self) -> i32 {
        self.metadata.step
    }

    /// Snapshot the property. Performs one live read.
    pub fn to_dto(&self) -> Result<CameraPropertyDto> {
        let state = self.live_state()?;
        Ok(CameraPropertyDto {
            name: self.name.clone(),
            value: state.value,
            is_automatically_adapting: state.is_auto,
            min_value: self.metadata.min,
            max_value: self.metadata.max,
            default: self.metadata.default,
            stepping_delta: self.metadata.step,
            can_adapt_automatically: self.metadata.can_auto_adapt,
        })
    }
}

impl fmt::Debug for DeviceProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceProperty")
            .field("group", &self.group())
            .field("property_id", &self.property_id)
            .field("name", &self.name)
            .field("metadata", &self.metadata)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::adapter::tests::{add_property, mock_adapter, range, MockState};
    use crate::camera::types::{FLAGS_AUTO, FLAGS_MANUAL};
    use std::cell::RefCell;

    fn focus_property(is_auto: bool) -> (DeviceProperty, Rc<RefCell<MockState>>) {
        let (adapter, state) = mock_adapter(ControlGroup::CameraControl);
        add_property(&state, 6, range(0, 255, 5, 25, true), 40, is_auto);
        let property = DeviceProperty::probe(Rc::new(adapter), 6).unwrap();
        (property, state)
    }

    fn brightness_property() -> (DeviceProperty, Rc<RefCell<MockState>>) {
        let (adapter, state) = mock_adapter(ControlGroup::VideoProcAmp);
        add_property(&state, 0, range(1, 255, 1, 128, false), 129, false);
        let property = DeviceProperty::probe(Rc::new(adapter), 0).unwrap();
        (property, state)
    }

    #[test]
    fn probe_caches_static_metadata() {
        let (property, _state) = focus_property(false);
        assert_eq!(property.name(), "Focus");
        assert_eq!(property.group(), ControlGroup::CameraControl);
        assert_eq!(property.min_value(), 0);
        assert_eq!(property.max_value(), 255);
        assert_eq!(property.default_value(), 25);
        assert_eq!(property.increment_size(), 5);
        assert!(property.has_auto_adapt_capability());
    }

    #[test]
    fn probe_fails_for_unsupported_id() {
        let (adapter, _state) = mock_adapter(ControlGroup::CameraControl);
        let result = DeviceProperty::probe(Rc::new(adapter), 2);
        assert!(matches!(result, Err(CameraError::PropertyNotSupported(_))));
    }

    #[test]
    fn value_is_re_read_on_every_access() {
        let (property, state) = focus_property(false);
        assert_eq!(property.value().unwrap(), 40);

        state.borrow_mut().values.insert(6, (55, FLAGS_MANUAL));
        assert_eq!(property.value().unwrap(), 55);
        assert_eq!(state.borrow().get_calls.len(), 2);
    }

    #[test]
    fn set_value_preserves_auto_mode() {
        let (property, state) = focus_property(true);
        property.set_value(100).unwrap();

        let state = state.borrow();
        assert_eq!(state.get_calls.len(), 1, "exactly one re-read before write");
        assert_eq!(state.set_calls, vec![(6, 100, FLAGS_AUTO)]);
    }

    #[test]
    fn set_value_preserves_manual_mode() {
        let (property, state) = focus_property(false);
        property.set_value(100).unwrap();
        assert_eq!(state.borrow().set_calls, vec![(6, 100, FLAGS_MANUAL)]);
    }

    #[test]
    fn set_auto_adapt_keeps_current_value() {
        let (property, state) = focus_property(false);
        property.set_auto_adapt(true).unwrap();
        assert_eq!(state.borrow().set_calls, vec![(6, 40, FLAGS_AUTO)]);
        assert!(property.is_auto_adapt().unwrap());
    }

    #[test]
    fn enabling_auto_without_capability_fails() {
        let (property, state) = brightness_property();
        let result = property.set_auto_adapt(true);
        assert!(matches!(result, Err(CameraError::UnsupportedAutoAdapt(ref n)) if n == "Brightness"));
        assert!(state.borrow().set_calls.is_empty());
    }

    #[test]
    fn disabling_auto_without_capability_is_silent_no_op() {
        let (property, state) = brightness_property();
        property.set_auto_adapt(false).unwrap();

        let state = state.borrow();
        assert!(state.set_calls.is_empty());
        assert!(state.get_calls.is_empty());
    }

    #[test]
    fn read_failure_propagates() {
        let (property, state) = focus_property(false);
        state.borrow_mut().fail_get = true;
        assert!(property.value().is_err());
        assert!(property.set_value(10).is_err());
        assert!(state.borrow().set_calls.is_empty());
    }

    #[test]
    fn dto_combines_static_and_live_state() {
        let (property, _state) = focus_property(true);
        let dto = property.to_dto().unwrap();

        assert_eq!(
            dto,
            CameraPropertyDto {
                name: "Focus".to_string(),
                value: 40,
                is_automatically_adapting: true,
                min_value: 0,
                max_value: 255,
                default: 25,
                stepping_delta: 5,
                can_adapt_automatically: true,
            }
        );
    }
}
