use std::collections::HashSet;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::camera::adapter::ControlAdapter;
use crate::camera::error::{CameraError, Result};
use crate::camera::property::DeviceProperty;
use crate::camera::types::PROBED_PROPERTY_IDS;
use crate::settings::types::{CameraDto, CameraPropertyDto};

/// A bound camera with every property it supports, sorted by name.
///
/// Instances are short-lived: each enumeration builds fresh ones, and all
/// dynamic state is read from the device on demand.
#[derive(Debug)]
pub struct CameraDevice {
    name: String,
    properties: Vec<DeviceProperty>,
}

impl CameraDevice {
    /// Probe every property id of the given adapters and keep the supported
    /// ones.
    pub fn discover(name: impl Into<String>, adapters: Vec<ControlAdapter>) -> Self {
        let name = name.into();
        let mut properties = Vec::new();
        let mut seen = HashSet::new();

        for adapter in adapters {
            let adapter = Rc::new(adapter);
            for id in PROBED_PROPERTY_IDS {
                match DeviceProperty::probe(Rc::clone(&adapter), id) {
                    Ok(property) => {
                        if seen.insert(property.name().to_string()) {
                            properties.push(property);
                        } else {
                            warn!(
                                "Skipping duplicate property '{}' on '{name}'",
                                property.name()
                            );
                        }
                    }
                    Err(e) => debug!("{} id {id} on '{name}': {e}", adapter.group()),
                }
            }
        }

        properties.sort_by(|a, b| a.name().cmp(b.name()));
        debug!("Discovered {} properties on '{name}'", properties.len());

        Self { name, properties }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All properties, ordered by name.
    pub fn properties(&self) -> &[DeviceProperty] {
        &self.properties
    }

    /// Exact-match lookup by property name.
    pub fn property_by_name(&self, name: &str) -> Result<&DeviceProperty> {
        self.properties
            .iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| CameraError::PropertyNotFound {
                device: self.name.clone(),
                property: name.to_string(),
            })
    }

    /// Snapshot every property. One live read per property.
    pub fn to_dto(&self) -> Result<CameraDto> {
        let properties = self
            .properties
            .iter()
            .map(DeviceProperty::to_dto)
            .collect::<Result<Vec<_>>>()?;
        Ok(CameraDto::new(self.name.clone(), properties))
    }

    /// Apply a snapshot to this device.
    ///
    /// The snapshot must name this device and carry a non-empty property
    /// list. Entries are applied in list order: the value first, then the
    /// auto/manual mode. The first failure aborts the rest.
    pub fn restore_dto(&self, dto: &CameraDto) -> Result<()> {
        if dto.name != self.name {
            return Err(CameraError::InvalidSettingsData(format!(
                "Device {} can not use data for '{}'",
                self.name, dto.name
            )));
        }
        let entries = validate_property_list(&dto.name, dto.properties.as_deref())?;

        for entry in entries {
            let property = self.property_by_name(&entry.name).map_err(|_| {
                CameraError::InvalidSettingsData(format!(
                    "Device {} has no property named '{}'",
                    self.name, entry.name
                ))
            })?;
            property.set_value(entry.value)?;
            property.set_auto_adapt(entry.is_automatically_adapting)?;
        }

        Ok(())
    }
}

fn validate_property_list<'a>(
    camera_name: &str,
    properties: Option<&'a [CameraPropertyDto]>,
) -> Result<&'a [CameraPropertyDto]> {
    match properties {
        None => Err(CameraError::InvalidSettingsData(format!(
            "Property list of {camera_name} is null, can not restore anything."
        ))),
        Some([]) => Err(CameraError::InvalidSettingsData(format!(
            "Property list of {camera_name} is empty, can not restore anything."
        ))),
        Some(list) => Ok(list),
    }
}
