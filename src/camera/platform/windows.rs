use tracing::{debug, info, warn};
use windows::core::Interface;
use windows::Win32::Media::DirectShow::{
    IAMCameraControl, IAMVideoProcAmp, IBaseFilter, ICreateDevEnum,
};
use windows::Win32::Media::MediaFoundation::{
    CLSID_SystemDeviceEnum, CLSID_VideoInputDeviceCategory,
};
use windows::Win32::System::Com::StructuredStorage::IPropertyBag;
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoUninitialize, IBindCtx, IMoniker, CLSCTX_INPROC_SERVER,
    COINIT_MULTITHREADED,
};
use windows::Win32::System::Variant::{VARIANT, VT_BSTR};

use crate::camera::adapter::ControlAccessor;
use crate::camera::backend::{CameraBackend, DeviceControls};
use crate::camera::error::{CameraError, Result};
use crate::camera::types::RawRange;

/// COM thread guard. Ensures CoInitializeEx/CoUninitialize
/// pairing.
struct ComGuard;

impl ComGuard {
    fn init() -> Result<Self> {
        unsafe {
            let hr = CoInitializeEx(None, COINIT_MULTITHREADED);
            if hr.is_err() {
                return Err(CameraError::ComInit(format!(
                    "CoInitializeEx failed: {hr:?}"
                )));
            }
        }
        Ok(Self)
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        unsafe {
            CoUninitialize();
        }
    }
}

/// Windows camera backend using DirectShow.
///
/// COM stays initialised for the lifetime of the backend, so devices bound
/// through it must be dropped first.
pub struct WindowsBackend {
    _com: ComGuard,
}

impl WindowsBackend {
    pub fn new() -> Result<Self> {
        Ok(Self {
            _com: ComGuard::init()?,
        })
    }
}

impl CameraBackend for WindowsBackend {
    fn device_names(&self) -> Result<Vec<String>> {
        let names: Vec<String> = unsafe { video_input_devices()? }
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        info!("Enumerated {} video input device(s)", names.len());
        Ok(names)
    }

    fn bind(&self, name: &str) -> Result<DeviceControls> {
        let moniker = unsafe { video_input_devices()? }
            .into_iter()
            .find_map(|(device_name, moniker)| (device_name == name).then_some(moniker))
            .ok_or_else(|| CameraError::DeviceNotFound(name.to_string()))?;

        unsafe { bind_controls(&moniker, name) }
    }
}

/// Enumerate DirectShow video input devices with their friendly names.
///
/// # Safety
/// Calls COM APIs. COM must be initialised on this thread.
unsafe fn video_input_devices() -> Result<Vec<(String, IMoniker)>> {
    let dev_enum: ICreateDevEnum =
        CoCreateInstance(&CLSID_SystemDeviceEnum, None, CLSCTX_INPROC_SERVER).map_err(|e| {
            CameraError::Enumeration(format!("CoCreateInstance(SystemDeviceEnum) failed: {e}"))
        })?;

    let mut enum_moniker = None;
    dev_enum
        .CreateClassEnumerator(&CLSID_VideoInputDeviceCategory, &mut enum_moniker, 0)
        .map_err(|e| CameraError::Enumeration(format!("CreateClassEnumerator failed: {e}")))?;

    // S_FALSE leaves the enumerator unset when the category is empty.
    let Some(enum_moniker) = enum_moniker else {
        return Ok(vec![]);
    };

    let mut devices = Vec::new();
    let mut moniker_array = [None; 1];

    loop {
        let hr = enum_moniker.Next(&mut moniker_array, None);
        if hr.is_err() {
            break;
        }

        let Some(moniker) = moniker_array[0].take() else {
            break;
        };

        let bag: IPropertyBag = match moniker.BindToStorage(None::<&IBindCtx>, None::<&IMoniker>)
        {
            Ok(b) => b,
            Err(e) => {
                warn!("BindToStorage failed for a device: {e}");
                continue;
            }
        };

        let Some(friendly_name) = read_property_string(&bag, "FriendlyName") else {
            warn!("Skipping a video input device without FriendlyName");
            continue;
        };

        debug!("Discovered device: {friendly_name}");
        devices.push((friendly_name, moniker));
    }

    Ok(devices)
}

/// Bind the filter behind a moniker and query both control interfaces.
///
/// # Safety
/// Calls COM APIs.
unsafe fn bind_controls(moniker: &IMoniker, name: &str) -> Result<DeviceControls> {
    let filter: IBaseFilter = moniker
        .BindToObject(None::<&IBindCtx>, None::<&IMoniker>)
        .map_err(|e| CameraError::DeviceBinding(format!("BindToObject failed for {name}: {e}")))?;

    let camera_control = filter.cast::<IAMCameraControl>().map_err(|_| {
        CameraError::DeviceBinding(format!("could not handle {name} as camera"))
    })?;
    let video_proc_amp = filter.cast::<IAMVideoProcAmp>().map_err(|_| {
        CameraError::DeviceBinding(format!("could not handle {name} as video proc amp"))
    })?;

    Ok(DeviceControls {
        camera_control: Box::new(CameraControlAccessor(camera_control)),
        video_proc_amp: Box::new(VideoProcAmpAccessor(video_proc_amp)),
    })
}

/// Read a string property from an `IPropertyBag`.
unsafe fn read_property_string(bag: &IPropertyBag, name: &str) -> Option<String> {
    use windows::core::BSTR;

    let prop_name = BSTR::from(name);
    let mut variant = VARIANT::default();

    bag.Read(
        windows::core::PCWSTR(prop_name.as_ptr()),
        &mut variant,
        None,
    )
    .ok()?;

    bstr_from_variant(&variant)
}

/// Decode a `VT_BSTR` variant. Any other variant type yields `None`.
///
/// # Safety
/// `variant` must be a VARIANT as filled in by COM: `vt` tag at offset 0,
/// union data at offset 8.
unsafe fn bstr_from_variant(variant: &VARIANT) -> Option<String> {
    let base = std::ptr::addr_of!(*variant).cast::<u8>();
    if base.cast::<u16>().read() != VT_BSTR.0 {
        return None;
    }

    let raw_bstr = base.add(8).cast::<*const u16>().read();
    if raw_bstr.is_null() {
        return None;
    }

    // Byte length prefix sits 4 bytes before the string data.
    let byte_len = raw_bstr.cast::<u8>().sub(4).cast::<u32>().read();
    let slice = std::slice::from_raw_parts(raw_bstr, byte_len as usize / 2);
    Some(String::from_utf16_lossy(slice))
}

/// `IAMCameraControl` and `IAMVideoProcAmp` share the same
/// GetRange/Get/Set shape; only the interface type differs.
macro_rules! native_accessor {
    ($accessor:ident, $interface:ty) => {
        struct $accessor($interface);

        impl ControlAccessor for $accessor {
            fn get_range(&self, property_id: i32) -> Result<RawRange> {
                let mut range = RawRange {
                    min: 0,
                    max: 0,
                    step: 0,
                    default: 0,
                    caps_flags: 0,
                };
                unsafe {
                    self.0.GetRange(
                        property_id,
                        &mut range.min,
                        &mut range.max,
                        &mut range.step,
                        &mut range.default,
                        &mut range.caps_flags,
                    )
                }
                .map_err(|e| CameraError::ControlQuery(format!("GetRange({property_id}): {e}")))?;
                Ok(range)
            }

            fn get(&self, property_id: i32) -> Result<(i32, i32)> {
                let mut value = 0i32;
                let mut flags = 0i32;
                unsafe { self.0.Get(property_id, &mut value, &mut flags) }
                    .map_err(|e| CameraError::ControlQuery(format!("Get({property_id}): {e}")))?;
                Ok((value, flags))
            }

            fn set(&self, property_id: i32, value: i32, flags: i32) -> Result<()> {
                unsafe { self.0.Set(property_id, value, flags) }.map_err(|e| {
                    CameraError::ControlWrite(format!("Set({property_id}, {value}): {e}"))
                })
            }
        }
    };
}

native_accessor!(CameraControlAccessor, IAMCameraControl);
native_accessor!(VideoProcAmpAccessor, IAMVideoProcAmp);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_initialises_com_and_enumerates() {
        let backend = WindowsBackend::new().unwrap();
        let names = backend.device_names().unwrap();
        assert!(names.iter().all(|n| !n.is_empty()));
    }

    #[test]
    fn bind_fails_for_absent_device() {
        let backend = WindowsBackend::new().unwrap();
        let result = backend.bind("No Such Camera \u{1F4F7}");
        assert!(matches!(result, Err(CameraError::DeviceNotFound(_))));
    }

    #[test]
    fn non_string_variant_is_not_read_as_bstr() {
        let variant = VARIANT::default();
        assert_eq!(unsafe { bstr_from_variant(&variant) }, None);
    }
}
