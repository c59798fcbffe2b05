use std::fmt;
use std::ops::RangeInclusive;

/// DirectShow flag bit: the control adapts automatically.
pub const FLAGS_AUTO: i32 = 0x1;

/// DirectShow flag bit: the control is set manually.
pub const FLAGS_MANUAL: i32 = 0x2;

/// Property ids probed per control group during device discovery.
pub const PROBED_PROPERTY_IDS: RangeInclusive<i32> = 0..=20;

/// `IAMCameraControl` property names by id.
const CAMERA_CONTROL_NAMES: [&str; 20] = [
    "Pan",
    "Tilt",
    "Roll",
    "Zoom",
    "Exposure",
    "Iris",
    "Focus",
    "CamControl 7",
    "CamControl 8",
    "CamControl 9",
    "CamControl 10",
    "CamControl 11",
    "CamControl 12",
    "CamControl 13",
    "CamControl 14",
    "CamControl 15",
    "CamControl 16",
    "CamControl 17",
    "CamControl 18",
    "LowLightCompensation",
];

/// `IAMVideoProcAmp` property names by id.
const VIDEO_PROC_AMP_NAMES: [&str; 14] = [
    "Brightness",
    "Contrast",
    "Hue",
    "Saturation",
    "Sharpness",
    "Gamma",
    "ColorEnable",
    "WhiteBalance",
    "BacklightCompensation",
    "Gain",
    "VideoProcAmp 10",
    "VideoProcAmp 11",
    "VideoProcAmp 12",
    "PowerLineFrequency",
];

/// One of the two native property families a webcam exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlGroup {
    /// `IAMCameraControl`: mechanical and optical properties.
    CameraControl,
    /// `IAMVideoProcAmp`: image-processing properties.
    VideoProcAmp,
}

impl ControlGroup {
    /// Both groups, in discovery order.
    pub const ALL: [ControlGroup; 2] = [ControlGroup::CameraControl, ControlGroup::VideoProcAmp];

    /// Tag used in logs and `describe` output.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::CameraControl => "CameraControl",
            Self::VideoProcAmp => "VideoProcAmp",
        }
    }

    fn name_table(self) -> &'static [&'static str] {
        match self {
            Self::CameraControl => &CAMERA_CONTROL_NAMES,
            Self::VideoProcAmp => &VIDEO_PROC_AMP_NAMES,
        }
    }

    fn fallback_prefix(self) -> &'static str {
        match self {
            Self::CameraControl => "CamControl",
            Self::VideoProcAmp => "VideoProcAmp",
        }
    }

    /// Human-readable name of a property id within this group.
    ///
    /// Ids beyond the name table get a synthesised `"<Group> <id>"` name.
    pub fn property_name(self, property_id: i32) -> String {
        usize::try_from(property_id)
            .ok()
            .and_then(|index| self.name_table().get(index))
            .map(|name| (*name).to_string())
            .unwrap_or_else(|| format!("{} {property_id}", self.fallback_prefix()))
    }
}

impl fmt::Display for ControlGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Raw result of a native range query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRange {
    pub min: i32,
    pub max: i32,
    pub step: i32,
    pub default: i32,
    pub caps_flags: i32,
}

/// Static metadata of a property, fetched once at discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyMetadata {
    pub can_auto_adapt: bool,
    pub default: i32,
    pub min: i32,
    pub max: i32,
    pub step: i32,
}

impl From<RawRange> for PropertyMetadata {
    fn from(raw: RawRange) -> Self {
        Self {
            can_auto_adapt: raw.caps_flags & FLAGS_AUTO != 0,
            default: raw.default,
            min: raw.min,
            max: raw.max,
            step: raw.step,
        }
    }
}

/// Live state of a property, re-read on every access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyState {
    pub value: i32,
    pub is_auto: bool,
}

impl PropertyState {
    /// Decode a native `(value, flags)` pair.
    pub fn from_raw(value: i32, flags: i32) -> Self {
        Self {
            value,
            is_auto: flags & FLAGS_AUTO != 0,
        }
    }
}

/// Native flags value for a write in the given mode.
pub fn mode_flags(auto_adapt: bool) -> i32 {
    if auto_adapt {
        FLAGS_AUTO
    } else {
        FLAGS_MANUAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_control_names_follow_directshow_ids() {
        let group = ControlGroup::CameraControl;
        assert_eq!(group.property_name(0), "Pan");
        assert_eq!(group.property_name(4), "Exposure");
        assert_eq!(group.property_name(6), "Focus");
        assert_eq!(group.property_name(7), "CamControl 7");
        assert_eq!(group.property_name(19), "LowLightCompensation");
    }

    #[test]
    fn video_proc_amp_names_follow_directshow_ids() {
        let group = ControlGroup::VideoProcAmp;
        assert_eq!(group.property_name(0), "Brightness");
        assert_eq!(group.property_name(7), "WhiteBalance");
        assert_eq!(group.property_name(9), "Gain");
        assert_eq!(group.property_name(13), "PowerLineFrequency");
    }

    #[test]
    fn ids_past_the_table_get_synthesised_names() {
        assert_eq!(ControlGroup::CameraControl.property_name(20), "CamControl 20");
        assert_eq!(ControlGroup::VideoProcAmp.property_name(14), "VideoProcAmp 14");
        assert_eq!(ControlGroup::VideoProcAmp.property_name(20), "VideoProcAmp 20");
    }

    #[test]
    fn negative_ids_get_synthesised_names() {
        assert_eq!(ControlGroup::CameraControl.property_name(-1), "CamControl -1");
    }

    #[test]
    fn group_names_never_collide_across_groups() {
        for id in PROBED_PROPERTY_IDS {
            let cam = ControlGroup::CameraControl.property_name(id);
            for other in PROBED_PROPERTY_IDS {
                assert_ne!(cam, ControlGroup::VideoProcAmp.property_name(other));
            }
        }
    }

    #[test]
    fn metadata_reads_auto_capability_from_caps_flags() {
        let meta = PropertyMetadata::from(RawRange {
            min: 0,
            max: 255,
            step: 1,
            default: 128,
            caps_flags: FLAGS_AUTO | FLAGS_MANUAL,
        });
        assert!(meta.can_auto_adapt);
        assert_eq!(meta.default, 128);

        let manual_only = PropertyMetadata::from(RawRange {
            min: 0,
            max: 255,
            step: 1,
            default: 128,
            caps_flags: FLAGS_MANUAL,
        });
        assert!(!manual_only.can_auto_adapt);
    }

    #[test]
    fn state_reads_auto_bit_from_current_flags() {
        assert!(PropertyState::from_raw(5, 0x01).is_auto);
        assert!(!PropertyState::from_raw(5, 0x02).is_auto);
        assert!(!PropertyState::from_raw(5, 0x00).is_auto);
    }

    #[test]
    fn mode_flags_select_exactly_one_bit() {
        assert_eq!(mode_flags(true), FLAGS_AUTO);
        assert_eq!(mode_flags(false), FLAGS_MANUAL);
    }
}
