use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot of a single camera property, the unit of the settings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct CameraPropertyDto {
    pub name: String,
    pub value: i32,
    pub is_automatically_adapting: bool,
    pub min_value: i32,
    pub max_value: i32,
    pub default: i32,
    pub stepping_delta: i32,
    pub can_adapt_automatically: bool,
}

/// Snapshot of one camera: name and property list.
///
/// `properties` is optional so that `null` or missing lists survive
/// deserialisation and can be rejected on restore.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct CameraDto {
    pub name: String,
    #[serde(default)]
    pub properties: Option<Vec<CameraPropertyDto>>,
}

impl CameraDto {
    pub fn new(name: impl Into<String>, properties: Vec<CameraPropertyDto>) -> Self {
        Self {
            name: name.into(),
            properties: Some(properties),
        }
    }
}

impl fmt::Display for CameraDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Camera {}: ", self.name)?;
        let Some(properties) = &self.properties else {
            return f.write_str("no properties set.");
        };
        for (index, property) in properties.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", property.name, property.value)?;
            if property.can_adapt_automatically {
                let mode = if property.is_automatically_adapting {
                    "auto"
                } else {
                    "manual"
                };
                write!(f, " ({mode})")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brightness() -> CameraPropertyDto {
        CameraPropertyDto {
            name: "Brightness".to_string(),
            value: 129,
            is_automatically_adapting: false,
            min_value: 1,
            max_value: 255,
            default: 128,
            stepping_delta: 1,
            can_adapt_automatically: false,
        }
    }

    #[test]
    fn property_dto_serialises_with_pascal_case_fields() {
        let json = serde_json::to_value(brightness()).unwrap();

        assert_eq!(json["Name"], "Brightness");
        assert_eq!(json["Value"], 129);
        assert_eq!(json["IsAutomaticallyAdapting"], false);
        assert_eq!(json["MinValue"], 1);
        assert_eq!(json["MaxValue"], 255);
        assert_eq!(json["Default"], 128);
        assert_eq!(json["SteppingDelta"], 1);
        assert_eq!(json["CanAdaptAutomatically"], false);
        assert_eq!(json.as_object().unwrap().len(), 8);
    }

    #[test]
    fn camera_dto_serialises_name_and_properties() {
        let dto = CameraDto::new("Logitech BRIO", vec![brightness()]);
        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(json["Name"], "Logitech BRIO");
        assert_eq!(json["Properties"][0]["Name"], "Brightness");
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn camera_dto_deserialises_from_settings_json() {
        let json = r#"{
            "Name": "Test Camera",
            "Properties": [
                {
                    "Name": "Focus",
                    "Value": 10,
                    "IsAutomaticallyAdapting": true,
                    "MinValue": 0,
                    "MaxValue": 255,
                    "Default": 25,
                    "SteppingDelta": 5,
                    "CanAdaptAutomatically": true
                }
            ]
        }"#;

        let dto: CameraDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.name, "Test Camera");
        let properties = dto.properties.unwrap();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].name, "Focus");
        assert_eq!(properties[0].stepping_delta, 5);
        assert!(properties[0].is_automatically_adapting);
    }

    #[test]
    fn null_or_missing_properties_deserialise_to_none() {
        let null: CameraDto = serde_json::from_str(r#"{"Name":"A","Properties":null}"#).unwrap();
        assert!(null.properties.is_none());

        let missing: CameraDto = serde_json::from_str(r#"{"Name":"A"}"#).unwrap();
        assert!(missing.properties.is_none());
    }

    #[test]
    fn missing_property_fields_take_defaults() {
        let dto: CameraPropertyDto = serde_json::from_str(r#"{"Name":"Gain","Value":3}"#).unwrap();
        assert_eq!(dto.name, "Gain");
        assert_eq!(dto.value, 3);
        assert!(!dto.is_automatically_adapting);
        assert_eq!(dto.stepping_delta, 0);
    }

    #[test]
    fn display_lists_values_and_auto_mode_only_when_capable() {
        let focus = CameraPropertyDto {
            name: "Focus".to_string(),
            value: 0,
            is_automatically_adapting: true,
            can_adapt_automatically: true,
            ..CameraPropertyDto::default()
        };
        let dto = CameraDto::new("Cam", vec![brightness(), focus]);

        assert_eq!(dto.to_string(), "Camera Cam: Brightness=129, Focus=0 (auto)");
    }

    #[test]
    fn display_without_property_list() {
        let dto = CameraDto {
            name: "Cam".to_string(),
            properties: None,
        };
        assert_eq!(dto.to_string(), "Camera Cam: no properties set.");
    }
}
