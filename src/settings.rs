//! Configuration shared by the writer and the reader.
//!
//! [`SerializerSettings`] is a plain `Copy` value: build it once, hand it to a
//! conversion, and it can never change underneath that call.
//!
//! ```rust
//! use serde_geojson_geom::settings::{Dimensions, SerializerSettings};
//!
//! let settings = SerializerSettings::default()
//!     .with_dimensions(Dimensions::Xyz)
//!     .with_default_z(10.0);
//!
//! assert!(settings.dimensions.has_z());
//! assert!(!settings.simplify);
//!
//! // Settings can also come from a JSON configuration, missing fields keep their defaults.
//! let loaded: SerializerSettings = serde_json::from_str(r#"{"dimensions": "XYZ"}"#).unwrap();
//! assert_eq!(loaded.dimensions, Dimensions::Xyz);
//! assert_eq!(loaded.default_z_value, 0.0);
//! ```
use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// Coordinate axes written to a document.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimensions {
    #[default]
    Xy,
    Xyz,
    Xym,
    Xyzm,
}

impl Dimensions {
    #[must_use]
    pub fn has_z(self) -> bool {
        matches!(self, Self::Xyz | Self::Xyzm)
    }

    #[must_use]
    pub fn has_m(self) -> bool {
        matches!(self, Self::Xym | Self::Xyzm)
    }

    /// Number of axes a fully aware geometry produces under this profile.
    #[must_use]
    pub fn size(self) -> usize {
        2 + usize::from(self.has_z()) + usize::from(self.has_m())
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xy => "XY",
            Self::Xyz => "XYZ",
            Self::Xym => "XYM",
            Self::Xyzm => "XYZM",
        }
    }
}

impl Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimensions {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "XY" => Ok(Self::Xy),
            "XYZ" => Ok(Self::Xyz),
            "XYM" => Ok(Self::Xym),
            "XYZM" => Ok(Self::Xyzm),
            _ => Err(Error::Message(format!("Invalid dimensions '{value}'"))),
        }
    }
}

impl Serialize for Dimensions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Dimensions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Options consulted by both directions of the conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerSettings {
    pub dimensions: Dimensions,
    /// Written in place of a missing Z on a Z-aware geometry.
    pub default_z_value: f64,
    /// Written in place of a missing M on an M-aware geometry.
    pub default_m_value: f64,
    /// Run [`crate::geometry::Geometry::simplify`] on every geometry read.
    pub simplify: bool,
}

impl Default for SerializerSettings {
    fn default() -> Self {
        Self {
            dimensions: Dimensions::Xy,
            default_z_value: 0.0,
            default_m_value: 0.0,
            simplify: false,
        }
    }
}

impl SerializerSettings {
    #[must_use]
    pub fn with_dimensions(self, dimensions: Dimensions) -> Self {
        Self { dimensions, ..self }
    }

    #[must_use]
    pub fn with_default_z(self, default_z_value: f64) -> Self {
        Self {
            default_z_value,
            ..self
        }
    }

    #[must_use]
    pub fn with_default_m(self, default_m_value: f64) -> Self {
        Self {
            default_m_value,
            ..self
        }
    }

    #[must_use]
    pub fn with_simplify(self, simplify: bool) -> Self {
        Self { simplify, ..self }
    }

    /// Loads settings from a JSON configuration value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the value is not a settings object.
    pub fn from_value(value: Value) -> crate::error::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn dimensions_str_roundtrip(
        #[values(
            (Dimensions::Xy, "XY", 2),
            (Dimensions::Xyz, "XYZ", 3),
            (Dimensions::Xym, "XYM", 3),
            (Dimensions::Xyzm, "XYZM", 4)
        )]
        case: (Dimensions, &str, usize),
    ) {
        let (dimensions, name, size) = case;
        assert_eq!(dimensions.as_str(), name);
        assert_eq!(name.parse::<Dimensions>().unwrap(), dimensions);
        assert_eq!(name.to_lowercase().parse::<Dimensions>().unwrap(), dimensions);
        assert_eq!(dimensions.size(), size);
    }

    #[test]
    fn invalid_dimensions() {
        let err = "XZ".parse::<Dimensions>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid dimensions 'XZ'");
    }

    #[test]
    fn defaults() {
        let settings = SerializerSettings::default();
        assert_eq!(settings.dimensions, Dimensions::Xy);
        assert!(settings.default_z_value.abs() < f64::EPSILON);
        assert!(settings.default_m_value.abs() < f64::EPSILON);
        assert!(!settings.simplify);
    }

    #[test]
    fn builder_leaves_original_untouched() {
        let base = SerializerSettings::default();
        let derived = base.with_simplify(true).with_default_m(4.5);
        assert!(!base.simplify);
        assert!(derived.simplify);
        assert_eq!(derived.dimensions, base.dimensions);
    }

    #[test]
    fn load_from_json() -> crate::error::Result<()> {
        let settings = SerializerSettings::from_value(json!({
            "dimensions": "XYZM",
            "default_z_value": 12.5,
            "simplify": true
        }))?;
        assert_eq!(settings.dimensions, Dimensions::Xyzm);
        assert_eq!(settings.default_z_value, 12.5);
        assert_eq!(settings.default_m_value, 0.0);
        assert!(settings.simplify);

        assert!(SerializerSettings::from_value(json!({"dimensions": "W"})).is_err());
        Ok(())
    }
}
