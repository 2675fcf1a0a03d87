//! The interchange document: a GeoJSON geometry object.
//!
//! A missing document (`None`, written as the literal `null`) stands for an
//! empty or unwritable geometry.
use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{Error, Result},
    geometry::GeometryKind,
};

/// GeoJSON `type` tags understood by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DocumentType {
    Point,
    LineString,
    Polygon,
    MultiPoint,
}

impl DocumentType {
    /// Array nesting of the `coordinates` member.
    #[must_use]
    pub fn depth(self) -> usize {
        match self {
            Self::Point => 1,
            Self::LineString | Self::MultiPoint => 2,
            Self::Polygon => 3,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::LineString => "LineString",
            Self::Polygon => "Polygon",
            Self::MultiPoint => "MultiPoint",
        }
    }

    /// The tag a native geometry is written with.
    #[must_use]
    pub fn for_kind(kind: GeometryKind) -> Self {
        match kind {
            GeometryKind::Point => Self::Point,
            GeometryKind::Polyline => Self::LineString,
            GeometryKind::Polygon => Self::Polygon,
            GeometryKind::MultiPoint => Self::MultiPoint,
        }
    }
}

impl Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "Point" => Ok(Self::Point),
            "LineString" => Ok(Self::LineString),
            "Polygon" => Ok(Self::Polygon),
            "MultiPoint" => Ok(Self::MultiPoint),
            _ => Err(Error::UnsupportedType(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    #[serde(rename = "type")]
    pub kind: DocumentType,
    pub coordinates: Value,
}

impl Document {
    #[must_use]
    pub fn new(kind: DocumentType, coordinates: Value) -> Self {
        Self { kind, coordinates }
    }

    /// Interprets a parsed JSON tree; `null` yields `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] when the tree is not a geometry object and
    /// [`Error::UnsupportedType`] for an unknown `type` tag.
    pub fn from_value(value: &Value) -> Result<Option<Self>> {
        let object = match value {
            Value::Null => return Ok(None),
            Value::Object(object) => object,
            other => return Err(Error::schema("a geometry object", json_kind(other))),
        };

        let kind = match object.get("type") {
            Some(Value::String(tag)) => tag.parse()?,
            Some(other) => return Err(Error::schema("a string type tag", json_kind(other))),
            None => return Err(Error::schema("a 'type' member", "none")),
        };
        let coordinates = object
            .get("coordinates")
            .cloned()
            .ok_or_else(|| Error::schema("a 'coordinates' member", "none"))?;

        Ok(Some(Self { kind, coordinates }))
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Document::from_value(&value)
            .map_err(serde::de::Error::custom)?
            .ok_or_else(|| serde::de::Error::custom("expected a geometry object, found null"))
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_type_first() -> Result<()> {
        let document = Document::new(DocumentType::LineString, json!([[1.5, 2.5], [3.5, 4.5]]));
        assert_eq!(
            serde_json::to_string(&document)?,
            r#"{"type":"LineString","coordinates":[[1.5,2.5],[3.5,4.5]]}"#
        );
        Ok(())
    }

    #[test]
    fn from_value() -> Result<()> {
        let document = Document::from_value(&json!({
            "type": "Point",
            "coordinates": [1.0, 2.0],
            "bbox": [1.0, 2.0, 1.0, 2.0]
        }))?
        .unwrap();
        assert_eq!(document.kind, DocumentType::Point);
        assert_eq!(document.coordinates, json!([1.0, 2.0]));

        assert!(Document::from_value(&json!(null))?.is_none());
        Ok(())
    }

    #[test]
    fn from_value_errors() {
        assert!(matches!(
            Document::from_value(&json!({"type": "MultiPolygon", "coordinates": []})),
            Err(Error::UnsupportedType(tag)) if tag == "MultiPolygon"
        ));
        assert!(matches!(
            Document::from_value(&json!({"coordinates": [1.0, 2.0]})),
            Err(Error::Schema { .. })
        ));
        assert!(matches!(
            Document::from_value(&json!({"type": "Point"})),
            Err(Error::Schema { .. })
        ));
        assert!(matches!(
            Document::from_value(&json!([1.0, 2.0])),
            Err(Error::Schema { .. })
        ));
    }

    #[test]
    fn deserialize() {
        let document: Document =
            serde_json::from_str(r#"{"type":"MultiPoint","coordinates":[[1,2]]}"#).unwrap();
        assert_eq!(document.kind, DocumentType::MultiPoint);
        assert!(serde_json::from_str::<Document>("null").is_err());
    }

    #[test]
    fn depth_follows_kind() {
        assert_eq!(DocumentType::for_kind(GeometryKind::Point).depth(), 1);
        assert_eq!(DocumentType::for_kind(GeometryKind::Polyline).depth(), 2);
        assert_eq!(DocumentType::for_kind(GeometryKind::MultiPoint).depth(), 2);
        assert_eq!(DocumentType::for_kind(GeometryKind::Polygon).depth(), 3);
    }
}
