//! Geometry writer.
//!
//! Every vertex goes through the [`crate::dimension`] policy and the
//! [`crate::codec`] before it lands in a [`Document`]. A geometry either
//! produces a complete document or no document at all.
use serde::ser;
use serde_json::Value;

use crate::{
    codec,
    dimension::{select_axes, AxisValue},
    document::{Document, DocumentType},
    error::Result,
    geometry::{Geometry, Shape},
    settings::SerializerSettings,
};

/// Writes `geometry` as a document, surfacing internal invariant violations.
///
/// `Ok(None)` is the no-value document: the geometry is empty or holds a vertex
/// without finite X/Y values.
///
/// # Errors
///
/// Returns [`crate::error::Error::InvariantViolation`] if a non-finite value
/// reaches the coordinate codec.
pub fn try_write(geometry: &Geometry, settings: &SerializerSettings) -> Result<Option<Document>> {
    let selected = select_axes(settings, geometry);
    if selected.is_empty() {
        return Ok(None);
    }

    let mut positions = selected.iter().map(|axes| position(axes));
    let coordinates = match geometry.shape() {
        Shape::Point(_) => position(&selected[0])?,
        Shape::Polyline(_) | Shape::MultiPoint(_) => {
            Value::Array(positions.collect::<Result<Vec<_>>>()?)
        }
        Shape::Polygon(rings) => {
            let mut out = Vec::with_capacity(rings.len());
            for ring in rings.iter().filter(|ring| !ring.is_empty()) {
                let ring = positions
                    .by_ref()
                    .take(ring.len())
                    .collect::<Result<Vec<_>>>()?;
                out.push(Value::Array(ring));
            }
            Value::Array(out)
        }
    };

    Ok(Some(Document::new(
        DocumentType::for_kind(geometry.kind()),
        coordinates,
    )))
}

/// Writes `geometry` as a document, or `None` for the no-value document.
///
/// Invariant violations are logged and resolve to `None` so that no invalid
/// text is ever produced.
#[must_use]
pub fn write(geometry: &Geometry, settings: &SerializerSettings) -> Option<Document> {
    match try_write(geometry, settings) {
        Ok(document) => document,
        Err(err) => {
            log::warn!("Writing {} as null: {err}", geometry.kind());
            None
        }
    }
}

fn position(axes: &[AxisValue]) -> Result<Value> {
    axes.iter()
        .map(|axis| codec::encode_number(axis.axis.label(), axis.value).map(Value::Number))
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

/// Serializes a geometry through serde, writing `null` for the no-value document.
///
/// ```rust
/// use serde::Serialize;
/// use serde_geojson_geom::{geometry::{Geometry, Vertex}, ser::GeometrySerializer, settings::SerializerSettings};
///
/// #[derive(Serialize)]
/// struct Feature<'a> {
///     name: &'a str,
///     geometry: GeometrySerializer<'a>,
/// }
///
/// let settings = SerializerSettings::default();
/// let point = Geometry::point(Vertex::new(13.4, 52.5));
/// let feature = Feature { name: "Berlin", geometry: GeometrySerializer::new(&point, &settings) };
///
/// assert_eq!(
///     serde_json::to_string(&feature).unwrap(),
///     r#"{"name":"Berlin","geometry":{"type":"Point","coordinates":[13.4,52.5]}}"#
/// );
/// ```
pub struct GeometrySerializer<'a> {
    pub geometry: &'a Geometry,
    pub settings: &'a SerializerSettings,
}

impl<'a> GeometrySerializer<'a> {
    #[must_use]
    pub fn new(geometry: &'a Geometry, settings: &'a SerializerSettings) -> Self {
        Self { geometry, settings }
    }
}

impl ser::Serialize for GeometrySerializer<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        match write(self.geometry, self.settings) {
            Some(document) => document.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }
}

/// Writes `geometry` into a JSON tree.
///
/// # Errors
///
/// Returns [`crate::error::Error::Json`] if the document cannot be serialized.
pub fn to_value(geometry: &Geometry, settings: &SerializerSettings) -> Result<Value> {
    Ok(serde_json::to_value(GeometrySerializer::new(
        geometry, settings,
    ))?)
}

/// Writes `geometry` as compact GeoJSON text.
///
/// # Errors
///
/// Returns [`crate::error::Error::Json`] if the document cannot be serialized.
pub fn to_string(geometry: &Geometry, settings: &SerializerSettings) -> Result<String> {
    Ok(serde_json::to_string(&GeometrySerializer::new(
        geometry, settings,
    ))?)
}

/// Writes `geometry` as indented GeoJSON text.
///
/// # Errors
///
/// Returns [`crate::error::Error::Json`] if the document cannot be serialized.
pub fn to_string_pretty(geometry: &Geometry, settings: &SerializerSettings) -> Result<String> {
    Ok(serde_json::to_string_pretty(&GeometrySerializer::new(
        geometry, settings,
    ))?)
}
