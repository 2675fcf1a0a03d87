//! Geometry reader.
//!
//! A document is read into a requested [`GeometryKind`]. Documents of a lower
//! nesting depth are coerced into the target: a `Point` read as a polyline is
//! a one-vertex line, a `LineString` read as a polygon is a single ring.
//! Coordinates are copied as is, never rounded.
use serde::de::{DeserializeSeed, Deserializer};
use serde_json::Value;

use crate::{
    codec,
    document::{json_kind, Document, DocumentType},
    error::{Error, Result},
    geometry::{Geometry, GeometryKind, Vertex},
    settings::{Dimensions, SerializerSettings},
};

/// Reads a document into a native geometry of the requested kind.
///
/// A missing document yields an empty geometry of that kind. When
/// [`SerializerSettings::simplify`] is set the result is simplified, which may
/// also leave it empty.
///
/// # Errors
///
/// Returns [`Error::Schema`] if the document cannot be represented as `kind`
/// or its coordinates are not nested as its type requires, and
/// [`Error::Format`] if a coordinate is not a number.
pub fn read(
    document: Option<&Document>,
    kind: GeometryKind,
    settings: &SerializerSettings,
) -> Result<Geometry> {
    let Some(document) = document else {
        return Ok(Geometry::empty(kind));
    };

    let target = DocumentType::for_kind(kind);
    if document.kind.depth() > target.depth() {
        return Err(Error::schema(
            format!("a geometry readable as {kind}"),
            document.kind.to_string(),
        ));
    }
    if document.kind != target {
        log::debug!("Reading a {} document as {kind}", document.kind);
    }

    let mut builder = VertexBuilder::new(settings.dimensions);
    let mut parts = match document.kind {
        DocumentType::Point => vec![vec![builder.vertex(&document.coordinates)?]],
        DocumentType::LineString | DocumentType::MultiPoint => {
            vec![builder.vertices(&document.coordinates)?]
        }
        DocumentType::Polygon => as_array(&document.coordinates, "an array of rings")?
            .iter()
            .map(|ring| builder.vertices(ring))
            .collect::<Result<Vec<_>>>()?,
    };

    let geometry = match kind {
        GeometryKind::Point => parts
            .pop()
            .and_then(|mut part| part.pop())
            .map_or_else(|| Geometry::empty(kind), Geometry::point),
        GeometryKind::Polyline => Geometry::polyline(parts.pop().unwrap_or_default()),
        GeometryKind::MultiPoint => Geometry::multipoint(parts.pop().unwrap_or_default()),
        GeometryKind::Polygon => Geometry::polygon(parts),
    }
    .with_z_aware(builder.z_seen)
    .with_m_aware(builder.m_seen);

    Ok(if settings.simplify {
        geometry.simplify()
    } else {
        geometry
    })
}

/// Builds vertices from positions, tracking which optional axes were present.
struct VertexBuilder {
    dimensions: Dimensions,
    z_seen: bool,
    m_seen: bool,
}

impl VertexBuilder {
    fn new(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            z_seen: false,
            m_seen: false,
        }
    }

    fn vertex(&mut self, position: &Value) -> Result<Vertex> {
        let values = as_array(position, "a position")?;
        let numbers = values
            .iter()
            .map(codec::decode_value)
            .collect::<Result<Vec<_>>>()?;

        let vertex = match numbers[..] {
            [x, y] => Vertex::new(x, y),
            // A lone third value is Z, unless the profile only knows about M.
            [x, y, third] if self.dimensions == Dimensions::Xym => {
                self.m_seen = true;
                Vertex::new(x, y).with_m(third)
            }
            [x, y, z] => {
                self.z_seen = true;
                Vertex::xyz(x, y, z)
            }
            [x, y, z, m] => {
                self.z_seen = true;
                self.m_seen = true;
                Vertex::xyz(x, y, z).with_m(m)
            }
            _ => {
                return Err(Error::schema(
                    "a position of 2 to 4 numbers",
                    format!("{} values", numbers.len()),
                ))
            }
        };
        Ok(vertex)
    }

    fn vertices(&mut self, positions: &Value) -> Result<Vec<Vertex>> {
        as_array(positions, "an array of positions")?
            .iter()
            .map(|position| self.vertex(position))
            .collect()
    }
}

fn as_array<'a>(value: &'a Value, expected: &str) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| Error::schema(expected, json_kind(value)))
}

/// Reads a geometry out of a parsed JSON tree; `null` yields an empty geometry.
///
/// # Errors
///
/// See [`read`]; additionally fails with [`Error::UnsupportedType`] for unknown
/// `type` tags.
pub fn from_value(
    value: &Value,
    kind: GeometryKind,
    settings: &SerializerSettings,
) -> Result<Geometry> {
    read(Document::from_value(value)?.as_ref(), kind, settings)
}

/// Reads a geometry from GeoJSON text.
///
/// ```rust
/// use serde_geojson_geom::{de::from_str, geometry::{GeometryKind, Vertex}, settings::SerializerSettings};
///
/// let geojson = r#"{"type": "Point", "coordinates": [13.4, 52.5]}"#;
/// let line = from_str(geojson, GeometryKind::Polyline, &SerializerSettings::default()).unwrap();
///
/// assert_eq!(line.vertex_count(), 1);
/// assert_eq!(line.vertices().next(), Some(&Vertex::new(13.4, 52.5)));
/// ```
///
/// # Errors
///
/// Returns [`Error::Json`] if the text is not JSON, otherwise see [`from_value`].
pub fn from_str(text: &str, kind: GeometryKind, settings: &SerializerSettings) -> Result<Geometry> {
    let value: Value = serde_json::from_str(text)?;
    from_value(&value, kind, settings)
}

/// Reads a geometry from GeoJSON bytes.
///
/// # Errors
///
/// Returns [`Error::Json`] if the bytes are not JSON, otherwise see [`from_value`].
pub fn from_slice(
    bytes: &[u8],
    kind: GeometryKind,
    settings: &SerializerSettings,
) -> Result<Geometry> {
    let value: Value = serde_json::from_slice(bytes)?;
    from_value(&value, kind, settings)
}

/// Deserializes a geometry of a known kind inside any serde data structure.
///
/// ```rust
/// use serde::de::DeserializeSeed;
/// use serde_geojson_geom::{de::GeometrySeed, geometry::GeometryKind, settings::SerializerSettings};
///
/// let settings = SerializerSettings::default().with_simplify(true);
/// let seed = GeometrySeed::new(GeometryKind::Polyline, &settings);
/// let mut deserializer = serde_json::Deserializer::from_str(r#"{"type":"Point","coordinates":[1.0,2.0]}"#);
///
/// let line = seed.deserialize(&mut deserializer).unwrap();
/// assert!(line.is_empty());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GeometrySeed<'a> {
    pub kind: GeometryKind,
    pub settings: &'a SerializerSettings,
}

impl<'a> GeometrySeed<'a> {
    #[must_use]
    pub fn new(kind: GeometryKind, settings: &'a SerializerSettings) -> Self {
        Self { kind, settings }
    }
}

impl<'de> DeserializeSeed<'de> for GeometrySeed<'_> {
    type Value = Geometry;

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = <Value as serde::Deserialize>::deserialize(deserializer)?;
        from_value(&value, self.kind, self.settings).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::Shape;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use serde_json::json;

    fn settings() -> SerializerSettings {
        SerializerSettings::default()
    }

    #[test]
    fn point() -> Result<()> {
        let point = from_str(
            r#"{"type": "Point", "coordinates": [299914.1745, 5031278.5]}"#,
            GeometryKind::Point,
            &settings(),
        )?;
        assert_eq!(point.shape(), &Shape::Point(Vertex::new(299_914.174_5, 5_031_278.5)));
        assert!(!point.z_aware());
        assert!(!point.m_aware());
        Ok(())
    }

    #[test]
    fn point_3d_sets_z_aware() -> Result<()> {
        let point = from_value(
            &json!({"type": "Point", "coordinates": [1.0, 2.0, 3.0]}),
            GeometryKind::Point,
            &settings(),
        )?;
        assert!(point.z_aware());
        assert!(!point.m_aware());
        assert_eq!(point.shape(), &Shape::Point(Vertex::xyz(1.0, 2.0, 3.0)));
        Ok(())
    }

    #[test]
    fn third_value_is_m_under_xym() -> Result<()> {
        let xym = settings().with_dimensions(Dimensions::Xym);
        let point = from_value(
            &json!({"type": "Point", "coordinates": [1.0, 2.0, 3.0]}),
            GeometryKind::Point,
            &xym,
        )?;
        assert!(!point.z_aware());
        assert!(point.m_aware());
        assert_eq!(point.shape(), &Shape::Point(Vertex::new(1.0, 2.0).with_m(3.0)));
        Ok(())
    }

    #[test]
    fn four_values() -> Result<()> {
        let point = from_value(
            &json!({"type": "Point", "coordinates": [1.0, 2.0, 3.0, 4.0]}),
            GeometryKind::Point,
            &settings(),
        )?;
        assert!(point.z_aware() && point.m_aware());
        Ok(())
    }

    #[test]
    fn point_as_polyline() -> Result<()> {
        let line = from_str(
            r#"{"type": "Point", "coordinates": [-73.25, 45.5]}"#,
            GeometryKind::Polyline,
            &settings(),
        )?;
        assert_eq!(line.kind(), GeometryKind::Polyline);
        assert_eq!(line.vertex_count(), 1);
        let vertex = line.vertices().next().unwrap();
        assert_relative_eq!(vertex.x, -73.25);
        assert_relative_eq!(vertex.y, 45.5);
        Ok(())
    }

    #[test]
    fn point_as_polyline_simplified_is_empty() -> Result<()> {
        let line = from_str(
            r#"{"type": "Point", "coordinates": [-73.25, 45.5]}"#,
            GeometryKind::Polyline,
            &settings().with_simplify(true),
        )?;
        assert!(line.is_empty());
        assert_eq!(line.kind(), GeometryKind::Polyline);
        Ok(())
    }

    #[rstest]
    #[case(json!({"type": "Point", "coordinates": [1.0, 2.0]}), GeometryKind::MultiPoint, 1)]
    #[case(json!({"type": "LineString", "coordinates": [[1.0, 2.0], [3.0, 4.0]]}), GeometryKind::MultiPoint, 2)]
    #[case(json!({"type": "MultiPoint", "coordinates": [[1.0, 2.0], [3.0, 4.0]]}), GeometryKind::Polyline, 2)]
    #[case(json!({"type": "LineString", "coordinates": [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0]]}), GeometryKind::Polygon, 3)]
    #[case(json!({"type": "Point", "coordinates": [1.0, 2.0]}), GeometryKind::Polygon, 1)]
    fn coercions(#[case] document: Value, #[case] kind: GeometryKind, #[case] vertices: usize) {
        let geometry = from_value(&document, kind, &settings()).unwrap();
        assert_eq!(geometry.kind(), kind);
        assert_eq!(geometry.vertex_count(), vertices);
    }

    #[rstest]
    #[case(json!({"type": "LineString", "coordinates": [[1.0, 2.0], [3.0, 4.0]]}), GeometryKind::Point)]
    #[case(json!({"type": "MultiPoint", "coordinates": [[1.0, 2.0]]}), GeometryKind::Point)]
    #[case(json!({"type": "Polygon", "coordinates": [[[1.0, 2.0]]]}), GeometryKind::Polyline)]
    #[case(json!({"type": "Polygon", "coordinates": [[[1.0, 2.0]]]}), GeometryKind::MultiPoint)]
    fn incompatible_targets(#[case] document: Value, #[case] kind: GeometryKind) {
        assert!(matches!(
            from_value(&document, kind, &settings()),
            Err(Error::Schema { .. })
        ));
    }

    #[rstest]
    #[case(json!({"type": "Point", "coordinates": [1.0]}))]
    #[case(json!({"type": "Point", "coordinates": [1.0, 2.0, 3.0, 4.0, 5.0]}))]
    #[case(json!({"type": "Point", "coordinates": [[1.0, 2.0]]}))]
    #[case(json!({"type": "Point", "coordinates": 1.0}))]
    #[case(json!({"type": "LineString", "coordinates": [1.0, 2.0]}))]
    #[case(json!({"type": "Polygon", "coordinates": [[1.0, 2.0]]}))]
    fn wrong_nesting(#[case] document: Value) {
        assert!(matches!(
            from_value(&document, GeometryKind::Polygon, &settings()),
            Err(Error::Schema { .. })
        ));
    }

    #[test]
    fn non_numeric_coordinate() {
        let err = from_str(
            r#"{"type":"Point","coordinates":["abc", 1]}"#,
            GeometryKind::Point,
            &settings(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Format { ref value, .. } if value == "'abc'"));
    }

    #[test]
    fn numeric_string_coordinate() -> Result<()> {
        let point = from_str(
            r#"{"type":"Point","coordinates":["1.5", 1]}"#,
            GeometryKind::Point,
            &settings(),
        )?;
        assert_eq!(point.shape(), &Shape::Point(Vertex::new(1.5, 1.0)));
        Ok(())
    }

    #[test]
    fn unknown_type() {
        assert!(matches!(
            from_str(
                r#"{"type":"Circle","coordinates":[1, 1]}"#,
                GeometryKind::Point,
                &settings()
            ),
            Err(Error::UnsupportedType(_))
        ));
    }

    #[test]
    fn invalid_json() {
        assert!(matches!(
            from_str("{\"type\":", GeometryKind::Point, &settings()),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn null_is_empty() -> Result<()> {
        for kind in GeometryKind::ALL {
            let geometry = from_str("null", kind, &settings())?;
            assert!(geometry.is_empty());
            assert_eq!(geometry.kind(), kind);
        }
        Ok(())
    }

    #[test]
    fn polygon_rings() -> Result<()> {
        let polygon = from_slice(
            br#"{"type":"Polygon","coordinates":[[[0,0],[0,10],[10,10],[0,0]],[[1,1],[1,2],[2,2],[1,1]]]}"#,
            GeometryKind::Polygon,
            &settings(),
        )?;
        let Shape::Polygon(rings) = polygon.shape() else {
            panic!("Expected Polygon shape");
        };
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[1][2], Vertex::new(2.0, 2.0));
        Ok(())
    }

    #[test]
    fn mixed_dimensions_leave_missing_z_absent() -> Result<()> {
        let line = from_value(
            &json!({"type": "LineString", "coordinates": [[1.0, 2.0, 3.0], [4.0, 5.0]]}),
            GeometryKind::Polyline,
            &settings(),
        )?;
        assert!(line.z_aware());
        let vertices: Vec<_> = line.vertices().collect();
        assert_relative_eq!(vertices[0].z, 3.0);
        assert!(vertices[1].z.is_nan());
        Ok(())
    }

    #[test]
    fn seed_inside_a_struct() {
        use serde::de::{MapAccess, Visitor};

        struct Feature {
            name: String,
            geometry: Geometry,
        }

        struct FeatureVisitor<'a>(&'a SerializerSettings);

        impl<'de> Visitor<'de> for FeatureVisitor<'_> {
            type Value = Feature;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a feature")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Feature, A::Error> {
                let mut name = None;
                let mut geometry = None;
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "name" => name = Some(map.next_value()?),
                        "geometry" => {
                            geometry = Some(
                                map.next_value_seed(GeometrySeed::new(
                                    GeometryKind::MultiPoint,
                                    self.0,
                                ))?,
                            );
                        }
                        _ => {
                            map.next_value::<serde::de::IgnoredAny>()?;
                        }
                    }
                }
                Ok(Feature {
                    name: name.ok_or_else(|| serde::de::Error::missing_field("name"))?,
                    geometry: geometry
                        .ok_or_else(|| serde::de::Error::missing_field("geometry"))?,
                })
            }
        }

        let settings = settings();
        let mut deserializer = serde_json::Deserializer::from_str(
            r#"{"name": "stops", "geometry": {"type": "LineString", "coordinates": [[1, 2], [3, 4]]}}"#,
        );
        let feature = (&mut deserializer)
            .deserialize_map(FeatureVisitor(&settings))
            .unwrap();
        assert_eq!(feature.name, "stops");
        assert_eq!(feature.geometry.kind(), GeometryKind::MultiPoint);
        assert_eq!(feature.geometry.vertex_count(), 2);
    }
}
