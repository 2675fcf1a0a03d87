//! Native geometry model.
//!
//! A [`Geometry`] carries its vertices together with an explicit emptiness
//! flag and two axis-awareness flags. Coordinates use `NaN` to mean "no value
//! stored for this axis", which is independent from whether the axis is
//! logically present on the geometry.
//!
//! ```rust
//! use serde_geojson_geom::geometry::{Geometry, GeometryKind, Vertex};
//!
//! let line = Geometry::polyline(vec![Vertex::new(0.0, 0.0), Vertex::new(1.0, 1.0)])
//!     .with_z_aware(true);
//!
//! assert_eq!(line.kind(), GeometryKind::Polyline);
//! assert!(line.awareness().z);
//! assert!(!line.is_empty());
//! ```
use std::{fmt::Display, str::FromStr};

use geo::Area;
use geozero::{error::GeozeroError, CoordDimensions, GeomProcessor, GeozeroGeometry, ToGeo};

use crate::error::{Error, Result};

/// A single coordinate tuple; `NaN` marks an axis value as absent.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub m: f64,
}

impl Vertex {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: f64::NAN,
            m: f64::NAN,
        }
    }

    #[must_use]
    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y).with_z(z)
    }

    #[must_use]
    pub fn with_z(self, z: f64) -> Self {
        Self { z, ..self }
    }

    #[must_use]
    pub fn with_m(self, m: f64) -> Self {
        Self { m, ..self }
    }

    fn same_xy(&self, other: &Vertex) -> bool {
        same_value(self.x, other.x) && same_value(self.y, other.y)
    }
}

fn same_value(a: f64, b: f64) -> bool {
    #[allow(clippy::float_cmp)]
    let equal = a == b;
    equal || (a.is_nan() && b.is_nan())
}

/// Two vertices are equal when every axis holds the same value or is absent on both.
impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.same_xy(other) && same_value(self.z, other.z) && same_value(self.m, other.m)
    }
}

/// Closed set of geometry variants known to the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    Polyline,
    Polygon,
    MultiPoint,
}

impl GeometryKind {
    pub const ALL: [GeometryKind; 4] = [
        GeometryKind::Point,
        GeometryKind::Polyline,
        GeometryKind::Polygon,
        GeometryKind::MultiPoint,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::Polyline => "Polyline",
            Self::Polygon => "Polygon",
            Self::MultiPoint => "MultiPoint",
        }
    }
}

impl Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts native names as well as GeoJSON type tags, ignoring case.
impl FromStr for GeometryKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "point" => Ok(Self::Point),
            "polyline" | "linestring" => Ok(Self::Polyline),
            "polygon" => Ok(Self::Polygon),
            "multipoint" => Ok(Self::MultiPoint),
            _ => Err(Error::UnsupportedType(value.to_string())),
        }
    }
}

/// Awareness flags captured from a geometry at the start of a conversion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Awareness {
    pub z: bool,
    pub m: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Point(Vertex),
    Polyline(Vec<Vertex>),
    /// Rings, the first one being the exterior.
    Polygon(Vec<Vec<Vertex>>),
    MultiPoint(Vec<Vertex>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    shape: Shape,
    empty: bool,
    z_aware: bool,
    m_aware: bool,
}

impl Geometry {
    fn from_shape(shape: Shape) -> Self {
        Self {
            shape,
            empty: false,
            z_aware: false,
            m_aware: false,
        }
    }

    #[must_use]
    pub fn point(vertex: Vertex) -> Self {
        Self::from_shape(Shape::Point(vertex))
    }

    #[must_use]
    pub fn polyline(vertices: Vec<Vertex>) -> Self {
        Self::from_shape(Shape::Polyline(vertices))
    }

    #[must_use]
    pub fn polygon(rings: Vec<Vec<Vertex>>) -> Self {
        Self::from_shape(Shape::Polygon(rings))
    }

    #[must_use]
    pub fn multipoint(vertices: Vec<Vertex>) -> Self {
        Self::from_shape(Shape::MultiPoint(vertices))
    }

    /// An empty geometry of the given variant.
    #[must_use]
    pub fn empty(kind: GeometryKind) -> Self {
        let shape = match kind {
            GeometryKind::Point => Shape::Point(Vertex::new(f64::NAN, f64::NAN)),
            GeometryKind::Polyline => Shape::Polyline(Vec::new()),
            GeometryKind::Polygon => Shape::Polygon(Vec::new()),
            GeometryKind::MultiPoint => Shape::MultiPoint(Vec::new()),
        };
        Self {
            empty: true,
            ..Self::from_shape(shape)
        }
    }

    #[must_use]
    pub fn with_z_aware(mut self, z_aware: bool) -> Self {
        self.z_aware = z_aware;
        self
    }

    #[must_use]
    pub fn with_m_aware(mut self, m_aware: bool) -> Self {
        self.m_aware = m_aware;
        self
    }

    pub fn set_z_aware(&mut self, z_aware: bool) {
        self.z_aware = z_aware;
    }

    pub fn set_m_aware(&mut self, m_aware: bool) {
        self.m_aware = m_aware;
    }

    /// Marks the geometry as empty, dropping its vertices.
    pub fn set_empty(&mut self) {
        *self = Self::empty(self.kind())
            .with_z_aware(self.z_aware)
            .with_m_aware(self.m_aware);
    }

    #[must_use]
    pub fn z_aware(&self) -> bool {
        self.z_aware
    }

    #[must_use]
    pub fn m_aware(&self) -> bool {
        self.m_aware
    }

    #[must_use]
    pub fn awareness(&self) -> Awareness {
        Awareness {
            z: self.z_aware,
            m: self.m_aware,
        }
    }

    #[must_use]
    pub fn kind(&self) -> GeometryKind {
        match self.shape {
            Shape::Point(_) => GeometryKind::Point,
            Shape::Polyline(_) => GeometryKind::Polyline,
            Shape::Polygon(_) => GeometryKind::Polygon,
            Shape::MultiPoint(_) => GeometryKind::MultiPoint,
        }
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Mutable access to the vertices, e.g. to overwrite a coordinate in place.
    pub fn shape_mut(&mut self) -> &mut Shape {
        &mut self.shape
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.empty
            || match &self.shape {
                Shape::Point(_) => false,
                Shape::Polyline(vertices) | Shape::MultiPoint(vertices) => vertices.is_empty(),
                // Interior rings do not count without an exterior.
                Shape::Polygon(rings) => rings.first().map_or(true, Vec::is_empty),
            }
    }

    /// Every vertex of the geometry, rings flattened in order.
    pub fn vertices(&self) -> Box<dyn Iterator<Item = &Vertex> + '_> {
        match &self.shape {
            Shape::Point(vertex) => Box::new(std::iter::once(vertex)),
            Shape::Polyline(vertices) | Shape::MultiPoint(vertices) => Box::new(vertices.iter()),
            Shape::Polygon(rings) => Box::new(rings.iter().flatten()),
        }
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.vertices().count()
        }
    }

    /// Reduces the geometry to a topologically clean equivalent.
    ///
    /// Repeated vertices are removed, and shapes left without extent (a line
    /// with a single distinct vertex, a ring without area) collapse to an empty
    /// geometry of the same variant. Awareness flags are kept.
    #[must_use]
    pub fn simplify(self) -> Self {
        if self.is_empty() {
            return self.into_empty();
        }

        let kind = self.kind();
        let simplified = match self.shape {
            Shape::Point(_) => return self,
            Shape::Polyline(vertices) => {
                let vertices = dedup_consecutive(vertices);
                (vertices.len() >= 2).then_some(Shape::Polyline(vertices))
            }
            Shape::Polygon(rings) => {
                let rings: Vec<_> = rings.into_iter().filter_map(clean_ring).collect();
                (!rings.is_empty()).then_some(Shape::Polygon(rings))
            }
            Shape::MultiPoint(vertices) => {
                let mut unique: Vec<Vertex> = Vec::with_capacity(vertices.len());
                for vertex in vertices {
                    if !unique.iter().any(|kept| kept.same_xy(&vertex)) {
                        unique.push(vertex);
                    }
                }
                Some(Shape::MultiPoint(unique))
            }
        };

        match simplified {
            Some(shape) => Self { shape, ..self },
            None => {
                log::debug!("Simplify reduced a degenerate {kind} to empty");
                Self::empty(kind)
                    .with_z_aware(self.z_aware)
                    .with_m_aware(self.m_aware)
            }
        }
    }

    fn into_empty(self) -> Self {
        Self::empty(self.kind())
            .with_z_aware(self.z_aware)
            .with_m_aware(self.m_aware)
    }

    /// Converts to a [`geo::Geometry`], keeping X and Y only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Geozero`] if the geometry cannot be represented, e.g. an
    /// empty point.
    pub fn to_geo(&self) -> Result<geo::Geometry<f64>> {
        Ok(ToGeo::to_geo(self)?)
    }
}

fn dedup_consecutive(mut vertices: Vec<Vertex>) -> Vec<Vertex> {
    vertices.dedup_by(|current, previous| current.same_xy(previous));
    vertices
}

/// Removes repeated vertices, closes the ring, and drops it when it has no area.
fn clean_ring(ring: Vec<Vertex>) -> Option<Vec<Vertex>> {
    let mut ring = dedup_consecutive(ring);
    let first = *ring.first()?;
    if ring.last().is_some_and(|last| !last.same_xy(&first)) {
        ring.push(first);
    }
    if ring.len() < 4 {
        return None;
    }

    let exterior: geo::LineString<f64> = ring.iter().map(|v| (v.x, v.y)).collect();
    let area = geo::Polygon::new(exterior, vec![]).unsigned_area();
    (area > 0.0).then_some(ring)
}

impl Geometry {
    fn process_vertex<P: GeomProcessor>(
        &self,
        vertex: &Vertex,
        idx: usize,
        processor: &mut P,
    ) -> geozero::error::Result<()> {
        if processor.multi_dim() {
            let z = (self.z_aware && !vertex.z.is_nan()).then_some(vertex.z);
            let m = (self.m_aware && !vertex.m.is_nan()).then_some(vertex.m);
            processor.coordinate(vertex.x, vertex.y, z, m, None, None, idx)
        } else {
            processor.xy(vertex.x, vertex.y, idx)
        }
    }

    fn process_path<P: GeomProcessor>(
        &self,
        vertices: &[Vertex],
        tagged: bool,
        idx: usize,
        processor: &mut P,
    ) -> geozero::error::Result<()> {
        processor.linestring_begin(tagged, vertices.len(), idx)?;
        for (i, vertex) in vertices.iter().enumerate() {
            self.process_vertex(vertex, i, processor)?;
        }
        processor.linestring_end(tagged, idx)
    }
}

impl GeozeroGeometry for Geometry {
    fn process_geom<P: GeomProcessor>(&self, processor: &mut P) -> geozero::error::Result<()> {
        match &self.shape {
            Shape::Point(_) if self.empty => processor.empty_point(0),
            Shape::Point(vertex) => {
                if vertex.x.is_nan() || vertex.y.is_nan() {
                    return Err(GeozeroError::Geometry(
                        "Point without X or Y value".to_string(),
                    ));
                }
                processor.point_begin(0)?;
                self.process_vertex(vertex, 0, processor)?;
                processor.point_end(0)
            }
            Shape::Polyline(vertices) => self.process_path(vertices, true, 0, processor),
            Shape::Polygon(rings) => {
                processor.polygon_begin(true, rings.len(), 0)?;
                for (i, ring) in rings.iter().enumerate() {
                    self.process_path(ring, false, i, processor)?;
                }
                processor.polygon_end(true, 0)
            }
            Shape::MultiPoint(vertices) => {
                processor.multipoint_begin(vertices.len(), 0)?;
                for (i, vertex) in vertices.iter().enumerate() {
                    self.process_vertex(vertex, i, processor)?;
                }
                processor.multipoint_end(0)
            }
        }
    }

    fn dims(&self) -> CoordDimensions {
        CoordDimensions {
            z: self.z_aware,
            m: self.m_aware,
            t: false,
            tm: false,
        }
    }
}
