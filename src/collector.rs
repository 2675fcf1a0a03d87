//! A collector building native geometries from geozero sources.
//!
//! [`GeometryCollector`] implements the geozero processor traits, so any
//! geozero reader (`GeoJSON`, WKT, `FlatGeobuf`, ...) can feed it. Z and M
//! values are requested from the source and set the awareness flags of the
//! collected geometry when present.
//!
//! # Example
//!
//! ```rust
//! use geozero::wkt::Wkt;
//! use serde_geojson_geom::{collector::from_geozero, geometry::GeometryKind, settings::SerializerSettings};
//!
//! let line = from_geozero(&Wkt("LINESTRING Z (1 2 3, 4 5 6)"), &SerializerSettings::default()).unwrap();
//!
//! assert_eq!(line.kind(), GeometryKind::Polyline);
//! assert!(line.z_aware());
//! ```
use std::mem;

use geozero::{
    error::GeozeroError, CoordDimensions, FeatureProcessor, GeomProcessor, GeozeroDatasource,
    GeozeroGeometry, PropertyProcessor,
};

use crate::{
    error::{Error, Result},
    geometry::{Geometry, GeometryKind, Vertex},
    settings::SerializerSettings,
};

#[derive(Default)]
pub struct GeometryCollector {
    pub geometries: Vec<Geometry>,

    current_kind: Option<GeometryKind>,
    current_path: Vec<Vertex>,
    current_rings: Vec<Vec<Vertex>>,
    z_seen: bool,
    m_seen: bool,
}

impl GeometryCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn begin(&mut self, kind: GeometryKind) -> geozero::error::Result<()> {
        if let Some(current) = self.current_kind {
            return Err(GeozeroError::Geometry(format!(
                "{kind} nested in {current} is not supported"
            )));
        }
        self.current_kind = Some(kind);
        self.current_path.clear();
        self.current_rings.clear();
        self.z_seen = false;
        self.m_seen = false;
        Ok(())
    }

    fn finish(&mut self) {
        let Some(kind) = self.current_kind.take() else {
            return;
        };
        let path = mem::take(&mut self.current_path);
        let geometry = match kind {
            GeometryKind::Point => path
                .into_iter()
                .next()
                .map_or_else(|| Geometry::empty(kind), Geometry::point),
            GeometryKind::Polyline => Geometry::polyline(path),
            GeometryKind::MultiPoint => Geometry::multipoint(path),
            GeometryKind::Polygon => Geometry::polygon(mem::take(&mut self.current_rings)),
        };
        self.geometries.push(
            geometry
                .with_z_aware(self.z_seen)
                .with_m_aware(self.m_seen),
        );
    }

    fn unsupported(name: &str) -> geozero::error::Result<()> {
        Err(GeozeroError::Geometry(format!("{name} is not supported")))
    }
}

impl PropertyProcessor for GeometryCollector {}

impl FeatureProcessor for GeometryCollector {}

impl GeomProcessor for GeometryCollector {
    fn dimensions(&self) -> CoordDimensions {
        CoordDimensions::xyzm()
    }

    fn multi_dim(&self) -> bool {
        true
    }

    fn xy(&mut self, x: f64, y: f64, _idx: usize) -> geozero::error::Result<()> {
        self.current_path.push(Vertex::new(x, y));
        Ok(())
    }

    fn coordinate(
        &mut self,
        x: f64,
        y: f64,
        z: Option<f64>,
        m: Option<f64>,
        _t: Option<f64>,
        _tm: Option<u64>,
        _idx: usize,
    ) -> geozero::error::Result<()> {
        let mut vertex = Vertex::new(x, y);
        if let Some(z) = z {
            self.z_seen = true;
            vertex = vertex.with_z(z);
        }
        if let Some(m) = m {
            self.m_seen = true;
            vertex = vertex.with_m(m);
        }
        self.current_path.push(vertex);
        Ok(())
    }

    fn empty_point(&mut self, _idx: usize) -> geozero::error::Result<()> {
        if self.current_kind.is_none() {
            self.geometries.push(Geometry::empty(GeometryKind::Point));
            Ok(())
        } else {
            Self::unsupported("An empty point inside another geometry")
        }
    }

    fn point_begin(&mut self, _idx: usize) -> geozero::error::Result<()> {
        self.begin(GeometryKind::Point)
    }

    fn point_end(&mut self, _idx: usize) -> geozero::error::Result<()> {
        self.finish();
        Ok(())
    }

    fn multipoint_begin(&mut self, _size: usize, _idx: usize) -> geozero::error::Result<()> {
        self.begin(GeometryKind::MultiPoint)
    }

    fn multipoint_end(&mut self, _idx: usize) -> geozero::error::Result<()> {
        self.finish();
        Ok(())
    }

    fn linestring_begin(
        &mut self,
        tagged: bool,
        _size: usize,
        _idx: usize,
    ) -> geozero::error::Result<()> {
        if tagged {
            self.begin(GeometryKind::Polyline)
        } else if self.current_kind == Some(GeometryKind::Polygon) {
            self.current_path.clear();
            Ok(())
        } else {
            Self::unsupported("A linestring outside a polygon")
        }
    }

    fn linestring_end(&mut self, tagged: bool, _idx: usize) -> geozero::error::Result<()> {
        if tagged {
            self.finish();
        } else {
            let ring = mem::take(&mut self.current_path);
            self.current_rings.push(ring);
        }
        Ok(())
    }

    fn polygon_begin(
        &mut self,
        tagged: bool,
        _size: usize,
        _idx: usize,
    ) -> geozero::error::Result<()> {
        if !tagged {
            return Self::unsupported("A polygon inside a multipolygon");
        }
        self.begin(GeometryKind::Polygon)
    }

    fn polygon_end(&mut self, _tagged: bool, _idx: usize) -> geozero::error::Result<()> {
        self.finish();
        Ok(())
    }

    fn multilinestring_begin(&mut self, _size: usize, _idx: usize) -> geozero::error::Result<()> {
        Self::unsupported("MultiLineString")
    }

    fn multipolygon_begin(&mut self, _size: usize, _idx: usize) -> geozero::error::Result<()> {
        Self::unsupported("MultiPolygon")
    }

    fn geometrycollection_begin(&mut self, _size: usize, _idx: usize) -> geozero::error::Result<()> {
        Self::unsupported("GeometryCollection")
    }

    fn circularstring_begin(&mut self, _size: usize, _idx: usize) -> geozero::error::Result<()> {
        Self::unsupported("CircularString")
    }

    fn compoundcurve_begin(&mut self, _size: usize, _idx: usize) -> geozero::error::Result<()> {
        Self::unsupported("CompoundCurve")
    }

    fn curvepolygon_begin(&mut self, _size: usize, _idx: usize) -> geozero::error::Result<()> {
        Self::unsupported("CurvePolygon")
    }

    fn multicurve_begin(&mut self, _size: usize, _idx: usize) -> geozero::error::Result<()> {
        Self::unsupported("MultiCurve")
    }

    fn multisurface_begin(&mut self, _size: usize, _idx: usize) -> geozero::error::Result<()> {
        Self::unsupported("MultiSurface")
    }

    fn triangle_begin(
        &mut self,
        _tagged: bool,
        _size: usize,
        _idx: usize,
    ) -> geozero::error::Result<()> {
        Self::unsupported("Triangle")
    }

    fn polyhedralsurface_begin(&mut self, _size: usize, _idx: usize) -> geozero::error::Result<()> {
        Self::unsupported("PolyhedralSurface")
    }

    fn tin_begin(&mut self, _size: usize, _idx: usize) -> geozero::error::Result<()> {
        Self::unsupported("Tin")
    }
}

fn finalize(geometry: Geometry, settings: &SerializerSettings) -> Geometry {
    if settings.simplify {
        geometry.simplify()
    } else {
        geometry
    }
}

/// Reads a single geometry from any geozero geometry source.
///
/// # Errors
///
/// Returns [`Error::Geozero`] if the source fails or holds an unsupported
/// geometry type.
pub fn from_geozero(
    source: &impl GeozeroGeometry,
    settings: &SerializerSettings,
) -> Result<Geometry> {
    let mut collector = GeometryCollector::new();
    source.process_geom(&mut collector)?;
    collector
        .geometries
        .pop()
        .map(|geometry| finalize(geometry, settings))
        .ok_or_else(|| Error::Message("The source produced no geometry".to_string()))
}

/// Reads the geometry of every feature of a geozero datasource.
///
/// # Errors
///
/// Returns [`Error::Geozero`] if the datasource processing fails or a feature
/// holds an unsupported geometry type.
pub fn from_datasource<S: GeozeroDatasource>(
    source: &mut S,
    settings: &SerializerSettings,
) -> Result<Vec<Geometry>> {
    let mut collector = GeometryCollector::new();
    source.process(&mut collector)?;
    Ok(collector
        .geometries
        .into_iter()
        .map(|geometry| finalize(geometry, settings))
        .collect())
}
