//! Writer/reader pairs keyed by geometry kind.
//!
//! [`ConverterRegistry::new`] knows the four built-in kinds. Additional
//! converters are added with [`ConverterRegistry::register`] without touching
//! the existing ones.
//!
//! ```rust
//! use serde_geojson_geom::{geometry::{Geometry, Vertex}, registry::ConverterRegistry, settings::SerializerSettings};
//!
//! let registry = ConverterRegistry::new();
//! let settings = SerializerSettings::default();
//!
//! let converter = registry.for_type("LineString").unwrap();
//! let line = Geometry::polyline(vec![Vertex::new(1.0, 2.0), Vertex::new(3.0, 4.0)]);
//! let document = converter.write(&line, &settings).unwrap();
//!
//! assert_eq!(converter.read(document.as_ref(), &settings).unwrap(), line);
//! ```
use hashbrown::HashMap;

use crate::{
    de,
    document::Document,
    error::{Error, Result},
    geometry::{Geometry, GeometryKind},
    ser,
    settings::SerializerSettings,
};

pub trait GeometryConverter: Send + Sync {
    fn kind(&self) -> GeometryKind;

    /// Writes a geometry of this converter's kind; `None` is the no-value document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] for a geometry of another kind.
    fn write(&self, geometry: &Geometry, settings: &SerializerSettings)
        -> Result<Option<Document>>;

    /// Reads a document into a geometry of this converter's kind.
    ///
    /// # Errors
    ///
    /// See [`de::read`].
    fn read(&self, document: Option<&Document>, settings: &SerializerSettings) -> Result<Geometry>;
}

/// Converter for one of the built-in kinds, delegating to [`ser`] and [`de`].
#[derive(Debug, Clone, Copy)]
pub struct NativeConverter(pub GeometryKind);

impl GeometryConverter for NativeConverter {
    fn kind(&self) -> GeometryKind {
        self.0
    }

    fn write(
        &self,
        geometry: &Geometry,
        settings: &SerializerSettings,
    ) -> Result<Option<Document>> {
        if geometry.kind() != self.0 {
            return Err(Error::schema(
                format!("a {} geometry", self.0),
                geometry.kind().to_string(),
            ));
        }
        Ok(ser::write(geometry, settings))
    }

    fn read(&self, document: Option<&Document>, settings: &SerializerSettings) -> Result<Geometry> {
        de::read(document, self.0, settings)
    }
}

pub struct ConverterRegistry {
    converters: HashMap<GeometryKind, Box<dyn GeometryConverter>>,
}

impl ConverterRegistry {
    /// A registry holding the built-in converters.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for kind in GeometryKind::ALL {
            registry.register(Box::new(NativeConverter(kind)));
        }
        registry
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// Adds a converter, returning the one it replaces for the same kind.
    pub fn register(
        &mut self,
        converter: Box<dyn GeometryConverter>,
    ) -> Option<Box<dyn GeometryConverter>> {
        self.converters.insert(converter.kind(), converter)
    }

    #[must_use]
    pub fn get(&self, kind: GeometryKind) -> Option<&dyn GeometryConverter> {
        self.converters.get(&kind).map(|converter| &**converter)
    }

    /// Looks up the converter for a native name or GeoJSON tag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedType`] if the tag is unknown or has no converter.
    pub fn for_type(&self, tag: &str) -> Result<&dyn GeometryConverter> {
        tag.parse::<GeometryKind>()
            .ok()
            .and_then(|kind| self.get(kind))
            .ok_or_else(|| Error::UnsupportedType(tag.to_string()))
    }

    /// Writes `geometry` with the converter registered for its kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedType`] if no converter is registered.
    pub fn write(
        &self,
        geometry: &Geometry,
        settings: &SerializerSettings,
    ) -> Result<Option<Document>> {
        self.converter(geometry.kind())?.write(geometry, settings)
    }

    /// Reads `document` with the converter registered for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedType`] if no converter is registered, otherwise
    /// see [`de::read`].
    pub fn read(
        &self,
        document: Option<&Document>,
        kind: GeometryKind,
        settings: &SerializerSettings,
    ) -> Result<Geometry> {
        self.converter(kind)?.read(document, settings)
    }

    fn converter(&self, kind: GeometryKind) -> Result<&dyn GeometryConverter> {
        self.get(kind)
            .ok_or_else(|| Error::UnsupportedType(kind.to_string()))
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
