//! # serde-geojson-geom
//!
//! Converts native geometries to and from `GeoJSON` geometry documents.
//!
//! The native side knows about Z-aware and M-aware geometries and stores
//! missing axis values as `NaN`; `GeoJSON` has neither. The [`settings`] decide
//! which axes are written and what replaces a missing value, and the reader
//! coerces documents into the requested geometry kind.
//!
//! ## Main Components
//!
//! - [`ser::to_string`] / [`ser::write`] - Native geometry to `GeoJSON`
//! - [`de::from_str`] / [`de::read`] - `GeoJSON` to native geometry
//! - [`registry::ConverterRegistry`] - Writer/reader pairs by geometry kind
//! - [`collector::GeometryCollector`] - Native geometries from any geozero source
//! - [`error::Error`] - Custom error types for the library
//!
//! ## Example
//!
//! ```rust
//! use serde_geojson_geom::{
//!     from_str, to_string,
//!     geometry::{Geometry, GeometryKind, Vertex},
//!     settings::{Dimensions, SerializerSettings},
//! };
//!
//! let settings = SerializerSettings::default()
//!     .with_dimensions(Dimensions::Xyz)
//!     .with_default_z(100.0);
//!
//! let point = Geometry::point(Vertex::new(13.4, 52.5)).with_z_aware(true);
//! let geojson = to_string(&point, &settings).unwrap();
//! assert_eq!(geojson, r#"{"type":"Point","coordinates":[13.4,52.5,100.0]}"#);
//!
//! let line = from_str(&geojson, GeometryKind::Polyline, &settings).unwrap();
//! assert_eq!(line.vertex_count(), 1);
//! assert!(line.z_aware());
//!
//! // Empty geometries are written as `null`.
//! assert_eq!(to_string(&Geometry::empty(GeometryKind::Point), &settings).unwrap(), "null");
//! ```
//!
//! ## Modules
//!
//! - [`codec`] - Text form of coordinate values
//! - [`dimension`] - Axis selection for the writer
//! - [`document`] - The `GeoJSON` geometry document
//! - [`geometry`] - The native geometry model
//! - [`settings`] - Serializer settings

pub mod codec;
#[allow(clippy::module_name_repetitions)]
pub mod collector;
pub mod de;
pub mod dimension;
pub mod document;
pub mod error;
pub mod geometry;
pub mod registry;
pub mod ser;
pub mod settings;

pub use de::{from_slice, from_str, from_value, read};
pub use error::{Error, Result};
pub use ser::{to_string, to_string_pretty, to_value, write};
