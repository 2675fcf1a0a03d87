//! Axis selection for the writer.
//!
//! Which of Z and M appear in the output is decided from the configured
//! [`Dimensions`] and the geometry's awareness flags only, never from the stored
//! values. A missing value on an emitted axis is replaced by the configured
//! default. X and Y have no default: a vertex without them, or with any infinite
//! emitted value, makes the whole geometry resolve to no-value.
use std::fmt::Display;

use crate::{
    geometry::{Awareness, Geometry, Vertex},
    settings::{Dimensions, SerializerSettings},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
    M,
}

impl Axis {
    #[must_use]
    pub fn label(self) -> char {
        match self {
            Self::X => 'X',
            Self::Y => 'Y',
            Self::Z => 'Z',
            Self::M => 'M',
        }
    }
}

impl Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisValue {
    pub axis: Axis,
    pub value: f64,
}

/// Per-call axis rules, built from the settings and an awareness snapshot.
#[derive(Debug, Clone, Copy)]
pub struct DimensionPolicy {
    dimensions: Dimensions,
    default_z_value: f64,
    default_m_value: f64,
    awareness: Awareness,
}

impl DimensionPolicy {
    #[must_use]
    pub fn new(settings: &SerializerSettings, awareness: Awareness) -> Self {
        Self {
            dimensions: settings.dimensions,
            default_z_value: settings.default_z_value,
            default_m_value: settings.default_m_value,
            awareness,
        }
    }

    /// Z is written for Z-aware geometries, and under XYZM also whenever M is,
    /// so that a third value is never a measure.
    #[must_use]
    pub fn emits_z(&self) -> bool {
        self.dimensions.has_z()
            && (self.awareness.z || (self.dimensions == Dimensions::Xyzm && self.emits_m()))
    }

    #[must_use]
    pub fn emits_m(&self) -> bool {
        self.dimensions.has_m() && self.awareness.m
    }

    /// The axes written for one vertex, in X, Y, Z, M order.
    ///
    /// Returns `None` when the vertex cannot be written.
    #[must_use]
    pub fn axes(&self, vertex: &Vertex) -> Option<Vec<AxisValue>> {
        if vertex.x.is_nan() || vertex.y.is_nan() {
            return None;
        }

        let mut axes = vec![
            AxisValue {
                axis: Axis::X,
                value: vertex.x,
            },
            AxisValue {
                axis: Axis::Y,
                value: vertex.y,
            },
        ];
        if self.emits_z() {
            axes.push(AxisValue {
                axis: Axis::Z,
                value: if self.awareness.z {
                    or_default(vertex.z, self.default_z_value)
                } else {
                    self.default_z_value
                },
            });
        }
        if self.emits_m() {
            axes.push(AxisValue {
                axis: Axis::M,
                value: or_default(vertex.m, self.default_m_value),
            });
        }

        axes.iter().all(|axis| axis.value.is_finite()).then_some(axes)
    }
}

fn or_default(value: f64, default: f64) -> f64 {
    if value.is_nan() {
        default
    } else {
        value
    }
}

/// Selects the axes of every vertex of `geometry`, flattened in vertex order.
///
/// An empty result means the geometry must be written as no-value: it is empty,
/// or at least one vertex failed the policy.
#[must_use]
pub fn select_axes(settings: &SerializerSettings, geometry: &Geometry) -> Vec<Vec<AxisValue>> {
    if geometry.is_empty() {
        return Vec::new();
    }

    let policy = DimensionPolicy::new(settings, geometry.awareness());
    let selected: Option<Vec<_>> = geometry
        .vertices()
        .map(|vertex| policy.axes(vertex))
        .collect();

    match selected {
        Some(selected) if !selected.is_empty() => selected,
        _ => {
            log::debug!(
                "{} has a non-finite emitted axis value, writing no-value",
                geometry.kind()
            );
            Vec::new()
        }
    }
}
