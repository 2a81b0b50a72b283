use super::planar::RotatedRect;
use super::rotation::rotation_from_euler;
use nalgebra::{Point2, Point3, Vector2, Vector3};
use thiserror::Error;

/// Number of decision variables a cuboid contributes to the optimizer:
/// three location components followed by three rotation components.
pub const OPTIMIZABLE_WIDTH: usize = 6;

/// Unit-cube corner signs, x varying slowest and z fastest.
const CORNER_SIGNS: [[f64; 3]; 8] = [
    [-0.5, -0.5, -0.5],
    [-0.5, -0.5, 0.5],
    [-0.5, 0.5, -0.5],
    [-0.5, 0.5, 0.5],
    [0.5, -0.5, -0.5],
    [0.5, -0.5, 0.5],
    [0.5, 0.5, -0.5],
    [0.5, 0.5, 0.5],
];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Scale component {axis} of '{name}' must be strictly positive and finite, got {value}")]
    InvalidScale {
        name: String,
        axis: usize,
        value: f64,
    },
    #[error("Field '{field}' of '{name}' contains a non-finite value")]
    NonFinite { name: String, field: &'static str },
    #[error("Optimizable vector for '{name}' must have {expected} components, got {actual}")]
    VectorLength {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// Closed interval `[min, max]` along one world axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Overlap of two intervals as used by the axis-aligned separation penalty.
    ///
    /// Zero when either "far minus near" margin is non-positive, otherwise the
    /// smaller margin. Nested intervals are scored like partial overlaps.
    pub fn overlap(&self, other: &Interval) -> f64 {
        let margin_a = self.max - other.min;
        let margin_b = other.max - self.min;
        if margin_a <= 0.0 || margin_b <= 0.0 {
            0.0
        } else {
            margin_a.min(margin_b)
        }
    }
}

/// An oriented box.
///
/// `loc` is the world-space center, `rot` holds intrinsic X-Y-Z Euler angles in
/// degrees and `scale` the full extents along the local axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Cuboid {
    pub name: String,
    pub loc: Vector3<f64>,
    pub rot: Vector3<f64>,
    scale: Vector3<f64>,
}

impl Cuboid {
    /// Creates a cuboid, validating that every scale component is positive.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] if `scale` has a non-positive or non-finite
    /// component, or if `loc`/`rot` contain non-finite values.
    pub fn new(
        loc: impl Into<Vector3<f64>>,
        rot: impl Into<Vector3<f64>>,
        scale: impl Into<Vector3<f64>>,
        name: impl Into<String>,
    ) -> Result<Self, GeometryError> {
        let name = name.into();
        let (loc, rot, scale) = (loc.into(), rot.into(), scale.into());

        if loc.iter().any(|v| !v.is_finite()) {
            return Err(GeometryError::NonFinite { name, field: "loc" });
        }
        if rot.iter().any(|v| !v.is_finite()) {
            return Err(GeometryError::NonFinite { name, field: "rot" });
        }
        if let Some((axis, &value)) = scale
            .iter()
            .enumerate()
            .find(|(_, v)| !(v.is_finite() && **v > 0.0))
        {
            return Err(GeometryError::InvalidScale { name, axis, value });
        }

        Ok(Self {
            name,
            loc,
            rot,
            scale,
        })
    }

    pub fn scale(&self) -> &Vector3<f64> {
        &self.scale
    }

    /// Returns the eight world-space corners in a fixed order.
    ///
    /// Local corners enumerate the sign combinations with x varying slowest
    /// and z fastest; indices `0, 2, 6, 4` trace the bottom face.
    pub fn corners(&self) -> [Point3<f64>; 8] {
        let rotation = rotation_from_euler(&self.rot);
        CORNER_SIGNS.map(|signs| {
            let local = Vector3::from(signs).component_mul(&self.scale);
            Point3::from(self.loc + rotation * local)
        })
    }

    /// Per-axis extrema over the corners.
    ///
    /// Tight for axis-aligned and right-angle rotations, an over-approximation
    /// for anything else.
    pub fn bounding_interval(&self) -> [Interval; 3] {
        let corners = self.corners();
        std::array::from_fn(|axis| {
            corners.iter().fold(
                Interval {
                    min: f64::INFINITY,
                    max: f64::NEG_INFINITY,
                },
                |acc, corner| Interval {
                    min: acc.min.min(corner[axis]),
                    max: acc.max.max(corner[axis]),
                },
            )
        })
    }

    /// Footprint in the horizontal plane.
    pub fn planar_projection(&self) -> RotatedRect {
        RotatedRect::new(
            Point2::new(self.loc.x, self.loc.y),
            self.scale.x,
            self.scale.y,
            self.rot.z,
        )
    }

    /// Unit heading in the plane: the local +x axis turned by the z rotation.
    pub fn heading(&self) -> Vector2<f64> {
        let angle = self.rot.z.to_radians();
        Vector2::new(angle.cos(), angle.sin())
    }

    pub fn optimizable_vector(&self) -> [f64; OPTIMIZABLE_WIDTH] {
        [
            self.loc.x, self.loc.y, self.loc.z, self.rot.x, self.rot.y, self.rot.z,
        ]
    }

    /// Overwrites location and rotation from a slice laid out like
    /// [`Cuboid::optimizable_vector`].
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::VectorLength`] if the slice length differs from
    /// [`OPTIMIZABLE_WIDTH`], or [`GeometryError::NonFinite`] if any value is NaN
    /// or infinite. The cuboid is left untouched on error.
    pub fn apply_optimizable_vector(&mut self, values: &[f64]) -> Result<(), GeometryError> {
        if values.len() != OPTIMIZABLE_WIDTH {
            return Err(GeometryError::VectorLength {
                name: self.name.clone(),
                expected: OPTIMIZABLE_WIDTH,
                actual: values.len(),
            });
        }
        let (loc, rot) = values.split_at(3);
        if loc.iter().any(|v| !v.is_finite()) {
            return Err(GeometryError::NonFinite {
                name: self.name.clone(),
                field: "loc",
            });
        }
        if rot.iter().any(|v| !v.is_finite()) {
            return Err(GeometryError::NonFinite {
                name: self.name.clone(),
                field: "rot",
            });
        }
        self.loc = Vector3::from_column_slice(loc);
        self.rot = Vector3::from_column_slice(rot);
        Ok(())
    }
}

impl std::fmt::Display for Cuboid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
