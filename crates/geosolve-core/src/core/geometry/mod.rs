//! Oriented-box geometry: Euler rotations, box corners and bounds, and the
//! planar footprint used by the horizontal badness formulas.

pub mod cuboid;
pub mod planar;
pub mod rotation;

pub use cuboid::{Cuboid, GeometryError, Interval, OPTIMIZABLE_WIDTH};
pub use planar::RotatedRect;
