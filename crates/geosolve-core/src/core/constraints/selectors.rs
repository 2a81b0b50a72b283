use super::error::ConstraintError;
use crate::core::geometry::Cuboid;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl FromStr for Axis {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            _ => Err(ConstraintError::UnknownSelector {
                selector: "axis",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which point of a box is read along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    BoundingMin,
    BoundingMax,
    Center,
}

impl Anchor {
    pub fn as_str(self) -> &'static str {
        match self {
            Anchor::BoundingMin => "bounding_min",
            Anchor::BoundingMax => "bounding_max",
            Anchor::Center => "center",
        }
    }

    /// Coordinate of the anchor point of `cuboid` along `axis`.
    pub fn value(self, cuboid: &Cuboid, axis: Axis) -> f64 {
        match self {
            Anchor::Center => cuboid.loc[axis.index()],
            Anchor::BoundingMin => cuboid.bounding_interval()[axis.index()].min,
            Anchor::BoundingMax => cuboid.bounding_interval()[axis.index()].max,
        }
    }
}

impl FromStr for Anchor {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bounding_min" => Ok(Anchor::BoundingMin),
            "bounding_max" => Ok(Anchor::BoundingMax),
            "center" => Ok(Anchor::Center),
            _ => Err(ConstraintError::UnknownSelector {
                selector: "anchor",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A world-frame direction in the horizontal plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Front,
    Back,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Front => "front",
            Direction::Back => "back",
        }
    }

    /// Unit reference vector: left is -x, right is +x, front is -y, back is +y.
    pub fn reference(self) -> Vector2<f64> {
        match self {
            Direction::Left => Vector2::new(-1.0, 0.0),
            Direction::Right => Vector2::new(1.0, 0.0),
            Direction::Front => Vector2::new(0.0, -1.0),
            Direction::Back => Vector2::new(0.0, 1.0),
        }
    }
}

impl FromStr for Direction {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            "front" => Ok(Direction::Front),
            "back" => Ok(Direction::Back),
            _ => Err(ConstraintError::UnknownSelector {
                selector: "direction",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-axis target values; an unset axis is ignored when scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AxisTargets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl AxisTargets {
    pub fn all(value: f64) -> Self {
        Self {
            x: Some(value),
            y: Some(value),
            z: Some(value),
        }
    }

    pub fn get(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Iterates over the axes that carry a target.
    pub fn iter(&self) -> impl Iterator<Item = (Axis, f64)> + '_ {
        Axis::ALL
            .into_iter()
            .filter_map(|axis| self.get(axis).map(|value| (axis, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl fmt::Display for AxisTargets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: Option<f64>| v.map_or_else(|| "_".to_string(), |v| v.to_string());
        write!(f, "({}, {}, {})", show(self.x), show(self.y), show(self.z))
    }
}
