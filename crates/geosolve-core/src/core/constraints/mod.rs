//! Soft geometric propositions over boxes and their badness scores.

pub mod arity;
pub mod badness;
pub mod error;
pub mod kind;
pub mod selectors;

pub use arity::Arity;
pub use badness::EPSILON;
pub use error::ConstraintError;
pub use kind::ConstraintKind;
pub use selectors::{Anchor, Axis, AxisTargets, Direction};

use crate::core::geometry::Cuboid;
use crate::core::models::ids::BoxId;
use crate::core::models::scene::Scene;
use std::fmt;

/// A constraint kind bound to an ordered list of boxes.
///
/// Constraints are immutable once built; the arity and the parameter payload
/// are checked by [`Constraint::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    kind: ConstraintKind,
    arguments: Vec<BoxId>,
}

impl Constraint {
    /// # Errors
    ///
    /// Returns [`ConstraintError::Arity`] if the argument count does not fit the
    /// kind, or [`ConstraintError::InvalidParameter`] if its payload is out of
    /// domain.
    pub fn new(kind: ConstraintKind, arguments: Vec<BoxId>) -> Result<Self, ConstraintError> {
        let expected = kind.arity();
        if !expected.accepts(arguments.len()) {
            return Err(ConstraintError::Arity {
                kind: kind.tag(),
                expected,
                actual: arguments.len(),
            });
        }
        kind.validate()?;
        Ok(Self { kind, arguments })
    }

    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    pub fn arguments(&self) -> &[BoxId] {
        &self.arguments
    }

    /// Non-negative badness of the current arrangement; 0 when satisfied.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::UnknownBox`] if an argument is not held by
    /// `scene`.
    pub fn badness(&self, scene: &Scene) -> Result<f64, ConstraintError> {
        let boxes = self.resolve(scene)?;
        Ok(badness::evaluate(&self.kind, &boxes))
    }

    fn resolve<'s>(&self, scene: &'s Scene) -> Result<Vec<&'s Cuboid>, ConstraintError> {
        self.arguments
            .iter()
            .map(|&id| {
                scene.get(id).ok_or(ConstraintError::UnknownBox {
                    kind: self.kind.tag(),
                    id,
                })
            })
            .collect()
    }

    /// Human-readable sentence naming the argument boxes.
    pub fn display<'a>(&'a self, scene: &'a Scene) -> ConstraintDisplay<'a> {
        ConstraintDisplay {
            constraint: self,
            scene,
        }
    }
}

/// Helper returned by [`Constraint::display`].
pub struct ConstraintDisplay<'a> {
    constraint: &'a Constraint,
    scene: &'a Scene,
}

impl ConstraintDisplay<'_> {
    fn name(&self, index: usize) -> &str {
        self.constraint
            .arguments
            .get(index)
            .and_then(|&id| self.scene.get(id))
            .map_or("<missing>", |c| c.name.as_str())
    }

    fn list(&self) -> String {
        let names: Vec<&str> = (0..self.constraint.arguments.len())
            .map(|i| self.name(i))
            .collect();
        match names.split_last() {
            None => String::new(),
            Some((last, [])) => (*last).to_string(),
            Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
        }
    }
}

impl fmt::Display for ConstraintDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b, c) = (self.name(0), self.name(1), self.name(2));
        match &self.constraint.kind {
            ConstraintKind::LocationTarget { target } => write!(f, "{a} is located at {target}"),
            ConstraintKind::RotationTarget { target } => write!(f, "{a} is rotated to {target}"),
            ConstraintKind::Alignment { axis, anchor } => {
                write!(f, "{} are aligned along {axis} at their {anchor}", self.list())
            }
            ConstraintKind::RotationalAlignment { axis } => {
                write!(f, "{} share the same rotation about {axis}", self.list())
            }
            ConstraintKind::TranslationalDifference {
                axis,
                anchor,
                target,
            } => write!(f, "{a} is offset by {target} from {b} along {axis} at their {anchor}"),
            ConstraintKind::RotationalDifference { axis, target } => {
                write!(f, "{a} is rotated {target} degrees from {b} about {axis}")
            }
            ConstraintKind::Distance { target } => write!(f, "{a} is {target} away from {b}"),
            ConstraintKind::PointingTowards { point } => write!(
                f,
                "{a} points towards ({}, {}, {})",
                point.x, point.y, point.z
            ),
            ConstraintKind::Facing => write!(f, "{a} faces {b}"),
            ConstraintKind::PointSymmetry { .. } => {
                write!(f, "{} are arranged symmetrically", self.list())
            }
            ConstraintKind::NoOverlap => write!(f, "{} do not overlap", self.list()),
            ConstraintKind::NoBoundsOverlap => write!(f, "{a} and {b} have disjoint bounds"),
            ConstraintKind::Proximity => write!(f, "{a} is close to {b}"),
            ConstraintKind::Parallel => write!(f, "{a} is parallel to {b}"),
            ConstraintKind::Perpendicular => write!(f, "{a} is perpendicular to {b}"),
            ConstraintKind::Direction { direction } => {
                write!(f, "{b} is on the {direction} of {a}")
            }
            ConstraintKind::Cover => write!(f, "{a} covers {b}"),
            ConstraintKind::Clearance => write!(f, "{a} does not block {b} from {c}"),
            ConstraintKind::Upright => write!(f, "{a} is upright"),
            ConstraintKind::AtOrigin => write!(f, "{a} is at the origin"),
            ConstraintKind::Proximal => write!(f, "{a} is next to {b}"),
            ConstraintKind::SameRotation => write!(f, "{} share the same rotation", self.list()),
            ConstraintKind::TopAligned => write!(f, "{} are aligned at the top", self.list()),
            ConstraintKind::BottomAligned => {
                write!(f, "{} are aligned at the bottom", self.list())
            }
            ConstraintKind::XPlusAligned => {
                write!(f, "{} are aligned at their +x side", self.list())
            }
            ConstraintKind::XMinusAligned => {
                write!(f, "{} are aligned at their -x side", self.list())
            }
            ConstraintKind::YPlusAligned => {
                write!(f, "{} are aligned at their +y side", self.list())
            }
            ConstraintKind::YMinusAligned => {
                write!(f, "{} are aligned at their -y side", self.list())
            }
            ConstraintKind::ParallelX => write!(f, "{a} and {b} share the same rotation about x"),
            ConstraintKind::ParallelY => write!(f, "{a} and {b} share the same rotation about y"),
            ConstraintKind::PerpendicularX => {
                write!(f, "{a} is rotated 90 degrees from {b} about x")
            }
            ConstraintKind::PerpendicularY => {
                write!(f, "{a} is rotated 90 degrees from {b} about y")
            }
            ConstraintKind::MirroredAbout => write!(f, "{a} and {c} mirror each other about {b}"),
            ConstraintKind::BackToBack => write!(f, "{a} and {b} stand back to back"),
        }
    }
}
