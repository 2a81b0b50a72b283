use super::arity::Arity;
use super::error::ConstraintError;
use super::selectors::{Anchor, Axis, AxisTargets, Direction};
use nalgebra::Point3;

/// Every constraint kind together with its parameter payload.
///
/// The first block holds the primitive propositions; the second holds fixed
/// combinations of them.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintKind {
    LocationTarget {
        target: AxisTargets,
    },
    RotationTarget {
        target: AxisTargets,
    },
    Alignment {
        axis: Axis,
        anchor: Anchor,
    },
    RotationalAlignment {
        axis: Axis,
    },
    TranslationalDifference {
        axis: Axis,
        anchor: Anchor,
        target: f64,
    },
    RotationalDifference {
        axis: Axis,
        target: f64,
    },
    Distance {
        target: f64,
    },
    PointingTowards {
        point: Point3<f64>,
    },
    Facing,
    PointSymmetry {
        clamp: bool,
    },
    NoOverlap,
    NoBoundsOverlap,
    Proximity,
    Parallel,
    Perpendicular,
    Direction {
        direction: Direction,
    },
    Cover,
    Clearance,

    Upright,
    AtOrigin,
    Proximal,
    SameRotation,
    TopAligned,
    BottomAligned,
    XPlusAligned,
    XMinusAligned,
    YPlusAligned,
    YMinusAligned,
    ParallelX,
    ParallelY,
    PerpendicularX,
    PerpendicularY,
    MirroredAbout,
    BackToBack,
}

impl ConstraintKind {
    /// Stable identifier, equal to the variant name.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::LocationTarget { .. } => "LocationTarget",
            Self::RotationTarget { .. } => "RotationTarget",
            Self::Alignment { .. } => "Alignment",
            Self::RotationalAlignment { .. } => "RotationalAlignment",
            Self::TranslationalDifference { .. } => "TranslationalDifference",
            Self::RotationalDifference { .. } => "RotationalDifference",
            Self::Distance { .. } => "Distance",
            Self::PointingTowards { .. } => "PointingTowards",
            Self::Facing => "Facing",
            Self::PointSymmetry { .. } => "PointSymmetry",
            Self::NoOverlap => "NoOverlap",
            Self::NoBoundsOverlap => "NoBoundsOverlap",
            Self::Proximity => "Proximity",
            Self::Parallel => "Parallel",
            Self::Perpendicular => "Perpendicular",
            Self::Direction { .. } => "Direction",
            Self::Cover => "Cover",
            Self::Clearance => "Clearance",
            Self::Upright => "Upright",
            Self::AtOrigin => "AtOrigin",
            Self::Proximal => "Proximal",
            Self::SameRotation => "SameRotation",
            Self::TopAligned => "TopAligned",
            Self::BottomAligned => "BottomAligned",
            Self::XPlusAligned => "XPlusAligned",
            Self::XMinusAligned => "XMinusAligned",
            Self::YPlusAligned => "YPlusAligned",
            Self::YMinusAligned => "YMinusAligned",
            Self::ParallelX => "ParallelX",
            Self::ParallelY => "ParallelY",
            Self::PerpendicularX => "PerpendicularX",
            Self::PerpendicularY => "PerpendicularY",
            Self::MirroredAbout => "MirroredAbout",
            Self::BackToBack => "BackToBack",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Self::LocationTarget { .. }
            | Self::RotationTarget { .. }
            | Self::PointingTowards { .. }
            | Self::Upright
            | Self::AtOrigin => Arity::Exact(1),

            Self::TranslationalDifference { .. }
            | Self::RotationalDifference { .. }
            | Self::Distance { .. }
            | Self::Facing
            | Self::NoBoundsOverlap
            | Self::Proximity
            | Self::Parallel
            | Self::Perpendicular
            | Self::Direction { .. }
            | Self::Cover
            | Self::Proximal
            | Self::ParallelX
            | Self::ParallelY
            | Self::PerpendicularX
            | Self::PerpendicularY
            | Self::BackToBack => Arity::Exact(2),

            Self::Clearance | Self::MirroredAbout => Arity::Exact(3),

            Self::Alignment { .. }
            | Self::RotationalAlignment { .. }
            | Self::NoOverlap
            | Self::SameRotation
            | Self::TopAligned
            | Self::BottomAligned
            | Self::XPlusAligned
            | Self::XMinusAligned
            | Self::YPlusAligned
            | Self::YMinusAligned => Arity::at_least(2),

            Self::PointSymmetry { .. } => Arity::at_least(3),
        }
    }

    /// Checks the parameter payload against its domain.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::InvalidParameter`] naming the first offending
    /// parameter.
    pub fn validate(&self) -> Result<(), ConstraintError> {
        let kind = self.tag();
        let invalid = |parameter: &'static str, reason: &str| ConstraintError::InvalidParameter {
            kind,
            parameter,
            reason: reason.to_string(),
        };

        match self {
            Self::LocationTarget { target } | Self::RotationTarget { target } => {
                if target.is_empty() {
                    return Err(invalid("target", "at least one axis must be set"));
                }
                if target.iter().any(|(_, v)| !v.is_finite()) {
                    return Err(invalid("target", "values must be finite"));
                }
            }
            Self::TranslationalDifference { target, .. }
            | Self::RotationalDifference { target, .. } => {
                if !target.is_finite() {
                    return Err(invalid("target_difference", "must be finite"));
                }
            }
            Self::Distance { target } => {
                if !(target.is_finite() && *target >= 0.0) {
                    return Err(invalid("target_distance", "must be finite and non-negative"));
                }
            }
            Self::PointingTowards { point } => {
                if point.iter().any(|v| !v.is_finite()) {
                    return Err(invalid("point", "coordinates must be finite"));
                }
            }
            _ => {}
        }
        Ok(())
    }
}
