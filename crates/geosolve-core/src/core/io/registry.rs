use super::records::{ConstraintParams, ConstraintRecord, RecordError, SceneDocument};
use crate::core::constraints::{Constraint, ConstraintError, ConstraintKind};
use crate::core::models::ids::BoxId;
use crate::core::models::scene::Scene;
use nalgebra::Point3;
use phf::{Map, phf_map};

type KindBuilder = fn(&ConstraintParams) -> Result<ConstraintKind, RecordError>;

/// Constraint type tag to the function rebuilding its payload from keyword
/// parameters.
static KIND_BUILDERS: Map<&'static str, KindBuilder> = phf_map! {
    "LocationTarget" => location_target as KindBuilder,
    "RotationTarget" => rotation_target as KindBuilder,
    "Alignment" => alignment as KindBuilder,
    "RotationalAlignment" => rotational_alignment as KindBuilder,
    "TranslationalDifference" => translational_difference as KindBuilder,
    "RotationalDifference" => rotational_difference as KindBuilder,
    "Distance" => distance as KindBuilder,
    "PointingTowards" => pointing_towards as KindBuilder,
    "Facing" => (|_| Ok(ConstraintKind::Facing)) as KindBuilder,
    "PointSymmetry" => point_symmetry as KindBuilder,
    "NoOverlap" => (|_| Ok(ConstraintKind::NoOverlap)) as KindBuilder,
    "NoBoundsOverlap" => (|_| Ok(ConstraintKind::NoBoundsOverlap)) as KindBuilder,
    "Proximity" => (|_| Ok(ConstraintKind::Proximity)) as KindBuilder,
    "Parallel" => (|_| Ok(ConstraintKind::Parallel)) as KindBuilder,
    "Perpendicular" => (|_| Ok(ConstraintKind::Perpendicular)) as KindBuilder,
    "Direction" => direction as KindBuilder,
    "Cover" => (|_| Ok(ConstraintKind::Cover)) as KindBuilder,
    "Clearance" => (|_| Ok(ConstraintKind::Clearance)) as KindBuilder,
    "Upright" => (|_| Ok(ConstraintKind::Upright)) as KindBuilder,
    "AtOrigin" => (|_| Ok(ConstraintKind::AtOrigin)) as KindBuilder,
    "Proximal" => (|_| Ok(ConstraintKind::Proximal)) as KindBuilder,
    "SameRotation" => (|_| Ok(ConstraintKind::SameRotation)) as KindBuilder,
    "TopAligned" => (|_| Ok(ConstraintKind::TopAligned)) as KindBuilder,
    "BottomAligned" => (|_| Ok(ConstraintKind::BottomAligned)) as KindBuilder,
    "XPlusAligned" => (|_| Ok(ConstraintKind::XPlusAligned)) as KindBuilder,
    "XMinusAligned" => (|_| Ok(ConstraintKind::XMinusAligned)) as KindBuilder,
    "YPlusAligned" => (|_| Ok(ConstraintKind::YPlusAligned)) as KindBuilder,
    "YMinusAligned" => (|_| Ok(ConstraintKind::YMinusAligned)) as KindBuilder,
    "ParallelX" => (|_| Ok(ConstraintKind::ParallelX)) as KindBuilder,
    "ParallelY" => (|_| Ok(ConstraintKind::ParallelY)) as KindBuilder,
    "PerpendicularX" => (|_| Ok(ConstraintKind::PerpendicularX)) as KindBuilder,
    "PerpendicularY" => (|_| Ok(ConstraintKind::PerpendicularY)) as KindBuilder,
    "MirroredAbout" => (|_| Ok(ConstraintKind::MirroredAbout)) as KindBuilder,
    "BackToBack" => (|_| Ok(ConstraintKind::BackToBack)) as KindBuilder,
};

fn required<T: Copy>(
    value: Option<T>,
    kind: &'static str,
    parameter: &'static str,
) -> Result<T, RecordError> {
    value.ok_or(RecordError::MissingParameter { kind, parameter })
}

fn location_target(p: &ConstraintParams) -> Result<ConstraintKind, RecordError> {
    Ok(ConstraintKind::LocationTarget {
        target: required(p.target, "LocationTarget", "target")?,
    })
}

fn rotation_target(p: &ConstraintParams) -> Result<ConstraintKind, RecordError> {
    Ok(ConstraintKind::RotationTarget {
        target: required(p.target, "RotationTarget", "target")?,
    })
}

fn alignment(p: &ConstraintParams) -> Result<ConstraintKind, RecordError> {
    Ok(ConstraintKind::Alignment {
        axis: required(p.dimension, "Alignment", "dimension")?,
        anchor: required(p.location, "Alignment", "location")?,
    })
}

fn rotational_alignment(p: &ConstraintParams) -> Result<ConstraintKind, RecordError> {
    Ok(ConstraintKind::RotationalAlignment {
        axis: required(p.dimension, "RotationalAlignment", "dimension")?,
    })
}

fn translational_difference(p: &ConstraintParams) -> Result<ConstraintKind, RecordError> {
    const KIND: &str = "TranslationalDifference";
    Ok(ConstraintKind::TranslationalDifference {
        axis: required(p.dimension, KIND, "dimension")?,
        anchor: required(p.location, KIND, "location")?,
        target: required(p.target_difference, KIND, "target_difference")?,
    })
}

fn rotational_difference(p: &ConstraintParams) -> Result<ConstraintKind, RecordError> {
    const KIND: &str = "RotationalDifference";
    Ok(ConstraintKind::RotationalDifference {
        axis: required(p.dimension, KIND, "dimension")?,
        target: required(p.target_difference, KIND, "target_difference")?,
    })
}

fn distance(p: &ConstraintParams) -> Result<ConstraintKind, RecordError> {
    Ok(ConstraintKind::Distance {
        target: required(p.target_distance, "Distance", "target_distance")?,
    })
}

fn pointing_towards(p: &ConstraintParams) -> Result<ConstraintKind, RecordError> {
    Ok(ConstraintKind::PointingTowards {
        point: Point3::from(required(p.point, "PointingTowards", "point")?),
    })
}

fn point_symmetry(p: &ConstraintParams) -> Result<ConstraintKind, RecordError> {
    Ok(ConstraintKind::PointSymmetry {
        clamp: p.clamp.unwrap_or(false),
    })
}

fn direction(p: &ConstraintParams) -> Result<ConstraintKind, RecordError> {
    Ok(ConstraintKind::Direction {
        direction: required(p.direction, "Direction", "direction")?,
    })
}

/// Rebuilds a constraint kind from its tag and keyword parameters.
pub fn build_kind(tag: &str, params: &ConstraintParams) -> Result<ConstraintKind, RecordError> {
    let builder = KIND_BUILDERS
        .get(tag)
        .ok_or_else(|| RecordError::UnknownKind(tag.to_string()))?;
    builder(params)
}

/// Whether `tag` names a known constraint type.
pub fn is_known_kind(tag: &str) -> bool {
    KIND_BUILDERS.contains_key(tag)
}

/// Keyword parameters that reproduce `kind` through [`build_kind`].
pub fn params_of(kind: &ConstraintKind) -> ConstraintParams {
    let mut params = ConstraintParams::default();
    match kind {
        ConstraintKind::LocationTarget { target } | ConstraintKind::RotationTarget { target } => {
            params.target = Some(*target);
        }
        ConstraintKind::Alignment { axis, anchor } => {
            params.dimension = Some(*axis);
            params.location = Some(*anchor);
        }
        ConstraintKind::RotationalAlignment { axis } => params.dimension = Some(*axis),
        ConstraintKind::TranslationalDifference {
            axis,
            anchor,
            target,
        } => {
            params.dimension = Some(*axis);
            params.location = Some(*anchor);
            params.target_difference = Some(*target);
        }
        ConstraintKind::RotationalDifference { axis, target } => {
            params.dimension = Some(*axis);
            params.target_difference = Some(*target);
        }
        ConstraintKind::Distance { target } => params.target_distance = Some(*target),
        ConstraintKind::PointingTowards { point } => params.point = Some([point.x, point.y, point.z]),
        ConstraintKind::PointSymmetry { clamp } => params.clamp = Some(*clamp),
        ConstraintKind::Direction { direction } => params.direction = Some(*direction),
        _ => {}
    }
    params
}

/// Resolves a record against the names of `scene` and builds the constraint.
pub fn build_constraint(record: &ConstraintRecord, scene: &Scene) -> Result<Constraint, RecordError> {
    let kind = build_kind(&record.kind, &record.params)?;
    let arguments = record
        .arguments
        .iter()
        .map(|name| {
            scene
                .find_by_name(name)
                .ok_or_else(|| RecordError::UnknownObject {
                    kind: record.kind.clone(),
                    name: name.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Constraint::new(kind, arguments)?)
}

impl Constraint {
    /// Serializable record of this constraint, naming arguments through `scene`.
    pub fn to_record(&self, scene: &Scene, weight: f64) -> Result<ConstraintRecord, RecordError> {
        let arguments = self
            .arguments()
            .iter()
            .map(|&id| {
                scene
                    .get(id)
                    .map(|c| c.name.clone())
                    .ok_or(ConstraintError::UnknownBox {
                        kind: self.kind().tag(),
                        id,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ConstraintRecord {
            kind: self.kind().tag().to_string(),
            arguments,
            params: params_of(self.kind()),
            weight,
        })
    }
}

/// A document turned into live objects.
#[derive(Debug, Clone)]
pub struct HydratedScene {
    pub scene: Scene,
    /// Box ids in document order.
    pub objects: Vec<BoxId>,
    /// Constraints with their weights, in document order.
    pub constraints: Vec<(Constraint, f64)>,
}

/// Builds the scene and every constraint of `document`.
///
/// # Errors
///
/// Fails on the first invalid object, unknown constraint type, missing
/// parameter, unknown argument name or negative weight.
pub fn hydrate(document: &SceneDocument) -> Result<HydratedScene, RecordError> {
    let mut scene = Scene::new();
    let objects = document
        .objects
        .iter()
        .map(|record| Ok(scene.add(record.to_cuboid()?)?))
        .collect::<Result<Vec<_>, RecordError>>()?;

    let constraints = document
        .constraints
        .iter()
        .map(|record| {
            if !(record.weight.is_finite() && record.weight >= 0.0) {
                return Err(RecordError::InvalidWeight {
                    kind: record.kind.clone(),
                    weight: record.weight,
                });
            }
            Ok((build_constraint(record, &scene)?, record.weight))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HydratedScene {
        scene,
        objects,
        constraints,
    })
}
