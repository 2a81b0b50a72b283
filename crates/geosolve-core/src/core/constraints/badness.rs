use super::kind::ConstraintKind;
use super::selectors::{Anchor, Axis, AxisTargets, Direction};
use crate::core::geometry::Cuboid;
use itertools::Itertools;
use nalgebra::{Point2, Vector2, Vector3};

/// Floor added to normalizing denominators so degenerate layouts saturate
/// instead of producing NaN.
pub const EPSILON: f64 = 1e-7;

/// Scores `kind` over `boxes`, which must already satisfy the kind's arity.
pub(super) fn evaluate(kind: &ConstraintKind, boxes: &[&Cuboid]) -> f64 {
    match kind {
        ConstraintKind::LocationTarget { target } => location_target(boxes[0], target),
        ConstraintKind::RotationTarget { target } => rotation_target(boxes[0], target),
        ConstraintKind::Alignment { axis, anchor } => alignment(boxes, *axis, *anchor),
        ConstraintKind::RotationalAlignment { axis } => rotational_alignment(boxes, *axis),
        ConstraintKind::TranslationalDifference {
            axis,
            anchor,
            target,
        } => translational_difference(boxes[0], boxes[1], *axis, *anchor, *target),
        ConstraintKind::RotationalDifference { axis, target } => {
            rotational_difference(boxes[0], boxes[1], *axis, *target)
        }
        ConstraintKind::Distance { target } => distance(boxes[0], boxes[1], *target),
        ConstraintKind::PointingTowards { point } => {
            pointing_towards(boxes[0], &Point2::new(point.x, point.y))
        }
        ConstraintKind::Facing => facing(boxes[0], boxes[1]),
        ConstraintKind::PointSymmetry { clamp } => point_symmetry(boxes, *clamp),
        ConstraintKind::NoOverlap => no_overlap(boxes),
        ConstraintKind::NoBoundsOverlap => no_bounds_overlap(boxes[0], boxes[1]),
        ConstraintKind::Proximity => proximity(boxes[0], boxes[1]),
        ConstraintKind::Parallel => parallel(boxes[0], boxes[1]),
        ConstraintKind::Perpendicular => perpendicular(boxes[0], boxes[1]),
        ConstraintKind::Direction { direction } => {
            relative_direction(boxes[0], boxes[1], *direction)
        }
        ConstraintKind::Cover => cover(boxes[0], boxes[1]),
        ConstraintKind::Clearance => clearance(boxes[0], boxes[1], boxes[2]),

        ConstraintKind::Upright => rotation_target(boxes[0], &AxisTargets::all(0.0)),
        ConstraintKind::AtOrigin => location_target(boxes[0], &AxisTargets::all(0.0)),
        ConstraintKind::Proximal => {
            distance(boxes[0], boxes[1], 0.0) + no_bounds_overlap(boxes[0], boxes[1])
        }
        ConstraintKind::SameRotation => Axis::ALL
            .into_iter()
            .map(|axis| rotational_alignment(boxes, axis))
            .sum(),
        ConstraintKind::TopAligned => alignment(boxes, Axis::Z, Anchor::BoundingMax),
        ConstraintKind::BottomAligned => alignment(boxes, Axis::Z, Anchor::BoundingMin),
        ConstraintKind::XPlusAligned => alignment(boxes, Axis::X, Anchor::BoundingMax),
        ConstraintKind::XMinusAligned => alignment(boxes, Axis::X, Anchor::BoundingMin),
        ConstraintKind::YPlusAligned => alignment(boxes, Axis::Y, Anchor::BoundingMax),
        ConstraintKind::YMinusAligned => alignment(boxes, Axis::Y, Anchor::BoundingMin),
        ConstraintKind::ParallelX => rotational_alignment(boxes, Axis::X),
        ConstraintKind::ParallelY => rotational_alignment(boxes, Axis::Y),
        ConstraintKind::PerpendicularX => rotational_difference(boxes[0], boxes[1], Axis::X, 90.0),
        ConstraintKind::PerpendicularY => rotational_difference(boxes[0], boxes[1], Axis::Y, 90.0),
        ConstraintKind::MirroredAbout => mirrored_about(boxes[0], boxes[1], boxes[2]),
        ConstraintKind::BackToBack => back_to_back(boxes[0], boxes[1]),
    }
}

fn population_std(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let count = values.clone().count();
    if count == 0 {
        return 0.0;
    }
    let mean = values.clone().sum::<f64>() / count as f64;
    let variance = values.map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
    variance.sqrt()
}

/// Cosine of the angle between `direction` and `displacement`, with the
/// displacement norm floored by [`EPSILON`].
fn guarded_cosine(direction: &Vector2<f64>, displacement: &Vector2<f64>) -> f64 {
    let cosine = direction.dot(displacement) / (direction.norm() * displacement.norm() + EPSILON);
    cosine.clamp(-1.0, 1.0)
}

pub fn location_target(cuboid: &Cuboid, target: &AxisTargets) -> f64 {
    target
        .iter()
        .map(|(axis, value)| (value - cuboid.loc[axis.index()]).abs())
        .sum()
}

pub fn rotation_target(cuboid: &Cuboid, target: &AxisTargets) -> f64 {
    target
        .iter()
        .map(|(axis, value)| (value - cuboid.rot[axis.index()]).abs())
        .sum()
}

pub fn alignment(boxes: &[&Cuboid], axis: Axis, anchor: Anchor) -> f64 {
    population_std(boxes.iter().map(|c| anchor.value(c, axis)))
}

pub fn rotational_alignment(boxes: &[&Cuboid], axis: Axis) -> f64 {
    population_std(boxes.iter().map(|c| c.rot[axis.index()]))
}

pub fn translational_difference(
    a: &Cuboid,
    b: &Cuboid,
    axis: Axis,
    anchor: Anchor,
    target: f64,
) -> f64 {
    (target - (anchor.value(a, axis) - anchor.value(b, axis))).abs()
}

pub fn rotational_difference(a: &Cuboid, b: &Cuboid, axis: Axis, target: f64) -> f64 {
    (target - (a.rot[axis.index()] - b.rot[axis.index()])).abs()
}

pub fn distance(a: &Cuboid, b: &Cuboid, target: f64) -> f64 {
    ((a.loc - b.loc).norm() - target).abs()
}

/// `1 - cos` of the angle between the heading of `cuboid` and the planar
/// displacement towards `point`. Ranges over `[0, 2]`.
pub fn pointing_towards(cuboid: &Cuboid, point: &Point2<f64>) -> f64 {
    let displacement = point - Point2::new(cuboid.loc.x, cuboid.loc.y);
    1.0 - guarded_cosine(&cuboid.heading(), &displacement)
}

pub fn facing(a: &Cuboid, b: &Cuboid) -> f64 {
    pointing_towards(a, &Point2::new(b.loc.x, b.loc.y))
}

/// Mirror-image consistency of the locations about their centroid.
///
/// Each location is reflected across the centroid along x (then y); the
/// distance from a reflection to its nearest original location, relative to the
/// reflection's distance from the centroid, is averaged and clipped to
/// `[0, 1]`. The better of the two axes wins.
pub fn point_symmetry(boxes: &[&Cuboid], clamp: bool) -> f64 {
    if boxes.is_empty() {
        return 0.0;
    }
    let locations: Vec<Vector3<f64>> = boxes.iter().map(|c| c.loc).collect();
    let centroid = locations.iter().sum::<Vector3<f64>>() / locations.len() as f64;

    let along = |axis: usize| {
        let total: f64 = locations
            .iter()
            .map(|p| {
                let mut mirrored = *p;
                mirrored[axis] = 2.0 * centroid[axis] - p[axis];
                let nearest = locations
                    .iter()
                    .map(|q| (mirrored - q).norm())
                    .fold(f64::INFINITY, f64::min);
                nearest / ((mirrored - centroid).norm() + EPSILON)
            })
            .sum();
        (total / locations.len() as f64).clamp(0.0, 1.0)
    };

    let badness = along(Axis::X.index()).min(along(Axis::Y.index()));
    if clamp { badness.min(1.0) } else { badness }
}

/// Mean planar intersection-over-union over all unordered pairs.
pub fn no_overlap(boxes: &[&Cuboid]) -> f64 {
    let footprints: Vec<_> = boxes.iter().map(|c| c.planar_projection()).collect();
    let (total, pairs) = footprints
        .iter()
        .tuple_combinations()
        .fold((0.0, 0usize), |(total, pairs), (a, b)| (total + a.iou(b), pairs + 1));
    if pairs == 0 { 0.0 } else { total / pairs as f64 }
}

/// Product of the per-axis overlaps of the bounding intervals.
pub fn no_bounds_overlap(a: &Cuboid, b: &Cuboid) -> f64 {
    let (bounds_a, bounds_b) = (a.bounding_interval(), b.bounding_interval());
    bounds_a
        .iter()
        .zip(bounds_b.iter())
        .map(|(ia, ib)| ia.overlap(ib))
        .product()
}

pub fn proximity(a: &Cuboid, b: &Cuboid) -> f64 {
    a.planar_projection()
        .distance(&b.planar_projection())
        .min(1.0)
}

fn z_rotation_difference(a: &Cuboid, b: &Cuboid) -> f64 {
    (a.rot.z - b.rot.z).to_radians()
}

/// `(1 - cos 2Δ) / 2` over the z-rotation difference, so a half turn counts as
/// parallel just like it does for [`perpendicular`].
pub fn parallel(a: &Cuboid, b: &Cuboid) -> f64 {
    (1.0 - (2.0 * z_rotation_difference(a, b)).cos()) / 2.0
}

pub fn perpendicular(a: &Cuboid, b: &Cuboid) -> f64 {
    z_rotation_difference(a, b).cos().abs()
}

/// Whether `b` lies towards `direction` as seen from `a`, in `[0, 1]`.
pub fn relative_direction(a: &Cuboid, b: &Cuboid, direction: Direction) -> f64 {
    let displacement = Vector2::new(b.loc.x - a.loc.x, b.loc.y - a.loc.y);
    (1.0 - guarded_cosine(&direction.reference(), &displacement)) / 2.0
}

/// Fraction of the footprint of `covered` left outside the footprint of `cover`.
pub fn cover(cover: &Cuboid, covered: &Cuboid) -> f64 {
    let (outer, inner) = (cover.planar_projection(), covered.planar_projection());
    let area = inner.area();
    (1.0 - outer.intersection_area(&inner) / area.max(EPSILON)).clamp(0.0, 1.0)
}

/// 1 when `blocker` sits on the straight line between `from` and `to`.
pub fn clearance(blocker: &Cuboid, from: &Cuboid, to: &Cuboid) -> f64 {
    let start = Point2::new(from.loc.x, from.loc.y);
    let end = Point2::new(to.loc.x, to.loc.y);
    if blocker.planar_projection().intersects_segment(&start, &end) {
        1.0
    } else {
        0.0
    }
}

/// How far `pivot` is from the midpoint of `a` and `b`, as an L1 norm of
/// twice the offset.
pub fn mirrored_about(a: &Cuboid, pivot: &Cuboid, b: &Cuboid) -> f64 {
    ((pivot.loc - a.loc) + (pivot.loc - b.loc)).lp_norm(1)
}

pub fn back_to_back(a: &Cuboid, b: &Cuboid) -> f64 {
    let facing_away = (4.0 - facing(a, b) - facing(b, a)) / 4.0;
    (proximity(a, b) + facing_away) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constraints::Arity;

    fn cube(x: f64, y: f64, z: f64, side: f64) -> Cuboid {
        Cuboid::new([x, y, z], [0.0; 3], [side; 3], "cube").unwrap()
    }

    fn rotated(x: f64, y: f64, rot_z: f64, side: f64) -> Cuboid {
        Cuboid::new([x, y, 0.0], [0.0, 0.0, rot_z], [side; 3], "cube").unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn location_target_sums_set_axes_only() {
        let c = cube(1.0, 2.0, 3.0, 1.0);
        let target = AxisTargets {
            x: Some(0.0),
            y: None,
            z: Some(5.0),
        };
        assert!(approx(location_target(&c, &target), 3.0));
        assert!(approx(location_target(&c, &AxisTargets::default()), 0.0));
    }

    #[test]
    fn upright_is_zero_only_without_rotation() {
        let upright = cube(0.0, 0.0, 0.0, 1.0);
        let tilted = Cuboid::new([0.0; 3], [10.0, -5.0, 0.0], [1.0; 3], "t").unwrap();
        assert_eq!(evaluate(&ConstraintKind::Upright, &[&upright]), 0.0);
        assert!(approx(evaluate(&ConstraintKind::Upright, &[&tilted]), 15.0));
    }

    #[test]
    fn alignment_is_population_std() {
        let (a, b) = (cube(0.0, 0.0, 0.0, 1.0), cube(0.0, 0.0, 2.0, 1.0));
        assert!(approx(alignment(&[&a, &b], Axis::Z, Anchor::Center), 1.0));
        assert!(approx(alignment(&[&a, &a], Axis::Z, Anchor::Center), 0.0));
    }

    #[test]
    fn bottom_aligned_compares_lower_faces() {
        let small = cube(0.0, 0.0, 0.5, 1.0);
        let tall = Cuboid::new([3.0, 0.0, 2.0], [0.0; 3], [1.0, 1.0, 4.0], "tall").unwrap();
        assert!(approx(evaluate(&ConstraintKind::BottomAligned, &[&small, &tall]), 0.0));
        assert!(evaluate(&ConstraintKind::TopAligned, &[&small, &tall]) > 1.0);
    }

    #[test]
    fn translational_difference_uses_anchor() {
        let (a, b) = (cube(5.0, 0.0, 0.0, 2.0), cube(1.0, 0.0, 0.0, 2.0));
        assert!(approx(
            translational_difference(&a, &b, Axis::X, Anchor::Center, 4.0),
            0.0
        ));
        assert!(approx(
            translational_difference(&a, &b, Axis::X, Anchor::BoundingMax, 1.0),
            3.0
        ));
    }

    #[test]
    fn distance_measures_centers() {
        let (a, b) = (cube(0.0, 0.0, 0.0, 1.0), cube(3.0, 4.0, 0.0, 1.0));
        assert!(approx(distance(&a, &b, 5.0), 0.0));
        assert!(approx(distance(&a, &b, 2.0), 3.0));
    }

    #[test]
    fn facing_is_zero_towards_and_two_away() {
        let a = rotated(0.0, 0.0, 0.0, 1.0);
        let ahead = rotated(5.0, 0.0, 0.0, 1.0);
        let behind = rotated(-5.0, 0.0, 0.0, 1.0);
        let aside = rotated(0.0, 5.0, 0.0, 1.0);
        assert!(facing(&a, &ahead) < 1e-6);
        assert!((facing(&a, &behind) - 2.0).abs() < 1e-6);
        assert!((facing(&a, &aside) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn facing_coincident_boxes_is_finite() {
        let a = rotated(1.0, 1.0, 30.0, 1.0);
        let value = facing(&a, &a);
        assert!(value.is_finite());
        assert!(approx(value, 1.0));
    }

    #[test]
    fn point_symmetry_of_mirrored_rows_is_zero() {
        let row = [cube(1.0, 0.0, 0.0, 2.0), cube(0.0, 0.0, 0.0, 2.0), cube(2.0, 0.0, 0.0, 2.0)];
        let refs: Vec<_> = row.iter().collect();
        assert!(point_symmetry(&refs, false) < 1e-9);

        let four = [1.0, 2.0, 3.0, 4.0].map(|x| cube(x, 0.0, 0.0, 2.0));
        let refs: Vec<_> = four.iter().collect();
        assert!(point_symmetry(&refs, false) < 1e-9);

        let triangle = [cube(1.0, 1.0, 0.0, 2.0), cube(0.0, 0.0, 0.0, 2.0), cube(2.0, 0.0, 0.0, 2.0)];
        let refs: Vec<_> = triangle.iter().collect();
        assert!(point_symmetry(&refs, false) < 1e-9);
    }

    #[test]
    fn collinear_row_is_symmetric_across_its_own_line() {
        // Reflecting y about the centroid maps a row on y = 0 onto itself, and
        // the better axis wins, so uneven spacing along x is not penalized.
        let row = [0.0, 1.0, 3.0].map(|x| cube(x, 0.0, 0.0, 1.0));
        let refs: Vec<_> = row.iter().collect();
        assert!(point_symmetry(&refs, false) < 1e-9);

        let bent = [cube(0.0, 0.0, 0.0, 1.0), cube(1.0, 0.0, 0.0, 1.0), cube(3.0, 1.0, 0.0, 1.0)];
        let refs: Vec<_> = bent.iter().collect();
        let value = point_symmetry(&refs, false);
        assert!(value > 0.0 && value <= 1.0);
    }

    #[test]
    fn point_symmetry_of_diagonal_is_two_thirds() {
        let diagonal = [cube(0.0, 0.0, 0.0, 2.0), cube(-1.0, -1.0, 0.0, 2.0), cube(1.0, 1.0, 0.0, 2.0)];
        let refs: Vec<_> = diagonal.iter().collect();
        assert!((point_symmetry(&refs, false) - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn point_symmetry_stays_in_unit_interval() {
        let scattered = [
            cube(0.1, 0.7, 0.3, 1.0),
            cube(0.9, 0.2, 0.5, 1.0),
            cube(0.4, 0.4, 0.9, 1.0),
            cube(0.3, 0.95, 0.1, 1.0),
        ];
        let refs: Vec<_> = scattered.iter().collect();
        for clamp in [false, true] {
            let value = point_symmetry(&refs, clamp);
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn point_symmetry_of_coincident_boxes_is_finite() {
        let same = [cube(1.0, 1.0, 1.0, 1.0), cube(1.0, 1.0, 1.0, 1.0), cube(1.0, 1.0, 1.0, 1.0)];
        let refs: Vec<_> = same.iter().collect();
        let value = point_symmetry(&refs, false);
        assert!(value.is_finite());
        assert!(value < 1e-9);
    }

    #[test]
    fn no_overlap_is_zero_when_disjoint_and_one_when_coincident() {
        let (a, b) = (cube(0.0, 0.0, 0.0, 1.0), cube(5.0, 0.0, 0.0, 1.0));
        assert_eq!(no_overlap(&[&a, &b]), 0.0);
        assert!(approx(no_overlap(&[&a, &a]), 1.0));
    }

    #[test]
    fn no_overlap_averages_over_pairs() {
        let (a, b, c) = (cube(0.0, 0.0, 0.0, 1.0), cube(5.0, 0.0, 0.0, 1.0), cube(0.0, 0.0, 0.0, 1.0));
        assert!(approx(no_overlap(&[&a, &b, &c]), 1.0 / 3.0));
    }

    #[test]
    fn no_bounds_overlap_multiplies_axis_overlaps() {
        let (a, b) = (cube(0.0, 0.0, 0.0, 2.0), cube(1.0, 1.0, 1.0, 2.0));
        assert!(approx(no_bounds_overlap(&a, &b), 1.0));
        let apart = cube(0.0, 0.0, 3.0, 2.0);
        assert_eq!(no_bounds_overlap(&a, &apart), 0.0);
    }

    #[test]
    fn proximity_of_touching_and_rotated_squares() {
        let a = cube(0.0, 0.0, 0.0, 2.0);
        let touching = cube(2.0, 2.0, 0.0, 2.0);
        assert_eq!(proximity(&a, &touching), 0.0);
        let diamond = rotated(2.0, 2.0, 45.0, 2.0);
        assert!(approx(proximity(&a, &diamond), 2.0_f64.sqrt() - 1.0));
    }

    #[test]
    fn proximity_saturates_at_one() {
        let (a, b) = (cube(0.0, 0.0, 0.0, 1.0), cube(10.0, 0.0, 0.0, 1.0));
        assert_eq!(proximity(&a, &b), 1.0);
    }

    #[test]
    fn parallel_and_perpendicular() {
        let a = rotated(0.0, 0.0, 0.0, 1.0);
        let right_angle = rotated(3.0, 0.0, 90.0, 1.0);
        let diagonal = rotated(3.0, 0.0, 45.0, 1.0);
        assert!(approx(parallel(&a, &a), 0.0));
        assert!(approx(parallel(&a, &right_angle), 1.0));
        assert!(approx(parallel(&a, &diagonal), 0.5));
        assert!(approx(perpendicular(&a, &right_angle), 0.0));
        assert!(approx(perpendicular(&a, &a), 1.0));
    }

    #[test]
    fn half_turn_is_parallel_and_not_perpendicular() {
        let a = rotated(0.0, 0.0, 0.0, 1.0);
        let flipped = rotated(3.0, 0.0, 180.0, 1.0);
        assert!(approx(parallel(&a, &flipped), 0.0));
        assert!(approx(perpendicular(&a, &flipped), 1.0));

        let quarter = rotated(3.0, 0.0, -90.0, 1.0);
        let three_quarters = rotated(3.0, 0.0, 270.0, 1.0);
        assert!(approx(parallel(&quarter, &three_quarters), 0.0));
        assert!(approx(perpendicular(&a, &three_quarters), 0.0));
    }

    #[test]
    fn direction_follows_world_frame() {
        let anchor = cube(0.0, 0.0, 0.0, 1.0);
        let left = cube(-3.0, 0.0, 0.0, 1.0);
        let back = cube(0.0, 3.0, 0.0, 1.0);
        assert!(relative_direction(&anchor, &left, Direction::Left) < 1e-6);
        assert!((relative_direction(&anchor, &left, Direction::Right) - 1.0).abs() < 1e-6);
        assert!((relative_direction(&anchor, &back, Direction::Left) - 0.5).abs() < 1e-6);
        assert!(relative_direction(&anchor, &back, Direction::Back) < 1e-6);
    }

    #[test]
    fn cover_is_zero_inside_and_half_when_offset() {
        let table = cube(0.0, 0.0, 0.0, 4.0);
        let cup = cube(0.5, 0.5, 0.0, 1.0);
        assert!(approx(cover(&table, &cup), 0.0));

        let (a, b) = (cube(0.0, 0.0, 0.0, 2.0), cube(1.0, 0.0, 0.0, 2.0));
        assert!(approx(cover(&a, &b), 0.5));
    }

    #[test]
    fn cover_of_unit_box_by_double_box() {
        let outer = cube(0.0, 0.0, 0.0, 2.0);
        assert!(approx(cover(&outer, &cube(0.0, 0.0, 0.0, 1.0)), 0.0));
        // Half a width of slack on each side keeps a half-width shift inside.
        assert!(approx(cover(&outer, &cube(0.5, 0.0, 0.0, 1.0)), 0.0));
        assert!(approx(cover(&outer, &cube(1.0, 0.0, 0.0, 1.0)), 0.5));
    }

    #[test]
    fn clearance_detects_blocker_on_line() {
        let (from, to) = (cube(0.0, 0.0, 0.0, 1.0), cube(10.0, 0.0, 0.0, 1.0));
        let blocking = cube(5.0, 0.0, 0.0, 1.0);
        let aside = cube(5.0, 5.0, 0.0, 1.0);
        assert_eq!(clearance(&blocking, &from, &to), 1.0);
        assert_eq!(clearance(&aside, &from, &to), 0.0);
    }

    #[test]
    fn mirrored_about_is_zero_at_midpoint() {
        let (a, pivot, b) = (cube(-2.0, 1.0, 0.0, 1.0), cube(0.0, 0.0, 0.0, 1.0), cube(2.0, -1.0, 0.0, 1.0));
        assert!(approx(mirrored_about(&a, &pivot, &b), 0.0));
        let off = cube(1.0, 0.0, 0.0, 1.0);
        assert!(approx(mirrored_about(&a, &off, &b), 2.0));
    }

    #[test]
    fn back_to_back_rewards_touching_and_facing_away() {
        let a = rotated(0.0, 0.0, 180.0, 1.0);
        let b = rotated(1.0, 0.0, 0.0, 1.0);
        assert!(back_to_back(&a, &b) < 1e-6);

        let facing_each_other_a = rotated(0.0, 0.0, 0.0, 1.0);
        let facing_each_other_b = rotated(1.0, 0.0, 180.0, 1.0);
        assert!((back_to_back(&facing_each_other_a, &facing_each_other_b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn proximal_adds_distance_and_bounds_overlap() {
        let (a, b) = (cube(0.0, 0.0, 0.0, 2.0), cube(1.0, 1.0, 1.0, 2.0));
        let expected = 3.0_f64.sqrt() + 1.0;
        assert!(approx(evaluate(&ConstraintKind::Proximal, &[&a, &b]), expected));
    }

    #[test]
    fn same_rotation_sums_every_axis() {
        let a = Cuboid::new([0.0; 3], [0.0, 0.0, 0.0], [1.0; 3], "a").unwrap();
        let b = Cuboid::new([0.0; 3], [2.0, 4.0, 6.0], [1.0; 3], "b").unwrap();
        assert!(approx(evaluate(&ConstraintKind::SameRotation, &[&a, &b]), 6.0));
    }

    #[test]
    fn axis_side_alignments_use_bounding_extremes() {
        let (small, large) = (cube(0.0, 0.0, 0.0, 1.0), cube(0.5, 0.0, 0.0, 2.0));
        assert!(approx(evaluate(&ConstraintKind::XPlusAligned, &[&small, &large]), 0.5));
        assert!(approx(evaluate(&ConstraintKind::XMinusAligned, &[&small, &large]), 0.0));

        let (low, high) = (cube(0.0, 1.0, 0.0, 2.0), cube(0.0, 0.5, 0.0, 1.0));
        assert!(approx(evaluate(&ConstraintKind::YPlusAligned, &[&low, &high]), 0.5));
        assert!(approx(evaluate(&ConstraintKind::YMinusAligned, &[&low, &high]), 0.0));
    }

    #[test]
    fn axis_parallel_and_perpendicular_composites() {
        let a = Cuboid::new([0.0; 3], [90.0, 30.0, 0.0], [1.0; 3], "a").unwrap();
        let b = Cuboid::new([2.0, 0.0, 0.0], [0.0, 30.0, 0.0], [1.0; 3], "b").unwrap();
        assert!(approx(evaluate(&ConstraintKind::ParallelY, &[&a, &b]), 0.0));
        assert!(approx(evaluate(&ConstraintKind::ParallelX, &[&a, &b]), 45.0));
        assert!(approx(evaluate(&ConstraintKind::PerpendicularX, &[&a, &b]), 0.0));
        assert!(approx(evaluate(&ConstraintKind::PerpendicularY, &[&a, &b]), 90.0));
    }

    fn every_kind() -> Vec<ConstraintKind> {
        vec![
            ConstraintKind::LocationTarget {
                target: AxisTargets {
                    x: Some(1.0),
                    y: None,
                    z: Some(-2.0),
                },
            },
            ConstraintKind::RotationTarget {
                target: AxisTargets::all(10.0),
            },
            ConstraintKind::Alignment {
                axis: Axis::Y,
                anchor: Anchor::Center,
            },
            ConstraintKind::RotationalAlignment { axis: Axis::Z },
            ConstraintKind::TranslationalDifference {
                axis: Axis::X,
                anchor: Anchor::BoundingMin,
                target: 1.5,
            },
            ConstraintKind::RotationalDifference {
                axis: Axis::Z,
                target: 45.0,
            },
            ConstraintKind::Distance { target: 2.0 },
            ConstraintKind::PointingTowards {
                point: nalgebra::Point3::new(1.0, -1.0, 0.0),
            },
            ConstraintKind::Facing,
            ConstraintKind::PointSymmetry { clamp: false },
            ConstraintKind::PointSymmetry { clamp: true },
            ConstraintKind::NoOverlap,
            ConstraintKind::NoBoundsOverlap,
            ConstraintKind::Proximity,
            ConstraintKind::Parallel,
            ConstraintKind::Perpendicular,
            ConstraintKind::Direction {
                direction: Direction::Back,
            },
            ConstraintKind::Cover,
            ConstraintKind::Clearance,
            ConstraintKind::Upright,
            ConstraintKind::AtOrigin,
            ConstraintKind::Proximal,
            ConstraintKind::SameRotation,
            ConstraintKind::TopAligned,
            ConstraintKind::BottomAligned,
            ConstraintKind::XPlusAligned,
            ConstraintKind::XMinusAligned,
            ConstraintKind::YPlusAligned,
            ConstraintKind::YMinusAligned,
            ConstraintKind::ParallelX,
            ConstraintKind::ParallelY,
            ConstraintKind::PerpendicularX,
            ConstraintKind::PerpendicularY,
            ConstraintKind::MirroredAbout,
            ConstraintKind::BackToBack,
        ]
    }

    fn unit_bounded(kind: &ConstraintKind) -> bool {
        matches!(
            kind,
            ConstraintKind::PointSymmetry { .. }
                | ConstraintKind::NoOverlap
                | ConstraintKind::Proximity
                | ConstraintKind::Parallel
                | ConstraintKind::Perpendicular
                | ConstraintKind::Direction { .. }
                | ConstraintKind::Cover
                | ConstraintKind::Clearance
                | ConstraintKind::BackToBack
        )
    }

    #[test]
    fn badness_is_finite_and_bounded_for_random_layouts() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let kinds = every_kind();
        let tags: std::collections::BTreeSet<_> = kinds.iter().map(ConstraintKind::tag).collect();
        assert_eq!(tags.len(), 34);
        assert!(tags.iter().all(|tag| crate::core::io::registry::is_known_kind(tag)));

        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..300 {
            let boxes: Vec<Cuboid> = (0..4)
                .map(|_| {
                    let loc: [f64; 3] = [(); 3].map(|_| rng.gen_range(-3.0..3.0));
                    let rot: [f64; 3] = [(); 3].map(|_| rng.gen_range(-180.0..180.0));
                    let scale: [f64; 3] = [(); 3].map(|_| rng.gen_range(0.2..3.0));
                    Cuboid::new(loc, rot, scale, "random").unwrap()
                })
                .collect();
            let refs: Vec<&Cuboid> = boxes.iter().collect();

            for kind in &kinds {
                let count = match kind.arity() {
                    Arity::Exact(n) => n,
                    _ => refs.len(),
                };
                let value = evaluate(kind, &refs[..count]);
                assert!(value.is_finite() && value >= 0.0, "{} gave {value}", kind.tag());
                if unit_bounded(kind) {
                    assert!(value <= 1.0 + 1e-12, "{} gave {value}", kind.tag());
                }
                if matches!(kind, ConstraintKind::Facing | ConstraintKind::PointingTowards { .. }) {
                    assert!(value <= 2.0 + 1e-12, "{} gave {value}", kind.tag());
                }
            }
        }
    }
}
