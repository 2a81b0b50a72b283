use nalgebra::{Point2, Rotation2, Vector2};

/// Tolerance used for inclusive containment and orientation tests.
const TOLERANCE: f64 = 1e-12;

/// A rectangle in the horizontal plane, rotated about its center.
///
/// This is the footprint of a box seen from above. All planar badness
/// formulas (proximity, cover, clearance, non-overlap) are expressed on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedRect {
    /// Center of the rectangle.
    pub center: Point2<f64>,
    /// Extent along the rectangle's local x axis.
    pub width: f64,
    /// Extent along the rectangle's local y axis.
    pub height: f64,
    /// Counter-clockwise rotation in degrees.
    pub angle_degrees: f64,
}

impl RotatedRect {
    pub fn new(center: Point2<f64>, width: f64, height: f64, angle_degrees: f64) -> Self {
        Self {
            center,
            width,
            height,
            angle_degrees,
        }
    }

    /// Returns the four corners in counter-clockwise order.
    pub fn corners(&self) -> [Point2<f64>; 4] {
        let rotation = Rotation2::new(self.angle_degrees.to_radians());
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        [
            Vector2::new(-hw, -hh),
            Vector2::new(hw, -hh),
            Vector2::new(hw, hh),
            Vector2::new(-hw, hh),
        ]
        .map(|offset| self.center + rotation * offset)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether `point` lies inside the rectangle or on its boundary.
    pub fn contains_point(&self, point: &Point2<f64>) -> bool {
        let corners = self.corners();
        edges(&corners).all(|(a, b)| cross(&(b - a), &(point - a)) >= -TOLERANCE)
    }

    /// Area of the intersection of the two footprints.
    pub fn intersection_area(&self, other: &RotatedRect) -> f64 {
        let clipped = clip_convex(&self.corners(), &other.corners());
        polygon_area(&clipped)
    }

    /// Intersection over union of the two footprints, in `[0, 1]`.
    pub fn iou(&self, other: &RotatedRect) -> f64 {
        let intersection = self.intersection_area(other);
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            return 0.0;
        }
        (intersection / union).clamp(0.0, 1.0)
    }

    /// Whether the two footprints share at least one point.
    pub fn intersects(&self, other: &RotatedRect) -> bool {
        let (mine, theirs) = (self.corners(), other.corners());
        mine.iter().any(|p| other.contains_point(p))
            || theirs.iter().any(|p| self.contains_point(p))
            || edges(&mine).any(|(a, b)| {
                edges(&theirs).any(|(c, d)| segments_intersect(&a, &b, &c, &d))
            })
    }

    /// Minimum distance between the two footprints.
    ///
    /// Touching, overlapping and nested footprints are at distance zero.
    pub fn distance(&self, other: &RotatedRect) -> f64 {
        if self.intersects(other) {
            return 0.0;
        }
        let (mine, theirs) = (self.corners(), other.corners());
        let from_mine = mine.iter().flat_map(|p| {
            edges(&theirs).map(move |(a, b)| point_segment_distance(p, &a, &b))
        });
        let from_theirs = theirs.iter().flat_map(|p| {
            edges(&mine).map(move |(a, b)| point_segment_distance(p, &a, &b))
        });
        from_mine.chain(from_theirs).fold(f64::INFINITY, f64::min)
    }

    /// Whether the segment `a`–`b` touches the filled footprint.
    pub fn intersects_segment(&self, a: &Point2<f64>, b: &Point2<f64>) -> bool {
        if self.contains_point(a) || self.contains_point(b) {
            return true;
        }
        let corners = self.corners();
        edges(&corners).any(|(c, d)| segments_intersect(a, b, &c, &d))
    }
}

fn edges(polygon: &[Point2<f64>]) -> impl Iterator<Item = (Point2<f64>, Point2<f64>)> + '_ {
    let n = polygon.len();
    (0..n).map(move |i| (polygon[i], polygon[(i + 1) % n]))
}

fn cross(u: &Vector2<f64>, v: &Vector2<f64>) -> f64 {
    u.x * v.y - u.y * v.x
}

fn orientation(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    cross(&(b - a), &(c - a))
}

fn on_segment(a: &Point2<f64>, b: &Point2<f64>, p: &Point2<f64>) -> bool {
    p.x >= a.x.min(b.x) - TOLERANCE
        && p.x <= a.x.max(b.x) + TOLERANCE
        && p.y >= a.y.min(b.y) - TOLERANCE
        && p.y <= a.y.max(b.y) + TOLERANCE
}

/// Closed-segment intersection test; collinear overlaps and touching ends count.
fn segments_intersect(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>, d: &Point2<f64>) -> bool {
    let d1 = orientation(c, d, a);
    let d2 = orientation(c, d, b);
    let d3 = orientation(a, b, c);
    let d4 = orientation(a, b, d);

    if ((d1 > TOLERANCE && d2 < -TOLERANCE) || (d1 < -TOLERANCE && d2 > TOLERANCE))
        && ((d3 > TOLERANCE && d4 < -TOLERANCE) || (d3 < -TOLERANCE && d4 > TOLERANCE))
    {
        return true;
    }

    (d1.abs() <= TOLERANCE && on_segment(c, d, a))
        || (d2.abs() <= TOLERANCE && on_segment(c, d, b))
        || (d3.abs() <= TOLERANCE && on_segment(a, b, c))
        || (d4.abs() <= TOLERANCE && on_segment(a, b, d))
}

fn point_segment_distance(p: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    let ab = b - a;
    let length_sq = ab.norm_squared();
    if length_sq <= TOLERANCE {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / length_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

/// Clips `subject` against the convex counter-clockwise polygon `clip`
/// (Sutherland–Hodgman).
fn clip_convex(subject: &[Point2<f64>], clip: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut output = subject.to_vec();

    for (edge_start, edge_end) in edges(clip) {
        if output.is_empty() {
            break;
        }
        let input = std::mem::take(&mut output);
        let inside = |p: &Point2<f64>| orientation(&edge_start, &edge_end, p) >= -TOLERANCE;

        for (current, next) in edges(&input) {
            let current_in = inside(&current);
            let next_in = inside(&next);
            if current_in {
                output.push(current);
            }
            if current_in != next_in {
                if let Some(point) = line_intersection(&current, &next, &edge_start, &edge_end) {
                    output.push(point);
                }
            }
        }
    }

    output
}

fn line_intersection(
    p1: &Point2<f64>,
    p2: &Point2<f64>,
    q1: &Point2<f64>,
    q2: &Point2<f64>,
) -> Option<Point2<f64>> {
    let r = p2 - p1;
    let s = q2 - q1;
    let denom = cross(&r, &s);
    if denom.abs() <= TOLERANCE {
        return None;
    }
    let t = cross(&(q1 - p1), &s) / denom;
    Some(p1 + r * t)
}

fn polygon_area(polygon: &[Point2<f64>]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let twice_area: f64 = edges(polygon)
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    twice_area.abs() / 2.0
}
