use nalgebra::{Rotation3, Vector3};

const GIMBAL_LOCK_TOLERANCE: f64 = 1e-9;

/// Builds the rotation for Euler angles given in degrees, applied intrinsically
/// about X, then Y, then Z (`R = Rx · Ry · Rz`).
pub fn rotation_from_euler(rot_degrees: &Vector3<f64>) -> Rotation3<f64> {
    let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), rot_degrees.x.to_radians());
    let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), rot_degrees.y.to_radians());
    let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), rot_degrees.z.to_radians());
    rx * ry * rz
}

/// Recovers intrinsic X-Y-Z Euler angles (degrees) from a rotation.
///
/// The decomposition is not unique; the returned angles reproduce the same
/// matrix through [`rotation_from_euler`]. When the Y angle is ±90° the X and Z
/// axes coincide and the Z angle is pinned to zero.
pub fn euler_from_rotation(rotation: &Rotation3<f64>) -> Vector3<f64> {
    let m = rotation.matrix();
    let sin_y = m[(0, 2)].clamp(-1.0, 1.0);
    let y = sin_y.asin();

    let (x, z) = if y.cos().abs() > GIMBAL_LOCK_TOLERANCE {
        (
            (-m[(1, 2)]).atan2(m[(2, 2)]),
            (-m[(0, 1)]).atan2(m[(0, 0)]),
        )
    } else {
        (m[(2, 1)].atan2(m[(1, 1)]), 0.0)
    };

    Vector3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
}

/// Wraps an angle in degrees into the half-open interval `(-180, 180]`.
pub fn canonical_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}
