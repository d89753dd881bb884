use std::f64::consts::{PI, TAU};

/// Maps an angle in radians onto `(-π, π]`.
///
/// Angles already in range come back unchanged, so normalizing twice is the
/// same as normalizing once.
pub fn normalize_angle(angle: f64) -> f64 {
    if angle > -PI && angle <= PI {
        return angle;
    }
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

pub fn normalize_joints(joints: &mut [f64]) {
    for angle in joints.iter_mut() {
        *angle = normalize_angle(*angle);
    }
}
