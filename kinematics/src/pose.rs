use nalgebra::{Isometry3, Matrix3, Matrix4, Rotation3, Translation3, UnitQuaternion, Vector3, Vector6};

use crate::error::{KinematicsError, KinematicsResult};

/// 4x4 homogeneous transform, rotation in the top-left block and translation
/// in the top-right column.
pub type Pose = Matrix4<f64>;

/// Angular part first, then linear: `(ω, v)`.
pub type Twist = Vector6<f64>;

/// Tolerance used when checking that a pose is a rigid transform.
pub const POSE_TOLERANCE: f64 = 1e-6;

pub fn rotation(pose: &Pose) -> Matrix3<f64> {
    pose.fixed_view::<3, 3>(0, 0).into_owned()
}

pub fn translation(pose: &Pose) -> Vector3<f64> {
    pose.fixed_view::<3, 1>(0, 3).into_owned()
}

pub fn from_rotation_translation(rotation: &Matrix3<f64>, translation: &Vector3<f64>) -> Pose {
    let mut pose = Pose::identity();
    pose.fixed_view_mut::<3, 3>(0, 0).copy_from(rotation);
    pose.fixed_view_mut::<3, 1>(0, 3).copy_from(translation);
    pose
}

/// Inverse of a rigid transform, `[Rᵀ, -Rᵀp; 0, 1]`.
pub fn inverse_transform(pose: &Pose) -> Pose {
    let r_t = rotation(pose).transpose();
    from_rotation_translation(&r_t, &(-(r_t * translation(pose))))
}

/// Checks the last row is `[0, 0, 0, 1]` and the rotation block is orthonormal
/// with determinant +1.
pub fn validate_pose(pose: &Pose) -> KinematicsResult<()> {
    if pose.iter().any(|x| !x.is_finite()) {
        return Err(KinematicsError::InvalidPose("non-finite entry".into()));
    }

    let last_row = pose.fixed_view::<1, 4>(3, 0);
    let expected = [0.0, 0.0, 0.0, 1.0];
    if last_row.iter().zip(expected).any(|(a, b)| (a - b).abs() > POSE_TOLERANCE) {
        return Err(KinematicsError::InvalidPose(format!(
            "last row must be [0, 0, 0, 1], got {last_row}"
        )));
    }

    let r = rotation(pose);
    let orthogonality = (r.transpose() * r - Matrix3::identity()).abs().max();
    if orthogonality > POSE_TOLERANCE {
        return Err(KinematicsError::InvalidPose(format!(
            "rotation block is not orthonormal (deviation {orthogonality:e})"
        )));
    }

    let det = r.determinant();
    if (det - 1.0).abs() > POSE_TOLERANCE {
        return Err(KinematicsError::InvalidPose(format!(
            "rotation determinant is {det}, expected 1"
        )));
    }

    Ok(())
}

pub fn pose_to_isometry(pose: &Pose) -> KinematicsResult<Isometry3<f64>> {
    validate_pose(pose)?;
    let rotation = Rotation3::from_matrix_unchecked(rotation(pose));
    Ok(Isometry3::from_parts(
        Translation3::from(translation(pose)),
        UnitQuaternion::from_rotation_matrix(&rotation),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    fn quarter_turn_about_x() -> Pose {
        let r = Rotation3::from_axis_angle(&Vector3::x_axis(), FRAC_PI_2);
        from_rotation_translation(r.matrix(), &Vector3::new(1.0, 2.0, 3.0))
    }

    #[test]
    fn test_inverse_transform() {
        let pose = quarter_turn_about_x();
        assert_abs_diff_eq!(pose * inverse_transform(&pose), Pose::identity(), epsilon = 1e-12);
        assert_abs_diff_eq!(inverse_transform(&pose), pose.try_inverse().unwrap(), epsilon = 1e-12);
    }

    #[test]
    fn test_validate_pose() {
        assert!(validate_pose(&Pose::identity()).is_ok());
        assert!(validate_pose(&quarter_turn_about_x()).is_ok());

        let mut scaled = Pose::identity();
        scaled[(0, 0)] = 2.0;
        assert!(matches!(validate_pose(&scaled), Err(KinematicsError::InvalidPose(_))));

        let mut reflected = Pose::identity();
        reflected[(2, 2)] = -1.0;
        assert!(validate_pose(&reflected).is_err());

        let mut bad_row = Pose::identity();
        bad_row[(3, 0)] = 0.5;
        assert!(validate_pose(&bad_row).is_err());

        let mut nan = Pose::identity();
        nan[(0, 3)] = f64::NAN;
        assert!(validate_pose(&nan).is_err());
    }

    #[test]
    fn test_validate_pose_tolerance_boundary() {
        let mut within = Pose::identity();
        within[(0, 3)] = 5.0;
        within[(3, 0)] = 0.9e-6;
        assert!(validate_pose(&within).is_ok());

        within[(3, 0)] = 1.1e-6;
        assert!(validate_pose(&within).is_err());
    }

    #[test]
    fn test_isometry_conversion() {
        let pose = quarter_turn_about_x();
        let isometry = pose_to_isometry(&pose).unwrap();
        assert_abs_diff_eq!(isometry.translation.vector, Vector3::new(1.0, 2.0, 3.0), epsilon = 1e-12);
        assert_abs_diff_eq!(isometry.to_homogeneous(), pose, epsilon = 1e-12);
    }
}
