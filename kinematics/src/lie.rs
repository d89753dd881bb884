use nalgebra::{Matrix3, Matrix4, Matrix6, Vector3};

use crate::pose::{Pose, Twist, from_rotation_translation, rotation, translation};

/// Threshold below which an angle, norm or singular value counts as zero.
pub const NEAR_ZERO: f64 = 1e-6;

pub fn near_zero(x: f64) -> bool {
    x.abs() < NEAR_ZERO
}

/// `[ω]`, the so(3) matrix of `ω`.
pub fn skew(omega: &Vector3<f64>) -> Matrix3<f64> {
    omega.cross_matrix()
}

/// Inverse of [`skew`].
pub fn vee(so3: &Matrix3<f64>) -> Vector3<f64> {
    Vector3::new(so3[(2, 1)], so3[(0, 2)], so3[(1, 0)])
}

pub fn twist_to_se3(twist: &Twist) -> Matrix4<f64> {
    let omega = twist.fixed_rows::<3>(0).into_owned();
    let mut se3 = Matrix4::zeros();
    se3.fixed_view_mut::<3, 3>(0, 0).copy_from(&skew(&omega));
    se3.fixed_view_mut::<3, 1>(0, 3).copy_from(&twist.fixed_rows::<3>(3));
    se3
}

pub fn se3_to_twist(se3: &Matrix4<f64>) -> Twist {
    let omega = vee(&se3.fixed_view::<3, 3>(0, 0).into_owned());
    Twist::new(omega.x, omega.y, omega.z, se3[(0, 3)], se3[(1, 3)], se3[(2, 3)])
}

/// `exp: so(3) → SO(3)`.
pub fn exp_so3(so3: &Matrix3<f64>) -> Matrix3<f64> {
    let theta = vee(so3).norm();
    if near_zero(theta) {
        return Matrix3::identity();
    }
    let omega = so3 / theta;
    Matrix3::identity() + omega * theta.sin() + omega * omega * (1.0 - theta.cos())
}

/// `log: SO(3) → so(3)`, with the returned angle in `[0, π]`.
pub fn log_so3(r: &Matrix3<f64>) -> Matrix3<f64> {
    let antisymmetric = r - r.transpose();
    // sin θ from the antisymmetric part, cos θ from the trace.
    let sin_theta = vee(&antisymmetric).norm() / 2.0;
    let cos_theta = (r.trace() - 1.0) / 2.0;
    let theta = sin_theta.atan2(cos_theta);

    if near_zero(theta) {
        // θ/(2 sin θ) → 1/2
        return antisymmetric / 2.0;
    }

    if near_zero(sin_theta) {
        // θ ≈ π: recover the axis from ωωᵀ = (sym(R) - cos θ I) / (1 - cos θ).
        let cos_theta = cos_theta.clamp(-1.0, 1.0);
        let outer = ((r + r.transpose()) / 2.0 - Matrix3::identity() * cos_theta) / (1.0 - cos_theta);
        let k = outer.diagonal().imax();
        let mut omega = outer.column(k) / outer[(k, k)].sqrt();
        if vee(&antisymmetric).dot(&omega) < 0.0 {
            omega = -omega;
        }
        return skew(&(omega * theta));
    }

    antisymmetric * (theta / (2.0 * sin_theta))
}

/// `exp: se(3) → SE(3)`. The input is the 4x4 matrix `[S]θ`.
pub fn exp_se3(se3: &Matrix4<f64>) -> Pose {
    let so3 = se3.fixed_view::<3, 3>(0, 0).into_owned();
    let v_theta = se3.fixed_view::<3, 1>(0, 3).into_owned();
    let theta = vee(&so3).norm();
    if near_zero(theta) {
        return from_rotation_translation(&Matrix3::identity(), &v_theta);
    }

    let omega = so3 / theta;
    let g = Matrix3::identity() * theta
        + omega * (1.0 - theta.cos())
        + omega * omega * (theta - theta.sin());
    from_rotation_translation(&exp_so3(&so3), &(g * v_theta / theta))
}

/// `log: SE(3) → se(3)`, returning the 4x4 matrix `[S]θ`.
pub fn log_se3(pose: &Pose) -> Matrix4<f64> {
    let p = translation(pose);
    let so3 = log_so3(&rotation(pose));
    let theta = vee(&so3).norm();

    let mut se3 = Matrix4::zeros();
    if near_zero(theta) {
        se3.fixed_view_mut::<3, 1>(0, 3).copy_from(&p);
        return se3;
    }

    let g_inv = Matrix3::identity() - so3 / 2.0
        + so3 * so3 * ((1.0 / theta - 1.0 / (theta / 2.0).tan() / 2.0) / theta);
    se3.fixed_view_mut::<3, 3>(0, 0).copy_from(&so3);
    se3.fixed_view_mut::<3, 1>(0, 3).copy_from(&(g_inv * p));
    se3
}

/// `Ad_T`, mapping twists expressed in the frame of `T` to the reference frame.
pub fn adjoint(pose: &Pose) -> Matrix6<f64> {
    let r = rotation(pose);
    let p = translation(pose);
    let mut ad = Matrix6::zeros();
    ad.fixed_view_mut::<3, 3>(0, 0).copy_from(&r);
    ad.fixed_view_mut::<3, 3>(3, 0).copy_from(&(skew(&p) * r));
    ad.fixed_view_mut::<3, 3>(3, 3).copy_from(&r);
    ad
}
