use nalgebra::{Matrix4, Vector3, Vector6};

use crate::error::{KinematicsError, KinematicsResult};
use crate::lie::{NEAR_ZERO, near_zero, twist_to_se3};

/// Unit screw axis `(ω, v)` of a single joint, expressed in the space frame.
///
/// A revolute joint has `‖ω‖ = 1`; a prismatic joint has `ω = 0` and `‖v‖ = 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrewAxis {
    omega: Vector3<f64>,
    v: Vector3<f64>,
}

impl ScrewAxis {
    pub fn new(omega: Vector3<f64>, v: Vector3<f64>) -> KinematicsResult<Self> {
        let omega_norm = omega.norm();
        if near_zero(omega_norm) {
            if !near_zero(v.norm() - 1.0) {
                return Err(KinematicsError::InvalidScrewAxis(format!(
                    "prismatic axis needs a unit linear part, got norm {}",
                    v.norm()
                )));
            }
        } else if !near_zero(omega_norm - 1.0) {
            return Err(KinematicsError::InvalidScrewAxis(format!(
                "revolute axis needs a unit angular part, got norm {omega_norm}"
            )));
        }
        Ok(Self { omega, v })
    }

    /// Pure rotation about the unit direction `omega` through `point`.
    pub fn revolute(omega: Vector3<f64>, point: Vector3<f64>) -> KinematicsResult<Self> {
        Self::new(omega, -omega.cross(&point))
    }

    pub fn prismatic(direction: Vector3<f64>) -> KinematicsResult<Self> {
        Self::new(Vector3::zeros(), direction)
    }

    pub fn from_vector(screw: &Vector6<f64>) -> KinematicsResult<Self> {
        Self::new(screw.fixed_rows::<3>(0).into_owned(), screw.fixed_rows::<3>(3).into_owned())
    }

    pub fn to_vector(&self) -> Vector6<f64> {
        Vector6::new(self.omega.x, self.omega.y, self.omega.z, self.v.x, self.v.y, self.v.z)
    }

    pub fn omega(&self) -> &Vector3<f64> {
        &self.omega
    }

    pub fn v(&self) -> &Vector3<f64> {
        &self.v
    }

    pub fn is_revolute(&self) -> bool {
        self.omega.norm() >= NEAR_ZERO
    }

    /// `[S]θ`, ready for the se(3) exponential.
    pub fn se3_matrix(&self, theta: f64) -> Matrix4<f64> {
        twist_to_se3(&self.to_vector()) * theta
    }
}
