use nalgebra::DMatrix;

use crate::ForwardKinematics;
use crate::error::{KinematicsError, KinematicsResult};
use crate::lie::{adjoint, exp_se3};
use crate::pose::{Pose, inverse_transform, validate_pose};
use crate::screw::ScrewAxis;

/// Serial open chain described by its space-frame screw axes and the
/// end-effector pose at the zero configuration.
///
/// Built once and never mutated; clone it or wrap it in an `Arc` to share it
/// between solvers and threads.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotModel {
    screw_axes: Vec<ScrewAxis>,
    home: Pose,
}

impl RobotModel {
    pub fn new(screw_axes: Vec<ScrewAxis>, home: Pose) -> KinematicsResult<Self> {
        if screw_axes.is_empty() {
            return Err(KinematicsError::EmptyModel);
        }
        validate_pose(&home)?;
        Ok(Self { screw_axes, home })
    }

    pub fn joint_count(&self) -> usize {
        self.screw_axes.len()
    }

    pub fn screw_axes(&self) -> &[ScrewAxis] {
        &self.screw_axes
    }

    /// End-effector pose with every joint at zero (`M`).
    pub fn home(&self) -> &Pose {
        &self.home
    }

    /// Product of exponentials, `T = e^[S₁]θ₁ ⋯ e^[Sₙ]θₙ M`.
    pub fn forward_kinematics(&self, joints: &[f64]) -> KinematicsResult<Pose> {
        KinematicsError::check_joint_count(self.joint_count(), joints.len())?;
        let mut pose = Pose::identity();
        for (screw, &theta) in self.screw_axes.iter().zip(joints) {
            pose *= exp_se3(&screw.se3_matrix(theta));
        }
        Ok(pose * self.home)
    }

    /// 6xN space Jacobian; column `i` is `Ad(e^[S₁]θ₁ ⋯ e^[Sᵢ₋₁]θᵢ₋₁) Sᵢ`.
    pub fn space_jacobian(&self, joints: &[f64]) -> KinematicsResult<DMatrix<f64>> {
        KinematicsError::check_joint_count(self.joint_count(), joints.len())?;
        let mut jacobian = DMatrix::zeros(6, self.joint_count());
        let mut prefix = Pose::identity();
        for (i, (screw, &theta)) in self.screw_axes.iter().zip(joints).enumerate() {
            jacobian.column_mut(i).copy_from(&(adjoint(&prefix) * screw.to_vector()));
            prefix *= exp_se3(&screw.se3_matrix(theta));
        }
        Ok(jacobian)
    }

    /// 6xN body Jacobian, `Ad(T⁻¹) J_s` with `T` the current end-effector pose.
    pub fn body_jacobian(&self, joints: &[f64]) -> KinematicsResult<DMatrix<f64>> {
        let pose = self.forward_kinematics(joints)?;
        let space = self.space_jacobian(joints)?;
        let ad_inv = adjoint(&inverse_transform(&pose));
        Ok(DMatrix::from_column_slice(6, 6, ad_inv.as_slice()) * space)
    }
}

impl ForwardKinematics for RobotModel {
    fn joint_count(&self) -> usize {
        RobotModel::joint_count(self)
    }

    fn forward_kinematics(&self, joints: &[f64]) -> KinematicsResult<Pose> {
        RobotModel::forward_kinematics(self, joints)
    }
}
