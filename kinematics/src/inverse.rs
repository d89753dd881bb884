use log::{debug, trace};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::JointVector;
use crate::angles::normalize_angle;
use crate::error::{KinematicsError, KinematicsResult};
use crate::lie::{adjoint, log_se3, se3_to_twist};
use crate::linalg::pseudo_inverse;
use crate::model::RobotModel;
use crate::pose::{Pose, Twist, inverse_transform, validate_pose};

/// Frame the error twist and Jacobian are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorFrame {
    /// `V_b = log(T⁻¹ T_target)` with the body Jacobian.
    #[default]
    Body,
    /// `V_s = Ad_T V_b` with the space Jacobian.
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IkConfig {
    /// Bound on the norm of the angular part of the error twist (radians).
    pub angular_tolerance: f64,
    /// Bound on the norm of the linear part of the error twist (metres).
    pub linear_tolerance: f64,
    pub max_iterations: u32,
    pub frame: ErrorFrame,
}

impl Default for IkConfig {
    fn default() -> Self {
        Self {
            angular_tolerance: 0.01,
            linear_tolerance: 0.001,
            max_iterations: 20,
            frame: ErrorFrame::Body,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IkSolution {
    /// Last iterate with revolute joints normalized to `(-π, π]`; a best
    /// effort when `converged` is false.
    pub joints: JointVector,
    pub converged: bool,
    /// Newton updates applied; zero when the initial guess already reached
    /// the target.
    pub iterations: u32,
    /// Norm of the angular part of the final error twist.
    pub angular_error: f64,
    /// Norm of the linear part of the final error twist.
    pub linear_error: f64,
}

/// Newton-Raphson on SE(3): `θ ← θ + J⁺ V` until the error twist `V` is within
/// tolerance or the iteration budget runs out.
pub struct NewtonRaphsonSolver {
    config: IkConfig,
}

impl NewtonRaphsonSolver {
    pub const fn new(config: IkConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(IkConfig::default())
    }

    pub fn config(&self) -> &IkConfig {
        &self.config
    }

    /// Solves for joints placing the end-effector of `model` at `target`,
    /// starting from `initial_guess` or the zero configuration.
    pub fn solve(
        &self,
        model: &RobotModel,
        target: &Pose,
        initial_guess: Option<&[f64]>,
    ) -> KinematicsResult<IkSolution> {
        validate_pose(target)?;
        let mut joints = match initial_guess {
            Some(guess) => {
                KinematicsError::check_joint_count(model.joint_count(), guess.len())?;
                if let Some(bad) = guess.iter().position(|q| !q.is_finite()) {
                    return Err(KinematicsError::InvalidJoints(format!(
                        "initial guess entry {bad} is {}",
                        guess[bad]
                    )));
                }
                JointVector::from_column_slice(guess)
            }
            None => JointVector::zeros(model.joint_count()),
        };

        let config = &self.config;
        let mut iterations = 0;
        let (converged, twist) = loop {
            let current = model.forward_kinematics(joints.as_slice())?;
            let twist = error_twist(config.frame, &current, target);
            let (angular, linear) = split_norms(&twist);
            trace!("iteration {iterations}: |ω| = {angular:.3e}, |v| = {linear:.3e}");

            if angular <= config.angular_tolerance && linear <= config.linear_tolerance {
                break (true, twist);
            }
            if iterations >= config.max_iterations {
                break (false, twist);
            }

            let jacobian = match config.frame {
                ErrorFrame::Body => model.body_jacobian(joints.as_slice())?,
                ErrorFrame::Space => model.space_jacobian(joints.as_slice())?,
            };
            joints += newton_step(&jacobian, &twist);
            iterations += 1;
        };

        for (angle, screw) in joints.iter_mut().zip(model.screw_axes()) {
            if screw.is_revolute() {
                *angle = normalize_angle(*angle);
            }
        }

        let (angular_error, linear_error) = split_norms(&twist);
        if converged {
            debug!("ik converged after {iterations} iterations");
        } else {
            debug!(
                "ik did not converge in {iterations} iterations (|ω| = {angular_error:.3e}, |v| = {linear_error:.3e})"
            );
        }

        Ok(IkSolution {
            joints,
            converged,
            iterations,
            angular_error,
            linear_error,
        })
    }
}

/// Convenience wrapper around [`NewtonRaphsonSolver::solve`].
pub fn inverse_kinematics(
    model: &RobotModel,
    target: &Pose,
    initial_guess: Option<&[f64]>,
    config: &IkConfig,
) -> KinematicsResult<IkSolution> {
    NewtonRaphsonSolver::new(*config).solve(model, target, initial_guess)
}

/// Twist carrying `current` onto `target`, in the requested frame.
pub fn error_twist(frame: ErrorFrame, current: &Pose, target: &Pose) -> Twist {
    let body = se3_to_twist(&log_se3(&(inverse_transform(current) * target)));
    match frame {
        ErrorFrame::Body => body,
        ErrorFrame::Space => adjoint(current) * body,
    }
}

fn split_norms(twist: &Twist) -> (f64, f64) {
    (twist.fixed_rows::<3>(0).norm(), twist.fixed_rows::<3>(3).norm())
}

fn newton_step(jacobian: &DMatrix<f64>, twist: &Twist) -> DVector<f64> {
    pseudo_inverse(jacobian) * DVector::from_column_slice(twist.as_slice())
}
