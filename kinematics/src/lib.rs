//! Screw-axis kinematics for serial open chains.
//!
//! A [`RobotModel`] holds the space-frame screw axes and the zero-configuration
//! pose of the end-effector. Forward kinematics is the product of exponentials;
//! inverse kinematics is a Newton-Raphson iteration on SE(3).

use nalgebra::DVector;

pub mod angles;
pub mod error;
pub mod inverse;
pub mod lie;
pub mod linalg;
pub mod model;
pub mod pose;
pub mod screw;

pub use angles::{normalize_angle, normalize_joints};
pub use error::{KinematicsError, KinematicsResult};
pub use inverse::{ErrorFrame, IkConfig, IkSolution, NewtonRaphsonSolver, inverse_kinematics};
pub use model::RobotModel;
pub use pose::{Pose, Twist};
pub use screw::ScrewAxis;

/// Joint angles in radians (or displacements for prismatic joints), in joint
/// order.
pub type JointVector = DVector<f64>;

pub trait ForwardKinematics {
    fn joint_count(&self) -> usize;

    fn forward_kinematics(&self, joints: &[f64]) -> KinematicsResult<Pose>;
}
