//! Kinematic model of the Waveshare RoArm-M3 five-joint arm.

use std::f64::consts::FRAC_PI_2;

use kinematics::{KinematicsError, KinematicsResult, Pose, RobotModel, ScrewAxis};
use log::debug;
use nalgebra::{Matrix3, Vector3};

// Link lengths in metres.
pub const L1: f64 = 0.044;
pub const L2A: f64 = 0.240;
pub const L2B: f64 = 0.030;
pub const L3: f64 = 0.144;
pub const L4A: f64 = 0.055;
pub const L4B: f64 = 0.010;
/// End-effector length.
pub const L5: f64 = 0.123;

pub const JOINT_COUNT: usize = 5;

/// Sum of all link lengths; no target farther than this from the base is
/// reachable.
pub fn reach() -> f64 {
    L1 + L2A + L2B + L3 + L4A + L4B + L5
}

/// End-effector pose with every joint at zero: arm raised, forearm level.
pub fn zero_configuration() -> Pose {
    kinematics::pose::from_rotation_translation(
        &Matrix3::identity(),
        &Vector3::new(L2B + L3 + L4A + L5, 0.0, L1 + L2A - L4B),
    )
}

/// Base, shoulder, elbow, wrist and roll axes in the base frame.
pub fn screw_axes() -> KinematicsResult<Vec<ScrewAxis>> {
    Ok(vec![
        ScrewAxis::revolute(Vector3::z(), Vector3::zeros())?,
        ScrewAxis::revolute(Vector3::y(), Vector3::new(0.0, 0.0, L1))?,
        ScrewAxis::revolute(Vector3::y(), Vector3::new(L2B, 0.0, L1 + L2A))?,
        ScrewAxis::revolute(Vector3::y(), Vector3::new(L2B + L3, 0.0, L1 + L2A))?,
        ScrewAxis::revolute(Vector3::x(), Vector3::new(L2B + L3 + L4A, 0.0, L1 + L2A - L4B))?,
    ])
}

pub fn roarm_m3() -> KinematicsResult<RobotModel> {
    let model = RobotModel::new(screw_axes()?, zero_configuration())?;
    debug!("built RoArm-M3 model with {} joints", model.joint_count());
    Ok(model)
}

/// Joint angles in the arm controller's convention. The elbow servo reads
/// π/2 when the forearm is level, where the kinematic elbow angle is zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ServoAngles {
    pub base: f64,
    pub shoulder: f64,
    pub elbow: f64,
    pub wrist: f64,
    pub roll: f64,
}

impl ServoAngles {
    pub fn from_joints(joints: &[f64]) -> KinematicsResult<Self> {
        let &[base, shoulder, elbow, wrist, roll] = joints else {
            return Err(KinematicsError::JointCountMismatch {
                expected: JOINT_COUNT,
                actual: joints.len(),
            });
        };
        Ok(Self {
            base,
            shoulder,
            elbow: elbow + FRAC_PI_2,
            wrist,
            roll,
        })
    }

    pub fn to_joints(&self) -> [f64; JOINT_COUNT] {
        [self.base, self.shoulder, self.elbow - FRAC_PI_2, self.wrist, self.roll]
    }
}
