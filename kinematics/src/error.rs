use thiserror::Error;

pub type KinematicsResult<T> = Result<T, KinematicsError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum KinematicsError {
    /// A joint vector whose length differs from the model's joint count.
    #[error("expected {expected} joint values, got {actual}")]
    JointCountMismatch { expected: usize, actual: usize },

    /// A pose that is not a rigid homogeneous transform.
    #[error("invalid pose: {0}")]
    InvalidPose(String),

    /// A joint vector with a NaN or infinite entry.
    #[error("invalid joint values: {0}")]
    InvalidJoints(String),

    #[error("invalid screw axis: {0}")]
    InvalidScrewAxis(String),

    #[error("robot model needs at least one joint")]
    EmptyModel,
}

impl KinematicsError {
    pub(crate) fn check_joint_count(expected: usize, actual: usize) -> KinematicsResult<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(KinematicsError::JointCountMismatch { expected, actual })
        }
    }
}
