use pl_behavior::{BehaviorError, BehaviorKind};
use pl_core::{FactorId, LogicalId, PlaneId, TaskId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MaxSumError {
    /// A factor was addressed by something that is neither a neighbor nor a
    /// recently retired one.  The graph wiring is corrupt.
    #[error("protocol violation: {factor} received a message from non-neighbor {from}")]
    ProtocolViolation { factor: FactorId, from: LogicalId },

    #[error("solver message for {got} delivered to {expected}")]
    WrongPlane { expected: PlaneId, got: PlaneId },

    #[error("graph wiring error: {0}")]
    Wiring(String),

    #[error("task {0} has no known location")]
    UnknownTask(TaskId),

    #[error("unknown cost strategy {0:?}")]
    UnknownStrategy(String),

    #[error("invalid max-sum configuration: {0}")]
    InvalidConfig(String),

    #[error("max-sum behavior used before on_init")]
    NotInitialised,
}

pub type MaxSumResult<T> = Result<T, MaxSumError>;

impl From<MaxSumError> for BehaviorError {
    fn from(e: MaxSumError) -> Self {
        BehaviorError::Handler { kind: BehaviorKind::MAX_SUM, source: Box::new(e) }
    }
}
