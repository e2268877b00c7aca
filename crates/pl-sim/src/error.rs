use pl_behavior::BehaviorError;
use pl_core::{PlError, PlaneId};
use pl_maxsum::MaxSumError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("{what} length {got} does not match plane count {expected}")]
    PlaneCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error(transparent)]
    Core(#[from] PlError),

    #[error(transparent)]
    MaxSum(#[from] MaxSumError),

    /// A behavior stack could not be assembled.
    #[error("behavior stack: {0}")]
    Stack(#[from] BehaviorError),

    /// A behavior hook failed.  Fatal: the run stops at the first one.
    #[error("{plane}: {source}")]
    Behavior {
        plane:  PlaneId,
        #[source]
        source: BehaviorError,
    },
}

pub type SimResult<T> = Result<T, SimError>;
