use thiserror::Error;

use crate::BehaviorKind;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("behavior dependency cycle among {0:?}")]
    Cycle(Vec<BehaviorKind>),

    #[error("behavior {behavior} depends on {dependency}, which is not registered")]
    MissingDependency {
        behavior:   BehaviorKind,
        dependency: BehaviorKind,
    },

    #[error("behavior {0} registered twice")]
    DuplicateKind(BehaviorKind),

    /// A behavior asked `Deps` for a type it never declared, or whose
    /// concrete type does not match the registered kind.
    #[error("behavior {behavior} has no dependency state of type {type_name}")]
    MissingDependencyState {
        behavior:  BehaviorKind,
        type_name: &'static str,
    },

    /// A handler or hook failed.  Aborts the step.
    #[error("behavior {kind} failed: {source}")]
    Handler {
        kind:   BehaviorKind,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
