//! Error types shared by every part of the store.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Everything that can go wrong while building or driving a store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store or its middleware were wired together in an unsupported way.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An action was not a record or carried no `type`.
    #[error("malformed action: {0}")]
    MalformedAction(String),

    /// `dispatch` was called while a reducer was still running.
    #[error("Reducers may not dispatch actions")]
    Reentrancy,

    /// A reducer broke the never-null contract.
    #[error(transparent)]
    ReducerContract(#[from] ReducerContractError),

    /// An action creator map could not be bound.
    #[error("bind error: {0}")]
    Bind(String),

    /// Application-defined reducer failure.
    #[error("reducer failed: {0}")]
    Reducer(String),
}

impl StoreError {
    /// Build an application-level reducer failure.
    pub fn reducer(message: impl Into<String>) -> Self {
        Self::Reducer(message.into())
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Violations of the reducer contract.
///
/// `Init` and `Probe` are found once when reducers are combined and replayed on
/// every later call. `UndefinedState` is raised per dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReducerContractError {
    #[error(
        "Reducer \"{key}\" returned undefined during initialization. If the state passed to the \
         reducer is undefined, you must explicitly return the initial state. The initial state \
         may not be undefined."
    )]
    Init { key: String },

    #[error(
        "Reducer \"{key}\" returned undefined when probed with a random type. Don't try to handle \
         {init} or other actions in the reserved namespace. Instead, you must return the current \
         state for any unknown actions, unless it is undefined, in which case you must return the \
         initial state, regardless of the action type. The initial state may not be undefined."
    )]
    Probe { key: String, init: String },

    #[error(
        "Given action \"{action_type}\", reducer \"{key}\" returned undefined. To ignore an action \
         you must return the previous state."
    )]
    UndefinedState { key: String, action_type: String },
}
