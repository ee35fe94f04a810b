use neutree_core::ErrorCode;
use thiserror::Error;

/// Errors the store façade can return. `NotFound` is the single sentinel
/// spec.md §2 requires every kind's façade to map "not found" onto,
/// regardless of whether the underlying cause was a 404, an empty list, or
/// a row-level-access policy hiding the row from this caller.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error("validation rejected (code {0}): {1}")]
    Validation(ErrorCode, String),

    #[error("referential integrity: {0}")]
    Referential(String),

    #[error("access policy rejected the request: {0}")]
    Policy(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<StoreError> for neutree_core::ReconcileError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => neutree_core::ReconcileError::NotFound,
            StoreError::Validation(code, msg) => neutree_core::ReconcileError::Validation(code, msg),
            StoreError::Referential(msg) => neutree_core::ReconcileError::Referential(msg),
            StoreError::Policy(msg) => neutree_core::ReconcileError::Policy(msg),
            StoreError::Transport(msg) => neutree_core::ReconcileError::Transient(msg),
            StoreError::Decode(msg) => neutree_core::ReconcileError::Transient(msg),
        }
    }
}
