use thiserror::Error;

/// Numeric diagnostic codes raised by the database's spec-validation
/// triggers (spec.md §6). Callers pattern-match on the code, not the
/// message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ErrorCode(pub u32);

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[allow(non_upper_case_globals)]
impl ErrorCode {
    pub const MissingKubeconfig: ErrorCode = ErrorCode(10021);
    pub const MissingAccessMode: ErrorCode = ErrorCode(10023);
    pub const MissingCpu: ErrorCode = ErrorCode(10025);
    pub const MissingMemory: ErrorCode = ErrorCode(10026);
    pub const RouterReplicasLtOne: ErrorCode = ErrorCode(10027);
    pub const RouterReplicasNonInteger: ErrorCode = ErrorCode(10028);
    pub const MissingResources: ErrorCode = ErrorCode(10029);
    pub const MissingModelRegistryUrl: ErrorCode = ErrorCode(10035);
    pub const DeleteDefaultWorkspace: ErrorCode = ErrorCode(10043);
    pub const InvalidMemoryLiteral: ErrorCode = ErrorCode(10114);
    pub const ModelCacheConstraintBase: ErrorCode = ErrorCode(10201);
}

/// The error taxonomy a reconcile pass can surface (spec.md §7).
///
/// `NotFound` is handled entirely inside the controller skeleton
/// (forget-and-move-on); reconcilers themselves only ever construct the
/// other four variants.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("not found")]
    NotFound,

    #[error("validation failed (code {0}): {1}")]
    Validation(ErrorCode, String),

    #[error("{0}")]
    Transient(String),

    #[error("{0}")]
    Referential(String),

    #[error("{0}")]
    Policy(String),
}

impl ReconcileError {
    pub fn is_retryable_by_resync(&self) -> bool {
        matches!(
            self,
            ReconcileError::Transient(_) | ReconcileError::Referential(_)
        )
    }

    /// Joins an error's `source` chain with `": "`, root cause last,
    /// matching the `update_status` error-text format spec.md §4.2
    /// requires.
    pub fn chain_message(err: &(dyn std::error::Error + 'static)) -> String {
        let mut parts = vec![err.to_string()];
        let mut cur = err.source();
        while let Some(src) = cur {
            parts.push(src.to_string());
            cur = src.source();
        }
        parts.join(": ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_message_joins_root_cause_last() {
        #[derive(Debug)]
        struct Root;
        impl std::fmt::Display for Root {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "connection refused")
            }
        }
        impl std::error::Error for Root {}

        #[derive(Debug)]
        struct Mid(Root);
        impl std::fmt::Display for Mid {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "health check failed")
            }
        }
        impl std::error::Error for Mid {
            fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
                Some(&self.0)
            }
        }

        let err = Mid(Root);
        assert_eq!(
            ReconcileError::chain_message(&err),
            "health check failed: connection refused"
        );
    }

    #[test]
    fn transient_and_referential_are_resync_retryable() {
        assert!(ReconcileError::Transient("x".into()).is_retryable_by_resync());
        assert!(ReconcileError::Referential("x".into()).is_retryable_by_resync());
        assert!(!ReconcileError::Policy("x".into()).is_retryable_by_resync());
        assert!(!ReconcileError::NotFound.is_retryable_by_resync());
    }
}
