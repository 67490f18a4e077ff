//! Error types for tfunlock.
//!
//! Uses thiserror for derive macros. Only `Conflict` is recoverable inside the
//! transition loop; every other variant propagates unchanged to the caller.

use crate::exit_codes;
use std::time::Duration;
use thiserror::Error;

/// Main error type for tfunlock operations.
#[derive(Error, Debug)]
pub enum UnlockError {
    /// User provided invalid arguments or the store is in an invalid state.
    #[error("{0}")]
    UserError(String),

    /// The target resource does not exist.
    #[error("terraform resource '{namespace}/{name}' not found")]
    NotFound { namespace: String, name: String },

    /// The resource changed between fetch and patch.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Object store I/O or parse failure.
    #[error("store operation failed: {0}")]
    Store(String),

    /// Conflicts persisted for every attempt in the retry budget.
    #[error("conflict persisted after {attempts} attempt(s): {last}")]
    RetriesExhausted { attempts: u32, last: String },

    /// Store write lock could not be acquired or cleared.
    #[error("lock operation failed: {0}")]
    LockError(String),

    /// The caller's deadline passed before the operation finished.
    #[error("deadline of {}s exceeded", .0.as_secs_f64())]
    DeadlineExceeded(Duration),

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,
}

impl UnlockError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            UnlockError::UserError(_) => exit_codes::USER_ERROR,
            UnlockError::NotFound { .. } => exit_codes::NOT_FOUND,
            UnlockError::Conflict(_) | UnlockError::RetriesExhausted { .. } => {
                exit_codes::CONFLICT
            }
            UnlockError::Store(_) => exit_codes::STORE_FAILURE,
            UnlockError::LockError(_) => exit_codes::LOCK_FAILURE,
            UnlockError::DeadlineExceeded(_) | UnlockError::Cancelled => exit_codes::TIMEOUT,
        }
    }

    /// Whether the transition loop may retry after this error.
    pub fn is_conflict(&self) -> bool {
        matches!(self, UnlockError::Conflict(_))
    }
}

/// Result type alias for tfunlock operations.
pub type Result<T> = std::result::Result<T, UnlockError>;
