//! Exit code constants for the tfunlock CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, uninitialized store, invalid resource)
//! - 2: Target resource not found
//! - 3: Conflict persisted past the retry budget
//! - 4: Object store failure
//! - 5: Store write lock failure
//! - 6: Deadline exceeded or cancelled

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid names, or uninitialized store.
pub const USER_ERROR: i32 = 1;

/// The target resource does not exist.
pub const NOT_FOUND: i32 = 2;

/// Concurrent modification could not be resolved within the retry budget.
pub const CONFLICT: i32 = 3;

/// Object store I/O or parse failure.
pub const STORE_FAILURE: i32 = 4;

/// Store write lock could not be acquired or cleared.
pub const LOCK_FAILURE: i32 = 5;

/// The operation ran out of time or was cancelled.
pub const TIMEOUT: i32 = 6;
