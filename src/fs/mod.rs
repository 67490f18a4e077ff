//! Filesystem utilities for tfunlock.
//!
//! Resource documents are only ever replaced atomically so a reader never
//! observes a half-written object.

pub mod atomic;

pub use atomic::atomic_write_file;
