//! Configuration model for tfunlock.
//!
//! This module defines the Config struct that represents `.tfunlock/config.yaml`.
//! Unknown fields are ignored, every field has a default, and values are
//! validated on load.

mod model;
mod operations;
pub mod types;


pub use model::Config;
