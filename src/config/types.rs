//! Default values for configuration fields.

pub(crate) fn default_namespace() -> String {
    "flux-system".to_string()
}
pub(crate) fn default_lock_stale_minutes() -> u32 {
    10
}
pub(crate) fn default_timeout_seconds() -> u64 {
    30
}
