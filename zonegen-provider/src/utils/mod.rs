//! Utility modules.

/// Size limits and credential redaction for log output.
pub mod log_sanitizer;
