//! API constants
//!
//! All JSON endpoints are versioned under this prefix; the static upload
//! mount (`/uploads`) and health checks are not.

/// Versioned API path prefix.
pub const API_PREFIX: &str = "/api/v0";
