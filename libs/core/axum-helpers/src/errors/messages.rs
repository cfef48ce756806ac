//! Standard client-facing messages for consistent error responses.

pub const INTERNAL_ERROR: &str = "An unexpected error occurred";
pub const AUTHENTICATION_REQUIRED: &str = "Authentication required";
pub const ACCESS_DENIED: &str = "Access denied";
