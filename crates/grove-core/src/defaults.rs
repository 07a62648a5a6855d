//! Centralized default constants for grove.
//!
//! Shared default values live here so the client, the CLI, and the core
//! agree on them.

// =============================================================================
// MESSAGES
// =============================================================================

/// Operator-facing message when a grower matches nothing, locally or remotely.
pub const GROWER_NOT_FOUND_MESSAGE: &str = "Sorry! No grower info found";

// =============================================================================
// DEVICES
// =============================================================================

/// Manufacturer string (compared case-insensitively) that identifies iOS devices.
pub const APPLE_MANUFACTURER: &str = "apple";

// =============================================================================
// API CLIENT
// =============================================================================

/// Default tree-tracker admin API base URL.
pub const API_URL: &str = "http://localhost:3000/api/admin";

/// Default request timeout in seconds.
pub const API_TIMEOUT_SECS: u64 = 30;

/// Environment variable for the API base URL.
pub const ENV_API_URL: &str = "GROVE_API_URL";

/// Environment variable for the API bearer token.
pub const ENV_API_TOKEN: &str = "GROVE_API_TOKEN";

/// Environment variable for the request timeout in seconds.
pub const ENV_API_TIMEOUT: &str = "GROVE_API_TIMEOUT";
