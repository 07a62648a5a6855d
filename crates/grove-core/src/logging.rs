//! Structured logging schema and field name constants for grove.
//!
//! Every `tracing` call in the workspace uses these field names so that log
//! aggregation can query the profile and review pipelines uniformly.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, zero/empty fallback applied |
//! | INFO  | Lifecycle events, profile commits |
//! | DEBUG | Decision points (cache hit, fallback step, stale discard) |
//! | TRACE | Per-item iteration (registration events, devices) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID for one profile request.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "profile", "review", "client"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "resolver", "registration", "capture_status", "aggregator"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "resolve", "aggregate", "request", "collapse"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Internal numeric grower id.
pub const GROWER_ID: &str = "grower_id";

/// External grower account identifier.
pub const GROWER_ACCOUNT_UUID: &str = "grower_account_uuid";

/// Candidate group id in the review queue.
pub const GROUP_ID: &str = "group_id";

/// Monotonic request generation used for stale-result checks.
pub const GENERATION: &str = "generation";

/// Identifier a profile request was made for (id or account UUID, displayed).
pub const TARGET: &str = "target";

/// Device identifier from a registration event.
pub const DEVICE_IDENTIFIER: &str = "device_identifier";

/// Capture status a count query was made for.
/// Values: "approved", "awaiting", "rejected"
pub const CAPTURE_STATUS: &str = "status";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of records returned by a query.
pub const RESULT_COUNT: &str = "result_count";

/// Size of the caller's local grower cache at resolution time.
pub const CACHE_SIZE: &str = "cache_size";

/// Number of distinct devices in a committed profile.
pub const DEVICE_COUNT: &str = "devices";

/// Sum of the per-status capture counts.
pub const CAPTURE_TOTAL: &str = "total";

/// HTTP status code of a failed admin API response.
pub const HTTP_STATUS: &str = "http_status";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Whether a remote lookup returned a record.
pub const FOUND: &str = "found";

/// Whether a failed admin API call may succeed on retry.
pub const RETRYABLE: &str = "retryable";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
