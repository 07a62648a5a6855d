//! Core traits for grove abstractions.
//!
//! The remote tree-tracker API is reached only through these traits, so the
//! reconciliation logic can be driven by the HTTP client in production and by
//! in-memory backends in tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// REMOTE SOURCE TRAITS
// =============================================================================

/// Remote lookup of grower records.
#[async_trait]
pub trait GrowerSource: Send + Sync {
    /// List growers matching a filter.
    async fn fetch_growers(&self, filter: &GrowerFilter) -> Result<Vec<Grower>>;

    /// Fetch one grower by internal id. `Ok(None)` when the id is unknown.
    async fn fetch_grower_by_id(&self, id: i64) -> Result<Option<Grower>>;
}

/// Remote lookup of a grower's registration events.
#[async_trait]
pub trait RegistrationSource: Send + Sync {
    /// All registrations for a grower, in no particular order.
    async fn fetch_registrations(&self, grower_id: i64) -> Result<Vec<RegistrationEvent>>;
}

/// Remote capture counting.
#[async_trait]
pub trait CaptureCountSource: Send + Sync {
    /// Count captures matching a filter.
    async fn fetch_capture_count(&self, filter: &CaptureFilter) -> Result<CaptureCount>;
}

/// Everything the profile aggregator needs from the remote API.
pub trait TrackerBackend: GrowerSource + RegistrationSource + CaptureCountSource {}

impl<T> TrackerBackend for T where T: GrowerSource + RegistrationSource + CaptureCountSource {}

// =============================================================================
// REVIEW TRAITS
// =============================================================================

/// Receiver of operator decisions from the candidate review queue.
///
/// The sink owns the authoritative candidate list; removing a decided group
/// from it is the sink's job.
pub trait DecisionSink: Send + Sync {
    fn on_decision(&self, group_id: GroupId, decision: Decision);
}

impl<F> DecisionSink for F
where
    F: Fn(GroupId, Decision) + Send + Sync,
{
    fn on_decision(&self, group_id: GroupId, decision: Decision) {
        self(group_id, decision)
    }
}
