//! Per-status capture counting for a grower.
//!
//! The three status counts are independent remote queries. They are issued
//! together and joined; a failed or empty query counts as zero without
//! affecting its siblings.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::models::{CaptureCount, CaptureStatus, CaptureStatusSummary};
use crate::traits::CaptureCountSource;

/// Builds a [`CaptureStatusSummary`] from three concurrent count queries.
pub struct CaptureStatusAggregator<C: ?Sized> {
    source: Arc<C>,
}

impl<C: ?Sized> Clone for CaptureStatusAggregator<C> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<C: CaptureCountSource + ?Sized> CaptureStatusAggregator<C> {
    pub fn new(source: Arc<C>) -> Self {
        Self { source }
    }

    /// Count approved, awaiting, and rejected captures for a grower.
    ///
    /// Never fails: every query error degrades to 0 for that status only.
    pub async fn aggregate(&self, grower_id: i64) -> CaptureStatusSummary {
        let start = Instant::now();

        let (approved, awaiting, rejected) = tokio::join!(
            self.count(grower_id, CaptureStatus::Approved),
            self.count(grower_id, CaptureStatus::Awaiting),
            self.count(grower_id, CaptureStatus::Rejected),
        );

        let summary = CaptureStatusSummary {
            approved,
            awaiting,
            rejected,
        };

        debug!(
            subsystem = "profile",
            component = "capture_status",
            op = "aggregate",
            grower_id,
            approved,
            awaiting,
            rejected,
            total = summary.total(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Capture status counts resolved"
        );

        summary
    }

    async fn count(&self, grower_id: i64, status: CaptureStatus) -> u64 {
        let filter = status.filter(grower_id);
        match self.source.fetch_capture_count(&filter).await {
            Ok(response) => count_or_zero(response),
            Err(e) => {
                warn!(
                    subsystem = "profile",
                    component = "capture_status",
                    op = "count",
                    grower_id,
                    status = %status,
                    error = %e,
                    "Capture count query failed, using 0"
                );
                0
            }
        }
    }
}

/// Missing or negative counts read as zero.
fn count_or_zero(response: CaptureCount) -> u64 {
    response
        .count
        .and_then(|c| u64::try_from(c).ok())
        .unwrap_or(0)
}
