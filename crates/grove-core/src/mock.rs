//! Mock tracker backend for deterministic testing.
//!
//! Serves growers, registrations, and capture counts from memory, records
//! every call, and can inject per-grower latency and per-query failures.
//!
//! ## Usage
//!
//! ```rust
//! use grove_core::mock::MockTrackerBackend;
//! use grove_core::{CaptureStatus, Grower};
//!
//! let backend = MockTrackerBackend::new()
//!     .with_grower(Grower::with_id(5).account_uuid("abc"))
//!     .with_capture_count(5, CaptureStatus::Approved, 12)
//!     .with_latency_ms(5, 50);
//! assert_eq!(backend.total_calls(), 0);
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::*;
use crate::traits::{CaptureCountSource, GrowerSource, RegistrationSource};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    FetchGrowers(GrowerFilter),
    FetchGrowerById(i64),
    FetchRegistrations(i64),
    FetchCaptureCount(CaptureFilter),
}

/// In-memory [`crate::TrackerBackend`].
#[derive(Clone, Default)]
pub struct MockTrackerBackend {
    growers: Vec<Grower>,
    registrations: HashMap<i64, Vec<RegistrationEvent>>,
    counts: HashMap<(i64, CaptureStatus), i64>,
    failing_counts: HashSet<CaptureStatus>,
    failing_registrations: bool,
    failing_grower_lookups: bool,
    latency_ms: HashMap<i64, u64>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl MockTrackerBackend {
    /// Create an empty backend: no growers, no registrations, no counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a grower to the remote grower table.
    pub fn with_grower(mut self, grower: Grower) -> Self {
        self.growers.push(grower);
        self
    }

    /// Set the registrations returned for a grower.
    pub fn with_registrations(mut self, grower_id: i64, events: Vec<RegistrationEvent>) -> Self {
        self.registrations.insert(grower_id, events);
        self
    }

    /// Set the count returned for one status of a grower.
    pub fn with_capture_count(mut self, grower_id: i64, status: CaptureStatus, count: i64) -> Self {
        self.counts.insert((grower_id, status), count);
        self
    }

    /// Make every count query for a status fail.
    pub fn with_failing_capture_count(mut self, status: CaptureStatus) -> Self {
        self.failing_counts.insert(status);
        self
    }

    /// Make every registration query fail.
    pub fn with_failing_registrations(mut self) -> Self {
        self.failing_registrations = true;
        self
    }

    /// Make every grower lookup fail.
    pub fn with_failing_grower_lookups(mut self) -> Self {
        self.failing_grower_lookups = true;
        self
    }

    /// Delay every query that concerns this grower.
    pub fn with_latency_ms(mut self, grower_id: i64, latency_ms: u64) -> Self {
        self.latency_ms.insert(grower_id, latency_ms);
        self
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }

    pub fn total_calls(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    pub fn grower_list_calls(&self) -> usize {
        self.count_calls(|c| matches!(c, MockCall::FetchGrowers(_)))
    }

    pub fn grower_by_id_calls(&self) -> usize {
        self.count_calls(|c| matches!(c, MockCall::FetchGrowerById(_)))
    }

    pub fn registration_calls(&self) -> usize {
        self.count_calls(|c| matches!(c, MockCall::FetchRegistrations(_)))
    }

    pub fn capture_count_calls(&self) -> usize {
        self.count_calls(|c| matches!(c, MockCall::FetchCaptureCount(_)))
    }

    fn count_calls(&self, pred: impl Fn(&MockCall) -> bool) -> usize {
        self.call_log.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: MockCall) {
        self.call_log.lock().unwrap().push(call);
    }

    async fn simulate_latency(&self, grower_id: i64) {
        if let Some(&ms) = self.latency_ms.get(&grower_id) {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }
}

#[async_trait]
impl GrowerSource for MockTrackerBackend {
    async fn fetch_growers(&self, filter: &GrowerFilter) -> Result<Vec<Grower>> {
        self.record(MockCall::FetchGrowers(filter.clone()));
        if self.failing_grower_lookups {
            return Err(Error::Request("mock grower list failure".to_string()));
        }

        let matches: Vec<Grower> = self
            .growers
            .iter()
            .filter(|g| match &filter.grower_account_uuid {
                Some(uuid) => g.grower_account_uuid.as_ref() == Some(uuid),
                None => true,
            })
            .cloned()
            .collect();

        if let Some(first) = matches.first() {
            self.simulate_latency(first.id).await;
        }
        Ok(matches)
    }

    async fn fetch_grower_by_id(&self, id: i64) -> Result<Option<Grower>> {
        self.record(MockCall::FetchGrowerById(id));
        self.simulate_latency(id).await;
        if self.failing_grower_lookups {
            return Err(Error::Request("mock grower lookup failure".to_string()));
        }
        Ok(self.growers.iter().find(|g| g.id == id).cloned())
    }
}

#[async_trait]
impl RegistrationSource for MockTrackerBackend {
    async fn fetch_registrations(&self, grower_id: i64) -> Result<Vec<RegistrationEvent>> {
        self.record(MockCall::FetchRegistrations(grower_id));
        self.simulate_latency(grower_id).await;
        if self.failing_registrations {
            return Err(Error::Request("mock registration failure".to_string()));
        }
        Ok(self
            .registrations
            .get(&grower_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl CaptureCountSource for MockTrackerBackend {
    async fn fetch_capture_count(&self, filter: &CaptureFilter) -> Result<CaptureCount> {
        self.record(MockCall::FetchCaptureCount(*filter));
        self.simulate_latency(filter.planter_id).await;

        let status = CaptureStatus::ALL
            .into_iter()
            .find(|s| s.filter(filter.planter_id) == *filter);
        let Some(status) = status else {
            return Ok(CaptureCount::default());
        };
        if self.failing_counts.contains(&status) {
            return Err(Error::Request(format!("mock {} count failure", status)));
        }
        Ok(CaptureCount {
            count: self.counts.get(&(filter.planter_id, status)).copied(),
        })
    }
}
