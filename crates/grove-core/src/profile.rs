//! Grower profile state machine.
//!
//! [`GrowerProfileAggregator`] turns a requested [`GrowerIdentifier`] into a
//! [`GrowerProfile`]:
//!
//! ```text
//! Idle -> ResolvingGrower -> ResolvingDetail -> Ready
//!                  |                  ^
//!                  |  same grower id  |
//!                  +-----> Ready -----+
//!                  |
//!                  +-----> Errored
//! ```
//!
//! Every transition is published as an immutable [`ProfileSnapshot`] on a
//! `watch` channel. Each request is tagged with a generation number; a
//! request whose generation is no longer current when a remote call returns
//! commits nothing and reports [`RequestOutcome::Superseded`].
//!
//! Registrations and capture counts are loaded once per resolved grower id
//! and reused while the same grower stays selected. A request that resolves
//! to the grower whose detail is still loading waits for that load instead
//! of starting another. Failures while loading them degrade to empty lists
//! and zero counts.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{watch, Mutex, OnceCell};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::capture_status::CaptureStatusAggregator;
use crate::models::{CaptureStatusSummary, Grower, GrowerIdentifier, GrowerProfile, GrowerQuery};
use crate::registration::{dedupe, DedupedRegistrations};
use crate::resolver::GrowerResolver;
use crate::traits::TrackerBackend;

/// Where the aggregator is for the current target.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfilePhase {
    /// No grower requested.
    Idle,
    /// Looking the grower up locally and remotely.
    ResolvingGrower,
    /// Grower found; registrations and capture counts in flight.
    ResolvingDetail,
    /// Profile complete.
    Ready(Arc<GrowerProfile>),
    /// The grower could not be resolved. Holds the operator-facing message.
    Errored(String),
}

/// Immutable view of the aggregator after a transition.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSnapshot {
    /// Generation of the request that produced this snapshot.
    pub generation: u64,
    pub target: Option<GrowerIdentifier>,
    pub phase: ProfilePhase,
}

impl ProfileSnapshot {
    fn idle() -> Self {
        Self {
            generation: 0,
            target: None,
            phase: ProfilePhase::Idle,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self.phase,
            ProfilePhase::ResolvingGrower | ProfilePhase::ResolvingDetail
        )
    }

    pub fn profile(&self) -> Option<&GrowerProfile> {
        match &self.phase {
            ProfilePhase::Ready(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            ProfilePhase::Errored(message) => Some(message),
            _ => None,
        }
    }
}

/// Result of a single [`GrowerProfileAggregator::request`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// The profile was committed as the current state.
    Ready(Arc<GrowerProfile>),
    /// The grower was not found; the error state was committed.
    NotFound(String),
    /// A newer request (or a clear) replaced this one; nothing was committed.
    Superseded,
}

/// Registration-derived data and counts for one grower id.
#[derive(Debug)]
struct ProfileDetail {
    grower_id: i64,
    registrations: DedupedRegistrations,
    capture_status: CaptureStatusSummary,
}

/// Detail load shared by every request that resolves to `grower_id`.
struct InFlightDetail {
    grower_id: i64,
    cell: Arc<OnceCell<Arc<ProfileDetail>>>,
}

enum DetailSource {
    Committed(Arc<ProfileDetail>),
    Loading(Arc<OnceCell<Arc<ProfileDetail>>>),
}

struct ControllerState {
    generation: u64,
    target: Option<GrowerIdentifier>,
    detail: Option<Arc<ProfileDetail>>,
    in_flight: Option<InFlightDetail>,
}

/// Owns the profile state for one dashboard view.
pub struct GrowerProfileAggregator<B: ?Sized> {
    backend: Arc<B>,
    resolver: GrowerResolver<B>,
    capture_status: CaptureStatusAggregator<B>,
    state: Mutex<ControllerState>,
    snapshots: watch::Sender<ProfileSnapshot>,
}

impl<B: TrackerBackend + ?Sized> GrowerProfileAggregator<B> {
    pub fn new(backend: Arc<B>) -> Self {
        let (snapshots, _) = watch::channel(ProfileSnapshot::idle());
        Self {
            resolver: GrowerResolver::new(Arc::clone(&backend)),
            capture_status: CaptureStatusAggregator::new(Arc::clone(&backend)),
            backend,
            state: Mutex::new(ControllerState {
                generation: 0,
                target: None,
                detail: None,
                in_flight: None,
            }),
            snapshots,
        }
    }

    /// Current state.
    pub fn snapshot(&self) -> ProfileSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receive every published snapshot from now on.
    pub fn subscribe(&self) -> watch::Receiver<ProfileSnapshot> {
        self.snapshots.subscribe()
    }

    /// Drop the current target and return to Idle.
    ///
    /// Requests still in flight will find their generation outdated and
    /// commit nothing.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.generation += 1;
        state.target = None;
        state.in_flight = None;
        debug!(
            subsystem = "profile",
            component = "aggregator",
            op = "clear",
            generation = state.generation,
            "Profile target cleared"
        );
        self.publish(&state, ProfilePhase::Idle);
    }

    /// Make `identifier` the current target and resolve its profile.
    ///
    /// `local_cache` is the grower list the dashboard already holds; it is
    /// consulted before any remote lookup and never modified.
    pub async fn request(
        &self,
        identifier: GrowerIdentifier,
        local_cache: &[Grower],
    ) -> RequestOutcome {
        let request_id = Uuid::now_v7();
        let start = Instant::now();

        let generation = {
            let mut state = self.state.lock().await;
            state.generation += 1;
            state.target = Some(identifier.clone());
            self.publish(&state, ProfilePhase::ResolvingGrower);
            state.generation
        };

        debug!(
            subsystem = "profile",
            component = "aggregator",
            op = "request",
            %request_id,
            generation,
            target = %identifier,
            "Profile requested"
        );

        let grower = match self
            .resolver
            .resolve(&GrowerQuery::from(&identifier), local_cache)
            .await
        {
            Ok(grower) => grower,
            Err(e) => {
                let message = e.to_string();
                let mut state = self.state.lock().await;
                if state.generation != generation {
                    return discard(request_id, generation);
                }
                state.detail = None;
                state.in_flight = None;
                self.publish(&state, ProfilePhase::Errored(message.clone()));
                info!(
                    subsystem = "profile",
                    component = "aggregator",
                    op = "request",
                    %request_id,
                    generation,
                    target = %identifier,
                    success = false,
                    error = %message,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Grower could not be resolved"
                );
                return RequestOutcome::NotFound(message);
            }
        };

        let source = {
            let mut state = self.state.lock().await;
            if state.generation != generation {
                return discard(request_id, generation);
            }
            let committed = state
                .detail
                .as_ref()
                .filter(|detail| detail.grower_id == grower.id)
                .cloned();
            match committed {
                Some(detail) => DetailSource::Committed(detail),
                None => {
                    self.publish(&state, ProfilePhase::ResolvingDetail);
                    let joined = state
                        .in_flight
                        .as_ref()
                        .filter(|pending| pending.grower_id == grower.id)
                        .map(|pending| Arc::clone(&pending.cell));
                    let cell = match joined {
                        Some(cell) => {
                            debug!(
                                %request_id,
                                grower_id = grower.id,
                                "Joining detail load already in flight"
                            );
                            cell
                        }
                        None => {
                            let cell = Arc::new(OnceCell::new());
                            state.in_flight = Some(InFlightDetail {
                                grower_id: grower.id,
                                cell: Arc::clone(&cell),
                            });
                            cell
                        }
                    };
                    DetailSource::Loading(cell)
                }
            }
        };

        let detail = match source {
            DetailSource::Committed(detail) => {
                debug!(
                    %request_id,
                    grower_id = grower.id,
                    "Grower id unchanged, reusing registrations and counts"
                );
                detail
            }
            DetailSource::Loading(cell) => {
                let grower_id = grower.id;
                let detail = cell
                    .get_or_init(|| async move { Arc::new(self.resolve_detail(grower_id).await) })
                    .await;
                Arc::clone(detail)
            }
        };

        let profile = Arc::new(compose(grower, &detail));

        let mut state = self.state.lock().await;
        if state.generation != generation {
            return discard(request_id, generation);
        }
        if state
            .in_flight
            .as_ref()
            .is_some_and(|pending| pending.grower_id == detail.grower_id)
        {
            state.in_flight = None;
        }
        state.detail = Some(detail);
        self.publish(&state, ProfilePhase::Ready(Arc::clone(&profile)));

        info!(
            subsystem = "profile",
            component = "aggregator",
            op = "request",
            %request_id,
            generation,
            grower_id = profile.grower.id,
            devices = profile.devices.len(),
            success = true,
            duration_ms = start.elapsed().as_millis() as u64,
            "Grower profile ready"
        );

        RequestOutcome::Ready(profile)
    }

    /// Registrations and capture counts, fetched concurrently.
    async fn resolve_detail(&self, grower_id: i64) -> ProfileDetail {
        let (registrations, capture_status) = tokio::join!(
            self.load_registrations(grower_id),
            self.capture_status.aggregate(grower_id),
        );
        ProfileDetail {
            grower_id,
            registrations,
            capture_status,
        }
    }

    async fn load_registrations(&self, grower_id: i64) -> DedupedRegistrations {
        match self.backend.fetch_registrations(grower_id).await {
            Ok(events) => {
                debug!(
                    subsystem = "profile",
                    component = "registration",
                    grower_id,
                    result_count = events.len(),
                    "Registrations loaded"
                );
                dedupe(events)
            }
            Err(e) => {
                warn!(
                    subsystem = "profile",
                    component = "registration",
                    op = "fetch",
                    grower_id,
                    error = %e,
                    "Registration query failed, showing no devices"
                );
                DedupedRegistrations::default()
            }
        }
    }

    fn publish(&self, state: &ControllerState, phase: ProfilePhase) {
        self.snapshots.send_replace(ProfileSnapshot {
            generation: state.generation,
            target: state.target.clone(),
            phase,
        });
    }
}

fn discard(request_id: Uuid, generation: u64) -> RequestOutcome {
    debug!(
        subsystem = "profile",
        component = "aggregator",
        %request_id,
        generation,
        "Discarding result for superseded request"
    );
    RequestOutcome::Superseded
}

fn compose(grower: Grower, detail: &ProfileDetail) -> GrowerProfile {
    GrowerProfile {
        grower,
        devices: detail.registrations.devices.clone(),
        countries: detail.registrations.countries(),
        registered_at: detail.registrations.registered_at(),
        registrations: detail.registrations.sorted_events.clone(),
        capture_status: detail.capture_status,
    }
}
