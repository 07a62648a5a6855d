//! # grove-core
//!
//! Core types, traits, and reconciliation logic for the grove admin dashboard.
//!
//! This crate holds everything behind the grower detail and capture matching
//! views that is not presentation:
//! - Grower resolution against a local cache and the remote API
//! - Registration deduplication (device list, countries, first registration)
//! - Concurrent capture status counting
//! - The grower profile state machine with stale-result discarding
//! - Per-candidate review state for capture matching
//!
//! Network access goes through the traits in [`traits`]; see `grove-client`
//! for the HTTP implementation.

pub mod capture_status;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod profile;
pub mod registration;
pub mod resolver;
pub mod review;
pub mod traits;

// Mock tracker backend for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types at crate root
pub use capture_status::CaptureStatusAggregator;
pub use error::{Error, Result};
pub use models::*;
pub use profile::{GrowerProfileAggregator, ProfilePhase, ProfileSnapshot, RequestOutcome};
pub use registration::{dedupe, DedupedRegistrations};
pub use resolver::GrowerResolver;
pub use review::{CandidateReviewQueue, CandidateView};
pub use traits::*;
