//! Registration deduplication.
//!
//! Growers re-register whenever they reinstall the app or switch phones, so
//! the raw registration list repeats devices. [`dedupe`] orders the events
//! and reduces them to one [`DeviceIdentity`] per device identifier.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::trace;

use crate::models::{DeviceIdentity, DeviceOs, RegistrationEvent};

/// Output of [`dedupe`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DedupedRegistrations {
    /// Input events, stable-sorted by `created_at` ascending.
    pub sorted_events: Vec<RegistrationEvent>,
    /// Distinct devices in first-seen order.
    pub devices: Vec<DeviceIdentity>,
}

impl DedupedRegistrations {
    /// Timestamp of the earliest registration.
    pub fn registered_at(&self) -> Option<DateTime<Utc>> {
        self.sorted_events.first().map(|e| e.created_at)
    }

    /// Distinct non-empty countries, in the order they first appear.
    pub fn countries(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.sorted_events
            .iter()
            .filter_map(|e| e.country.as_deref())
            .filter(|c| !c.is_empty())
            .filter(|c| seen.insert(*c))
            .map(str::to_string)
            .collect()
    }
}

/// Sort registrations chronologically and collect distinct devices.
///
/// Ties keep their input order. Events without a device identifier (missing
/// or empty) are skipped for the device list. The first event for an identifier decides its
/// OS; later events for the same identifier are ignored even if their
/// manufacturer differs.
pub fn dedupe(mut events: Vec<RegistrationEvent>) -> DedupedRegistrations {
    events.sort_by_key(|e| e.created_at);

    let mut seen: HashSet<&str> = HashSet::new();
    let mut devices = Vec::new();
    for event in &events {
        let Some(device_id) = event.device_identifier.as_deref().filter(|d| !d.is_empty()) else {
            continue;
        };
        if !seen.insert(device_id) {
            trace!(device_identifier = device_id, "Skipping repeated device");
            continue;
        }
        devices.push(DeviceIdentity {
            id: device_id.to_string(),
            os: DeviceOs::from_manufacturer(event.manufacturer.as_deref()),
        });
    }

    DedupedRegistrations {
        sorted_events: events,
        devices,
    }
}
