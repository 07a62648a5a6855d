//! Core data models for grove.
//!
//! Growers, their registration events and capture counts, the composed
//! profile handed to the dashboard, and the candidate groups reviewed during
//! capture matching.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::defaults::APPLE_MANUFACTURER;
use crate::error::Error;

// =============================================================================
// GROWER TYPES
// =============================================================================

/// Canonical grower (planter) record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grower {
    /// Internal numeric id.
    pub id: i64,
    /// External account identifier (UUID string from the wallet/account service).
    pub grower_account_uuid: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub person_id: Option<i64>,
    pub image_url: Option<String>,
    /// Clockwise rotation of the profile image, in degrees.
    pub image_rotation: Option<i32>,
    pub organization: Option<String>,
    pub organization_id: Option<i64>,
}

impl Grower {
    /// Minimal record with only an id, mostly useful in tests and fixtures.
    pub fn with_id(id: i64) -> Self {
        Self {
            id,
            grower_account_uuid: None,
            first_name: None,
            last_name: None,
            email: None,
            phone: None,
            person_id: None,
            image_url: None,
            image_rotation: None,
            organization: None,
            organization_id: None,
        }
    }

    /// Builder-style setter for the external account identifier.
    pub fn account_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.grower_account_uuid = Some(uuid.into());
        self
    }

    /// "First Last", skipping whichever part is missing.
    pub fn display_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Identifier an operator uses to open a grower profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowerIdentifier {
    /// Internal numeric id.
    Id(i64),
    /// External account identifier.
    AccountUuid(String),
}

impl FromStr for GrowerIdentifier {
    type Err = Error;

    /// Numeric strings are internal ids; anything else is an account identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput(
                "grower identifier cannot be empty".to_string(),
            ));
        }
        match trimmed.parse::<i64>() {
            Ok(id) => Ok(Self::Id(id)),
            Err(_) => Ok(Self::AccountUuid(trimmed.to_string())),
        }
    }
}

impl fmt::Display for GrowerIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::AccountUuid(uuid) => write!(f, "{}", uuid),
        }
    }
}

/// Lookup request for grower resolution. Either field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrowerQuery {
    pub id: Option<i64>,
    pub grower_account_uuid: Option<String>,
}

impl GrowerQuery {
    pub fn by_id(id: i64) -> Self {
        Self {
            id: Some(id),
            grower_account_uuid: None,
        }
    }

    pub fn by_account_uuid(uuid: impl Into<String>) -> Self {
        Self {
            id: None,
            grower_account_uuid: Some(uuid.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.grower_account_uuid.is_none()
    }
}

impl From<&GrowerIdentifier> for GrowerQuery {
    fn from(identifier: &GrowerIdentifier) -> Self {
        match identifier {
            GrowerIdentifier::Id(id) => Self::by_id(*id),
            GrowerIdentifier::AccountUuid(uuid) => Self::by_account_uuid(uuid.clone()),
        }
    }
}

/// Remote filter for listing growers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowerFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grower_account_uuid: Option<String>,
}

// =============================================================================
// REGISTRATION TYPES
// =============================================================================

/// One app/device registration of a grower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationEvent {
    #[serde(default)]
    pub id: Option<i64>,
    /// Internal id of the grower this registration belongs to.
    #[serde(rename = "planter_id")]
    pub grower_id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub device_identifier: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Operating system inferred from a registration's manufacturer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceOs {
    #[serde(rename = "iOS")]
    Ios,
    Android,
}

impl DeviceOs {
    /// "apple" in any case is iOS; every other manufacturer, or none, is Android.
    pub fn from_manufacturer(manufacturer: Option<&str>) -> Self {
        match manufacturer {
            Some(m) if m.eq_ignore_ascii_case(APPLE_MANUFACTURER) => Self::Ios,
            _ => Self::Android,
        }
    }
}

impl fmt::Display for DeviceOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ios => write!(f, "iOS"),
            Self::Android => write!(f, "Android"),
        }
    }
}

/// A distinct device a grower registered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub id: String,
    pub os: DeviceOs,
}

// =============================================================================
// CAPTURE STATUS TYPES
// =============================================================================

/// Verification status of a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureStatus {
    Approved,
    Awaiting,
    Rejected,
}

impl CaptureStatus {
    pub const ALL: [CaptureStatus; 3] = [Self::Approved, Self::Awaiting, Self::Rejected];

    /// Count filter selecting captures of this status for a grower.
    pub fn filter(self, grower_id: i64) -> CaptureFilter {
        let (active, approved) = match self {
            Self::Approved => (true, true),
            Self::Awaiting => (true, false),
            Self::Rejected => (false, false),
        };
        CaptureFilter {
            planter_id: grower_id,
            active,
            approved,
        }
    }
}

impl fmt::Display for CaptureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approved => write!(f, "approved"),
            Self::Awaiting => write!(f, "awaiting"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Filter for the remote capture count query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureFilter {
    pub planter_id: i64,
    pub active: bool,
    pub approved: bool,
}

/// Raw count response. The API may omit `count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureCount {
    #[serde(default)]
    pub count: Option<i64>,
}

/// Per-status capture counts for one grower.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureStatusSummary {
    pub approved: u64,
    pub awaiting: u64,
    pub rejected: u64,
}

impl CaptureStatusSummary {
    pub fn get(&self, status: CaptureStatus) -> u64 {
        match status {
            CaptureStatus::Approved => self.approved,
            CaptureStatus::Awaiting => self.awaiting,
            CaptureStatus::Rejected => self.rejected,
        }
    }

    pub fn total(&self) -> u64 {
        self.approved + self.awaiting + self.rejected
    }
}

// =============================================================================
// PROFILE TYPES
// =============================================================================

/// Everything the grower detail view shows, resolved in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowerProfile {
    pub grower: Grower,
    /// Registrations in chronological order.
    pub registrations: Vec<RegistrationEvent>,
    pub devices: Vec<DeviceIdentity>,
    pub countries: Vec<String>,
    pub registered_at: Option<DateTime<Utc>>,
    pub capture_status: CaptureStatusSummary,
}

// =============================================================================
// CANDIDATE MATCHING TYPES
// =============================================================================

/// Identifier of a candidate group.
pub type GroupId = i64;

/// One capture inside a candidate group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateCapture {
    pub id: i64,
    pub image_url: String,
}

/// A cluster of captures believed to show the same physical tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateGroup {
    pub id: GroupId,
    pub tree_id: i64,
    /// Representative image, used when the group carries no captures.
    pub image_url: String,
    #[serde(default)]
    pub captures: Vec<CandidateCapture>,
}

impl CandidateGroup {
    pub fn label(&self) -> String {
        format!("Tree {}", self.tree_id)
    }
}

/// Operator verdict on a candidate group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Same,
    Different,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Same => write!(f, "same"),
            Self::Different => write!(f, "different"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_numeric_is_id() {
        assert_eq!(
            "42".parse::<GrowerIdentifier>().unwrap(),
            GrowerIdentifier::Id(42)
        );
        assert_eq!(
            " 7 ".parse::<GrowerIdentifier>().unwrap(),
            GrowerIdentifier::Id(7)
        );
    }

    #[test]
    fn test_identifier_non_numeric_is_account_uuid() {
        let raw = "0b1c4a3e-6f6b-4b1e-9d3a-5b6e2f1c9a00";
        assert_eq!(
            raw.parse::<GrowerIdentifier>().unwrap(),
            GrowerIdentifier::AccountUuid(raw.to_string())
        );
    }

    #[test]
    fn test_identifier_blank_is_rejected() {
        let err = "   ".parse::<GrowerIdentifier>().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_query_from_identifier_sets_one_field() {
        let q = GrowerQuery::from(&GrowerIdentifier::Id(5));
        assert_eq!(q.id, Some(5));
        assert!(q.grower_account_uuid.is_none());

        let q = GrowerQuery::from(&GrowerIdentifier::AccountUuid("abc".into()));
        assert!(q.id.is_none());
        assert_eq!(q.grower_account_uuid.as_deref(), Some("abc"));
    }

    #[test]
    fn test_os_inference() {
        assert_eq!(DeviceOs::from_manufacturer(Some("Apple")), DeviceOs::Ios);
        assert_eq!(DeviceOs::from_manufacturer(Some("apple")), DeviceOs::Ios);
        assert_eq!(DeviceOs::from_manufacturer(Some("APPLE")), DeviceOs::Ios);
        assert_eq!(
            DeviceOs::from_manufacturer(Some("Samsung")),
            DeviceOs::Android
        );
        assert_eq!(DeviceOs::from_manufacturer(None), DeviceOs::Android);
    }

    #[test]
    fn test_device_os_serializes_as_label() {
        assert_eq!(serde_json::to_value(DeviceOs::Ios).unwrap(), "iOS");
        assert_eq!(serde_json::to_value(DeviceOs::Android).unwrap(), "Android");
    }

    #[test]
    fn test_capture_status_filters() {
        assert_eq!(
            CaptureStatus::Approved.filter(3),
            CaptureFilter {
                planter_id: 3,
                active: true,
                approved: true
            }
        );
        let awaiting = CaptureStatus::Awaiting.filter(3);
        assert!(awaiting.active && !awaiting.approved);
        let rejected = CaptureStatus::Rejected.filter(3);
        assert!(!rejected.active && !rejected.approved);
    }

    #[test]
    fn test_capture_status_summary_lookup() {
        let summary = CaptureStatusSummary {
            approved: 4,
            awaiting: 1,
            rejected: 2,
        };
        let per_status: Vec<u64> = CaptureStatus::ALL.iter().map(|s| summary.get(*s)).collect();
        assert_eq!(per_status, vec![4, 1, 2]);
        assert_eq!(summary.total(), 7);
    }

    #[test]
    fn test_capture_count_missing_field() {
        let count: CaptureCount = serde_json::from_str("{}").unwrap();
        assert_eq!(count.count, None);
    }

    #[test]
    fn test_grower_deserializes_camel_case() {
        let json = r#"{
            "id": 12,
            "growerAccountUuid": "abc",
            "firstName": "Ada",
            "lastName": "Okafor",
            "organizationId": 4
        }"#;
        let grower: Grower = serde_json::from_str(json).unwrap();
        assert_eq!(grower.id, 12);
        assert_eq!(grower.grower_account_uuid.as_deref(), Some("abc"));
        assert_eq!(grower.organization_id, Some(4));
        assert_eq!(grower.display_name(), "Ada Okafor");
        assert!(grower.email.is_none());
    }

    #[test]
    fn test_registration_deserializes_planter_id() {
        let json = r#"{
            "planter_id": 9,
            "created_at": "2021-03-01T10:00:00Z",
            "device_identifier": "dev-1",
            "manufacturer": "samsung",
            "country": "Kenya"
        }"#;
        let reg: RegistrationEvent = serde_json::from_str(json).unwrap();
        assert_eq!(reg.grower_id, 9);
        assert_eq!(reg.device_identifier.as_deref(), Some("dev-1"));
        assert!(reg.id.is_none());
    }

    #[test]
    fn test_candidate_group_label_and_decision_display() {
        let group = CandidateGroup {
            id: 1,
            tree_id: 880,
            image_url: "https://img/1.jpg".to_string(),
            captures: vec![],
        };
        assert_eq!(group.label(), "Tree 880");
        assert_eq!(Decision::Same.to_string(), "same");
        assert_eq!(Decision::Different.to_string(), "different");
    }
}
