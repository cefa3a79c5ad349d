//! Scan events and the sensor application contract.

use super::query::QueryOptions;
use super::result::ApiResult;
use crate::types::{AccountId, ClueId, GeoLocation, ScanEventId, SpotId, TrailId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A hint pointing at an undiscovered spot near the scan location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clue {
    pub id: ClueId,
    pub spot_id: SpotId,
    pub location: GeoLocation,
    /// How close the account must get to discover the spot, in metres.
    pub discovery_radius: f64,
}

impl Clue {
    pub fn new(spot_id: SpotId, location: GeoLocation, discovery_radius: f64) -> Self {
        Self {
            id: ClueId::new(),
            spot_id,
            location,
            discovery_radius,
        }
    }
}

/// One completed discovery scan.
///
/// Immutable once created: fields are only readable, and the only
/// constructor is [`ScanEvent::record`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanEvent {
    id: ScanEventId,
    account_id: AccountId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trail_id: Option<TrailId>,
    scanned_at: DateTime<Utc>,
    radius_used: f64,
    successful: bool,
    clues: Vec<Clue>,
    created_at: DateTime<Utc>,
    location: GeoLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    silent: Option<bool>,
}

impl ScanEvent {
    /// Record a finished scan. `successful` is derived from the clues.
    pub fn record(
        request: &ScanRequest,
        location: GeoLocation,
        radius_used: f64,
        clues: Vec<Clue>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ScanEventId::new(),
            account_id: request.account_id.clone(),
            trail_id: request.trail_id.clone(),
            scanned_at: now,
            radius_used,
            successful: !clues.is_empty(),
            clues,
            created_at: now,
            location,
            silent: request.silent.then_some(true),
        }
    }

    pub fn id(&self) -> ScanEventId {
        self.id
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn trail_id(&self) -> Option<&TrailId> {
        self.trail_id.as_ref()
    }

    pub fn scanned_at(&self) -> DateTime<Utc> {
        self.scanned_at
    }

    pub fn radius_used(&self) -> f64 {
        self.radius_used
    }

    pub fn successful(&self) -> bool {
        self.successful
    }

    pub fn clues(&self) -> &[Clue] {
        &self.clues
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn location(&self) -> GeoLocation {
        self.location
    }

    pub fn is_silent(&self) -> bool {
        self.silent.unwrap_or(false)
    }

    /// Get a short summary of the scan.
    pub fn summary(&self) -> String {
        format!(
            "{} {} - {} clue(s) within {:.0} m{}",
            self.id.short(),
            self.trail_id
                .as_ref()
                .map_or_else(|| "(no trail)".to_string(), |t| t.to_string()),
            self.clues.len(),
            self.radius_used,
            if self.is_silent() { " [silent]" } else { "" }
        )
    }
}

/// What the caller asks the sensor application to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub account_id: AccountId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trail_id: Option<TrailId>,
    /// Background scans are recorded but not announced to the user.
    #[serde(default)]
    pub silent: bool,
}

impl ScanRequest {
    pub fn new(account_id: AccountId, trail_id: Option<TrailId>) -> Self {
        Self {
            account_id,
            trail_id,
            silent: false,
        }
    }

    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }
}

/// A scan that has started but not yet completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingScan {
    pub account_id: AccountId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trail_id: Option<TrailId>,
    pub started_at: DateTime<Utc>,
}

/// The external application that performs scans.
///
/// Implementations answer with [`ApiResult`] envelopes and never fail with
/// a Rust error across this boundary.
#[async_trait]
pub trait SensorApplication: Send + Sync {
    /// Run one scan and return the recorded event.
    async fn scan(&self, request: ScanRequest) -> ApiResult<ScanEvent>;

    /// List previously recorded scans of an account.
    async fn list_scan_events(
        &self,
        account_id: &AccountId,
        trail_id: Option<&TrailId>,
        options: Option<QueryOptions>,
    ) -> ApiResult<Vec<ScanEvent>>;
}
