//! In-process sensor application backed by the local trail catalog.

use crate::contracts::{
    ApiResult, Clue, QueryOptions, ScanEvent, ScanRequest, SensorApplication,
    DEFAULT_SCANNER_RADIUS,
};
use crate::error::{SensorError, SensorResult};
use crate::storage::{filter_events, ScanEventStore, TrailCatalog};
use crate::types::{AccountId, GeoLocation, GeoRegion, TrailId};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Where the device currently is.
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn current_location(&self) -> SensorResult<GeoLocation>;
}

/// A location source that always reports the same position, or never has a
/// fix at all.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation {
    location: Option<GeoLocation>,
}

impl FixedLocation {
    pub fn new(location: GeoLocation) -> Self {
        Self {
            location: Some(location),
        }
    }

    pub fn unavailable() -> Self {
        Self { location: None }
    }
}

#[async_trait]
impl LocationSource for FixedLocation {
    async fn current_location(&self) -> SensorResult<GeoLocation> {
        self.location
            .ok_or_else(|| SensorError::LocationUnavailable("no position fix".to_string()))
    }
}

/// Sensor that turns nearby trail spots into clues and records every scan in
/// a [`ScanEventStore`].
///
/// A scan scoped to a trail uses that trail's scanner radius. An unscoped
/// scan looks at every known trail with [`DEFAULT_SCANNER_RADIUS`].
pub struct LocalSensor {
    trails: Arc<TrailCatalog>,
    history: Arc<dyn ScanEventStore>,
    location: Arc<dyn LocationSource>,
}

impl LocalSensor {
    pub fn new(
        trails: Arc<TrailCatalog>,
        history: Arc<dyn ScanEventStore>,
        location: Arc<dyn LocationSource>,
    ) -> Self {
        Self {
            trails,
            history,
            location,
        }
    }

    async fn try_scan(&self, request: &ScanRequest) -> SensorResult<ScanEvent> {
        let here = self.location.current_location().await?;

        let (trails, radius) = match &request.trail_id {
            Some(id) => {
                let trail = self
                    .trails
                    .get(id)?
                    .ok_or_else(|| SensorError::TrailNotFound(id.to_string()))?;
                let radius = trail.options.scanner_radius;
                (vec![trail], radius)
            }
            None => (self.trails.list()?, DEFAULT_SCANNER_RADIUS),
        };

        let region = GeoRegion { center: here, radius };
        let mut clues: Vec<Clue> = trails
            .iter()
            .flat_map(|trail| {
                trail.spots_within(&region).into_iter().map(|spot| {
                    Clue::new(
                        spot.id.clone(),
                        spot.location,
                        trail.options.discovery_radius,
                    )
                })
            })
            .collect();
        clues.sort_by(|a, b| {
            here.distance_to(&a.location)
                .total_cmp(&here.distance_to(&b.location))
        });

        let event = ScanEvent::record(request, here, radius, clues);
        self.history.append(&event)?;
        debug!(scan = %event.id().short(), clues = event.clues().len(), "scan recorded");
        Ok(event)
    }

    fn try_list(
        &self,
        account_id: &AccountId,
        trail_id: Option<&TrailId>,
        options: Option<&QueryOptions>,
    ) -> SensorResult<Vec<ScanEvent>> {
        let mut events = self.history.list(account_id, None)?;
        if let Some(trail_id) = trail_id {
            events.retain(|e| e.trail_id() == Some(trail_id));
        }
        Ok(filter_events(events, account_id, options))
    }
}

#[async_trait]
impl SensorApplication for LocalSensor {
    async fn scan(&self, request: ScanRequest) -> ApiResult<ScanEvent> {
        self.try_scan(&request).await.into()
    }

    async fn list_scan_events(
        &self,
        account_id: &AccountId,
        trail_id: Option<&TrailId>,
        options: Option<QueryOptions>,
    ) -> ApiResult<Vec<ScanEvent>> {
        self.try_list(account_id, trail_id, options.as_ref()).into()
    }
}
