//! Scan lifecycle for one account.

use super::{ScanCompleted, ScanStarted, SensorEvents};
use crate::contracts::{PendingScan, ScanEvent, ScanRequest, SensorApplication};
use crate::error::{SensorError, SensorResult};
use crate::events::EventStore;
use crate::types::{AccountId, ScanEventId, TrailId};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, warn};

type PendingKey = Option<TrailId>;

#[derive(Debug, Default)]
struct SessionState {
    records: Vec<ScanEvent>,
    latest_scan_id: Option<ScanEventId>,
    pending: HashMap<PendingKey, PendingScan>,
}

/// Scan state of one account: pending scans, completed records and the
/// latest scan id.
///
/// Every completed scan appends exactly one record, updates
/// `latest_scan_id` to that record's id, and emits exactly one
/// [`ScanCompleted`] event.
pub struct ScanSession {
    account_id: AccountId,
    sensor: Arc<dyn SensorApplication>,
    events: Arc<SensorEvents>,
    timeout: Option<Duration>,
    state: Mutex<SessionState>,
}

impl ScanSession {
    pub fn new(account_id: AccountId, sensor: Arc<dyn SensorApplication>) -> Self {
        Self {
            account_id,
            sensor,
            events: Arc::new(SensorEvents::new()),
            timeout: None,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Share an existing event store instead of creating a new one.
    pub fn with_events(mut self, events: Arc<SensorEvents>) -> Self {
        self.events = events;
        self
    }

    /// Abort sensor calls that take longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn events(&self) -> &Arc<SensorEvents> {
        &self.events
    }

    /// Run one scan, optionally scoped to a trail.
    pub async fn start_scan(&self, trail_id: Option<TrailId>) -> SensorResult<ScanEvent> {
        self.run(ScanRequest::new(self.account_id.clone(), trail_id))
            .await
    }

    /// Run a background scan that is recorded but not surfaced to the user.
    pub async fn start_silent_scan(&self, trail_id: Option<TrailId>) -> SensorResult<ScanEvent> {
        self.run(ScanRequest::new(self.account_id.clone(), trail_id).silent())
            .await
    }

    async fn run(&self, request: ScanRequest) -> SensorResult<ScanEvent> {
        let key = request.trail_id.clone();
        let pending = PendingScan {
            account_id: self.account_id.clone(),
            trail_id: key.clone(),
            started_at: Utc::now(),
        };

        {
            let mut state = self.lock();
            if state.pending.contains_key(&key) {
                return Err(SensorError::ScanInProgress(describe(&key)));
            }
            state.pending.insert(key.clone(), pending.clone());
        }
        // Removes the pending record on every exit path, including when this
        // future is dropped mid-scan.
        let guard = PendingGuard {
            state: &self.state,
            key: Some(key.clone()),
        };

        debug!(account = %self.account_id, trail = %describe(&key), "scan started");
        self.events.emit::<ScanStarted>(&pending);

        let outcome = self.call_sensor(request).await;
        drop(guard);

        let event = match outcome {
            Ok(event) => event,
            Err(e) => {
                warn!(trail = %describe(&key), error = %e, "scan failed");
                return Err(e);
            }
        };

        {
            let mut state = self.lock();
            state.records.push(event.clone());
            state.latest_scan_id = Some(event.id());
        }

        info!(
            scan = %event.id().short(),
            trail = %describe(&key),
            clues = event.clues().len(),
            "scan completed"
        );
        self.events.emit::<ScanCompleted>(&event);
        Ok(event)
    }

    async fn call_sensor(&self, request: ScanRequest) -> SensorResult<ScanEvent> {
        let call = self.sensor.scan(request);
        let envelope = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| SensorError::Timeout(limit.as_millis() as u64))?,
            None => call.await,
        };
        envelope.into_result().map_err(SensorError::Rejected)
    }

    /// Completed scans in completion order.
    pub fn records(&self) -> Vec<ScanEvent> {
        self.lock().records.clone()
    }

    pub fn record_count(&self) -> usize {
        self.lock().records.len()
    }

    pub fn latest_scan_id(&self) -> Option<ScanEventId> {
        self.lock().latest_scan_id
    }

    pub fn latest_scan(&self) -> Option<ScanEvent> {
        let state = self.lock();
        let id = state.latest_scan_id?;
        state.records.iter().rev().find(|r| r.id() == id).cloned()
    }

    /// The pending scan for `trail_id`, if one is running.
    pub fn pending(&self, trail_id: Option<&TrailId>) -> Option<PendingScan> {
        self.lock().pending.get(&trail_id.cloned()).cloned()
    }

    pub fn is_pending(&self, trail_id: Option<&TrailId>) -> bool {
        self.pending(trail_id).is_some()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // The lock is never held across listener calls or awaits, so the
        // state behind a poisoned lock is still consistent.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

struct PendingGuard<'a> {
    state: &'a Mutex<SessionState>,
    key: Option<PendingKey>,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.pending.remove(&key);
        }
    }
}

fn describe(key: &PendingKey) -> String {
    key.as_ref()
        .map_or_else(|| "(no trail)".to_string(), |t| t.to_string())
}
