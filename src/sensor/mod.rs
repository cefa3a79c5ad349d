//! Discovery scans.
//!
//! A [`ScanSession`] drives the scan lifecycle for one account against a
//! [`SensorApplication`](crate::contracts::SensorApplication) and announces
//! progress on its [`SensorEvents`] store. [`LocalSensor`] is an in-process
//! sensor application working from the local trail catalog.

mod local;
mod session;

pub use local::{FixedLocation, LocalSensor, LocationSource};
pub use session::ScanSession;

use crate::contracts::{PendingScan, ScanEvent};
use crate::events::EventName;

/// A scan was started and is waiting for the sensor.
pub enum ScanStarted {}

impl EventName for ScanStarted {
    type Payload = PendingScan;
    const NAME: &'static str = "scan-started";
}

/// A scan completed and its event was recorded.
pub enum ScanCompleted {}

impl EventName for ScanCompleted {
    type Payload = ScanEvent;
    const NAME: &'static str = "scan-completed";
}

crate::event_store! {
    /// Event store for the scan lifecycle.
    pub struct SensorEvents {
        started: ScanStarted,
        completed: ScanCompleted,
    }
}
