//! # ferthe - location-based discovery trails
//!
//! Client-side building blocks for ferthe: users walk trails, scan their
//! surroundings for clues pointing at nearby spots, and react to each
//! other's discoveries.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use ferthe::sensor::{FixedLocation, LocalSensor, ScanCompleted, ScanSession};
//! use ferthe::storage::{MemoryScanStore, TrailCatalog};
//! use ferthe::events::EventStore;
//! use ferthe::types::{AccountId, GeoLocation};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let here = GeoLocation::new(52.52, 13.405).unwrap();
//!     let sensor = LocalSensor::new(
//!         Arc::new(TrailCatalog::in_memory()),
//!         Arc::new(MemoryScanStore::new()),
//!         Arc::new(FixedLocation::new(here)),
//!     );
//!     let session = ScanSession::new(AccountId::new("me").unwrap(), Arc::new(sensor));
//!     session
//!         .events()
//!         .on_fn::<ScanCompleted, _>(|scan| println!("{}", scan.summary()));
//!
//!     session.start_scan(None).await.unwrap();
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`events`] - Typed event stores with per-event listener registries
//! - [`sensor`] - Scan sessions and the local sensor application
//! - [`reactions`] - Reactions on discoveries
//! - [`contracts`] - Wire types: result envelope, query options, trails, scans
//! - [`types`] - Identifiers and geographic primitives
//! - [`config`] - Environment configuration and application paths
//! - [`storage`] - Local scan history and trail catalog
//! - [`error`] - Error types
//! - [`output`] - Output formatting utilities

pub mod cli;
pub mod config;
pub mod contracts;
pub mod error;
pub mod events;
pub mod output;
pub mod reactions;
pub mod sensor;
pub mod slug;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use contracts::{ApiResult, ErrorResult, QueryOptions, ScanEvent, Trail};
pub use error::{CliError, SensorError};
pub use events::{EventName, EventStore};
pub use sensor::{ScanSession, SensorEvents};
pub use types::{AccountId, GeoLocation, ScanEventId, TrailId};
