//! Core type definitions using newtype patterns for type safety.
//!
//! Identifiers cannot be mixed up with one another, and coordinates are
//! validated on construction.

mod geo;
mod ids;

pub use geo::{
    CardinalDirection, GeoBoundary, GeoDirection, GeoError, GeoLocation, GeoRegion,
    EARTH_RADIUS_M,
};
pub use ids::{AccountId, ClueId, DiscoveryId, IdError, ScanEventId, SpotId, TrailId};
