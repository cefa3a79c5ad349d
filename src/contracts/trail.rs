//! Trails and the spots placed along them.

use crate::slug::create_slug;
use crate::types::{GeoBoundary, GeoError, GeoLocation, GeoRegion, SpotId, TrailId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default radius (metres) a scan covers on a trail.
pub const DEFAULT_SCANNER_RADIUS: f64 = 500.0;

/// Default radius (metres) within which a spot counts as discovered.
pub const DEFAULT_DISCOVERY_RADIUS: f64 = 25.0;

/// A point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spot {
    pub id: SpotId,
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location: GeoLocation,
    pub created_at: DateTime<Utc>,
}

impl Spot {
    /// Create a spot whose slug is derived from its name.
    pub fn new(id: SpotId, name: impl Into<String>, location: GeoLocation) -> Self {
        let name = name.into();
        Self {
            id,
            slug: create_slug(&name),
            name,
            description: None,
            location,
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Per-trail scanner settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailOptions {
    #[serde(default = "default_scanner_radius")]
    pub scanner_radius: f64,
    #[serde(default = "default_discovery_radius")]
    pub discovery_radius: f64,
}

fn default_scanner_radius() -> f64 {
    DEFAULT_SCANNER_RADIUS
}

fn default_discovery_radius() -> f64 {
    DEFAULT_DISCOVERY_RADIUS
}

impl Default for TrailOptions {
    fn default() -> Self {
        Self {
            scanner_radius: DEFAULT_SCANNER_RADIUS,
            discovery_radius: DEFAULT_DISCOVERY_RADIUS,
        }
    }
}

/// A walkable route with its spots.
///
/// The center is always derived from `boundary` and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trail {
    pub id: TrailId,
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub boundary: GeoBoundary,
    #[serde(default)]
    pub spots: Vec<Spot>,
    #[serde(default)]
    pub options: TrailOptions,
}

impl Trail {
    pub fn new(id: TrailId, name: impl Into<String>, boundary: GeoBoundary) -> Self {
        let name = name.into();
        Self {
            id,
            slug: create_slug(&name),
            name,
            description: None,
            boundary,
            spots: Vec::new(),
            options: TrailOptions::default(),
        }
    }

    /// Build a trail whose boundary tightly encloses `spots`.
    pub fn from_spots(
        id: TrailId,
        name: impl Into<String>,
        spots: Vec<Spot>,
    ) -> Result<Self, GeoError> {
        let boundary = GeoBoundary::from_locations(spots.iter().map(|s| &s.location))?;
        let mut trail = Self::new(id, name, boundary);
        trail.spots = spots;
        Ok(trail)
    }

    pub fn with_options(mut self, options: TrailOptions) -> Self {
        self.options = options;
        self
    }

    pub fn center(&self) -> GeoLocation {
        self.boundary.center()
    }

    pub fn spot(&self, id: &SpotId) -> Option<&Spot> {
        self.spots.iter().find(|s| &s.id == id)
    }

    /// Spots inside `region`, closest first.
    pub fn spots_within(&self, region: &GeoRegion) -> Vec<&Spot> {
        let mut hits: Vec<(f64, &Spot)> = self
            .spots
            .iter()
            .map(|s| (region.center.distance_to(&s.location), s))
            .filter(|(d, _)| *d <= region.radius)
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        hits.into_iter().map(|(_, s)| s).collect()
    }

    /// The spot closest to `location` with its distance in metres.
    pub fn nearest_spot(&self, location: &GeoLocation) -> Option<(&Spot, f64)> {
        self.spots
            .iter()
            .map(|s| (s, location.distance_to(&s.location)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}
