//! Coordinate value types.
//!
//! `GeoLocation` is always a valid WGS84 coordinate. Distances use the
//! haversine formula on a spherical earth, which is accurate well within
//! the tolerance of a phone GPS fix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Error type for coordinate validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeoError {
    #[error("latitude {0} is out of range (-90..=90)")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is out of range (-180..=180)")]
    LongitudeOutOfRange(f64),
    #[error("radius must be a finite, non-negative number of metres, got {0}")]
    InvalidRadius(f64),
    #[error("cannot build a boundary from zero locations")]
    EmptyBoundary,
    #[error("north-east corner {north_east} is not north-east of south-west corner {south_west}")]
    InvertedBoundary {
        north_east: GeoLocation,
        south_west: GeoLocation,
    },
}

/// A point on the earth's surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLocation")]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Deserialize)]
struct RawLocation {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawLocation> for GeoLocation {
    type Error = GeoError;

    fn try_from(raw: RawLocation) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lon)
    }
}

impl GeoLocation {
    /// Create a validated location.
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::LatitudeOutOfRange(lat));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(GeoError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Great-circle distance in metres.
    pub fn distance_to(&self, other: &GeoLocation) -> f64 {
        let (phi1, phi2) = (self.lat.to_radians(), other.lat.to_radians());
        let d_phi = (other.lat - self.lat).to_radians();
        let d_lambda = (other.lon - self.lon).to_radians();

        let a = (d_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
    }

    /// Initial bearing towards `other`, in degrees within `[0, 360)`.
    pub fn bearing_to(&self, other: &GeoLocation) -> f64 {
        let (phi1, phi2) = (self.lat.to_radians(), other.lat.to_radians());
        let d_lambda = (other.lon - self.lon).to_radians();

        let y = d_lambda.sin() * phi2.cos();
        let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
        normalize_bearing(y.atan2(x).to_degrees())
    }

    /// Bearing and cardinal direction towards `other`.
    pub fn direction_to(&self, other: &GeoLocation) -> GeoDirection {
        GeoDirection::from_bearing(self.bearing_to(other))
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lon)
    }
}

fn normalize_bearing(degrees: f64) -> f64 {
    let b = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if b >= 360.0 {
        0.0
    } else {
        b
    }
}

/// A circular area around a center point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRegion")]
pub struct GeoRegion {
    pub center: GeoLocation,
    /// Radius in metres.
    pub radius: f64,
}

#[derive(Deserialize)]
struct RawRegion {
    center: GeoLocation,
    radius: f64,
}

impl TryFrom<RawRegion> for GeoRegion {
    type Error = GeoError;

    fn try_from(raw: RawRegion) -> Result<Self, Self::Error> {
        Self::new(raw.center, raw.radius)
    }
}

impl GeoRegion {
    pub fn new(center: GeoLocation, radius: f64) -> Result<Self, GeoError> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(GeoError::InvalidRadius(radius));
        }
        Ok(Self { center, radius })
    }

    /// Check whether `location` lies inside the region (edge inclusive).
    pub fn contains(&self, location: &GeoLocation) -> bool {
        self.center.distance_to(location) <= self.radius
    }
}

/// An axis-aligned latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawBoundary")]
pub struct GeoBoundary {
    pub north_east: GeoLocation,
    pub south_west: GeoLocation,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBoundary {
    north_east: GeoLocation,
    south_west: GeoLocation,
}

impl TryFrom<RawBoundary> for GeoBoundary {
    type Error = GeoError;

    fn try_from(raw: RawBoundary) -> Result<Self, Self::Error> {
        Self::new(raw.north_east, raw.south_west)
    }
}

impl GeoBoundary {
    /// The north-east corner must be at least as far north and east as the
    /// south-west one.
    pub fn new(north_east: GeoLocation, south_west: GeoLocation) -> Result<Self, GeoError> {
        if north_east.lat < south_west.lat || north_east.lon < south_west.lon {
            return Err(GeoError::InvertedBoundary {
                north_east,
                south_west,
            });
        }
        Ok(Self {
            north_east,
            south_west,
        })
    }

    /// Smallest boundary containing every location.
    pub fn from_locations<'a, I>(locations: I) -> Result<Self, GeoError>
    where
        I: IntoIterator<Item = &'a GeoLocation>,
    {
        let mut iter = locations.into_iter();
        let first = iter.next().ok_or(GeoError::EmptyBoundary)?;
        let (mut north, mut east, mut south, mut west) = (first.lat, first.lon, first.lat, first.lon);

        for loc in iter {
            north = north.max(loc.lat);
            south = south.min(loc.lat);
            east = east.max(loc.lon);
            west = west.min(loc.lon);
        }

        Ok(Self {
            north_east: GeoLocation { lat: north, lon: east },
            south_west: GeoLocation { lat: south, lon: west },
        })
    }

    /// Midpoint of the box. Boxes crossing the antimeridian are not supported.
    pub fn center(&self) -> GeoLocation {
        GeoLocation {
            lat: (self.north_east.lat + self.south_west.lat) / 2.0,
            lon: (self.north_east.lon + self.south_west.lon) / 2.0,
        }
    }

    pub fn contains(&self, location: &GeoLocation) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&location.lat)
            && (self.south_west.lon..=self.north_east.lon).contains(&location.lon)
    }
}

/// Eight-point compass classification of a bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardinalDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CardinalDirection {
    const ALL: [CardinalDirection; 8] = [
        Self::N,
        Self::NE,
        Self::E,
        Self::SE,
        Self::S,
        Self::SW,
        Self::W,
        Self::NW,
    ];

    /// Classify a bearing into 45° sectors centred on each compass point.
    pub fn from_bearing(bearing: f64) -> Self {
        let b = normalize_bearing(bearing);
        let sector = ((b + 22.5) / 45.0).floor() as usize % 8;
        Self::ALL[sector]
    }
}

impl fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::N => "N",
            Self::NE => "NE",
            Self::E => "E",
            Self::SE => "SE",
            Self::S => "S",
            Self::SW => "SW",
            Self::W => "W",
            Self::NW => "NW",
        };
        f.write_str(s)
    }
}

/// A bearing together with its compass classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoDirection {
    /// Degrees clockwise from true north, `[0, 360)`.
    pub bearing: f64,
    pub direction: CardinalDirection,
}

impl GeoDirection {
    pub fn from_bearing(bearing: f64) -> Self {
        let bearing = normalize_bearing(bearing);
        Self {
            bearing,
            direction: CardinalDirection::from_bearing(bearing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(lat: f64, lon: f64) -> GeoLocation {
        GeoLocation::new(lat, lon).unwrap()
    }

    #[test]
    fn test_location_validation() {
        assert!(GeoLocation::new(91.0, 0.0).is_err());
        assert!(GeoLocation::new(0.0, -180.5).is_err());
        assert!(GeoLocation::new(f64::NAN, 0.0).is_err());
        assert!(GeoLocation::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        let d = loc(0.0, 0.0).distance_to(&loc(1.0, 0.0));
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = loc(47.3769, 8.5417);
        assert_eq!(p.distance_to(&p), 0.0);
    }

    #[test]
    fn test_bearing_cardinal_points() {
        let origin = loc(0.0, 0.0);
        assert!((origin.bearing_to(&loc(1.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((origin.bearing_to(&loc(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((origin.bearing_to(&loc(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((origin.bearing_to(&loc(0.0, -1.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_cardinal_classification() {
        assert_eq!(CardinalDirection::from_bearing(0.0), CardinalDirection::N);
        assert_eq!(CardinalDirection::from_bearing(22.4), CardinalDirection::N);
        assert_eq!(CardinalDirection::from_bearing(22.5), CardinalDirection::NE);
        assert_eq!(CardinalDirection::from_bearing(135.0), CardinalDirection::SE);
        assert_eq!(CardinalDirection::from_bearing(350.0), CardinalDirection::N);
        assert_eq!(CardinalDirection::from_bearing(-90.0), CardinalDirection::W);
        assert_eq!(CardinalDirection::from_bearing(300.0), CardinalDirection::NW);
    }

    #[test]
    fn test_direction_to() {
        let dir = loc(0.0, 0.0).direction_to(&loc(-1.0, -1.0));
        assert_eq!(dir.direction, CardinalDirection::SW);
    }

    #[test]
    fn test_boundary_center_and_contains() {
        let boundary = GeoBoundary::new(loc(48.0, 9.0), loc(46.0, 7.0)).unwrap();
        assert_eq!(boundary.center(), loc(47.0, 8.0));
        assert!(boundary.contains(&loc(47.5, 8.5)));
        assert!(!boundary.contains(&loc(49.0, 8.5)));
    }

    #[test]
    fn test_boundary_from_locations() {
        let points = [loc(1.0, 5.0), loc(-2.0, 3.0), loc(0.5, 7.0)];
        let boundary = GeoBoundary::from_locations(&points).unwrap();
        assert_eq!(boundary.north_east, loc(1.0, 7.0));
        assert_eq!(boundary.south_west, loc(-2.0, 3.0));
        assert_eq!(
            GeoBoundary::from_locations(&[]),
            Err(GeoError::EmptyBoundary)
        );
    }

    #[test]
    fn test_region_contains() {
        let region = GeoRegion::new(loc(0.0, 0.0), 200.0).unwrap();
        assert!(region.contains(&loc(0.001, 0.0)));
        assert!(!region.contains(&loc(0.01, 0.0)));
        assert!(GeoRegion::new(loc(0.0, 0.0), -1.0).is_err());
    }

    #[test]
    fn test_boundary_wire_names() {
        let boundary = GeoBoundary::new(loc(1.0, 1.0), loc(0.0, 0.0)).unwrap();
        let json = serde_json::to_value(boundary).unwrap();
        assert!(json.get("northEast").is_some());
        assert!(json.get("southWest").is_some());
    }

    #[test]
    fn test_inverted_boundary_rejected() {
        assert!(matches!(
            GeoBoundary::new(loc(0.0, 0.0), loc(1.0, 1.0)),
            Err(GeoError::InvertedBoundary { .. })
        ));
    }

    #[test]
    fn test_deserialize_validates_location() {
        let ok: GeoLocation = serde_json::from_str(r#"{"lat":52.5,"lon":13.4}"#).unwrap();
        assert_eq!(ok, loc(52.5, 13.4));
        assert!(serde_json::from_str::<GeoLocation>(r#"{"lat":200.0,"lon":0.0}"#).is_err());
        assert!(serde_json::from_str::<GeoLocation>(r#"{"lat":0.0,"lon":-181.0}"#).is_err());
    }

    #[test]
    fn test_deserialize_validates_region_and_boundary() {
        let region = r#"{"center":{"lat":0.0,"lon":0.0},"radius":-5.0}"#;
        assert!(serde_json::from_str::<GeoRegion>(region).is_err());

        let inverted = r#"{"northEast":{"lat":0.0,"lon":0.0},"southWest":{"lat":1.0,"lon":1.0}}"#;
        assert!(serde_json::from_str::<GeoBoundary>(inverted).is_err());

        let boundary = GeoBoundary::new(loc(1.0, 1.0), loc(0.0, 0.0)).unwrap();
        let json = serde_json::to_string(&boundary).unwrap();
        assert_eq!(serde_json::from_str::<GeoBoundary>(&json).unwrap(), boundary);
    }
}
