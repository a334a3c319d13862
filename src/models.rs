use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Resolved logical owner of a feature: a station number, or a pseudo-station
/// label used by the incident exports (e.g. `"1CH"`).
///
/// An unresolved or aggregate owner is represented as `Option::None` at the
/// use sites; it is never a variant here so that a present identity is always
/// a real one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StationId {
    Number(i64),
    Token(String),
}

impl StationId {
    pub fn number(n: i64) -> Self {
        StationId::Number(n)
    }

    pub fn token(t: impl Into<String>) -> Self {
        StationId::Token(t.into())
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            StationId::Number(n) => Some(*n),
            StationId::Token(_) => None,
        }
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationId::Number(n) => write!(f, "{}", n),
            StationId::Token(t) => write!(f, "{}", t),
        }
    }
}

/// Geographic coordinate in decimal degrees, World Geodetic System.
/// The contract across the crate is `(latitude, longitude)` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Geographic bounding box accumulated over rendered coordinates.
///
/// Starts inverted; `is_valid` is false until at least one point extends it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn empty() -> Self {
        Self {
            south: f64::INFINITY,
            west: f64::INFINITY,
            north: f64::NEG_INFINITY,
            east: f64::NEG_INFINITY,
        }
    }

    pub fn extend(&mut self, p: LatLng) {
        self.south = self.south.min(p.lat);
        self.north = self.north.max(p.lat);
        self.west = self.west.min(p.lng);
        self.east = self.east.max(p.lng);
    }

    pub fn is_valid(&self) -> bool {
        self.south <= self.north && self.west <= self.east
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

/// Canonical geometry extracted by the normalizer.
///
/// Ring and point coordinates stay as raw JSON values because the source
/// families encode a point as either a `[x, y]` array or an `{x, y}` object;
/// the projector accepts both.
#[derive(Debug, Clone, PartialEq)]
pub enum RawGeometry {
    /// One or more rings, each an ordered list of raw points. GeoJSON
    /// MultiPolygons are flattened into a single ring list.
    Polygon { rings: Vec<Vec<Value>> },
    Point(Value),
}

/// One feature as produced by the normalizer, format-transparent to every
/// downstream component.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFeature {
    pub geometry: Option<RawGeometry>,
    pub attributes: serde_json::Map<String, Value>,
}

/// Output of the format normalizer: a resolved spatial reference plus the
/// canonical feature list, in source order.
///
/// `wkid` is resolved before any projection occurs; `None` means geographic
/// (4326) is assumed downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFeatureSet {
    pub wkid: Option<i32>,
    pub features: Vec<RawFeature>,
}
