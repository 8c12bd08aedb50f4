//! Vehicle identity and position record types.
//!
//! A [`VehiclePosition`] is one immutable reading from the feed. The core
//! never mutates a position in place; each refresh replaces the whole set.

use serde::{Deserialize, Serialize};

use crate::geo::LatLon;

/// Stable identity of a vehicle within the feed.
///
/// Feeds deliver ids as strings or bare numbers depending on the agency.
/// Both forms normalize to the same `VehicleId`, so `"105"` and `105`
/// compare equal after parsing. Identity is stable across refreshes even
/// though the position record it refers to is replaced every snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "IdRepr")]
pub struct VehicleId(String);

impl VehicleId {
    /// Create an id from any string-like value.
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// The id as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VehicleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for VehicleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for VehicleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Wire representation of an id: some feeds send `"105"`, others `105`.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Number(i64),
    Text(String),
}

impl From<IdRepr> for VehicleId {
    fn from(raw: IdRepr) -> Self {
        match raw {
            IdRepr::Number(n) => Self(n.to_string()),
            IdRepr::Text(s) => Self(s),
        }
    }
}

/// One vehicle's position reading within a snapshot.
///
/// Fields beyond id/lat/lon are feed-specific metadata (route, bearing,
/// delay, whatever the agency publishes). They are carried through opaquely
/// for the rendering collaborator and never interpreted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehiclePosition {
    /// Feed identity, unique within a snapshot.
    pub id: VehicleId,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Feed-specific metadata, passed through untouched.
    #[serde(flatten, default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl VehiclePosition {
    /// Create a position with no extra metadata.
    pub fn new<I: Into<VehicleId>>(id: I, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lon,
            extra: serde_json::Map::new(),
        }
    }

    /// Attach feed metadata to the position.
    pub fn with_extra(mut self, extra: serde_json::Map<String, serde_json::Value>) -> Self {
        self.extra = extra;
        self
    }

    /// The position as a coordinate pair.
    pub fn point(&self) -> LatLon {
        LatLon {
            lat: self.lat,
            lon: self.lon,
        }
    }
}
