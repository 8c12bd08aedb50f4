//! Snapshot parsing for vehicle position feeds.
//!
//! Feeds deliver complete snapshots as JSON arrays of `{id, lat, lon, ...}`
//! records. Each document replaces the previous snapshot wholesale, so the
//! parser's job is just normalization at the boundary: ids arrive as strings
//! or numbers, coordinates must be real positions, and any further fields
//! pass through untouched for the rendering collaborator.
//!
//! Network transport is out of scope. Whatever polls the feed hands the
//! finished document to [`parse_snapshot`].

use thiserror::Error;
use tracing::debug;

use crate::geo::{CoordError, LatLon};
use crate::vehicle::{VehicleId, VehiclePosition};

/// Errors from snapshot parsing.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The document is not a JSON array of vehicle records.
    #[error("malformed snapshot document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A record carried an out-of-range or non-finite coordinate.
    #[error("vehicle {id}: {source}")]
    InvalidCoordinate {
        /// Id of the offending record.
        id: VehicleId,
        /// The underlying range violation.
        #[source]
        source: CoordError,
    },
}

/// Parse one snapshot document into vehicle positions.
///
/// # Arguments
///
/// * `document` - JSON text holding an array of vehicle records
///
/// # Returns
///
/// The positions in feed order, or an error if the document does not parse
/// or a record's coordinates are invalid. An empty array is a valid, empty
/// snapshot.
pub fn parse_snapshot(document: &str) -> Result<Vec<VehiclePosition>, FeedError> {
    let vehicles: Vec<VehiclePosition> = serde_json::from_str(document)?;

    for vehicle in &vehicles {
        if let Err(source) = LatLon::new(vehicle.lat, vehicle.lon) {
            return Err(FeedError::InvalidCoordinate {
                id: vehicle.id.clone(),
                source,
            });
        }
    }

    debug!(vehicles = vehicles.len(), "Parsed vehicle snapshot");
    Ok(vehicles)
}
