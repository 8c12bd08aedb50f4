//! The map view collaborator boundary.

use crate::geo::LatLon;

/// A map surface that can recenter on demand.
///
/// Centering is fire-and-forget from the layer's perspective: the layer
/// never awaits completion, never retries, and never reads the view's
/// state back. Implementations must not block the caller.
pub trait MapView: Send + Sync {
    /// Center the view on a coordinate.
    fn center_on(&self, point: LatLon);
}
