//! Tracking state and the view-centering side effect.

use crate::geo::LatLon;
use crate::vehicle::VehicleId;

/// Which vehicle, if any, drives automatic view centering.
///
/// The identity is stable across refreshes even though the position record
/// it points at is replaced with every snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingState {
    /// No vehicle selected; refreshes pass through with no effect.
    Untracked,
    /// The id was found in the latest snapshot and centering is live.
    Tracking(VehicleId),
    /// The id is missing from the latest snapshot. Centering is paused,
    /// not cancelled; it resumes if the id reappears.
    Stale(VehicleId),
}

impl TrackingState {
    /// The tracked id, whether live or stale.
    pub fn tracked_id(&self) -> Option<&VehicleId> {
        match self {
            TrackingState::Untracked => None,
            TrackingState::Tracking(id) | TrackingState::Stale(id) => Some(id),
        }
    }

    /// True when centering is live (tracked id present in the snapshot).
    pub fn is_live(&self) -> bool {
        matches!(self, TrackingState::Tracking(_))
    }
}

impl std::fmt::Display for TrackingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackingState::Untracked => write!(f, "untracked"),
            TrackingState::Tracking(id) => write!(f, "tracking {}", id),
            TrackingState::Stale(id) => write!(f, "stale {}", id),
        }
    }
}

/// A fire-and-forget request to recenter the map view.
///
/// Emitted when the tracked vehicle was located in the snapshot that just
/// arrived, carrying that snapshot's coordinates for it. The core never
/// waits for the view to act on the request.
#[derive(Debug, Clone, PartialEq)]
pub struct CenterRequest {
    /// The vehicle the view should follow.
    pub id: VehicleId,
    /// Where the view should center.
    pub point: LatLon,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracked_id_covers_live_and_stale() {
        let id = VehicleId::new("105");
        assert_eq!(
            TrackingState::Tracking(id.clone()).tracked_id(),
            Some(&id)
        );
        assert_eq!(TrackingState::Stale(id.clone()).tracked_id(), Some(&id));
        assert_eq!(TrackingState::Untracked.tracked_id(), None);
    }

    #[test]
    fn test_is_live() {
        let id = VehicleId::new("105");
        assert!(TrackingState::Tracking(id.clone()).is_live());
        assert!(!TrackingState::Stale(id).is_live());
        assert!(!TrackingState::Untracked.is_live());
    }

    #[test]
    fn test_display() {
        let id = VehicleId::new("105");
        assert_eq!(format!("{}", TrackingState::Tracking(id.clone())), "tracking 105");
        assert_eq!(format!("{}", TrackingState::Stale(id)), "stale 105");
        assert_eq!(format!("{}", TrackingState::Untracked), "untracked");
    }
}
