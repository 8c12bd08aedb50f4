//! Vehicle tracking state machine.
//!
//! One vehicle at a time can drive automatic view centering. On every
//! refresh the controller re-resolves that vehicle inside the new snapshot
//! and decides whether to request a recenter:
//!
//! - **Tracking**: the id was found; the refresh emits one centering
//!   request at the vehicle's fresh coordinates.
//! - **Stale**: the id vanished from the feed. The view stays where it is
//!   and the last known position remains available for display until the
//!   id reappears.
//! - **Untracked**: no selection; refreshes pass through with no effect.
//!
//! Transitions happen only inside [`TrackingController::refresh`] and the
//! selection calls, never as a side effect of rendering.

use tracing::info;

use super::state::{CenterRequest, TrackingState};
use crate::vehicle::{VehicleId, VehiclePosition, VehicleSet};
use crate::zoom::{ZoomThresholds, ZoomTier};

/// Owns the tracked-vehicle selection and the zoom tier configuration.
///
/// The controller holds no snapshot data of its own; each call that needs
/// vehicle positions borrows the current [`VehicleSet`].
#[derive(Debug)]
pub struct TrackingController {
    state: TrackingState,

    /// Last position resolved for the tracked id, kept for display
    /// continuity while the id is absent from the feed.
    last_known: Option<VehiclePosition>,

    /// Read-only zoom configuration carried for the rendering collaborator.
    thresholds: ZoomThresholds,
}

impl TrackingController {
    /// Create a controller with the given zoom configuration.
    pub fn new(thresholds: ZoomThresholds) -> Self {
        Self {
            state: TrackingState::Untracked,
            last_known: None,
            thresholds,
        }
    }

    /// Create a controller with default zoom thresholds.
    pub fn with_defaults() -> Self {
        Self::new(ZoomThresholds::default())
    }

    /// Apply the initial tracking rule to a freshly seeded snapshot.
    ///
    /// The first vehicle in feed order becomes the tracked vehicle; an
    /// empty snapshot leaves the controller untracked.
    ///
    /// # Returns
    ///
    /// A centering request for the seeded vehicle, so the view can start
    /// out on it.
    pub fn seed_default(&mut self, set: &VehicleSet) -> Option<CenterRequest> {
        match set.first() {
            Some(vehicle) => {
                info!(
                    vehicle_id = %vehicle.id,
                    "Tracking first vehicle from initial snapshot"
                );
                self.last_known = Some(vehicle.clone());
                self.state = TrackingState::Tracking(vehicle.id.clone());
                Some(CenterRequest {
                    id: vehicle.id.clone(),
                    point: vehicle.point(),
                })
            }
            None => {
                self.state = TrackingState::Untracked;
                self.last_known = None;
                None
            }
        }
    }

    /// Resolve the tracked vehicle inside a new snapshot.
    ///
    /// Call once per refresh, after the set has been replaced.
    ///
    /// # Returns
    ///
    /// `Some(CenterRequest)` with the snapshot's coordinates for the
    /// tracked vehicle when it is present, `None` when there is no tracked
    /// vehicle or it is missing from this snapshot.
    pub fn refresh(&mut self, set: &VehicleSet) -> Option<CenterRequest> {
        let id = match self.state.tracked_id() {
            Some(id) => id.clone(),
            None => return None,
        };

        match set.find_by_id(&id) {
            Some(vehicle) => {
                if !self.state.is_live() {
                    info!(vehicle_id = %id, "Tracked vehicle reappeared, centering resumes");
                }
                self.last_known = Some(vehicle.clone());
                self.state = TrackingState::Tracking(id.clone());
                Some(CenterRequest {
                    id,
                    point: vehicle.point(),
                })
            }
            None => {
                if self.state.is_live() {
                    info!(vehicle_id = %id, "Tracked vehicle missing from snapshot, centering paused");
                    self.state = TrackingState::Stale(id);
                }
                None
            }
        }
    }

    /// Select a vehicle to track.
    ///
    /// Always legal, regardless of previous state. Selecting an id that is
    /// absent from the current snapshot starts tracking in the stale state
    /// with no last known position. Re-selecting the id that is already
    /// live is a no-op and does not re-center.
    ///
    /// # Returns
    ///
    /// `Some(CenterRequest)` when the newly selected vehicle is present in
    /// the current snapshot, so the view can jump to it immediately.
    pub fn track(&mut self, id: VehicleId, set: &VehicleSet) -> Option<CenterRequest> {
        if self.state == TrackingState::Tracking(id.clone()) {
            return None;
        }

        match set.find_by_id(&id) {
            Some(vehicle) => {
                info!(vehicle_id = %id, "Tracking vehicle");
                self.last_known = Some(vehicle.clone());
                self.state = TrackingState::Tracking(id.clone());
                Some(CenterRequest {
                    id,
                    point: vehicle.point(),
                })
            }
            None => {
                info!(vehicle_id = %id, "Tracking vehicle not in current snapshot, starting stale");
                self.last_known = None;
                self.state = TrackingState::Stale(id);
                None
            }
        }
    }

    /// Clear the tracked vehicle. Idempotent.
    pub fn untrack(&mut self) {
        if self.state != TrackingState::Untracked {
            info!("Tracking cleared");
        }
        self.state = TrackingState::Untracked;
        self.last_known = None;
    }

    /// True iff the given id is the tracked vehicle, live or stale.
    pub fn is_tracking(&self, id: &VehicleId) -> bool {
        self.state.tracked_id() == Some(id)
    }

    /// Current tracking state.
    pub fn state(&self) -> &TrackingState {
        &self.state
    }

    /// Last position resolved for the tracked vehicle, if any.
    ///
    /// Stays available while tracking is stale so markers keep a position
    /// to draw.
    pub fn last_known_position(&self) -> Option<&VehiclePosition> {
        self.last_known.as_ref()
    }

    /// The zoom tier configuration.
    pub fn thresholds(&self) -> &ZoomThresholds {
        &self.thresholds
    }

    /// Tier for the given zoom level under this controller's thresholds.
    pub fn tier_for(&self, zoom: u8) -> ZoomTier {
        self.thresholds.tier_for(zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_vehicle(id: &str, lat: f64, lon: f64) -> VehiclePosition {
        VehiclePosition::new(id, lat, lon)
    }

    fn make_set(vehicles: Vec<VehiclePosition>) -> VehicleSet {
        VehicleSet::from_snapshot(vehicles)
    }

    fn id(text: &str) -> VehicleId {
        VehicleId::new(text)
    }

    #[test]
    fn test_seed_default_tracks_first_vehicle() {
        let set = make_set(vec![
            make_vehicle("1", 4.0, 3.0),
            make_vehicle("2", 1.0, 1.0),
        ]);
        let mut controller = TrackingController::with_defaults();

        let request = controller.seed_default(&set).unwrap();

        assert_eq!(request.id, id("1"));
        assert!((request.point.lat - 4.0).abs() < f64::EPSILON);
        assert_eq!(controller.state(), &TrackingState::Tracking(id("1")));
        assert!(controller.is_tracking(&id("1")));
        assert!(!controller.is_tracking(&id("2")));
    }

    #[test]
    fn test_seed_default_empty_snapshot_stays_untracked() {
        let mut controller = TrackingController::with_defaults();
        assert!(controller.seed_default(&make_set(vec![])).is_none());
        assert_eq!(controller.state(), &TrackingState::Untracked);
    }

    #[test]
    fn test_refresh_with_tracked_vehicle_present_centers() {
        let mut controller = TrackingController::with_defaults();
        controller.seed_default(&make_set(vec![make_vehicle("1", 0.0, 0.0)]));

        let next = make_set(vec![make_vehicle("1", 45.5, -122.6)]);
        let request = controller.refresh(&next).unwrap();

        assert_eq!(request.id, id("1"));
        assert!((request.point.lat - 45.5).abs() < f64::EPSILON);
        assert!((request.point.lon + 122.6).abs() < f64::EPSILON);
        assert_eq!(controller.state(), &TrackingState::Tracking(id("1")));
    }

    #[test]
    fn test_refresh_updates_last_known() {
        let mut controller = TrackingController::with_defaults();
        controller.seed_default(&make_set(vec![make_vehicle("1", 0.0, 0.0)]));

        controller.refresh(&make_set(vec![make_vehicle("1", 3.0, 4.0)]));

        let last = controller.last_known_position().unwrap();
        assert!((last.lat - 3.0).abs() < f64::EPSILON);
        assert!((last.lon - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_refresh_with_tracked_vehicle_absent_goes_stale() {
        let mut controller = TrackingController::with_defaults();
        controller.seed_default(&make_set(vec![make_vehicle("1", 2.0, 2.0)]));

        let next = make_set(vec![make_vehicle("2", 1.0, 1.0)]);
        let request = controller.refresh(&next);

        assert!(request.is_none());
        assert_eq!(controller.state(), &TrackingState::Stale(id("1")));
        // Last known position survives for display continuity.
        let last = controller.last_known_position().unwrap();
        assert!((last.lat - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stale_vehicle_reappearing_resumes_centering() {
        let mut controller = TrackingController::with_defaults();
        controller.seed_default(&make_set(vec![make_vehicle("1", 0.0, 0.0)]));

        assert!(controller.refresh(&make_set(vec![make_vehicle("2", 1.0, 1.0)])).is_none());
        assert_eq!(controller.state(), &TrackingState::Stale(id("1")));

        let request = controller
            .refresh(&make_set(vec![make_vehicle("1", 5.0, 5.0)]))
            .unwrap();
        assert!((request.point.lat - 5.0).abs() < f64::EPSILON);
        assert_eq!(controller.state(), &TrackingState::Tracking(id("1")));
    }

    #[test]
    fn test_refresh_while_untracked_is_noop() {
        let mut controller = TrackingController::with_defaults();
        let set = make_set(vec![make_vehicle("1", 0.0, 0.0)]);

        assert!(controller.refresh(&set).is_none());
        assert_eq!(controller.state(), &TrackingState::Untracked);
    }

    #[test]
    fn test_track_present_vehicle_centers_immediately() {
        let set = make_set(vec![
            make_vehicle("1", 0.0, 0.0),
            make_vehicle("2", 7.0, 8.0),
        ]);
        let mut controller = TrackingController::with_defaults();
        controller.seed_default(&set);

        let request = controller.track(id("2"), &set).unwrap();

        assert_eq!(request.id, id("2"));
        assert!((request.point.lat - 7.0).abs() < f64::EPSILON);
        assert_eq!(controller.state(), &TrackingState::Tracking(id("2")));
    }

    #[test]
    fn test_track_absent_vehicle_starts_stale() {
        let set = make_set(vec![make_vehicle("1", 0.0, 0.0)]);
        let mut controller = TrackingController::with_defaults();

        let request = controller.track(id("99"), &set);

        assert!(request.is_none());
        assert_eq!(controller.state(), &TrackingState::Stale(id("99")));
        assert!(controller.last_known_position().is_none());
        assert!(controller.is_tracking(&id("99")));
    }

    #[test]
    fn test_retrack_same_live_vehicle_is_noop() {
        let set = make_set(vec![make_vehicle("1", 2.0, 2.0)]);
        let mut controller = TrackingController::with_defaults();
        controller.seed_default(&set);

        let request = controller.track(id("1"), &set);

        assert!(request.is_none());
        assert_eq!(controller.state(), &TrackingState::Tracking(id("1")));
        // Last known survives untouched.
        assert!((controller.last_known_position().unwrap().lat - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_track_stale_id_promotes_when_present_again() {
        let mut controller = TrackingController::with_defaults();
        controller.seed_default(&make_set(vec![make_vehicle("1", 0.0, 0.0)]));
        controller.refresh(&make_set(vec![make_vehicle("2", 1.0, 1.0)]));
        assert_eq!(controller.state(), &TrackingState::Stale(id("1")));

        // Vehicle 1 is back in the current set; selecting it again goes
        // straight to live tracking.
        let set = make_set(vec![make_vehicle("1", 6.0, 6.0)]);
        let request = controller.track(id("1"), &set).unwrap();

        assert!((request.point.lat - 6.0).abs() < f64::EPSILON);
        assert_eq!(controller.state(), &TrackingState::Tracking(id("1")));
    }

    #[test]
    fn test_untrack_is_idempotent() {
        let set = make_set(vec![make_vehicle("1", 0.0, 0.0)]);
        let mut controller = TrackingController::with_defaults();
        controller.seed_default(&set);

        controller.untrack();
        assert_eq!(controller.state(), &TrackingState::Untracked);
        assert!(controller.last_known_position().is_none());

        controller.untrack();
        assert_eq!(controller.state(), &TrackingState::Untracked);
    }

    #[test]
    fn test_refresh_after_untrack_never_centers() {
        let set = make_set(vec![make_vehicle("1", 0.0, 0.0)]);
        let mut controller = TrackingController::with_defaults();
        controller.seed_default(&set);
        controller.untrack();

        assert!(controller.refresh(&set).is_none());
        assert!(controller
            .refresh(&make_set(vec![make_vehicle("1", 9.0, 9.0)]))
            .is_none());
    }

    #[test]
    fn test_is_tracking_covers_stale() {
        let mut controller = TrackingController::with_defaults();
        controller.seed_default(&make_set(vec![make_vehicle("1", 0.0, 0.0)]));
        controller.refresh(&make_set(vec![make_vehicle("2", 1.0, 1.0)]));

        assert!(controller.is_tracking(&id("1")));
        assert!(!controller.is_tracking(&id("2")));
    }

    #[test]
    fn test_thresholds_accessor() {
        let thresholds = ZoomThresholds::new(8, 12, 16).unwrap();
        let controller = TrackingController::new(thresholds);
        assert_eq!(controller.thresholds().far, 8);
        assert_eq!(controller.thresholds().close, 16);
        assert_eq!(controller.tier_for(7), ZoomTier::Hidden);
        assert_eq!(controller.tier_for(16), ZoomTier::Close);
    }
}
