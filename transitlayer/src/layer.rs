//! The attachable vehicle overlay.
//!
//! [`VehicleLayer`] is the facade a host map container drives. It owns the
//! snapshot set and the tracking controller, forwards overlay events to the
//! host's callbacks, and turns tracking decisions into view-centering
//! requests.
//!
//! # Lifecycle
//!
//! The host invokes the entry points in a defined order: [`on_attach`] once
//! when the overlay joins the map, then any mix of [`on_data_refresh`],
//! [`on_viewport_changed`], the overlay event forwarders, and the selection
//! calls, then [`on_detach`] once when the overlay leaves the map. Events
//! that arrive after detach are safely ignored, never an error. No
//! particular UI framework is assumed; anything that can call these methods
//! in one logical thread of control can host the layer.
//!
//! Rendering reads derived state ([`visible_vehicles`], [`is_tracking`],
//! [`current_tier`]) and never mutates tracking state itself.
//!
//! [`on_attach`]: VehicleLayer::on_attach
//! [`on_detach`]: VehicleLayer::on_detach
//! [`on_data_refresh`]: VehicleLayer::on_data_refresh
//! [`on_viewport_changed`]: VehicleLayer::on_viewport_changed
//! [`visible_vehicles`]: VehicleLayer::visible_vehicles
//! [`is_tracking`]: VehicleLayer::is_tracking
//! [`current_tier`]: VehicleLayer::current_tier

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::LayerConfig;
use crate::geo::GeoBounds;
use crate::overlay::{LayerDescriptor, LayerHooks, OverlayEvent, ViewportEvent};
use crate::tracking::{CenterRequest, TrackingController, TrackingState};
use crate::vehicle::{VehicleId, VehiclePosition, VehicleSet};
use crate::view::MapView;
use crate::zoom::{ZoomThresholds, ZoomTier};

/// A real-time vehicle overlay for an interactive map.
pub struct VehicleLayer {
    config: LayerConfig,
    vehicles: VehicleSet,
    controller: TrackingController,
    hooks: LayerHooks,
    view: Option<Arc<dyn MapView>>,
    attached: bool,
    current_zoom: Option<u8>,
}

impl VehicleLayer {
    /// Create a layer from a configuration and host callbacks.
    ///
    /// The layer starts empty and detached. Seed a snapshot with
    /// [`with_initial_snapshot`](Self::with_initial_snapshot), wire a view
    /// with [`with_view`](Self::with_view), then hand control to the host
    /// via [`on_attach`](Self::on_attach).
    pub fn new(config: LayerConfig, hooks: LayerHooks) -> Self {
        let controller = TrackingController::new(config.thresholds);
        Self {
            config,
            vehicles: VehicleSet::new(),
            controller,
            hooks,
            view: None,
            attached: false,
            current_zoom: None,
        }
    }

    /// Create a layer with default configuration and no callbacks.
    pub fn with_defaults() -> Self {
        Self::new(LayerConfig::default(), LayerHooks::new())
    }

    /// Seed the layer with the snapshot available at mount time.
    pub fn with_initial_snapshot(mut self, snapshot: Vec<VehiclePosition>) -> Self {
        self.vehicles.replace(snapshot);
        self
    }

    /// Wire the view collaborator that receives centering requests.
    ///
    /// Without a view the layer still tracks; centering requests are
    /// simply dropped.
    pub fn with_view(mut self, view: Arc<dyn MapView>) -> Self {
        self.view = Some(view);
        self
    }

    /// Attach the overlay to its host.
    ///
    /// Announces the layer to the host's overlay registry, applies the
    /// initial tracking rule (first vehicle of the seeded snapshot, if
    /// any), and centers the view on that vehicle once. Attaching twice is
    /// a no-op.
    pub fn on_attach(&mut self) {
        if self.attached {
            debug!("Layer already attached, ignoring");
            return;
        }
        self.attached = true;
        info!(layer = %self.config.name, "Overlay attached");

        self.hooks.fire_register_overlay(&LayerDescriptor {
            name: self.config.name.clone(),
        });

        if let Some(request) = self.controller.seed_default(&self.vehicles) {
            self.dispatch_center(&request);
        }
    }

    /// Detach the overlay from its host.
    ///
    /// Releases every registered callback and the view handle. The layer
    /// stops acting on events; anything arriving afterwards is ignored.
    /// Detaching twice is a no-op.
    pub fn on_detach(&mut self) {
        if !self.attached {
            debug!("Layer already detached, ignoring");
            return;
        }
        self.attached = false;
        self.hooks.clear();
        self.view = None;
        info!(layer = %self.config.name, "Overlay detached");
    }

    /// Apply a new snapshot from the feed collaborator.
    ///
    /// Replaces the whole set, re-resolves the tracked vehicle, and when it
    /// is present emits exactly one centering request at its coordinates
    /// from this snapshot.
    pub fn on_data_refresh(&mut self, snapshot: Vec<VehiclePosition>) {
        if !self.attached {
            debug!("Ignoring snapshot, layer is detached");
            return;
        }

        self.vehicles.replace(snapshot);
        debug!(
            vehicles = self.vehicles.len(),
            state = %self.controller.state(),
            "Snapshot applied"
        );

        if let Some(request) = self.controller.refresh(&self.vehicles) {
            self.dispatch_center(&request);
        }
    }

    /// Record a viewport change and forward it to the host's callback.
    pub fn on_viewport_changed(&mut self, event: ViewportEvent) {
        if !self.attached {
            debug!("Ignoring viewport change, layer is detached");
            return;
        }

        self.current_zoom = Some(event.zoom);
        debug!(zoom = event.zoom, tier = ?self.current_tier(), "Viewport changed");
        self.hooks.fire_viewport_changed(&event);
    }

    /// Forward an overlay-added event to the host's callback.
    pub fn on_overlay_added(&mut self, event: OverlayEvent) {
        if !self.attached {
            return;
        }
        self.hooks.fire_overlay_added(&event);
    }

    /// Forward an overlay-removed event to the host's callback.
    pub fn on_overlay_removed(&mut self, event: OverlayEvent) {
        if !self.attached {
            return;
        }
        self.hooks.fire_overlay_removed(&event);
    }

    /// Select a vehicle to track.
    ///
    /// When the vehicle is present in the current snapshot the view jumps
    /// to it immediately; otherwise tracking starts stale and centering
    /// begins on the first refresh that carries the id.
    pub fn track(&mut self, id: VehicleId) {
        if !self.attached {
            debug!(vehicle_id = %id, "Ignoring selection, layer is detached");
            return;
        }
        if let Some(request) = self.controller.track(id, &self.vehicles) {
            self.dispatch_center(&request);
        }
    }

    /// Clear the tracked vehicle. Idempotent.
    pub fn untrack(&mut self) {
        if !self.attached {
            debug!("Ignoring untrack, layer is detached");
            return;
        }
        self.controller.untrack();
    }

    fn dispatch_center(&self, request: &CenterRequest) {
        debug!(
            vehicle_id = %request.id,
            point = %request.point,
            "Centering view on tracked vehicle"
        );
        if let Some(view) = &self.view {
            view.center_on(request.point);
        }
    }

    /// The vehicles to render this pass: a prefix of the snapshot capped
    /// at the configured display limit, in feed order.
    pub fn visible_vehicles(&self) -> &[VehiclePosition] {
        self.vehicles.limited(self.config.limit)
    }

    /// True iff the given id is the tracked vehicle, live or stale.
    pub fn is_tracking(&self, id: &VehicleId) -> bool {
        self.controller.is_tracking(id)
    }

    /// Current tracking state.
    pub fn tracking_state(&self) -> &TrackingState {
        self.controller.state()
    }

    /// Last resolved position of the tracked vehicle.
    ///
    /// Survives staleness so markers keep a position to draw.
    pub fn tracked_position(&self) -> Option<&VehiclePosition> {
        self.controller.last_known_position()
    }

    /// The zoom tier configuration, for the rendering collaborator.
    pub fn zoom_thresholds(&self) -> &ZoomThresholds {
        self.controller.thresholds()
    }

    /// Tier of the most recent viewport zoom, once one has been reported.
    pub fn current_tier(&self) -> Option<ZoomTier> {
        self.current_zoom
            .map(|zoom| self.zoom_thresholds().tier_for(zoom))
    }

    /// The most recent viewport zoom level, if any was reported.
    pub fn current_zoom(&self) -> Option<u8> {
        self.current_zoom
    }

    /// Bounding box around the whole current snapshot.
    pub fn bounds(&self) -> Option<GeoBounds> {
        self.vehicles.bounds()
    }

    /// The current snapshot.
    pub fn vehicles(&self) -> &VehicleSet {
        &self.vehicles
    }

    /// Whether the layer is currently attached to a host.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// The layer configuration.
    pub fn config(&self) -> &LayerConfig {
        &self.config
    }
}

impl fmt::Debug for VehicleLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VehicleLayer")
            .field("attached", &self.attached)
            .field("vehicles", &self.vehicles.len())
            .field("state", self.controller.state())
            .field("zoom", &self.current_zoom)
            .finish()
    }
}
