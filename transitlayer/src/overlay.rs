//! Overlay lifecycle events and host callbacks.
//!
//! The layer lives inside a host map container that manages overlays. The
//! host learns when this layer is toggled visible or hidden through the
//! overlay-added and overlay-removed callbacks, and hears about viewport
//! changes through its own dedicated callback. Events are forwarded, never
//! interpreted; the layer holds no visibility state of its own.
//!
//! Every callback is optional. An unset callback makes the forwarding call
//! a no-op, not an error.

use std::fmt;

use serde_json::Value;

use crate::geo::LatLon;

/// An overlay visibility event from the host container.
///
/// The payload is host-defined and passed through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayEvent {
    /// Host-assigned overlay name.
    pub name: String,
    /// Host-specific event payload.
    pub detail: Value,
}

impl OverlayEvent {
    /// Create an event with an empty payload.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            detail: Value::Null,
        }
    }

    /// Attach a host-specific payload.
    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = detail;
        self
    }
}

/// A viewport change reported by the host map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportEvent {
    /// The map's new zoom level.
    pub zoom: u8,
    /// The map's new center, when the host reports one.
    pub center: Option<LatLon>,
}

impl ViewportEvent {
    /// Create a zoom-only viewport event.
    pub fn new(zoom: u8) -> Self {
        Self { zoom, center: None }
    }

    /// Attach the map center to the event.
    pub fn with_center(mut self, center: LatLon) -> Self {
        self.center = Some(center);
        self
    }
}

/// Identifies this layer to the host's overlay registry.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerDescriptor {
    /// Display name the host shows for the overlay.
    pub name: String,
}

/// Callback invoked with overlay visibility events.
pub type OverlayCallback = Box<dyn Fn(&OverlayEvent) + Send + Sync>;
/// Callback invoked with viewport change events.
pub type ViewportCallback = Box<dyn Fn(&ViewportEvent) + Send + Sync>;
/// Callback invoked once at attach with the layer's descriptor.
pub type RegisterCallback = Box<dyn Fn(&LayerDescriptor) + Send + Sync>;

/// The host-supplied callback set.
///
/// Built with the `with_*` methods; any subset may be configured.
#[derive(Default)]
pub struct LayerHooks {
    on_overlay_added: Option<OverlayCallback>,
    on_overlay_removed: Option<OverlayCallback>,
    on_viewport_changed: Option<ViewportCallback>,
    register_overlay: Option<RegisterCallback>,
}

impl LayerHooks {
    /// Create an empty callback set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the overlay-added callback.
    pub fn with_on_overlay_added<F>(mut self, callback: F) -> Self
    where
        F: Fn(&OverlayEvent) + Send + Sync + 'static,
    {
        self.on_overlay_added = Some(Box::new(callback));
        self
    }

    /// Set the overlay-removed callback.
    pub fn with_on_overlay_removed<F>(mut self, callback: F) -> Self
    where
        F: Fn(&OverlayEvent) + Send + Sync + 'static,
    {
        self.on_overlay_removed = Some(Box::new(callback));
        self
    }

    /// Set the viewport-changed callback.
    pub fn with_on_viewport_changed<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ViewportEvent) + Send + Sync + 'static,
    {
        self.on_viewport_changed = Some(Box::new(callback));
        self
    }

    /// Set the overlay registration callback.
    pub fn with_register_overlay<F>(mut self, callback: F) -> Self
    where
        F: Fn(&LayerDescriptor) + Send + Sync + 'static,
    {
        self.register_overlay = Some(Box::new(callback));
        self
    }

    pub(crate) fn fire_overlay_added(&self, event: &OverlayEvent) {
        if let Some(callback) = &self.on_overlay_added {
            callback(event);
        }
    }

    pub(crate) fn fire_overlay_removed(&self, event: &OverlayEvent) {
        if let Some(callback) = &self.on_overlay_removed {
            callback(event);
        }
    }

    pub(crate) fn fire_viewport_changed(&self, event: &ViewportEvent) {
        if let Some(callback) = &self.on_viewport_changed {
            callback(event);
        }
    }

    pub(crate) fn fire_register_overlay(&self, descriptor: &LayerDescriptor) {
        if let Some(callback) = &self.register_overlay {
            callback(descriptor);
        }
    }

    /// Drop every configured callback.
    pub(crate) fn clear(&mut self) {
        self.on_overlay_added = None;
        self.on_overlay_removed = None;
        self.on_viewport_changed = None;
        self.register_overlay = None;
    }
}

impl fmt::Debug for LayerHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerHooks")
            .field("on_overlay_added", &self.on_overlay_added.is_some())
            .field("on_overlay_removed", &self.on_overlay_removed.is_some())
            .field("on_viewport_changed", &self.on_viewport_changed.is_some())
            .field("register_overlay", &self.register_overlay.is_some())
            .finish()
    }
}
