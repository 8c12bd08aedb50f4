//! Real-time transit vehicle overlay for interactive maps.
//!
//! TransitLayer maintains a bounded, queryable view of a live vehicle
//! position feed and keeps a map view centered on one tracked vehicle as
//! new snapshots arrive. Rendering, marker visuals, and the polling that
//! produces snapshots stay outside; this crate owns the state in between.
//!
//! # Architecture
//!
//! Data flows in one direction:
//!
//! ```text
//! feed document --> parse_snapshot --> VehicleSet --> TrackingController
//!                                          |                  |
//!                                   visible_vehicles    CenterRequest
//!                                          |                  |
//!                                   render collaborator    MapView
//! ```
//!
//! - [`VehicleSet`] holds the current snapshot: bounded iteration in feed
//!   order and lookup by id, replaced wholesale on every refresh.
//! - [`TrackingController`] owns the tracked-vehicle state machine and
//!   decides when the view should recenter.
//! - [`VehicleLayer`] ties both together behind the host lifecycle entry
//!   points and forwards overlay events to host callbacks.
//! - [`runtime`] serializes events onto a layer for async hosts.
//!
//! # Example
//!
//! ```ignore
//! use transitlayer::{feed, LayerConfig, LayerHooks, VehicleLayer};
//!
//! let initial = feed::parse_snapshot(first_document)?;
//! let mut layer = VehicleLayer::new(LayerConfig::default(), LayerHooks::new())
//!     .with_initial_snapshot(initial)
//!     .with_view(map_handle);
//!
//! layer.on_attach();
//! layer.on_data_refresh(feed::parse_snapshot(next_document)?);
//! ```

pub mod config;
pub mod error;
pub mod feed;
pub mod geo;
pub mod layer;
pub mod overlay;
pub mod runtime;
pub mod tracking;
pub mod vehicle;
pub mod view;
pub mod zoom;

pub use config::{ConfigFile, LayerConfig, DEFAULT_DISPLAY_LIMIT};
pub use error::LayerError;
pub use layer::VehicleLayer;
pub use overlay::{LayerDescriptor, LayerHooks, OverlayEvent, ViewportEvent};
pub use tracking::{CenterRequest, TrackingController, TrackingState};
pub use vehicle::{VehicleId, VehiclePosition, VehicleSet};
pub use view::MapView;
pub use zoom::{ZoomThresholds, ZoomTier};

/// Crate version, for banners and diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
