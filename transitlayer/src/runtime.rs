//! Serialized event delivery for async hosts.
//!
//! The layer's contract is one logical thread of control: refreshes and
//! selection events must never run concurrently. Hosts that produce events
//! from async tasks get that serialization here. One task owns the
//! [`VehicleLayer`], drains a channel in arrival order, and publishes a
//! status snapshot after every event so observers can render without ever
//! touching layer state directly.
//!
//! The loop attaches the layer when it starts and detaches it on the way
//! out, whether shutdown came from the cancellation token or from every
//! sender being dropped. Events still in flight after shutdown are simply
//! never applied, which matches the layer's own teardown rule.

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::layer::VehicleLayer;
use crate::overlay::{OverlayEvent, ViewportEvent};
use crate::tracking::TrackingState;
use crate::vehicle::{VehicleId, VehiclePosition};
use crate::zoom::ZoomTier;

/// A host event delivered to the layer, applied in arrival order.
#[derive(Debug)]
pub enum LayerEvent {
    /// A complete replacement snapshot from the feed.
    Refresh(Vec<VehiclePosition>),
    /// Select a vehicle to track.
    Track(VehicleId),
    /// Clear the tracked vehicle.
    Untrack,
    /// The host map's viewport moved.
    ViewportChanged(ViewportEvent),
    /// The host toggled this overlay visible.
    OverlayAdded(OverlayEvent),
    /// The host toggled this overlay hidden.
    OverlayRemoved(OverlayEvent),
}

/// Snapshot of layer state, published after every applied event.
#[derive(Debug, Clone)]
pub struct LayerStatus {
    /// Whether the layer is attached to its host.
    pub attached: bool,
    /// Current tracking state.
    pub state: TrackingState,
    /// Total vehicles in the current snapshot.
    pub vehicle_count: usize,
    /// The vehicles a render pass would draw, display limit applied.
    pub visible: Vec<VehiclePosition>,
    /// Tier of the most recent viewport zoom, once one was reported.
    pub tier: Option<ZoomTier>,
    /// When the current snapshot was installed.
    pub last_refresh: Option<DateTime<Utc>>,
}

impl LayerStatus {
    fn of(layer: &VehicleLayer) -> Self {
        Self {
            attached: layer.is_attached(),
            state: layer.tracking_state().clone(),
            vehicle_count: layer.vehicles().len(),
            visible: layer.visible_vehicles().to_vec(),
            tier: layer.current_tier(),
            last_refresh: layer.vehicles().replaced_at(),
        }
    }
}

/// Spawn the event loop that owns a layer.
///
/// The layer is attached before the first event is applied and detached
/// when the loop exits. The loop ends when `shutdown` is cancelled or when
/// every event sender has been dropped.
///
/// # Returns
///
/// The task handle and a watch receiver that always holds the latest
/// status snapshot.
pub fn start(
    layer: VehicleLayer,
    events: mpsc::UnboundedReceiver<LayerEvent>,
    shutdown: CancellationToken,
) -> (JoinHandle<()>, watch::Receiver<LayerStatus>) {
    let (status_tx, status_rx) = watch::channel(LayerStatus::of(&layer));

    let handle = tokio::spawn(run(layer, events, shutdown, status_tx));

    (handle, status_rx)
}

async fn run(
    mut layer: VehicleLayer,
    mut events: mpsc::UnboundedReceiver<LayerEvent>,
    shutdown: CancellationToken,
    status_tx: watch::Sender<LayerStatus>,
) {
    layer.on_attach();
    let _ = status_tx.send(LayerStatus::of(&layer));
    info!("Vehicle layer event loop started");

    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                info!("Vehicle layer event loop shutting down");
                break;
            }

            event = events.recv() => {
                match event {
                    Some(event) => {
                        apply_event(&mut layer, event);
                        let _ = status_tx.send(LayerStatus::of(&layer));
                    }
                    None => {
                        debug!("Event channel closed");
                        break;
                    }
                }
            }
        }
    }

    layer.on_detach();
    let _ = status_tx.send(LayerStatus::of(&layer));
    info!("Vehicle layer event loop stopped");
}

fn apply_event(layer: &mut VehicleLayer, event: LayerEvent) {
    match event {
        LayerEvent::Refresh(snapshot) => layer.on_data_refresh(snapshot),
        LayerEvent::Track(id) => layer.track(id),
        LayerEvent::Untrack => layer.untrack(),
        LayerEvent::ViewportChanged(event) => layer.on_viewport_changed(event),
        LayerEvent::OverlayAdded(event) => layer.on_overlay_added(event),
        LayerEvent::OverlayRemoved(event) => layer.on_overlay_removed(event),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn make_vehicle(id: &str, lat: f64, lon: f64) -> VehiclePosition {
        VehiclePosition::new(id, lat, lon)
    }

    async fn wait_for<F>(status: &mut watch::Receiver<LayerStatus>, mut predicate: F)
    where
        F: FnMut(&LayerStatus) -> bool,
    {
        tokio::time::timeout(Duration::from_secs(1), async {
            loop {
                if predicate(&status.borrow()) {
                    return;
                }
                status.changed().await.unwrap();
            }
        })
        .await
        .expect("status condition not reached in time");
    }

    #[tokio::test]
    async fn test_events_apply_in_order() {
        let (tx, rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let (handle, mut status) =
            start(VehicleLayer::with_defaults(), rx, shutdown.clone());

        tx.send(LayerEvent::Refresh(vec![
            make_vehicle("1", 0.0, 0.0),
            make_vehicle("2", 1.0, 1.0),
        ]))
        .unwrap();
        tx.send(LayerEvent::Track(VehicleId::new("2"))).unwrap();

        wait_for(&mut status, |s| {
            s.state == TrackingState::Tracking(VehicleId::new("2"))
        })
        .await;

        let snapshot = status.borrow().clone();
        assert_eq!(snapshot.vehicle_count, 2);
        assert_eq!(snapshot.visible.len(), 2);
        assert!(snapshot.last_refresh.is_some());

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_dropping_sender_stops_loop_and_detaches() {
        let (tx, rx) = mpsc::unbounded_channel();
        let (handle, status) =
            start(VehicleLayer::with_defaults(), rx, CancellationToken::new());

        drop(tx);
        handle.await.unwrap();

        assert!(!status.borrow().attached);
    }

    #[tokio::test]
    async fn test_shutdown_token_stops_loop() {
        let (tx, rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let (handle, status) =
            start(VehicleLayer::with_defaults(), rx, shutdown.clone());

        shutdown.cancel();
        handle.await.unwrap();

        assert!(!status.borrow().attached);
        // Senders outliving the loop is fine; the event just goes nowhere.
        let _ = tx.send(LayerEvent::Untrack);
    }

    #[tokio::test]
    async fn test_viewport_events_update_published_tier() {
        let (tx, rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let (handle, mut status) =
            start(VehicleLayer::with_defaults(), rx, shutdown.clone());

        tx.send(LayerEvent::ViewportChanged(ViewportEvent::new(16)))
            .unwrap();

        wait_for(&mut status, |s| s.tier == Some(ZoomTier::Close)).await;

        shutdown.cancel();
        handle.await.unwrap();
    }
}
