//! Replay command - drive the vehicle overlay from a recorded snapshot file.
//!
//! The input file carries one JSON snapshot (an array of vehicle records)
//! per line. The first line seeds the layer, every following line is applied
//! as a feed refresh on the runtime loop, paced by `--interval`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use transitlayer::config::ConfigFile;
use transitlayer::feed;
use transitlayer::geo::LatLon;
use transitlayer::runtime::{self, LayerEvent, LayerStatus};
use transitlayer::{
    LayerHooks, MapView, VehicleId, VehicleLayer, VehiclePosition, ViewportEvent,
};

use crate::error::CliError;

/// Arguments for the replay command.
#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Snapshot file, one JSON vehicle array per line
    pub input: PathBuf,

    /// Maximum number of vehicles shown per refresh (overrides the config file)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Vehicle id to track instead of the feed's first vehicle
    #[arg(long)]
    pub track: Option<String>,

    /// Milliseconds between replayed snapshots
    #[arg(long, default_value_t = 1000)]
    pub interval: u64,

    /// Viewport zoom level reported to the layer before the replay starts
    #[arg(long)]
    pub zoom: Option<u8>,
}

/// A view that logs every centering request and counts them for the summary.
#[derive(Default)]
struct LoggingView {
    centers: AtomicUsize,
}

impl LoggingView {
    fn center_count(&self) -> usize {
        self.centers.load(Ordering::Relaxed)
    }
}

impl MapView for LoggingView {
    fn center_on(&self, point: LatLon) {
        self.centers.fetch_add(1, Ordering::Relaxed);
        info!(lat = point.lat, lon = point.lon, "Map centered on tracked vehicle");
    }
}

/// Run the replay command.
pub async fn run(args: ReplayArgs) -> Result<(), CliError> {
    // Resolve settings: CLI > config file > defaults
    let config_file = ConfigFile::load().map_err(|e| CliError::Config(e.to_string()))?;
    let mut layer_config = config_file
        .to_layer_config()
        .map_err(|e| CliError::Config(e.to_string()))?;
    if let Some(limit) = args.limit {
        layer_config = layer_config.with_limit(limit);
    }
    let layer_config = layer_config
        .validated()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let mut snapshots = load_snapshots(&args.input)?;
    if snapshots.is_empty() {
        return Err(CliError::Config(format!(
            "No snapshots found in {}",
            args.input.display()
        )));
    }
    let initial = snapshots.remove(0);
    let total = snapshots.len();

    // Print banner
    println!("TransitLayer Replay v{}", transitlayer::VERSION);
    println!("========================");
    println!();
    println!("Input:         {}", args.input.display());
    println!("Snapshots:     {}", total + 1);
    println!("Display limit: {}", layer_config.limit);
    println!(
        "Zoom tiers:    far {} / mid {} / close {}",
        layer_config.thresholds.far, layer_config.thresholds.mid, layer_config.thresholds.close
    );
    println!("Interval:      {} ms", args.interval);
    println!();
    println!("Press Ctrl+C to stop the replay early");
    println!();

    let view = Arc::new(LoggingView::default());
    let hooks = LayerHooks::new()
        .with_register_overlay(|descriptor| {
            info!(overlay = %descriptor.name, "Overlay registered with host");
        })
        .with_on_viewport_changed(|event| {
            debug!(zoom = event.zoom, "Host viewport callback fired");
        });

    let layer = VehicleLayer::new(layer_config, hooks)
        .with_initial_snapshot(initial)
        .with_view(view.clone());

    let (tx, rx) = mpsc::unbounded_channel();
    let shutdown = CancellationToken::new();
    let (handle, mut status) = runtime::start(layer, rx, shutdown.clone());

    if let Some(zoom) = args.zoom {
        send_event(&tx, LayerEvent::ViewportChanged(ViewportEvent::new(zoom)))?;
    }
    if let Some(id) = &args.track {
        send_event(&tx, LayerEvent::Track(VehicleId::new(id.as_str())))?;
    }

    let mut previous = status.borrow().clone();
    let mut applied = 0usize;
    let mut interrupted = false;

    for (step, snapshot) in snapshots.into_iter().enumerate() {
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(args.interval)) => {}
            _ = tokio::signal::ctrl_c() => {
                println!();
                println!("Received shutdown signal, stopping replay...");
                interrupted = true;
            }
        }
        if interrupted {
            break;
        }

        send_event(&tx, LayerEvent::Refresh(snapshot))?;
        let current = next_refresh(&mut status, &previous).await;

        let shown: Vec<&str> = current.visible.iter().map(|v| v.id.as_str()).collect();
        println!(
            "[{}/{}] {} vehicles, showing [{}], {}",
            step + 1,
            total,
            current.vehicle_count,
            shown.join(", "),
            current.state
        );

        applied += 1;
        previous = current;
    }

    // Close the loop: cancellation on interrupt, channel close on a full run
    if interrupted {
        shutdown.cancel();
    }
    drop(tx);
    handle
        .await
        .map_err(|e| CliError::Runtime(e.to_string()))?;

    let final_status = status.borrow().clone();
    println!();
    println!("Replay Summary");
    println!("──────────────");
    println!("  Snapshots applied: {} of {}", applied + 1, total + 1);
    println!("  Final state:       {}", final_status.state);
    println!("  Map centerings:    {}", view.center_count());

    Ok(())
}

/// Read a snapshot file. Blank lines and `#` comment lines are skipped.
fn load_snapshots(path: &Path) -> Result<Vec<Vec<VehiclePosition>>, CliError> {
    let text = fs::read_to_string(path)?;
    let mut snapshots = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let vehicles = feed::parse_snapshot(line).map_err(|source| CliError::Feed {
            line: idx + 1,
            source,
        })?;
        snapshots.push(vehicles);
    }

    Ok(snapshots)
}

fn send_event(
    tx: &mpsc::UnboundedSender<LayerEvent>,
    event: LayerEvent,
) -> Result<(), CliError> {
    tx.send(event)
        .map_err(|_| CliError::Runtime("event loop stopped unexpectedly".to_string()))
}

/// Wait until the published status reflects a refresh newer than `previous`.
async fn next_refresh(
    status: &mut watch::Receiver<LayerStatus>,
    previous: &LayerStatus,
) -> LayerStatus {
    loop {
        {
            let current = status.borrow_and_update();
            if current.last_refresh != previous.last_refresh {
                return current.clone();
            }
        }
        if status.changed().await.is_err() {
            break;
        }
    }
    status.borrow().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_snapshots_skips_blanks_and_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# recorded 2024-03-01").unwrap();
        writeln!(file, r#"[{{"id": 1, "lat": 45.5, "lon": -122.6}}]"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"[{{"id": 2, "lat": 45.6, "lon": -122.7}}]"#).unwrap();

        let snapshots = load_snapshots(file.path()).unwrap();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0][0].id, VehicleId::new("1"));
        assert_eq!(snapshots[1][0].id, VehicleId::new("2"));
    }

    #[test]
    fn test_load_snapshots_reports_the_failing_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"[{{"id": 1, "lat": 45.5, "lon": -122.6}}]"#).unwrap();
        writeln!(file, "not json").unwrap();

        let err = load_snapshots(file.path()).unwrap_err();
        match err {
            CliError::Feed { line, .. } => assert_eq!(line, 2),
            other => panic!("expected feed error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_snapshots_missing_file() {
        let err = load_snapshots(Path::new("/nonexistent/replay.jsonl")).unwrap_err();
        assert!(matches!(err, CliError::SnapshotRead(_)));
    }
}
