//! The current snapshot of vehicle positions.
//!
//! A [`VehicleSet`] holds exactly one snapshot at a time. Refreshes replace
//! the whole set; there is no merging or patching of individual vehicles.
//! Feed order is preserved, and the display limit is applied as a plain
//! prefix of that order.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::geo::GeoBounds;
use crate::vehicle::{VehicleId, VehiclePosition};

/// Ordered collection of vehicle positions for one snapshot in time.
///
/// Invariant: ids are unique within the set. Snapshots that arrive with a
/// duplicated id are normalized on entry (first occurrence wins, later ones
/// are dropped with a warning).
#[derive(Debug, Clone, Default)]
pub struct VehicleSet {
    vehicles: Vec<VehiclePosition>,
    index: HashMap<VehicleId, usize>,
    replaced_at: Option<DateTime<Utc>>,
}

impl VehicleSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set seeded with an initial snapshot.
    pub fn from_snapshot(snapshot: Vec<VehiclePosition>) -> Self {
        let mut set = Self::new();
        set.replace(snapshot);
        set
    }

    /// Atomically swap in a new snapshot.
    ///
    /// The previous snapshot is discarded entirely and the id index is
    /// rebuilt, so any lookup after this call only ever sees the new data.
    pub fn replace(&mut self, snapshot: Vec<VehiclePosition>) {
        self.vehicles.clear();
        self.index.clear();
        self.vehicles.reserve(snapshot.len());

        for vehicle in snapshot {
            if self.index.contains_key(&vehicle.id) {
                warn!(
                    vehicle_id = %vehicle.id,
                    "Duplicate vehicle id in snapshot, keeping first occurrence"
                );
                continue;
            }
            self.index.insert(vehicle.id.clone(), self.vehicles.len());
            self.vehicles.push(vehicle);
        }

        self.replaced_at = Some(Utc::now());
    }

    /// Look up a vehicle by id within the current snapshot only.
    ///
    /// # Returns
    ///
    /// `None` when the id is absent. Absence is an expected condition on a
    /// live feed (the caller decides whether it means stale or removed),
    /// never an error.
    pub fn find_by_id(&self, id: &VehicleId) -> Option<&VehiclePosition> {
        self.index.get(id).map(|&i| &self.vehicles[i])
    }

    /// A prefix of the current snapshot with at most `n` vehicles.
    ///
    /// Returns the first `min(n, len)` vehicles in feed order. `n == 0`
    /// yields an empty slice. The underlying snapshot is never modified.
    pub fn limited(&self, n: usize) -> &[VehiclePosition] {
        &self.vehicles[..n.min(self.vehicles.len())]
    }

    /// Bounding box around every vehicle in the snapshot.
    ///
    /// `None` for an empty set.
    pub fn bounds(&self) -> Option<GeoBounds> {
        let mut iter = self.vehicles.iter();
        let first = iter.next()?;
        let mut bounds = GeoBounds::from_point(first.point());
        for vehicle in iter {
            bounds.expand(vehicle.point());
        }
        Some(bounds)
    }

    /// The first vehicle in feed order, if any.
    pub fn first(&self) -> Option<&VehiclePosition> {
        self.vehicles.first()
    }

    /// Iterate the snapshot in feed order.
    pub fn iter(&self) -> std::slice::Iter<'_, VehiclePosition> {
        self.vehicles.iter()
    }

    /// Number of vehicles in the snapshot.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// True when the snapshot holds no vehicles.
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// When the current snapshot was installed, if one ever was.
    pub fn replaced_at(&self) -> Option<DateTime<Utc>> {
        self.replaced_at
    }
}
