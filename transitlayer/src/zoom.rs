//! Zoom tier classification for marker rendering.
//!
//! The map's zoom level gates how much detail each vehicle marker shows.
//! Three configured thresholds split the zoom range into tiers and the
//! rendering collaborator picks an icon style per tier. The tracking core
//! never branches on zoom itself; it only carries this configuration and
//! answers tier queries.

use crate::error::LayerError;

/// Zoom levels at which marker detail steps up.
///
/// Thresholds must be strictly ordered `far < mid < close`. The defaults
/// match typical street-map zoom levels where a transit fleet stays
/// readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomThresholds {
    /// Zoom level at which markers first appear.
    pub far: u8,
    /// Zoom level at which markers gain directional detail.
    pub mid: u8,
    /// Zoom level at which markers show full detail.
    pub close: u8,
}

impl Default for ZoomThresholds {
    fn default() -> Self {
        Self {
            far: 10,
            mid: 13,
            close: 15,
        }
    }
}

impl ZoomThresholds {
    /// Create validated thresholds.
    ///
    /// # Returns
    ///
    /// An error unless `far < mid < close`.
    pub fn new(far: u8, mid: u8, close: u8) -> Result<Self, LayerError> {
        if far >= mid || mid >= close {
            return Err(LayerError::InvalidZoomThresholds { far, mid, close });
        }
        Ok(Self { far, mid, close })
    }

    /// Classify a map zoom level into a rendering tier.
    pub fn tier_for(&self, zoom: u8) -> ZoomTier {
        if zoom >= self.close {
            ZoomTier::Close
        } else if zoom >= self.mid {
            ZoomTier::Mid
        } else if zoom >= self.far {
            ZoomTier::Far
        } else {
            ZoomTier::Hidden
        }
    }
}

/// A band of map zoom levels controlling marker detail.
///
/// Ordered from least to most detail, so tiers compare naturally as zoom
/// increases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ZoomTier {
    /// Below the far threshold; markers are not drawn at all.
    Hidden,
    /// Far band: minimal dot markers.
    Far,
    /// Mid band: markers with heading detail.
    Mid,
    /// Close band: full detail markers with labels.
    Close,
}
