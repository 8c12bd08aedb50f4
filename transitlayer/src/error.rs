//! Library error types.
//!
//! The tracking core itself has no fatal failure modes: an empty snapshot,
//! a tracked vehicle that vanished from the feed, or an unset callback are
//! all ordinary states. Errors exist only at the boundaries where untyped
//! values enter, which is configuration and feed parsing.

use thiserror::Error;

use crate::feed::FeedError;
use crate::geo::CoordError;

/// Errors from layer configuration and construction.
#[derive(Debug, Error)]
pub enum LayerError {
    /// The display limit must be a positive integer.
    ///
    /// A zero or negative limit is a contract violation by the caller, not
    /// a state the layer can run in.
    #[error("display limit must be positive, got {0}")]
    InvalidDisplayLimit(i64),

    /// Zoom thresholds must be strictly ordered.
    #[error("zoom thresholds must satisfy far < mid < close, got far={far} mid={mid} close={close}")]
    InvalidZoomThresholds {
        /// Configured far threshold.
        far: u8,
        /// Configured mid threshold.
        mid: u8,
        /// Configured close threshold.
        close: u8,
    },

    /// The configuration file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// A coordinate failed validation.
    #[error("coordinate error: {0}")]
    Coord(#[from] CoordError),

    /// A snapshot document failed to parse.
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_limit_error_message() {
        let err = LayerError::InvalidDisplayLimit(-3);
        assert!(err.to_string().contains("positive"));
        assert!(err.to_string().contains("-3"));
    }

    #[test]
    fn test_zoom_threshold_error_message() {
        let err = LayerError::InvalidZoomThresholds {
            far: 13,
            mid: 10,
            close: 15,
        };
        assert!(err.to_string().contains("far < mid < close"));
        assert!(err.to_string().contains("far=13"));
    }

    #[test]
    fn test_coord_error_converts() {
        let err: LayerError = CoordError::InvalidLatitude(99.0).into();
        assert!(matches!(err, LayerError::Coord(_)));
    }
}
