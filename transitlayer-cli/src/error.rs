//! CLI error types.

use std::fmt;

use transitlayer::error::LayerError;
use transitlayer::feed::FeedError;

/// Errors that can occur while running a CLI command.
#[derive(Debug)]
pub enum CliError {
    /// Failed to read the snapshot input file.
    SnapshotRead(std::io::Error),

    /// A snapshot document in the replay input failed to parse.
    Feed { line: usize, source: FeedError },

    /// Configuration error.
    Config(String),

    /// Error raised by the overlay library.
    Layer(LayerError),

    /// The replay loop task failed.
    Runtime(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::SnapshotRead(e) => {
                write!(f, "Failed to read snapshot file: {}", e)
            }
            CliError::Feed { line, source } => {
                write!(f, "Malformed snapshot on line {}: {}", line, source)
            }
            CliError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            CliError::Layer(e) => {
                write!(f, "Layer error: {}", e)
            }
            CliError::Runtime(msg) => {
                write!(f, "Replay loop failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::SnapshotRead(e) => Some(e),
            CliError::Feed { source, .. } => Some(source),
            CliError::Config(_) => None,
            CliError::Layer(e) => Some(e),
            CliError::Runtime(_) => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::SnapshotRead(e)
    }
}

impl From<LayerError> for CliError {
    fn from(e: LayerError) -> Self {
        CliError::Layer(e)
    }
}
