//! Error types for the export engine

use thiserror::Error;

/// Result type alias for export operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while exporting a panel
#[derive(Error, Debug)]
pub enum Error {
    /// Page/margin configuration collapses the printable area. This is a
    /// configuration defect and is never clamped or worked around.
    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),

    /// The snapshot stage failed to produce a bitmap
    #[error("Capture failed: {0}")]
    CaptureFailure(String),

    /// The document writer failed while assembling or finalizing
    #[error("Document write failed: {0}")]
    WriteFailure(String),

    /// Invalid export configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// A second export was triggered while one was still in flight
    #[error("An export is already in progress")]
    ExportInProgress,

    /// Export timed out
    #[error("Export timed out after {0}ms")]
    Timeout(u64),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
