//! Error types for the HUD monitor

use std::io;
use thiserror::Error;

/// Result type alias for monitor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type
///
/// None of these reach the user while the dashboard is running: the sampler
/// turns every failure into the metric's placeholder value.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Parse error (procfs/sysfs content, numeric fields)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Metric not available on this platform or machine
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Frame image could not be decoded
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    /// Shorthand used by platform readers that have nothing to offer
    pub fn not_supported(what: &str) -> Self {
        Error::NotSupported(format!("{} is not available on {}", what, std::env::consts::OS))
    }
}
