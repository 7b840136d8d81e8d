//! Error types

use thiserror::Error;

/// Engine errors
///
/// None of these are fatal to the page: rendering failures disable the
/// starfield, navigation failures are ignored.
#[derive(Error, Debug)]
pub enum WarpError {
    /// Required DOM element is absent
    #[error("Missing element: {0}")]
    MissingElement(String),

    /// Browser API call failed
    #[error("Browser API failed: {0}")]
    Browser(String),

    /// Drawing surface could not be created on the canvas
    #[error("Surface creation failed: {0}")]
    Surface(String),

    /// No GPU adapter for the surface (WebGPU and WebGL2 both unavailable)
    #[error("No compatible graphics adapter: {0}")]
    Adapter(String),

    /// Device request rejected by the adapter
    #[error("Device request failed: {0}")]
    Device(String),

    /// Config block could not be parsed
    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),

    /// Navigation target is not a known page
    #[error("Unknown page: {0}")]
    UnknownPage(String),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, WarpError>;
