use thiserror::Error;

/// Construction failures. A live [`crate::tunnel::Tunnel`] has no error paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("failed to allocate {bytes} bytes for the {what}")]
    Allocation { what: &'static str, bytes: usize },

    #[error("invalid raster dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid texture dimensions {width}x{height}")]
    InvalidTexture { width: usize, height: usize },
}
