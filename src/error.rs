//! Error taxonomy for the visualization core.
//!
//! Every variant is contained by the caller: audio failures degrade to an idle
//! field, surface failures disable drawing, and nothing is retried.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VizError {
    /// The signal tap or analysis context could not be established
    #[error("audio unavailable: {0}")]
    AudioUnavailable(String),

    /// The drawing surface or its rendering context could not be created
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A single frame could not be presented
    #[error("draw failed: {0}")]
    Draw(#[from] wgpu::SurfaceError),
}
