//! Parameter definitions with units and documented semantics.
//!
//! All tunables live here with:
//! - Units (world units, radians, dBFS, pixels)
//! - Documented ranges and meanings
//! - Defaults tuned for a few hundred particles at 60 fps

mod audio;
mod config;
mod particles;
mod render;

// Re-export all types
pub use audio::AnalyzerParams;
pub use config::{TrackEntry, VisualizerConfig, LOCAL_CONFIG};
pub use particles::ParticleParams;
pub use render::{CameraParams, WindowParams};
