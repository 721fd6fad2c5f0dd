//! Particle field dimensions and motion parameters.

use serde::Deserialize;

/// Particle field parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParticleParams {
    /// Number of particles (P), fixed for the session
    pub count: usize,

    /// Radius reached by a full-scale bin (world units)
    pub radius_scale: f32,

    /// Rotation about the Y axis added every tick (radians)
    pub rotation_speed: f32,

    /// Extent of the initial cloud on each axis (world units)
    /// Depth (z) is drawn from this range once and never changes
    pub depth_spread: f32,

    /// Rendered point diameter (world units)
    pub point_size: f32,

    /// Seed for initial placement and colors (random when absent)
    pub seed: Option<u64>,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            count: 128,
            radius_scale: 5.0,
            rotation_speed: 0.002,
            depth_spread: 10.0,
            point_size: 0.1,
            seed: None,
        }
    }
}
