//! Camera and window configuration.

use serde::Deserialize;

/// Perspective camera configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraParams {
    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units)
    pub far_plane: f32,

    /// Distance of the eye from the field origin along +Z
    pub distance: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near_plane: 0.1,
            far_plane: 1000.0,
            distance: 5.0,
        }
    }
}

/// Initial window configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowParams {
    /// Window width (logical pixels)
    pub width: u32,

    /// Window height (logical pixels)
    pub height: u32,
}

impl Default for WindowParams {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
        }
    }
}
