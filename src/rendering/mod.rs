//! Draw targets for the particle field.
//!
//! [`RenderTarget`] is the seam between the visualization core and the
//! host surface: the viewport reads the client area and resizes the raster
//! surface through it, and the render loop issues exactly one draw per tick.

mod system;

use glam::Mat4;

use crate::error::VizError;
use crate::particles::ParticleVertex;

pub use system::{RenderSystem, Uniforms};

/// Everything a single draw call needs
#[derive(Debug, Clone, Copy)]
pub struct FrameData<'a> {
    pub particles: &'a [ParticleVertex],
    /// Camera view combined with the field rotation
    pub model_view: Mat4,
    pub projection: Mat4,
    /// Particle diameter (world units)
    pub point_size: f32,
}

/// Host drawing surface
pub trait RenderTarget {
    /// Current client-visible size in physical pixels
    fn client_size(&self) -> (u32, u32);

    /// Match the raster surface to the given client size
    fn resize_surface(&mut self, width: u32, height: u32);

    /// Draw one frame
    fn draw(&mut self, frame: &FrameData<'_>) -> Result<(), VizError>;
}
