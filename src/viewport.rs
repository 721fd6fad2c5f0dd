//! Viewport sizing and perspective camera.

use glam::{Mat4, Vec3};

use crate::params::CameraParams;
use crate::rendering::RenderTarget;

/// Result of a resize notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// Projection and surface were updated
    Resized,
    /// Client area already matched; nothing changed
    Unchanged,
    /// Zero-sized client area (transient); nothing changed
    Ignored,
}

/// Projection parameters kept in step with the host surface size
#[derive(Debug, Clone)]
pub struct Viewport {
    width_px: u32,
    height_px: u32,
    aspect_ratio: f32,
    fov_degrees: f32,
    near_plane: f32,
    far_plane: f32,
    /// Camera eye, looking at the origin
    eye: Vec3,
    projection: Mat4,
}

impl Viewport {
    /// Unsized viewport (aspect 1) until the first resize
    pub fn new(params: &CameraParams) -> Self {
        let mut viewport = Self {
            width_px: 0,
            height_px: 0,
            aspect_ratio: 1.0,
            fov_degrees: params.fov_degrees,
            near_plane: params.near_plane,
            far_plane: params.far_plane,
            eye: Vec3::new(0.0, 0.0, params.distance),
            projection: Mat4::IDENTITY,
        };
        viewport.update_projection();
        viewport
    }

    /// Re-read the host's client area and bring projection and surface in line.
    ///
    /// A zero-sized client area is ignored; the next notification corrects it.
    pub fn on_resize<T: RenderTarget + ?Sized>(&mut self, target: &mut T) -> ResizeOutcome {
        let (width, height) = target.client_size();

        if width == 0 || height == 0 {
            log::debug!("Viewport: ignoring zero-sized client area {}x{}", width, height);
            return ResizeOutcome::Ignored;
        }
        if (width, height) == (self.width_px, self.height_px) {
            return ResizeOutcome::Unchanged;
        }

        self.width_px = width;
        self.height_px = height;
        self.aspect_ratio = width as f32 / height as f32;
        self.update_projection();
        target.resize_surface(width, height);

        log::debug!(
            "Viewport: {}x{} (aspect {:.3})",
            width,
            height,
            self.aspect_ratio
        );
        ResizeOutcome::Resized
    }

    fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect_ratio,
            self.near_plane,
            self.far_plane,
        );
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width_px, self.height_px)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// World-to-camera transform (Y up, camera never rolls)
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, Vec3::ZERO, Vec3::Y)
    }
}
