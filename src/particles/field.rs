//! Particle field with spectrum-driven radial placement.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

use crate::audio::AmplitudeSnapshot;
use crate::params::ParticleParams;

/// Per-particle instance data (position + color)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Fixed-size particle field.
///
/// Local positions are derived state: every call to
/// [`apply_spectrum`](Self::apply_spectrum) recomputes x and y of every
/// particle from the snapshot alone. Depth and color are drawn once at
/// construction. The whole field additionally spins about the Y axis by the
/// accumulated rotation angle, applied through [`model_matrix`](Self::model_matrix).
pub struct ParticleField {
    vertices: Vec<ParticleVertex>,
    radius_scale: f32,
    rotation_speed: f32,
    point_size: f32,
    /// Accumulated rotation about Y (radians, in [0, 2pi))
    rotation: f32,
}

impl ParticleField {
    /// Scatter `params.count` particles through a cube of side `depth_spread`
    pub fn new<R: Rng + ?Sized>(params: &ParticleParams, rng: &mut R) -> Self {
        let half = params.depth_spread / 2.0;

        let vertices = (0..params.count)
            .map(|_| ParticleVertex {
                position: [
                    rng.random_range(-half..=half),
                    rng.random_range(-half..=half),
                    rng.random_range(-half..=half),
                ],
                color: [rng.random(), rng.random(), rng.random()],
            })
            .collect();

        Self {
            vertices,
            radius_scale: params.radius_scale,
            rotation_speed: params.rotation_speed,
            point_size: params.point_size,
            rotation: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[ParticleVertex] {
        &self.vertices
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Rendered diameter of each particle (world units)
    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    /// Distance of particle `index` from the rotation axis in the field's own frame
    pub fn radius(&self, index: usize) -> f32 {
        let [x, y, _] = self.vertices[index].position;
        x.hypot(y)
    }

    /// Recompute every particle's x/y from `snapshot`.
    ///
    /// Particle `i` reads bin `i mod N` and sits at angle `i` radians on a
    /// circle of radius `amplitude * radius_scale`. An empty snapshot places
    /// every particle on the axis.
    pub fn apply_spectrum(&mut self, snapshot: &AmplitudeSnapshot) {
        for (i, vertex) in self.vertices.iter_mut().enumerate() {
            let radius = snapshot.wrapped(i) * self.radius_scale;
            let angle = i as f32;
            vertex.position[0] = radius * angle.cos();
            vertex.position[1] = radius * angle.sin();
        }
    }

    /// Add one fixed rotation increment, kept within one turn
    pub fn advance_rotation(&mut self) {
        self.rotation = (self.rotation + self.rotation_speed).rem_euclid(TAU);
    }

    /// Rotation of the whole field about Y
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation)
    }

    /// Positions after applying the field rotation
    pub fn world_positions(&self) -> Vec<Vec3> {
        let model = self.model_matrix();
        self.vertices
            .iter()
            .map(|v| model.transform_point3(Vec3::from_array(v.position)))
            .collect()
    }
}
