//! Audio-reactive particle field.

mod field;

pub use field::{ParticleField, ParticleVertex};
