//! boltviz library - audio-reactive particle visualization

pub mod audio;
pub mod error;
pub mod params;
pub mod particles;
pub mod render_loop;
pub mod rendering;
pub mod session;
pub mod transport;
pub mod viewport;

#[cfg(test)]
mod testing;
