//! Playback transport feeding the visualizer.
//!
//! Tracks are decoded whole with symphonia, resampled to the device rate and
//! played through cpal. Every block sent to the device is also published to
//! the transport's [`AudioSignal`](crate::audio::AudioSignal).

mod decode;
mod player;
mod playlist;
mod state;

pub use decode::{decode_track, DecodedTrack};
pub use player::{Transport, TransportEvent};
pub use playlist::{Playlist, Track};
pub use state::{normalize_progress, PlaybackState};
