//! Playback transport: playlist navigation, the output stream and the
//! persistent signal the analyzer taps.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};
use std::thread;

use super::decode::{decode_track, DecodedTrack};
use super::playlist::{Playlist, Track};
use super::state::{normalize_progress, PlaybackState};
use crate::audio::AudioSignal;

/// Sample rate used when no output device is available
const FALLBACK_SAMPLE_RATE: u32 = 44_100;

/// Notifications for the UI collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportEvent {
    /// Position within the current track, in [0, 1]
    Progress(f32),
    /// The track at this index played to its end
    TrackEnded(usize),
}

/// Playback cursor shared with the output callback
struct Deck {
    track: DecodedTrack,
    /// Next stereo frame to play
    position: usize,
    playing: bool,
    ended: bool,
    /// Bumped on every track selection; stale decodes are discarded
    generation: u64,
    /// A decode for the current selection is still running
    loading: bool,
    /// Scratch buffer for the mono mix handed to the signal
    mono: Vec<f32>,
}

impl Deck {
    fn new(sample_rate: u32) -> Self {
        Self {
            track: DecodedTrack::silent(sample_rate),
            position: 0,
            playing: false,
            ended: false,
            generation: 0,
            loading: false,
            mono: Vec::new(),
        }
    }

    /// Switch to silence while the next track decodes
    fn begin_load(&mut self, sample_rate: u32) -> u64 {
        self.generation += 1;
        self.track = DecodedTrack::silent(sample_rate);
        self.position = 0;
        self.ended = false;
        self.loading = true;
        self.generation
    }

    /// Install a finished decode unless a newer selection superseded it
    fn finish_load(&mut self, generation: u64, track: DecodedTrack) -> bool {
        if generation != self.generation {
            return false;
        }
        self.track = track;
        self.position = 0;
        self.ended = false;
        self.loading = false;
        true
    }

    fn progress(&self) -> f32 {
        normalize_progress(self.position as f64, self.track.frames() as f64)
    }

    /// Fill one interleaved output block and publish its mono mix
    fn fill(&mut self, data: &mut [f32], channels: usize, signal: &AudioSignal) {
        let channels = channels.max(1);
        self.mono.clear();

        for frame in data.chunks_mut(channels) {
            let (left, right) = if self.playing && !self.ended {
                match self.track.frame(self.position) {
                    Some(sample) => {
                        self.position += 1;
                        sample
                    }
                    None => {
                        // A track that failed to load stays silent until skipped
                        if self.track.frames() > 0 {
                            self.ended = true;
                        }
                        (0.0, 0.0)
                    }
                }
            } else {
                (0.0, 0.0)
            };

            let mid = (left + right) * 0.5;
            for (ch, out) in frame.iter_mut().enumerate() {
                *out = match (channels, ch) {
                    (1, _) => mid,
                    (_, 0) => left,
                    (_, 1) => right,
                    _ => mid,
                };
            }
            self.mono.push(mid);
        }

        let frames = self.track.frames();
        if self.playing && frames > 0 && self.position >= frames {
            self.ended = true;
        }

        signal.publish(&self.mono);
    }
}

type SharedDeck = Arc<Mutex<Deck>>;

/// Plays the playlist through the default output device.
///
/// The [`AudioSignal`] is created once with the transport and survives every
/// track change, so the analyzer's tap keeps observing whatever plays.
pub struct Transport {
    playlist: Playlist,
    index: usize,
    deck: SharedDeck,
    signal: AudioSignal,
    sample_rate: u32,
    /// Output stream (kept alive); absent when no device is available
    _stream: Option<cpal::Stream>,
    /// Decoder thread for the most recent selection
    loader: Option<thread::JoinHandle<()>>,
}

impl Transport {
    /// Open the default output device and start loading the first track
    /// (paused).
    ///
    /// Without a usable device the transport still works, silently, and its
    /// signal cannot be tapped.
    pub fn open(playlist: Playlist) -> Self {
        let deck = Arc::new(Mutex::new(Deck::new(FALLBACK_SAMPLE_RATE)));
        let connected = AudioSignal::connected();

        let (signal, sample_rate, stream) = match build_output_stream(&deck, &connected) {
            Ok((stream, sample_rate)) => (connected, sample_rate, Some(stream)),
            Err(e) => {
                log::warn!("Audio output unavailable: {}", e);
                (AudioSignal::disconnected(), FALLBACK_SAMPLE_RATE, None)
            }
        };

        let mut transport = Self {
            playlist,
            index: 0,
            deck,
            signal,
            sample_rate,
            _stream: stream,
            loader: None,
        };
        transport.select(0);
        transport
    }

    /// Transport without a device; blocks are pulled with [`render_block`](Self::render_block)
    pub fn headless(playlist: Playlist, sample_rate: u32) -> Self {
        let mut transport = Self {
            playlist,
            index: 0,
            deck: Arc::new(Mutex::new(Deck::new(sample_rate))),
            signal: AudioSignal::connected(),
            sample_rate,
            _stream: None,
            loader: None,
        };
        transport.select(0);
        transport
    }

    /// Produce one interleaved stereo block, as the device callback would
    pub fn render_block(&self, data: &mut [f32]) {
        lock(&self.deck).fill(data, 2, &self.signal);
    }

    pub fn signal(&self) -> &AudioSignal {
        &self.signal
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn current_track(&self) -> &Track {
        // Index always comes from the playlist's own navigation
        &self.playlist.tracks()[self.index]
    }

    pub fn state(&self) -> PlaybackState {
        let deck = lock(&self.deck);
        PlaybackState {
            current_track_index: self.index,
            is_playing: deck.playing,
            progress_fraction: deck.progress(),
        }
    }

    /// Duration of the loaded track; 0 while it is still decoding
    pub fn duration_secs(&self) -> f64 {
        lock(&self.deck).track.duration_secs()
    }

    /// Whether the current track is still being decoded
    pub fn is_loading(&self) -> bool {
        lock(&self.deck).loading
    }

    /// Block until the current track has finished decoding
    pub fn wait_loaded(&mut self) {
        if let Some(loader) = self.loader.take() {
            if loader.join().is_err() {
                log::error!("Decoder thread panicked");
                lock(&self.deck).loading = false;
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        lock(&self.deck).playing
    }

    pub fn play(&mut self) {
        self.set_playing(true);
    }

    pub fn pause(&mut self) {
        self.set_playing(false);
    }

    pub fn toggle_play(&mut self) {
        let playing = self.is_playing();
        self.set_playing(!playing);
    }

    fn set_playing(&mut self, playing: bool) {
        lock(&self.deck).playing = playing;
        self.signal.set_live(playing);
        log::debug!("Transport: {}", if playing { "play" } else { "pause" });
    }

    /// Advance to the next track, wrapping; the playing flag is kept
    pub fn next(&mut self) {
        self.select(self.playlist.next_index(self.index));
    }

    /// Step back to the previous track, wrapping; the playing flag is kept
    pub fn previous(&mut self) {
        self.select(self.playlist.previous_index(self.index));
    }

    /// Jump to `fraction` of the current track (clamped into [0, 1])
    pub fn seek(&mut self, fraction: f32) {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let mut deck = lock(&self.deck);
        let frames = deck.track.frames();
        deck.position = ((frames as f64 * fraction as f64) as usize).min(frames);
        deck.ended = false;
    }

    /// Collect pending notifications; an ended track advances to the next one
    pub fn poll(&mut self) -> Vec<TransportEvent> {
        let (progress, ended) = {
            let deck = lock(&self.deck);
            (deck.progress(), deck.ended)
        };

        let mut events = vec![TransportEvent::Progress(progress)];
        if ended {
            events.push(TransportEvent::TrackEnded(self.index));
            self.next();
        }
        events
    }

    /// Point at `index` and decode it in the background. The deck plays
    /// silence until the decode lands, so callers on the UI thread never wait.
    fn select(&mut self, index: usize) {
        self.index = index;
        let track = self.current_track().clone();
        let sample_rate = self.sample_rate;
        let generation = lock(&self.deck).begin_load(sample_rate);

        log::info!(
            "Track {}/{}: {}",
            index + 1,
            self.playlist.len(),
            track.title
        );

        let deck = Arc::clone(&self.deck);
        let spawned = thread::Builder::new()
            .name("track-decode".to_string())
            .spawn(move || {
                let decoded = match decode_track(&track.source, sample_rate) {
                    Ok(decoded) => decoded,
                    Err(e) => {
                        log::warn!("Track '{}' unavailable: {:#}", track.title, e);
                        DecodedTrack::silent(sample_rate)
                    }
                };
                if !lock(&deck).finish_load(generation, decoded) {
                    log::debug!("Discarded stale decode of '{}'", track.title);
                }
            });

        match spawned {
            Ok(handle) => self.loader = Some(handle),
            Err(e) => {
                log::error!("Failed to start decoder thread: {}", e);
                lock(&self.deck).loading = false;
            }
        }
    }
}

fn lock(deck: &SharedDeck) -> std::sync::MutexGuard<'_, Deck> {
    deck.lock().unwrap_or_else(|e| e.into_inner())
}

fn build_output_stream(
    deck: &SharedDeck,
    signal: &AudioSignal,
) -> Result<(cpal::Stream, u32), String> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or("No audio output device found")?;

    let supported = device
        .default_output_config()
        .map_err(|e| format!("Failed to get audio config: {}", e))?;

    let sample_rate = supported.sample_rate().0;
    let channels = supported.channels() as usize;

    log::info!(
        "Audio: {} @ {}Hz, {} ch",
        device.name().unwrap_or_else(|_| "Unknown".to_string()),
        sample_rate,
        channels
    );

    let deck_ref = Arc::clone(deck);
    let signal_ref = signal.clone();

    let stream = device
        .build_output_stream(
            &supported.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let Ok(mut deck) = deck_ref.lock() else {
                    data.fill(0.0);
                    return;
                };
                deck.fill(data, channels, &signal_ref);
            },
            |err| log::error!("Audio stream error: {}", err),
            None,
        )
        .map_err(|e| format!("Failed to build audio stream: {}", e))?;

    stream
        .play()
        .map_err(|e| format!("Failed to start audio stream: {}", e))?;

    Ok((stream, sample_rate))
}
