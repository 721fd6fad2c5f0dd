//! boltviz - audio-reactive particle visualizer
//!
//! Plays a playlist and spins a cloud of particles whose distance from the
//! axis follows the live frequency spectrum of whatever is playing.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use boltviz::params::VisualizerConfig;
use boltviz::render_loop::FrameScheduler;
use boltviz::rendering::RenderSystem;
use boltviz::session::{seeded_rng, VisualizerSession};
use boltviz::transport::{Playlist, Transport, TransportEvent};
use cli::Args;

/// How often playback progress is polled when no frames are drawn
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Display refresh via winit redraw requests
struct WindowScheduler(Arc<Window>);

impl FrameScheduler for WindowScheduler {
    fn request_frame(&self) {
        self.0.request_redraw();
    }
}

type Session = VisualizerSession<RenderSystem, WindowScheduler>;

/// Main application state
struct App {
    config: VisualizerConfig,
    transport: Transport,

    // Window and visualization
    window: Option<Arc<Window>>,
    session: Option<Session>,

    title: String,
}

impl App {
    fn new(config: VisualizerConfig, transport: Transport) -> Self {
        Self {
            config,
            transport,
            window: None,
            session: None,
            title: String::new(),
        }
    }

    fn mount(&mut self, window: &Arc<Window>) {
        let scheduler = WindowScheduler(Arc::clone(window));
        let target_window = Arc::clone(window);
        let particle_count = self.config.particles.count;
        let mut rng = seeded_rng(self.config.particles.seed);

        match VisualizerSession::setup(
            &self.config,
            self.transport.signal(),
            scheduler,
            || pollster::block_on(RenderSystem::new(target_window, particle_count)),
            &mut rng,
        ) {
            Ok(session) => self.session = Some(session),
            // Playback keeps working without visuals
            Err(e) => log::error!("Visualizer disabled: {}", e),
        }
    }

    fn unmount(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.teardown();
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode) {
        match code {
            KeyCode::Escape => {
                self.unmount();
                event_loop.exit();
            }
            KeyCode::Space => self.transport.toggle_play(),
            KeyCode::ArrowRight | KeyCode::KeyN => self.transport.next(),
            KeyCode::ArrowLeft | KeyCode::KeyP => self.transport.previous(),
            other => {
                if let Some(fraction) = seek_fraction(other) {
                    self.transport.seek(fraction);
                }
            }
        }
        self.refresh_title();
    }

    fn refresh_title(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let state = self.transport.state();
        let title = format!(
            "boltviz - {} {} [{:.0}%]",
            if state.is_playing { "Playing" } else { "Paused" },
            self.transport.current_track().title,
            state.progress_fraction * 100.0
        );
        if title != self.title {
            window.set_title(&title);
            self.title = title;
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        for event in self.transport.poll() {
            if let TransportEvent::TrackEnded(index) = event {
                log::info!("Track {} ended", index + 1);
            }
        }
        self.refresh_title();
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("boltviz")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        self.mount(&window);
        self.window = Some(window);
        self.refresh_title();

        log::info!("Space: play/pause, Left/Right: previous/next, 0-9: seek, Esc: quit");
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.unmount();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, code),
            WindowEvent::Resized(_) => {
                if let Some(session) = &mut self.session {
                    session.on_resize();
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(session) = &mut self.session {
                    session.on_frame();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.unmount();
    }
}

/// Digit keys seek to 0%..90% of the current track
fn seek_fraction(code: KeyCode) -> Option<f32> {
    let digit = match code {
        KeyCode::Digit0 => 0,
        KeyCode::Digit1 => 1,
        KeyCode::Digit2 => 2,
        KeyCode::Digit3 => 3,
        KeyCode::Digit4 => 4,
        KeyCode::Digit5 => 5,
        KeyCode::Digit6 => 6,
        KeyCode::Digit7 => 7,
        KeyCode::Digit8 => 8,
        KeyCode::Digit9 => 9,
        _ => return None,
    };
    Some(digit as f32 / 10.0)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();

    let mut config = match args.config_path() {
        Some(path) => {
            let config = VisualizerConfig::load(&path)?;
            log::info!("Loaded config from {}", path.display());
            config
        }
        None => VisualizerConfig::default(),
    };
    args.apply_overrides(&mut config);

    let playlist = Playlist::new(args.playlist_tracks(&config))
        .context("Nothing to play: pass audio files or add [[tracks]] to the config")?;
    let transport = Transport::open(playlist);

    let mut app = App::new(config, transport);
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.run_app(&mut app).context("Event loop failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_keys_seek_in_tenths() {
        assert_eq!(seek_fraction(KeyCode::Digit0), Some(0.0));
        assert_eq!(seek_fraction(KeyCode::Digit5), Some(0.5));
        assert_eq!(seek_fraction(KeyCode::Digit9), Some(0.9));
        assert_eq!(seek_fraction(KeyCode::KeyA), None);
    }
}
