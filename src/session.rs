//! Visualization session: everything acquired at mount, released at unmount.
//!
//! Setup acquires the analyzer tap, then the draw target, then starts the
//! render loop. Teardown undoes all of it exactly once, whether called
//! explicitly or by dropping the session.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::{AudioSignal, FrequencyAnalyzer};
use crate::error::VizError;
use crate::params::VisualizerConfig;
use crate::particles::ParticleField;
use crate::render_loop::{FrameScheduler, RenderLoop, TickOutcome};
use crate::rendering::RenderTarget;
use crate::viewport::{ResizeOutcome, Viewport};

/// Field RNG: fixed seed when given, otherwise a fresh one
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    StdRng::seed_from_u64(seed.unwrap_or_else(rand::random))
}

pub struct VisualizerSession<T: RenderTarget, S: FrameScheduler> {
    analyzer: FrequencyAnalyzer,
    field: ParticleField,
    viewport: Viewport,
    render_loop: RenderLoop<S>,
    /// Released on teardown
    target: Option<T>,
}

impl<T: RenderTarget, S: FrameScheduler> VisualizerSession<T, S> {
    /// Mount the visualizer on `signal`.
    ///
    /// An unavailable signal or an unusable analyzer configuration degrades
    /// to a silent analyzer, leaving an idle but rendered field. A draw target
    /// that cannot be created fails the whole setup, after the tap has been
    /// released again.
    pub fn setup<F, R>(
        config: &VisualizerConfig,
        signal: &AudioSignal,
        scheduler: S,
        make_target: F,
        rng: &mut R,
    ) -> Result<Self, VizError>
    where
        F: FnOnce() -> Result<T, VizError>,
        R: Rng + ?Sized,
    {
        let mut analyzer = match FrequencyAnalyzer::setup(signal, &config.analyzer) {
            Ok(analyzer) => analyzer,
            Err(e) => {
                log::warn!("{}; particles will stay idle", e);
                FrequencyAnalyzer::unavailable(&config.analyzer)
            }
        };

        let mut target = match make_target() {
            Ok(target) => target,
            Err(e) => {
                analyzer.teardown();
                return Err(e);
            }
        };

        let field = ParticleField::new(&config.particles, rng);
        let mut viewport = Viewport::new(&config.camera);
        viewport.on_resize(&mut target);

        log::info!(
            "Visualizer session started: {} particles, {} bins",
            field.len(),
            analyzer.bin_count()
        );

        Ok(Self {
            analyzer,
            field,
            viewport,
            render_loop: RenderLoop::start(scheduler),
            target: Some(target),
        })
    }

    /// One display refresh
    pub fn on_frame(&mut self) -> TickOutcome {
        let Some(target) = self.target.as_mut() else {
            return TickOutcome::Stopped;
        };
        self.render_loop
            .tick(&mut self.analyzer, &mut self.field, &self.viewport, target)
    }

    /// Host resize notification
    pub fn on_resize(&mut self) -> ResizeOutcome {
        match self.target.as_mut() {
            Some(target) => self.viewport.on_resize(target),
            None => ResizeOutcome::Ignored,
        }
    }

    /// Stop the loop, release the tap and the draw target.
    /// Returns false when the session was already torn down.
    pub fn teardown(&mut self) -> bool {
        let stopped = self.render_loop.stop();
        let untapped = self.analyzer.teardown();
        let released = self.target.take().is_some();

        let any = stopped || untapped || released;
        if any {
            log::info!(
                "Visualizer session ended after {} frames",
                self.render_loop.ticks()
            );
        }
        any
    }

    pub fn is_active(&self) -> bool {
        self.render_loop.is_active()
    }

    pub fn frames(&self) -> u64 {
        self.render_loop.ticks()
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn analyzer(&self) -> &FrequencyAnalyzer {
        &self.analyzer
    }

    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }
}

impl<T: RenderTarget, S: FrameScheduler> Drop for VisualizerSession<T, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingScheduler, FakeSurface};
    use crate::transport::{Playlist, Track, Transport};
    use std::path::PathBuf;

    type TestSession = VisualizerSession<FakeSurface, CountingScheduler>;

    fn config() -> VisualizerConfig {
        let mut config = VisualizerConfig::default();
        config.particles.seed = Some(3);
        config
    }

    fn mount(signal: &AudioSignal, surface: FakeSurface) -> (TestSession, CountingScheduler) {
        let scheduler = CountingScheduler::default();
        let session = VisualizerSession::setup(
            &config(),
            signal,
            scheduler.clone(),
            || Ok(surface),
            &mut seeded_rng(Some(3)),
        )
        .unwrap();
        (session, scheduler)
    }

    fn write_tone(name: &str, frames: usize) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "boltviz_session_{}_{}.wav",
            std::process::id(),
            name
        ));
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for n in 0..frames {
            let s = (n as f32 * 0.3).sin() * 0.5;
            writer.write_sample((s * i16::MAX as f32) as i16).unwrap();
        }
        writer.finalize().unwrap();
        path
    }

    #[test]
    fn test_setup_sizes_viewport_and_starts_loop() {
        let signal = AudioSignal::connected();
        let (session, scheduler) = mount(&signal, FakeSurface::new(800, 600));

        assert!(session.is_active());
        assert!(signal.has_tap());
        assert_eq!(scheduler.requests.get(), 1);
        assert_eq!(session.viewport().size(), (800, 600));
        assert_eq!(session.target().unwrap().surface, (800, 600));
        assert_eq!(session.field().len(), 128);
    }

    #[test]
    fn test_resize_after_mount() {
        let signal = AudioSignal::connected();
        let (mut session, _) = mount(&signal, FakeSurface::new(800, 600));

        assert_eq!(session.on_resize(), ResizeOutcome::Unchanged);
        assert!((session.viewport().aspect_ratio() - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_teardown_stops_drawing_and_releases_tap() {
        let signal = AudioSignal::connected();
        let surface = FakeSurface::new(640, 480);
        let draws = surface.draws.clone();
        let (mut session, scheduler) = mount(&signal, surface);

        for _ in 0..3 {
            assert_eq!(session.on_frame(), TickOutcome::Drawn);
        }
        assert!(session.teardown());

        assert!(!signal.has_tap());
        assert!(session.target().is_none());
        assert_eq!(session.on_frame(), TickOutcome::Stopped);
        assert_eq!(session.on_resize(), ResizeOutcome::Ignored);
        assert_eq!(draws.get(), 3);
        assert_eq!(scheduler.requests.get(), 4);

        // Second teardown and the drop are no-ops
        assert!(!session.teardown());
        drop(session);
        assert_eq!(draws.get(), 3);
    }

    #[test]
    fn test_drop_releases_tap() {
        let signal = AudioSignal::connected();
        let (session, _) = mount(&signal, FakeSurface::new(640, 480));
        assert!(signal.has_tap());

        drop(session);
        assert!(!signal.has_tap());

        // The persistent signal can be tapped again by a new session
        let (session, _) = mount(&signal, FakeSurface::new(640, 480));
        assert!(session.analyzer().is_tapped());
    }

    #[test]
    fn test_surface_failure_releases_tap() {
        let signal = AudioSignal::connected();
        let scheduler = CountingScheduler::default();

        let result: Result<TestSession, _> = VisualizerSession::setup(
            &config(),
            &signal,
            scheduler.clone(),
            || Err(VizError::SurfaceUnavailable("no adapter".to_string())),
            &mut seeded_rng(Some(1)),
        );

        assert!(matches!(result, Err(VizError::SurfaceUnavailable(_))));
        assert!(!signal.has_tap());
        assert_eq!(scheduler.requests.get(), 0);
    }

    #[test]
    fn test_zero_bins_degrades_to_idle_field() {
        let signal = AudioSignal::connected();
        let mut config = config();
        config.analyzer.bin_resolution = 0;

        let mut session: TestSession = VisualizerSession::setup(
            &config,
            &signal,
            CountingScheduler::default(),
            || Ok(FakeSurface::new(640, 480)),
            &mut seeded_rng(Some(3)),
        )
        .unwrap();

        assert!(!session.analyzer().is_tapped());
        assert!(!signal.has_tap());
        signal.set_live(true);
        for _ in 0..3 {
            assert_eq!(session.on_frame(), TickOutcome::Drawn);
        }
        for i in 0..session.field().len() {
            assert_eq!(session.field().radius(i), 0.0);
        }
        assert!(session.field().rotation() > 0.0);
    }

    #[test]
    fn test_missing_audio_degrades_to_idle_field() {
        let signal = AudioSignal::disconnected();
        let (mut session, _) = mount(&signal, FakeSurface::new(640, 480));

        assert!(!session.analyzer().is_tapped());
        assert_eq!(session.on_frame(), TickOutcome::Drawn);
        for i in 0..session.field().len() {
            assert_eq!(session.field().radius(i), 0.0);
        }
    }

    #[test]
    fn test_track_change_keeps_cadence_and_rotation() {
        let paths = vec![write_tone("one", 4000), write_tone("two", 4000)];
        let playlist = Playlist::new(paths.iter().map(|p| Track::from_path(p)).collect()).unwrap();
        let mut transport = Transport::headless(playlist, 8000);
        transport.wait_loaded();

        let (mut session, scheduler) = mount(transport.signal(), FakeSurface::new(800, 600));
        transport.play();

        let mut block = vec![0.0; 256 * 2];
        for frame in 0..20 {
            if frame == 10 {
                transport.next();
                transport.wait_loaded();
            }
            transport.render_block(&mut block);
            assert_eq!(session.on_frame(), TickOutcome::Drawn);
        }
        for p in &paths {
            std::fs::remove_file(p).ok();
        }

        assert_eq!(transport.state().current_track_index, 1);
        assert!(transport.signal().has_tap());
        assert_eq!(session.frames(), 20);
        assert_eq!(scheduler.requests.get(), 21);
        assert!((session.field().rotation() - 20.0 * 0.002).abs() < 1e-5);

        // The tone reaches the field after the track change
        let moving = (0..session.field().len()).any(|i| session.field().radius(i) > 0.0);
        assert!(moving);
    }
}
