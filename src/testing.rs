//! Test doubles for the host surface, frame scheduler and spectrum source.

use glam::Mat4;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::audio::{AmplitudeSnapshot, SpectrumSource};
use crate::error::VizError;
use crate::particles::ParticleVertex;
use crate::render_loop::FrameScheduler;
use crate::rendering::{FrameData, RenderTarget};

/// What the last draw call received
#[derive(Debug, Clone)]
pub struct DrawnFrame {
    pub particles: Vec<ParticleVertex>,
    pub model_view: Mat4,
    pub projection: Mat4,
}

/// Surface whose client area is set by the test; counters survive moves
pub struct FakeSurface {
    pub client: (u32, u32),
    pub surface: (u32, u32),
    pub resizes: usize,
    pub draws: Rc<Cell<usize>>,
    pub last_frame: Rc<RefCell<Option<DrawnFrame>>>,
    pub fail_draws: bool,
}

impl FakeSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            client: (width, height),
            surface: (0, 0),
            resizes: 0,
            draws: Rc::new(Cell::new(0)),
            last_frame: Rc::new(RefCell::new(None)),
            fail_draws: false,
        }
    }
}

impl RenderTarget for FakeSurface {
    fn client_size(&self) -> (u32, u32) {
        self.client
    }

    fn resize_surface(&mut self, width: u32, height: u32) {
        self.surface = (width, height);
        self.resizes += 1;
    }

    fn draw(&mut self, frame: &FrameData<'_>) -> Result<(), VizError> {
        self.draws.set(self.draws.get() + 1);
        *self.last_frame.borrow_mut() = Some(DrawnFrame {
            particles: frame.particles.to_vec(),
            model_view: frame.model_view,
            projection: frame.projection,
        });
        if self.fail_draws {
            return Err(VizError::Draw(wgpu::SurfaceError::Lost));
        }
        Ok(())
    }
}

/// Scheduler that only counts refresh requests
#[derive(Clone, Default)]
pub struct CountingScheduler {
    pub requests: Rc<Cell<usize>>,
}

impl FrameScheduler for CountingScheduler {
    fn request_frame(&self) {
        self.requests.set(self.requests.get() + 1);
    }
}

/// Spectrum source replaying one fixed snapshot
pub struct FixedSpectrum {
    pub snapshot: AmplitudeSnapshot,
    pub pulls: usize,
}

impl FixedSpectrum {
    pub fn new(bins: Vec<u8>) -> Self {
        Self {
            snapshot: AmplitudeSnapshot::from_bins(bins),
            pulls: 0,
        }
    }
}

impl SpectrumSource for FixedSpectrum {
    fn current_snapshot(&mut self) -> AmplitudeSnapshot {
        self.pulls += 1;
        self.snapshot.clone()
    }
}
