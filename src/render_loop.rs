//! Frame-synchronized render loop driver.
//!
//! One tick runs per display refresh: pull a snapshot, recompute the field,
//! advance its rotation, draw once, then ask the host for the next refresh.
//! The loop keeps rescheduling itself until [`RenderLoop::stop`] drops the
//! scheduling handle; a stopped loop ignores any refresh that still arrives.

use crate::audio::SpectrumSource;
use crate::particles::ParticleField;
use crate::rendering::{FrameData, RenderTarget};
use crate::viewport::Viewport;

/// Host primitive that delivers one callback per display refresh
pub trait FrameScheduler {
    /// Ask for the next refresh callback; repeated requests coalesce
    fn request_frame(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The frame was drawn and the next one requested
    Drawn,
    /// Drawing failed; the error was logged and the next frame requested
    DrawFailed,
    /// The loop is stopped; nothing ran
    Stopped,
}

pub struct RenderLoop<S: FrameScheduler> {
    /// Present while the loop is active
    scheduler: Option<S>,
    ticks: u64,
}

impl<S: FrameScheduler> RenderLoop<S> {
    /// Activate the loop and request the first refresh
    pub fn start(scheduler: S) -> Self {
        scheduler.request_frame();
        Self {
            scheduler: Some(scheduler),
            ticks: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.scheduler.is_some()
    }

    /// Completed ticks since start
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one tick. Does nothing once the loop is stopped.
    pub fn tick<A, T>(
        &mut self,
        source: &mut A,
        field: &mut ParticleField,
        viewport: &Viewport,
        target: &mut T,
    ) -> TickOutcome
    where
        A: SpectrumSource + ?Sized,
        T: RenderTarget + ?Sized,
    {
        let Some(scheduler) = &self.scheduler else {
            return TickOutcome::Stopped;
        };

        let snapshot = source.current_snapshot();
        field.apply_spectrum(&snapshot);
        field.advance_rotation();

        let frame = FrameData {
            particles: field.vertices(),
            model_view: viewport.view() * field.model_matrix(),
            projection: viewport.projection(),
            point_size: field.point_size(),
        };

        let outcome = match target.draw(&frame) {
            Ok(()) => TickOutcome::Drawn,
            Err(e) => {
                log::warn!("Render error: {}", e);
                TickOutcome::DrawFailed
            }
        };

        self.ticks += 1;
        scheduler.request_frame();
        outcome
    }

    /// Stop scheduling and release the scheduling handle.
    /// Returns false if the loop was already stopped.
    pub fn stop(&mut self) -> bool {
        let stopped = self.scheduler.take().is_some();
        if stopped {
            log::debug!("Render loop stopped after {} ticks", self.ticks);
        }
        stopped
    }
}
