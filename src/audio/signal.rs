//! Persistent output signal and the one-time analysis tap on it.
//!
//! The Transport publishes every mono block it sends to the device into an
//! [`AudioSignal`]. The signal lives as long as the Transport and is not
//! replaced on track changes, so a tap attached once keeps observing whatever
//! is currently playing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::VizError;

/// Bounded window of the most recent samples seen by a tap
struct TapRing {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl TapRing {
    fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn push(&mut self, block: &[f32]) {
        // Only the tail of an oversized block can survive
        let block = &block[block.len().saturating_sub(self.capacity)..];
        let overflow = (self.samples.len() + block.len()).saturating_sub(self.capacity);
        self.samples.drain(..overflow);
        self.samples.extend(block.iter().copied());
    }
}

type SharedRing = Arc<Mutex<TapRing>>;

struct SignalInner {
    /// Whether an output stream feeds this signal at all
    connected: bool,
    /// Whether samples are currently flowing (playing)
    live: AtomicBool,
    tap: Mutex<Option<SharedRing>>,
}

/// Handle to the Transport's persistent output signal (cheap to clone)
#[derive(Clone)]
pub struct AudioSignal {
    inner: Arc<SignalInner>,
}

impl AudioSignal {
    /// Signal backed by a real output stream
    pub fn connected() -> Self {
        Self::with_connection(true)
    }

    /// Signal with no output behind it; taps cannot be attached
    pub fn disconnected() -> Self {
        Self::with_connection(false)
    }

    fn with_connection(connected: bool) -> Self {
        Self {
            inner: Arc::new(SignalInner {
                connected,
                live: AtomicBool::new(false),
                tap: Mutex::new(None),
            }),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.inner.connected
    }

    pub fn is_live(&self) -> bool {
        self.inner.live.load(Ordering::Acquire)
    }

    /// Mark the signal as flowing or silent. Going silent clears the tap
    /// window so a resumed stream starts from fresh samples.
    pub fn set_live(&self, live: bool) {
        let was_live = self.inner.live.swap(live, Ordering::AcqRel);
        if was_live && !live {
            if let Some(ring) = self.current_ring() {
                ring.lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .samples
                    .clear();
            }
        }
    }

    /// Feed one block of mono samples to the attached tap, if any
    pub fn publish(&self, block: &[f32]) {
        if !self.is_live() {
            return;
        }
        if let Some(ring) = self.current_ring() {
            ring.lock().unwrap_or_else(|e| e.into_inner()).push(block);
        }
    }

    /// Establish the tap. A signal supports a single tap at a time; it is
    /// released when the returned [`SignalTap`] is dropped.
    pub fn attach_tap(&self, capacity: usize) -> Result<SignalTap, VizError> {
        if !self.inner.connected {
            return Err(VizError::AudioUnavailable(
                "no audio output behind the signal".to_string(),
            ));
        }
        if capacity == 0 {
            return Err(VizError::AudioUnavailable(
                "tap window must hold at least one sample".to_string(),
            ));
        }

        let mut slot = self.inner.tap.lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_some() {
            return Err(VizError::AudioUnavailable(
                "signal is already tapped".to_string(),
            ));
        }

        let ring = Arc::new(Mutex::new(TapRing::new(capacity)));
        *slot = Some(Arc::clone(&ring));

        Ok(SignalTap {
            signal: Arc::clone(&self.inner),
            ring,
        })
    }

    pub fn has_tap(&self) -> bool {
        self.inner
            .tap
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    fn current_ring(&self) -> Option<SharedRing> {
        self.inner
            .tap
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Read side of the signal, owned by the frequency analyzer
pub struct SignalTap {
    signal: Arc<SignalInner>,
    ring: SharedRing,
}

impl SignalTap {
    pub fn is_live(&self) -> bool {
        self.signal.live.load(Ordering::Acquire)
    }

    /// Copy the most recent samples into `out`, oldest first.
    /// Zero-pads the front when fewer samples than `out.len()` are buffered.
    pub fn latest(&self, out: &mut [f32]) {
        let ring = self.ring.lock().unwrap_or_else(|e| e.into_inner());
        let available = ring.samples.len().min(out.len());
        let pad = out.len() - available;

        out[..pad].fill(0.0);
        let skip = ring.samples.len() - available;
        for (dst, src) in out[pad..].iter_mut().zip(ring.samples.iter().skip(skip)) {
            *dst = *src;
        }
    }
}

impl Drop for SignalTap {
    fn drop(&mut self) {
        let mut slot = self.signal.tap.lock().unwrap_or_else(|e| e.into_inner());
        // Only clear the slot if it still holds this tap's window
        if slot
            .as_ref()
            .is_some_and(|ring| Arc::ptr_eq(ring, &self.ring))
        {
            *slot = None;
        }
    }
}
