//! Spectrum analysis of the live output signal.
//!
//! The Transport publishes what it plays into an [`AudioSignal`]; the
//! [`FrequencyAnalyzer`] taps that signal once per session and turns the most
//! recent window of samples into an [`AmplitudeSnapshot`] on demand.

mod analyzer;
mod fft;
mod signal;

// Re-export public types
pub use analyzer::{AmplitudeSnapshot, FrequencyAnalyzer, SpectrumSource};
pub use fft::{hann_window, magnitude_to_byte, Spectrum};
pub use signal::{AudioSignal, SignalTap};
