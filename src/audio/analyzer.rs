//! Frequency analyzer: per-frame amplitude snapshots of the live signal.

use super::fft::{magnitude_to_byte, Spectrum};
use super::signal::{AudioSignal, SignalTap};
use crate::error::VizError;
use crate::params::AnalyzerParams;

/// One frame's byte-scaled magnitude per frequency bin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmplitudeSnapshot {
    bins: Vec<u8>,
}

impl AmplitudeSnapshot {
    /// Largest representable bin value
    pub const MAX: u8 = u8::MAX;

    pub fn zeros(len: usize) -> Self {
        Self { bins: vec![0; len] }
    }

    pub fn from_bins(bins: Vec<u8>) -> Self {
        Self { bins }
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn bins(&self) -> &[u8] {
        &self.bins
    }

    /// Amplitude in [0, 1] for `index`, wrapping modulo the bin count.
    /// An empty snapshot reads as silence.
    pub fn wrapped(&self, index: usize) -> f32 {
        if self.bins.is_empty() {
            return 0.0;
        }
        self.bins[index % self.bins.len()] as f32 / Self::MAX as f32
    }
}

/// Anything that can produce a snapshot on demand without failing
pub trait SpectrumSource {
    fn current_snapshot(&mut self) -> AmplitudeSnapshot;
}

/// Frequency analyzer holding the one-time tap on the Transport's signal
pub struct FrequencyAnalyzer {
    params: AnalyzerParams,
    tap: Option<SignalTap>,
    spectrum: Option<Spectrum>,
    /// Scratch window of the most recent samples
    samples: Vec<f32>,
}

impl FrequencyAnalyzer {
    /// Attach to `signal` and prepare the transform.
    ///
    /// Fails with [`VizError::AudioUnavailable`] when the signal has no
    /// output behind it or is already tapped.
    pub fn setup(signal: &AudioSignal, params: &AnalyzerParams) -> Result<Self, VizError> {
        params.validate()?;

        let fft_size = params.fft_size();
        let tap = signal.attach_tap(fft_size)?;

        log::info!(
            "Analyzer: {} bins (fft size {}), smoothing {:.2}",
            params.bin_resolution,
            fft_size,
            params.smoothing
        );

        Ok(Self {
            params: params.clone(),
            tap: Some(tap),
            spectrum: Some(Spectrum::new(fft_size)),
            samples: vec![0.0; fft_size],
        })
    }

    /// Analyzer without a tap; every snapshot is silent
    pub fn unavailable(params: &AnalyzerParams) -> Self {
        Self {
            params: params.clone(),
            tap: None,
            spectrum: None,
            samples: Vec::new(),
        }
    }

    /// Bin count (N) of every snapshot this analyzer produces
    pub fn bin_count(&self) -> usize {
        self.params.bin_resolution
    }

    pub fn is_tapped(&self) -> bool {
        self.tap.is_some()
    }

    /// Sever the tap and release analysis buffers.
    /// Safe to call repeatedly; returns whether anything was released.
    pub fn teardown(&mut self) -> bool {
        let released = self.tap.take().is_some();
        self.spectrum = None;
        self.samples = Vec::new();
        if released {
            log::info!("Analyzer: tap released");
        }
        released
    }
}

impl SpectrumSource for FrequencyAnalyzer {
    fn current_snapshot(&mut self) -> AmplitudeSnapshot {
        let bin_count = self.bin_count();

        let (Some(tap), Some(spectrum)) = (&self.tap, &mut self.spectrum) else {
            return AmplitudeSnapshot::zeros(bin_count);
        };

        if !tap.is_live() {
            spectrum.reset();
            return AmplitudeSnapshot::zeros(bin_count);
        }

        tap.latest(&mut self.samples);
        let magnitudes = spectrum.process(&self.samples, self.params.smoothing);

        let bins = magnitudes
            .iter()
            .map(|&m| magnitude_to_byte(m, self.params.min_decibels, self.params.max_decibels))
            .collect();

        AmplitudeSnapshot::from_bins(bins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn tone(bin: usize, fft_size: usize) -> Vec<f32> {
        (0..fft_size)
            .map(|n| 0.5 * (2.0 * PI * bin as f32 * n as f32 / fft_size as f32).sin())
            .collect()
    }

    #[test]
    fn test_snapshot_wraps_and_normalizes() {
        let snapshot = AmplitudeSnapshot::from_bins(vec![0, 255, 51]);
        assert_eq!(snapshot.wrapped(1), 1.0);
        assert_eq!(snapshot.wrapped(4), 1.0);
        assert!((snapshot.wrapped(5) - 0.2).abs() < 1e-6);
        assert_eq!(AmplitudeSnapshot::zeros(0).wrapped(7), 0.0);
    }

    #[test]
    fn test_paused_signal_yields_zeros() {
        let signal = AudioSignal::connected();
        let params = AnalyzerParams::default();
        let mut analyzer = FrequencyAnalyzer::setup(&signal, &params).unwrap();

        let snapshot = analyzer.current_snapshot();
        assert_eq!(snapshot.len(), params.bin_resolution);
        assert!(snapshot.bins().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_live_tone_lights_its_bin() {
        let signal = AudioSignal::connected();
        let mut params = AnalyzerParams::default();
        params.smoothing = 0.0;
        let mut analyzer = FrequencyAnalyzer::setup(&signal, &params).unwrap();

        signal.set_live(true);
        signal.publish(&tone(10, params.fft_size()));

        let snapshot = analyzer.current_snapshot();
        assert_eq!(snapshot.len(), 64);
        assert_eq!(snapshot.bins()[10], AmplitudeSnapshot::MAX);
        assert!(snapshot.bins()[50] < snapshot.bins()[10]);
    }

    #[test]
    fn test_setup_fails_without_output() {
        let signal = AudioSignal::disconnected();
        let result = FrequencyAnalyzer::setup(&signal, &AnalyzerParams::default());
        assert!(matches!(result, Err(VizError::AudioUnavailable(_))));
    }

    #[test]
    fn test_unavailable_analyzer_is_silent() {
        let mut analyzer = FrequencyAnalyzer::unavailable(&AnalyzerParams::default());
        assert!(!analyzer.is_tapped());
        assert!(analyzer.current_snapshot().bins().iter().all(|&b| b == 0));

        let mut params = AnalyzerParams::default();
        params.bin_resolution = 0;
        let mut degenerate = FrequencyAnalyzer::unavailable(&params);
        assert!(degenerate.current_snapshot().is_empty());
    }

    #[test]
    fn test_teardown_releases_tap_once() {
        let signal = AudioSignal::connected();
        let mut analyzer = FrequencyAnalyzer::setup(&signal, &AnalyzerParams::default()).unwrap();
        assert!(signal.has_tap());

        assert!(analyzer.teardown());
        assert!(!signal.has_tap());
        assert!(!analyzer.teardown());

        // A torn-down analyzer still answers, with silence
        signal.set_live(true);
        assert!(analyzer.current_snapshot().bins().iter().all(|&b| b == 0));
    }
}
