//! Windowed FFT magnitudes and their byte-scaled representation.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

/// Forward transform with Hann window and per-bin temporal smoothing
pub struct Spectrum {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
}

impl Spectrum {
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        Self {
            fft,
            window: (0..fft_size).map(|i| hann_window(i, fft_size)).collect(),
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
            smoothed: vec![0.0; fft_size / 2],
        }
    }

    pub fn fft_size(&self) -> usize {
        self.window.len()
    }

    /// Transform one window of samples and return the smoothed magnitude of
    /// each of the `fft_size / 2` bins.
    ///
    /// `samples` must hold exactly `fft_size` values, oldest first.
    pub fn process(&mut self, samples: &[f32], smoothing: f32) -> &[f32] {
        debug_assert_eq!(samples.len(), self.window.len());

        for ((slot, &sample), &w) in self.buffer.iter_mut().zip(samples).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }

        self.fft.process(&mut self.buffer);

        let scale = 1.0 / self.window.len() as f32;
        for (s, c) in self.smoothed.iter_mut().zip(&self.buffer) {
            let magnitude = c.norm() * scale;
            *s = smoothing * *s + (1.0 - smoothing) * magnitude;
        }

        &self.smoothed
    }

    /// Forget smoothing history (signal stopped)
    pub fn reset(&mut self) {
        self.smoothed.fill(0.0);
    }
}

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    if size < 2 {
        return 1.0;
    }
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

/// Map a linear magnitude onto 0..=255 between two decibel bounds
pub fn magnitude_to_byte(magnitude: f32, min_decibels: f32, max_decibels: f32) -> u8 {
    if magnitude.is_nan() || magnitude <= 0.0 {
        return 0;
    }
    let db = 20.0 * magnitude.log10();
    let scaled = 255.0 * (db - min_decibels) / (max_decibels - min_decibels);
    scaled.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(bin: usize, size: usize) -> Vec<f32> {
        (0..size)
            .map(|n| (2.0 * PI * bin as f32 * n as f32 / size as f32).sin())
            .collect()
    }

    #[test]
    fn test_hann_window() {
        let size = 128;

        // Hann window should be 0 at edges, 1 at center
        assert!((hann_window(0, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size - 1, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size / 2, size) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_sine_peaks_at_its_bin() {
        let mut spectrum = Spectrum::new(128);
        let magnitudes = spectrum.process(&sine(8, 128), 0.0);

        assert_eq!(magnitudes.len(), 64);
        let peak = magnitudes
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 8);
        assert!(magnitudes[40] < magnitudes[8] * 0.01);
    }

    #[test]
    fn test_smoothing_and_reset() {
        let mut spectrum = Spectrum::new(128);
        let input = sine(8, 128);

        let first = spectrum.process(&input, 0.8)[8];
        let second = spectrum.process(&input, 0.8)[8];
        assert!(second > first);

        spectrum.reset();
        let silent = spectrum.process(&vec![0.0; 128], 0.8);
        assert!(silent.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_magnitude_to_byte_bounds() {
        assert_eq!(magnitude_to_byte(0.0, -100.0, -30.0), 0);
        assert_eq!(magnitude_to_byte(f32::NAN, -100.0, -30.0), 0);
        // -100 dB and below map to 0
        assert_eq!(magnitude_to_byte(1e-6, -100.0, -30.0), 0);
        // -30 dB and above map to 255
        assert_eq!(magnitude_to_byte(1.0, -100.0, -30.0), 255);
        // -65 dB sits half way
        let mid = magnitude_to_byte(10f32.powf(-65.0 / 20.0), -100.0, -30.0);
        assert!((126..=128).contains(&mid));
    }
}
