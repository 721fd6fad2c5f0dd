//! Spectrum analysis configuration.

use serde::Deserialize;

use crate::error::VizError;

/// Frequency analyzer configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyzerParams {
    /// Number of frequency bins per snapshot (N)
    /// Transform size is twice this; must be a power of 2
    pub bin_resolution: usize,

    /// Temporal smoothing between consecutive snapshots
    /// 0.0 = none, values near 1.0 = sluggish
    pub smoothing: f32,

    /// Magnitude mapped to amplitude 0 (dBFS)
    pub min_decibels: f32,

    /// Magnitude mapped to amplitude 255 (dBFS)
    pub max_decibels: f32,
}

impl Default for AnalyzerParams {
    fn default() -> Self {
        Self {
            bin_resolution: 64, // Tens of bins keep the per-frame mapping cheap
            smoothing: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
        }
    }
}

impl AnalyzerParams {
    /// Transform window size in samples
    pub fn fft_size(&self) -> usize {
        self.bin_resolution * 2
    }

    /// Validate configuration (bin count must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), VizError> {
        if !self.bin_resolution.is_power_of_two() {
            return Err(VizError::InvalidConfig(format!(
                "bin resolution must be a power of 2, got {}",
                self.bin_resolution
            )));
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(VizError::InvalidConfig(format!(
                "smoothing must be in [0, 1), got {}",
                self.smoothing
            )));
        }
        if self.min_decibels >= self.max_decibels {
            return Err(VizError::InvalidConfig(format!(
                "min_decibels ({}) must be below max_decibels ({})",
                self.min_decibels, self.max_decibels
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fft_size_is_twice_bin_count() {
        let params = AnalyzerParams::default();
        assert_eq!(params.fft_size(), 128);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut params = AnalyzerParams::default();
        params.bin_resolution = 48;
        assert!(matches!(params.validate(), Err(VizError::InvalidConfig(_))));

        params.bin_resolution = 0;
        assert!(params.validate().is_err());

        let mut params = AnalyzerParams::default();
        params.smoothing = 1.0;
        assert!(params.validate().is_err());

        let mut params = AnalyzerParams::default();
        params.min_decibels = -20.0;
        assert!(params.validate().is_err());
    }
}
