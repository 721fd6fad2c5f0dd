//! Playback state as seen by the UI.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub current_track_index: usize,
    pub is_playing: bool,
    /// Position within the current track, in [0, 1]
    pub progress_fraction: f32,
}

/// Position over duration, clamped into [0, 1]. Unknown or zero durations
/// report 0.
pub fn normalize_progress(position: f64, duration: f64) -> f32 {
    let fraction = position / duration;
    if !fraction.is_finite() {
        return 0.0;
    }
    fraction.clamp(0.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_fraction() {
        assert!((normalize_progress(30.0, 120.0) - 0.25).abs() < 1e-6);
        assert_eq!(normalize_progress(120.0, 120.0), 1.0);
    }

    #[test]
    fn test_progress_unknown_duration_is_zero() {
        assert_eq!(normalize_progress(5.0, 0.0), 0.0);
        assert_eq!(normalize_progress(0.0, 0.0), 0.0);
        assert_eq!(normalize_progress(5.0, f64::NAN), 0.0);
        assert_eq!(normalize_progress(5.0, f64::INFINITY), 0.0);
    }

    #[test]
    fn test_progress_clamped() {
        assert_eq!(normalize_progress(200.0, 120.0), 1.0);
        assert_eq!(normalize_progress(-1.0, 120.0), 0.0);
    }
}
