//! Config file discovery and loading.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::{AnalyzerParams, CameraParams, ParticleParams, WindowParams};

/// File name looked up in the working directory
pub const LOCAL_CONFIG: &str = "boltviz.toml";

/// Complete visualizer configuration, fixed at setup
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    pub particles: ParticleParams,
    pub analyzer: AnalyzerParams,
    pub camera: CameraParams,
    pub window: WindowParams,
    pub tracks: Vec<TrackEntry>,
}

/// Playlist entry as written in the config file
#[derive(Debug, Clone, Deserialize)]
pub struct TrackEntry {
    pub title: String,
    pub source: PathBuf,
}

impl VisualizerConfig {
    /// Parse a config file; missing keys fall back to defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Find a config file: ./boltviz.toml, then the platform config dir
    pub fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG);
        if local.exists() {
            return Some(local);
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("boltviz").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = VisualizerConfig::from_toml(
            r#"
            [particles]
            count = 256

            [analyzer]
            bin_resolution = 32

            [[tracks]]
            title = "astrix - git"
            source = "music/track1.mp3"
            "#,
        )
        .unwrap();

        assert_eq!(config.particles.count, 256);
        assert_eq!(config.particles.radius_scale, 5.0);
        assert_eq!(config.analyzer.bin_resolution, 32);
        assert_eq!(config.analyzer.smoothing, 0.8);
        assert_eq!(config.camera.fov_degrees, 75.0);
        assert_eq!(config.tracks.len(), 1);
        assert_eq!(config.tracks[0].source, PathBuf::from("music/track1.mp3"));
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = VisualizerConfig::from_toml("").unwrap();
        assert_eq!(config.particles.count, 128);
        assert!(config.tracks.is_empty());
    }

    #[test]
    fn test_malformed_file_is_error() {
        assert!(VisualizerConfig::from_toml("[particles]\ncount = \"many\"").is_err());
    }
}
