//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

use boltviz::params::VisualizerConfig;
use boltviz::transport::Track;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "boltviz")]
#[command(about = "Audio-reactive particle visualizer and music player", long_about = None)]
pub struct Args {
    /// Audio files to play, in order (overrides the config playlist)
    #[arg(value_name = "TRACKS")]
    pub tracks: Vec<PathBuf>,

    /// Config file (default: ./boltviz.toml, then the platform config dir)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of particles
    #[arg(long, value_name = "N")]
    pub particles: Option<usize>,

    /// Frequency bins per snapshot (power of two)
    #[arg(long, value_name = "N")]
    pub bins: Option<usize>,

    /// Field rotation per frame
    #[arg(long, value_name = "RADIANS")]
    pub rotation_speed: Option<f32>,

    /// Seed for particle depths and colors
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,
}

impl Args {
    /// Config file to load: explicit `--config`, else the first one found
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(VisualizerConfig::discover)
    }

    /// Command-line values win over file values
    pub fn apply_overrides(&self, config: &mut VisualizerConfig) {
        if let Some(count) = self.particles {
            config.particles.count = count;
        }
        if let Some(bins) = self.bins {
            config.analyzer.bin_resolution = bins;
        }
        if let Some(speed) = self.rotation_speed {
            config.particles.rotation_speed = speed;
        }
        if self.seed.is_some() {
            config.particles.seed = self.seed;
        }
    }

    /// Tracks from the command line, or the config playlist when none given
    pub fn playlist_tracks(&self, config: &VisualizerConfig) -> Vec<Track> {
        if self.tracks.is_empty() {
            config.tracks.iter().map(Track::from).collect()
        } else {
            self.tracks.iter().map(|p| Track::from_path(p)).collect()
        }
    }
}
