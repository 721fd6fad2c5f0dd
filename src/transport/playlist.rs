//! Ordered, fixed track list with wrap-around navigation.

use std::path::{Path, PathBuf};

use crate::error::VizError;
use crate::params::TrackEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    /// Local audio file
    pub source: PathBuf,
}

impl Track {
    pub fn new(title: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            source: source.into(),
        }
    }

    /// Track titled after the file stem
    pub fn from_path(path: &Path) -> Self {
        let title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::new(title, path)
    }
}

impl From<&TrackEntry> for Track {
    fn from(entry: &TrackEntry) -> Self {
        Self::new(entry.title.clone(), entry.source.clone())
    }
}

/// Non-empty, immutable track list
#[derive(Debug, Clone)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Result<Self, VizError> {
        if tracks.is_empty() {
            return Err(VizError::InvalidConfig(
                "playlist needs at least one track".to_string(),
            ));
        }
        Ok(Self { tracks })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Never true for a constructed playlist
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.tracks.len()
    }

    pub fn previous_index(&self, index: usize) -> usize {
        let len = self.tracks.len();
        (index % len + len - 1) % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist(n: usize) -> Playlist {
        Playlist::new(
            (0..n)
                .map(|i| Track::new(format!("track {}", i), format!("{}.mp3", i)))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_playlist_rejected() {
        assert!(matches!(
            Playlist::new(Vec::new()),
            Err(VizError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_navigation_wraps() {
        let list = playlist(3);
        assert_eq!(list.next_index(0), 1);
        assert_eq!(list.next_index(2), 0);
        assert_eq!(list.previous_index(0), 2);
        assert_eq!(list.previous_index(1), 0);
    }

    #[test]
    fn test_single_track_navigation_stays_put() {
        let list = playlist(1);
        assert_eq!(list.next_index(0), 0);
        assert_eq!(list.previous_index(0), 0);
    }

    #[test]
    fn test_title_from_file_stem() {
        let track = Track::from_path(Path::new("music/astrix - git.mp3"));
        assert_eq!(track.title, "astrix - git");
        assert_eq!(track.source, PathBuf::from("music/astrix - git.mp3"));
    }
}
