use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::tag::TagName;
use super::track::Track;

/// The tracks found in one directory, in file-name order.
///
/// An album is the unit of validation and of commit: album-level rules look
/// at the union of every track's values, and staged edits are written for
/// all tracks or none.
#[derive(Debug, Clone)]
pub struct Album {
    path: PathBuf,
    tracks: Vec<Track>,
}

impl Album {
    pub fn new(path: impl Into<PathBuf>, tracks: Vec<Track>) -> Self {
        Self {
            path: path.into(),
            tracks,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn tracks_mut(&mut self) -> &mut [Track] {
        &mut self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Distinct values of a tag across all tracks, sorted.
    pub fn distinct_values(&self, tag: TagName) -> Vec<String> {
        self.tracks
            .iter()
            .flat_map(|t| t.tag(tag).iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// `artist/album` identity of the album, taken from the first track.
    ///
    /// Uses ALBUMARTIST when present, otherwise ARTIST.
    pub fn identity(&self) -> String {
        let Some(first) = self.tracks.first() else {
            return "/".to_string();
        };

        let album = first.tag(TagName::Album).first().cloned().unwrap_or_default();
        let artist = first
            .tag_ok(TagName::AlbumArtist)
            .and_then(|v| v.first())
            .or_else(|| first.tag(TagName::Artist).first())
            .cloned()
            .unwrap_or_default();

        format!("{artist}/{album}")
    }
}
