//! Test utilities and fixtures shared across module tests.
//!
//! Provides image magic bytes, track builders, and an in-memory
//! [`TagCodec`] so album-level tests never touch real FLAC files.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{album_of, complete_track};
//!
//! let album = album_of(vec![complete_track(1, 1), complete_track(1, 2)]);
//! assert!(validate_album(&album, &ValidationConfig::default()).is_empty());
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::metadata::{TagCodec, is_flac};
use crate::model::{Album, Picture, TagStore, Track};

/// Smallest prefix `infer` recognizes as JPEG.
pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];

/// PNG signature plus the start of an IHDR chunk.
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R',
];

/// Release ID carried by [`complete_track`].
pub const RELEASE_ID: &str = "b84ee12a-09ef-421b-82de-0441a926375b";

/// A track at a throwaway path holding exactly these comments.
pub fn track_with(comments: &[(&str, &str)]) -> Track {
    Track::new(
        "/music/album/01.flac",
        TagStore::from_comments(comments.iter().copied()),
        None,
    )
}

/// Comments for a track that passes every tag rule.
///
/// All tracks share artist, album, date, genre, and release ID, so any set
/// of them with distinct numbering forms a valid album.
pub fn complete_comments(disc: u32, number: u32) -> Vec<(String, String)> {
    [
        ("ARTIST", "Someone".to_string()),
        ("ARTISTSORT", "Someone".to_string()),
        ("ALBUM", "Record".to_string()),
        ("TITLE", format!("Song {number}")),
        ("DATE", "2001-05-14".to_string()),
        ("GENRE", "rock".to_string()),
        ("DISCNUMBER", disc.to_string()),
        ("TRACKNUMBER", number.to_string()),
        ("TRACKTOTAL", "10".to_string()),
        ("MUSICBRAINZ_ALBUMID", RELEASE_ID.to_string()),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect()
}

/// A fully valid track with no picture.
pub fn complete_track(disc: u32, number: u32) -> Track {
    Track::new(
        format!("/music/album/{disc:02}-{number:02}.flac"),
        TagStore::from_comments(complete_comments(disc, number)),
        None,
    )
}

pub fn album_of(tracks: Vec<Track>) -> Album {
    Album::new("/music/album", tracks)
}

/// Files held in memory, keyed by path.
#[derive(Default)]
pub struct MemoryCodec {
    files: Mutex<HashMap<PathBuf, (Vec<(String, String)>, Option<Picture>)>>,
    failing: Mutex<HashSet<PathBuf>>,
    writes: Mutex<Vec<PathBuf>>,
}

impl MemoryCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, comments: Vec<(String, String)>) {
        self.files.lock().insert(path.into(), (comments, None));
    }

    /// Make writes to `path` fail.
    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        self.failing.lock().insert(path.into());
    }

    pub fn comments(&self, path: &Path) -> Vec<(String, String)> {
        self.files
            .lock()
            .get(path)
            .map(|(comments, _)| comments.clone())
            .unwrap_or_default()
    }

    pub fn picture(&self, path: &Path) -> Option<Picture> {
        self.files.lock().get(path).and_then(|(_, p)| p.clone())
    }

    /// Paths written so far, in order.
    pub fn writes(&self) -> Vec<PathBuf> {
        self.writes.lock().clone()
    }
}

impl TagCodec for MemoryCodec {
    fn recognizes(&self, path: &Path) -> bool {
        is_flac(path)
    }

    fn read(&self, path: &Path) -> Result<Track> {
        let files = self.files.lock();
        let (comments, picture) = files.get(path).ok_or_else(|| Error::not_found(path))?;
        Ok(Track::new(
            path,
            TagStore::from_comments(comments.iter().cloned()),
            picture.clone(),
        ))
    }

    fn write(&self, track: &Track) -> Result<()> {
        let path = track.path().to_path_buf();
        if self.failing.lock().contains(&path) {
            return Err(Error::metadata(&path, "write refused"));
        }

        let mut files = self.files.lock();
        let entry = files.entry(path.clone()).or_default();
        entry.0 = track.pending_comments();
        if let Some(picture) = &track.staged().picture {
            entry.1 = Some(Picture {
                description: String::new(),
                ..picture.clone()
            });
        }
        self.writes.lock().push(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationConfig;
    use crate::model::detect_image_type;
    use crate::validation::validate_album;

    #[test]
    fn test_image_fixtures_are_detected() {
        assert_eq!(detect_image_type(JPEG_BYTES), Some("image/jpeg"));
        assert_eq!(detect_image_type(PNG_BYTES), Some("image/png"));
    }

    #[test]
    fn test_complete_tracks_form_a_valid_album() {
        let album = album_of(vec![complete_track(1, 1), complete_track(1, 2), complete_track(2, 1)]);
        assert_eq!(validate_album(&album, &ValidationConfig::default()), vec![]);
    }

    #[test]
    fn test_memory_codec_round_trip() {
        let codec = MemoryCodec::new();
        codec.insert("/m/a/01.flac", complete_comments(1, 1));

        let mut track = codec.read(Path::new("/m/a/01.flac")).unwrap();
        track.set_genres(vec!["jazz".to_string()]);
        codec.write(&track).unwrap();

        let reread = codec.read(Path::new("/m/a/01.flac")).unwrap();
        assert_eq!(reread.tag(crate::model::TagName::Genre), &["jazz"]);
        assert_eq!(codec.writes().len(), 1);
    }
}
