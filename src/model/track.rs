//! One audio file: its on-disk tags, its front cover, and the edits staged
//! against it during enrichment.
//!
//! Reads always consult the staged edits first and fall back to what was
//! read from disk, so every pipeline step sees the work of the steps before
//! it. Nothing reaches the file until the album is committed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::TrackError;

use super::tag::{TagName, TagStore};

/// An embedded front-cover picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    /// Raw image bytes
    pub data: Vec<u8>,
    /// Declared MIME type from the picture block
    pub mime_type: String,
    /// Picture description (the source URL for fetched covers)
    pub description: String,
}

impl Picture {
    /// Sniff the real content type from the image bytes.
    pub fn detected_mime(&self) -> Option<&'static str> {
        detect_image_type(&self.data)
    }
}

/// Detect an image's MIME type from its leading bytes.
pub fn detect_image_type(data: &[u8]) -> Option<&'static str> {
    infer::get(data).map(|kind| kind.mime_type())
}

/// Whether a detected MIME type is one we accept for cover art.
pub fn is_supported_image(mime: &str) -> bool {
    mime == "image/jpeg" || mime == "image/png"
}

/// Pending changes for a track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedEdits {
    /// Replacement values; an empty vector removes the tag
    pub tags: BTreeMap<TagName, Vec<String>>,
    /// Replacement front cover
    pub picture: Option<Picture>,
}

impl StagedEdits {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.picture.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct Track {
    path: PathBuf,
    tags: TagStore,
    picture: Option<Picture>,
    staged: StagedEdits,
}

impl Track {
    pub fn new(path: impl Into<PathBuf>, tags: TagStore, picture: Option<Picture>) -> Self {
        Self {
            path: path.into(),
            tags,
            picture,
            staged: StagedEdits::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name used to identify the track in logs and reports.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Values of a tag; empty when absent.
    pub fn tag(&self, name: TagName) -> &[String] {
        self.tag_ok(name).unwrap_or(&[])
    }

    /// Values of a tag, or `None` if neither staged nor on disk.
    pub fn tag_ok(&self, name: TagName) -> Option<&[String]> {
        match self.staged.tags.get(&name) {
            Some(values) => Some(values.as_slice()),
            None => self.tags.get(name),
        }
    }

    /// The value of a tag that has exactly one value.
    pub fn single_tag(&self, name: TagName) -> Option<&str> {
        match self.tag(name) {
            [value] => Some(value.as_str()),
            _ => None,
        }
    }

    /// The front cover, staged replacement first.
    pub fn picture(&self) -> Option<&Picture> {
        self.staged.picture.as_ref().or(self.picture.as_ref())
    }

    pub fn has_picture(&self) -> bool {
        self.picture().is_some()
    }

    pub fn has_genre(&self) -> bool {
        !self.tag(TagName::Genre).is_empty()
    }

    pub fn has_lyrics(&self) -> bool {
        self.tag_ok(TagName::Lyrics).is_some() || self.tag_ok(TagName::UnsyncedLyrics).is_some()
    }

    /// Stage replacement values for a tag.
    pub fn stage(&mut self, name: TagName, values: Vec<String>) {
        self.staged.tags.insert(name, values);
    }

    pub fn set_musicbrainz_album_id(&mut self, id: impl Into<String>) {
        self.stage(TagName::MusicBrainzAlbumId, vec![id.into()]);
    }

    pub fn set_genres(&mut self, genres: Vec<String>) {
        self.stage(TagName::Genre, genres);
    }

    /// Stage a new front cover fetched from `source_url`.
    ///
    /// Only JPEG and PNG data is accepted; the declared MIME type is the
    /// detected one.
    pub fn set_picture(&mut self, data: Vec<u8>, source_url: &str) -> Result<(), TrackError> {
        let mime = detect_image_type(&data).unwrap_or("application/octet-stream");
        if !is_supported_image(mime) {
            return Err(TrackError::InvalidPicture(mime.to_string()));
        }

        self.staged.picture = Some(Picture {
            data,
            mime_type: mime.to_string(),
            description: source_url.to_string(),
        });
        Ok(())
    }

    /// Stage synchronized lyrics (LYRICS).
    pub fn set_synced_lyrics(&mut self, lyrics: String) -> Result<(), TrackError> {
        if self.tag_ok(TagName::UnsyncedLyrics).is_some() {
            return Err(TrackError::Contract(
                "synced lyrics set on a track that already has unsynced lyrics".to_string(),
            ));
        }
        self.stage(TagName::Lyrics, vec![lyrics]);
        Ok(())
    }

    /// Stage plain lyrics (UNSYNCEDLYRICS).
    pub fn set_unsynced_lyrics(&mut self, lyrics: String) -> Result<(), TrackError> {
        if self.tag_ok(TagName::Lyrics).is_some() {
            return Err(TrackError::Contract(
                "unsynced lyrics set on a track that already has synced lyrics".to_string(),
            ));
        }
        self.stage(TagName::UnsyncedLyrics, vec![lyrics]);
        Ok(())
    }

    pub fn staged(&self) -> &StagedEdits {
        &self.staged
    }

    pub fn has_changes(&self) -> bool {
        !self.staged.is_empty()
    }

    /// The comment list to write back on commit.
    ///
    /// Comments for staged tags are dropped from their original positions
    /// and the staged values appended; every other comment keeps its place.
    pub fn pending_comments(&self) -> Vec<(String, String)> {
        let mut comments: Vec<(String, String)> = self
            .tags
            .comments()
            .iter()
            .filter(|(key, _)| {
                key.parse::<TagName>()
                    .map_or(true, |tag| !self.staged.tags.contains_key(&tag))
            })
            .cloned()
            .collect();

        for (tag, values) in &self.staged.tags {
            for value in values {
                comments.push((tag.as_str().to_string(), value.clone()));
            }
        }

        comments
    }
}
