//! The audited tag vocabulary and the on-disk tag store.
//!
//! Vorbis comments are free-form `KEY=value` pairs. Only the keys in
//! [`TagName`] are examined by enrichment and validation; anything else is
//! kept verbatim in the store so it survives a rewrite untouched.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A tag key from the fixed, audited vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TagName {
    Artist,
    #[serde(rename = "ALBUMARTIST")]
    AlbumArtist,
    Album,
    Date,
    Genre,
    Title,
    #[serde(rename = "TRACKNUMBER")]
    TrackNumber,
    #[serde(rename = "TRACKTOTAL")]
    TrackTotal,
    #[serde(rename = "DISCNUMBER")]
    DiscNumber,
    #[serde(rename = "ARTISTSORT")]
    ArtistSort,
    Lyrics,
    #[serde(rename = "UNSYNCEDLYRICS")]
    UnsyncedLyrics,
    #[serde(rename = "MUSICBRAINZ_ALBUMID")]
    MusicBrainzAlbumId,
    #[serde(rename = "MUSICBRAINZ_DISCID")]
    MusicBrainzDiscId,
    #[serde(rename = "MUSICBRAINZ_ARTISTID")]
    MusicBrainzArtistId,
    #[serde(rename = "MUSICBRAINZ_ALBUMARTISTID")]
    MusicBrainzAlbumArtistId,
    #[serde(rename = "MUSICBRAINZ_TRACKID")]
    MusicBrainzTrackId,
}

impl TagName {
    pub const ALL: [TagName; 17] = [
        TagName::Artist,
        TagName::AlbumArtist,
        TagName::Album,
        TagName::Date,
        TagName::Genre,
        TagName::Title,
        TagName::TrackNumber,
        TagName::TrackTotal,
        TagName::DiscNumber,
        TagName::ArtistSort,
        TagName::Lyrics,
        TagName::UnsyncedLyrics,
        TagName::MusicBrainzAlbumId,
        TagName::MusicBrainzDiscId,
        TagName::MusicBrainzArtistId,
        TagName::MusicBrainzAlbumArtistId,
        TagName::MusicBrainzTrackId,
    ];

    /// The Vorbis comment key as written to disk.
    pub fn as_str(&self) -> &'static str {
        match self {
            TagName::Artist => "ARTIST",
            TagName::AlbumArtist => "ALBUMARTIST",
            TagName::Album => "ALBUM",
            TagName::Date => "DATE",
            TagName::Genre => "GENRE",
            TagName::Title => "TITLE",
            TagName::TrackNumber => "TRACKNUMBER",
            TagName::TrackTotal => "TRACKTOTAL",
            TagName::DiscNumber => "DISCNUMBER",
            TagName::ArtistSort => "ARTISTSORT",
            TagName::Lyrics => "LYRICS",
            TagName::UnsyncedLyrics => "UNSYNCEDLYRICS",
            TagName::MusicBrainzAlbumId => "MUSICBRAINZ_ALBUMID",
            TagName::MusicBrainzDiscId => "MUSICBRAINZ_DISCID",
            TagName::MusicBrainzArtistId => "MUSICBRAINZ_ARTISTID",
            TagName::MusicBrainzAlbumArtistId => "MUSICBRAINZ_ALBUMARTISTID",
            TagName::MusicBrainzTrackId => "MUSICBRAINZ_TRACKID",
        }
    }

    /// Whether this is one of the MusicBrainz identifier tags.
    pub fn is_musicbrainz_id(&self) -> bool {
        matches!(
            self,
            TagName::MusicBrainzAlbumId
                | TagName::MusicBrainzArtistId
                | TagName::MusicBrainzAlbumArtistId
                | TagName::MusicBrainzTrackId
        )
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a comment key is outside the audited vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tag: {0}")]
pub struct UnknownTag(pub String);

impl FromStr for TagName {
    type Err = UnknownTag;

    // Vorbis comment field names are case-insensitive ASCII.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TagName::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

/// Tags as read from disk.
///
/// Keeps the raw comment list (in file order) for the rewrite on commit,
/// plus an index of the audited tags. Repeated keys are preserved as
/// repeated values; nothing is deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagStore {
    comments: Vec<(String, String)>,
    known: HashMap<TagName, Vec<String>>,
}

impl TagStore {
    /// Build a store from `(key, value)` comments in file order.
    pub fn from_comments<I, K, V>(comments: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut store = TagStore::default();
        for (key, value) in comments {
            store.push(key.into(), value.into());
        }
        store
    }

    fn push(&mut self, key: String, value: String) {
        if let Ok(tag) = key.parse::<TagName>() {
            self.known.entry(tag).or_default().push(value.clone());
        }
        self.comments.push((key, value));
    }

    /// All values of `tag`, or `None` when the key never appeared.
    pub fn get(&self, tag: TagName) -> Option<&[String]> {
        self.known.get(&tag).map(Vec::as_slice)
    }

    pub fn contains(&self, tag: TagName) -> bool {
        self.known.contains_key(&tag)
    }

    /// The raw comments, including keys outside the audited vocabulary.
    pub fn comments(&self) -> &[(String, String)] {
        &self.comments
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}
