//! Consistency violations reported by the validation rules.
//!
//! Each variant keeps the data that produced it so callers (and tests) can
//! compare violations structurally rather than by message text.

use serde::Serialize;

use crate::model::TagName;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// A tag that must hold exactly one value holds zero or several.
    #[error("expected single value for {:?}, got {}", .tag.as_str(), join(.values))]
    NotSingleTagValue { tag: TagName, values: Vec<String> },

    /// A single value that is empty or a known sentinel.
    #[error("expected valid value for {:?}, got {}", .tag.as_str(), join(.values))]
    InvalidValue { tag: TagName, values: Vec<String> },

    /// Tracks of one album disagree on a tag that must be album-wide.
    #[error("expected one value for {:?} across the album, got {}", .tag.as_str(), join(.values))]
    InconsistentTag { tag: TagName, values: Vec<String> },

    /// Neither ARTIST nor ALBUMARTIST is singular across the album.
    #[error(
        "expected single value for \"ALBUMARTIST\" when multiple \"ARTIST\", got {} & {}",
        join(.artists),
        join(.album_artists)
    )]
    NotSingleAlbumArtist {
        artists: Vec<String>,
        album_artists: Vec<String>,
    },

    /// Tracks carry different GENRE sequences.
    #[error("expected the same \"GENRE\" on every track, got {}", join(.values))]
    InconsistentGenre { values: Vec<String> },

    #[error("expected disc numbers to start at 0 or 1, lowest is {lowest}")]
    InvalidStartingDiscNumber { lowest: i64 },

    #[error("missing disc number {disc}")]
    MissingDiscNumber { disc: i64 },

    #[error("disc {disc} track {track} is claimed by {count} tracks")]
    TrackNumberCollision { disc: i64, track: i64, count: usize },

    #[error("disc {disc} is missing track number {track}")]
    MissingTrackNumber { disc: i64, track: i64 },

    /// A disc or track number too large (or negative) to check for gaps.
    #[error("{:?} value {value} is outside 0..={max}", .tag.as_str())]
    NumberOutOfRange { tag: TagName, value: i64, max: i64 },

    /// Values of an integer-shaped tag that do not parse.
    #[error("expected integer values for {:?}, got {}", .tag.as_str(), join(.values))]
    InvalidIntTag { tag: TagName, values: Vec<String> },

    /// An identifier value that does not match its expected shape.
    #[error("value {value:?} for {:?} does not match {pattern}", .tag.as_str())]
    InvalidTagValue {
        tag: TagName,
        pattern: String,
        value: String,
    },

    #[error("invalid picture type: {detected}")]
    InvalidPictureType { detected: String },

    #[error("incorrect picture type {declared} - should be {detected}")]
    MismatchedPictureType { detected: String, declared: String },
}

fn join(values: &[String]) -> String {
    if values.is_empty() {
        return "<empty>".to_string();
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    sorted.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_sorts_values() {
        let v = Violation::NotSingleTagValue {
            tag: TagName::Album,
            values: vec!["b".to_string(), "a".to_string()],
        };
        assert_eq!(v.to_string(), "expected single value for \"ALBUM\", got a,b");
    }

    #[test]
    fn test_display_empty_values() {
        let v = Violation::NotSingleTagValue {
            tag: TagName::Artist,
            values: vec![],
        };
        assert!(v.to_string().ends_with("<empty>"));
    }

    #[test]
    fn test_serializes_with_kind_and_data() {
        let v = Violation::TrackNumberCollision {
            disc: 1,
            track: 1,
            count: 2,
        };
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["kind"], "track_number_collision");
        assert_eq!(json["count"], 2);

        let v = Violation::InvalidIntTag {
            tag: TagName::DiscNumber,
            values: vec!["one".to_string()],
        };
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["tag"], "DISCNUMBER");
    }
}
