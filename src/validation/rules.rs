//! Album and track consistency rules.
//!
//! Every function here is pure: it reads tags through the [`Track`] read
//! contract (staged edits first) and returns every violation it finds.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::config::ValidationConfig;
use crate::model::{Album, TagName, Track, is_supported_image};

use super::Violation;

/// Sentinel written by some rippers when the release date is unknown.
pub const ZERO_DATE: &str = "0001-01-01";

/// Shape of a MusicBrainz identifier.
pub const IDENTIFIER_PATTERN: &str = "^[A-Za-z0-9-]+$";

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(IDENTIFIER_PATTERN).expect("identifier pattern is valid"));

/// Tags that must hold exactly one value on every track.
const REQUIRED_TAGS: [TagName; 8] = [
    TagName::Artist,
    TagName::TrackNumber,
    TagName::TrackTotal,
    TagName::Album,
    TagName::Title,
    TagName::ArtistSort,
    TagName::MusicBrainzAlbumId,
    TagName::DiscNumber,
];

const INT_TAGS: [TagName; 2] = [TagName::DiscNumber, TagName::TrackNumber];

/// Highest disc number the numbering rules will reason about.
pub const MAX_DISC_NUMBER: i64 = 999;

/// Highest track number the numbering rules will reason about.
pub const MAX_TRACK_NUMBER: i64 = 9999;

/// Run every album-level and track-level rule over an album.
///
/// Album rules come first, then each track's rules in track order.
pub fn validate_album(album: &Album, config: &ValidationConfig) -> Vec<Violation> {
    let mut violations = validate_album_tags(album, config);
    for track in album.tracks() {
        violations.extend(validate_track(track, config));
    }
    violations
}

/// Tags that must agree across every track of the album.
pub fn validate_album_tags(album: &Album, config: &ValidationConfig) -> Vec<Violation> {
    if album.is_empty() {
        return Vec::new();
    }

    let mut violations = Vec::new();

    for (tag, invalid) in [
        (TagName::Album, &[""][..]),
        (TagName::Date, &["", ZERO_DATE][..]),
    ] {
        let values = album.distinct_values(tag);
        if values.len() != 1 {
            violations.push(Violation::NotSingleTagValue { tag, values });
        } else if invalid.contains(&values[0].as_str()) {
            violations.push(Violation::InvalidValue { tag, values });
        }
    }

    let artists = album.distinct_values(TagName::Artist);
    if artists.len() != 1 {
        let album_artists = album.distinct_values(TagName::AlbumArtist);
        if album_artists.len() != 1 {
            violations.push(Violation::NotSingleAlbumArtist {
                artists,
                album_artists,
            });
        }
    }

    violations.extend(consistent_genre(album));
    violations.extend(single_album_id(album));
    violations.extend(disc_numbers(album));
    violations.extend(track_numbers(album, config));

    violations
}

fn consistent_genre(album: &Album) -> Option<Violation> {
    let first = album.tracks().first()?.tag(TagName::Genre);
    album
        .tracks()
        .iter()
        .any(|t| t.tag(TagName::Genre) != first)
        .then(|| Violation::InconsistentGenre {
            values: album.distinct_values(TagName::Genre),
        })
}

fn single_album_id(album: &Album) -> Option<Violation> {
    let values = album.distinct_values(TagName::MusicBrainzAlbumId);
    (values.len() > 1).then_some(Violation::InconsistentTag {
        tag: TagName::MusicBrainzAlbumId,
        values,
    })
}

/// First value of an integer tag; absent or unparsable is `None`.
fn first_int(track: &Track, tag: TagName) -> Option<i64> {
    track.tag(tag).first()?.parse().ok()
}

fn out_of_range(tag: TagName, value: i64, max: i64) -> Violation {
    Violation::NumberOutOfRange { tag, value, max }
}

fn disc_numbers(album: &Album) -> Vec<Violation> {
    let (discs, unbounded): (BTreeSet<i64>, BTreeSet<i64>) = album
        .tracks()
        .iter()
        .filter_map(|t| first_int(t, TagName::DiscNumber))
        .partition(|disc| (0..=MAX_DISC_NUMBER).contains(disc));

    let mut violations: Vec<Violation> = unbounded
        .into_iter()
        .map(|disc| out_of_range(TagName::DiscNumber, disc, MAX_DISC_NUMBER))
        .collect();

    // Absence is a per-track violation.
    let (Some(&lowest), Some(&highest)) = (discs.first(), discs.last()) else {
        return violations;
    };

    if lowest != 0 && lowest != 1 {
        violations.push(Violation::InvalidStartingDiscNumber { lowest });
    }
    violations.extend(
        (lowest..=highest)
            .filter(|disc| !discs.contains(disc))
            .map(|disc| Violation::MissingDiscNumber { disc }),
    );
    violations
}

fn track_numbers(album: &Album, config: &ValidationConfig) -> Vec<Violation> {
    let mut discs: BTreeMap<i64, BTreeMap<i64, usize>> = BTreeMap::new();
    for track in album.tracks() {
        let (Some(disc), Some(number)) = (
            first_int(track, TagName::DiscNumber),
            first_int(track, TagName::TrackNumber),
        ) else {
            continue;
        };
        *discs.entry(disc).or_default().entry(number).or_default() += 1;
    }

    let silenced = config.silence_tracks_for(&album.identity());

    let mut violations = Vec::new();
    for (&disc, tracks) in &discs {
        violations.extend(
            tracks
                .iter()
                .filter(|&(_, &count)| count > 1)
                .map(|(&track, &count)| Violation::TrackNumberCollision { disc, track, count }),
        );

        violations.extend(
            tracks
                .keys()
                .filter(|n| !(0..=MAX_TRACK_NUMBER).contains(*n))
                .map(|&n| out_of_range(TagName::TrackNumber, n, MAX_TRACK_NUMBER)),
        );

        let highest = tracks
            .range(..=MAX_TRACK_NUMBER)
            .next_back()
            .map_or(0, |(&n, _)| n);
        violations.extend(
            (1..=highest)
                .filter(|n| !tracks.contains_key(n) && !silenced.contains(n))
                .map(|track| Violation::MissingTrackNumber { disc, track }),
        );
    }
    violations
}

/// Every per-track rule, including the picture check.
pub fn validate_track(track: &Track, config: &ValidationConfig) -> Vec<Violation> {
    let mut violations = validate_track_tags(track, config);
    violations.extend(picture(track));
    violations
}

/// Per-track tag rules: required tags, integer tags and identifier shape.
pub fn validate_track_tags(track: &Track, config: &ValidationConfig) -> Vec<Violation> {
    let mut violations = Vec::new();

    for tag in REQUIRED_TAGS {
        let values = track.tag(tag);
        if values.len() == 1 {
            continue;
        }
        if tag == TagName::MusicBrainzAlbumId && has_no_catalog_entry(track, config) {
            continue;
        }
        violations.push(Violation::NotSingleTagValue {
            tag,
            values: values.to_vec(),
        });
    }

    for tag in INT_TAGS {
        let invalid: Vec<String> = track
            .tag(tag)
            .iter()
            .filter(|v| v.parse::<i64>().is_err())
            .cloned()
            .collect();
        if !invalid.is_empty() {
            violations.push(Violation::InvalidIntTag {
                tag,
                values: invalid,
            });
        }
    }

    for tag in TagName::ALL.into_iter().filter(TagName::is_musicbrainz_id) {
        for value in track.tag(tag) {
            if !IDENTIFIER.is_match(value) {
                violations.push(Violation::InvalidTagValue {
                    tag,
                    pattern: IDENTIFIER_PATTERN.to_string(),
                    value: value.clone(),
                });
            }
        }
    }

    violations
}

fn has_no_catalog_entry(track: &Track, config: &ValidationConfig) -> bool {
    let artists = track.tag(TagName::Artist);
    let albums = track.tag(TagName::Album);
    config
        .musicbrainz_exceptions
        .iter()
        .any(|key| artists.contains(&key.artist) && albums.contains(&key.album))
}

fn picture(track: &Track) -> Option<Violation> {
    let picture = track.picture()?;
    let detected = picture
        .detected_mime()
        .unwrap_or("application/octet-stream");

    if !is_supported_image(detected) {
        Some(Violation::InvalidPictureType {
            detected: detected.to_string(),
        })
    } else if picture.mime_type != detected {
        Some(Violation::MismatchedPictureType {
            detected: detected.to_string(),
            declared: picture.mime_type.clone(),
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AlbumKey;
    use crate::model::{Picture, TagStore};
    use crate::test_utils::{JPEG_BYTES, PNG_BYTES, album_of, complete_track, track_with};
    use proptest::prelude::*;

    fn disc_track(disc: &str, number: &str) -> Track {
        track_with(&[
            ("ALBUM", "Record"),
            ("ARTIST", "Someone"),
            ("DATE", "2001"),
            ("DISCNUMBER", disc),
            ("TRACKNUMBER", number),
        ])
    }

    fn album_rules(tracks: Vec<Track>) -> Vec<Violation> {
        validate_album_tags(&album_of(tracks), &ValidationConfig::default())
    }

    #[test]
    fn test_complete_album_is_valid() {
        let album = album_of(vec![complete_track(1, 1), complete_track(1, 2)]);
        assert_eq!(validate_album(&album, &ValidationConfig::default()), vec![]);
    }

    #[test]
    fn test_zero_date_is_invalid() {
        let violations = album_rules(vec![track_with(&[
            ("ALBUM", "Record"),
            ("ARTIST", "Someone"),
            ("DATE", ZERO_DATE),
        ])]);
        assert_eq!(
            violations,
            vec![Violation::InvalidValue {
                tag: TagName::Date,
                values: vec![ZERO_DATE.to_string()],
            }]
        );
    }

    #[test]
    fn test_two_album_names_are_not_single() {
        let violations = album_rules(vec![
            track_with(&[("ALBUM", "A"), ("ARTIST", "x"), ("DATE", "2001")]),
            track_with(&[("ALBUM", "B"), ("ARTIST", "x"), ("DATE", "2001")]),
        ]);
        assert_eq!(
            violations,
            vec![Violation::NotSingleTagValue {
                tag: TagName::Album,
                values: vec!["A".to_string(), "B".to_string()],
            }]
        );
    }

    #[test]
    fn test_various_artists_need_album_artist() {
        let with_album_artist = album_rules(vec![
            track_with(&[("ALBUM", "A"), ("ARTIST", "x"), ("ALBUMARTIST", "VA"), ("DATE", "1")]),
            track_with(&[("ALBUM", "A"), ("ARTIST", "y"), ("ALBUMARTIST", "VA"), ("DATE", "1")]),
        ]);
        assert!(with_album_artist.is_empty());

        let without = album_rules(vec![
            track_with(&[("ALBUM", "A"), ("ARTIST", "x"), ("DATE", "1")]),
            track_with(&[("ALBUM", "A"), ("ARTIST", "y"), ("DATE", "1")]),
        ]);
        assert_eq!(
            without,
            vec![Violation::NotSingleAlbumArtist {
                artists: vec!["x".to_string(), "y".to_string()],
                album_artists: vec![],
            }]
        );
    }

    #[test]
    fn test_genre_order_matters() {
        let violations = album_rules(vec![
            track_with(&[("ALBUM", "A"), ("ARTIST", "x"), ("DATE", "1"), ("GENRE", "a"), ("GENRE", "b")]),
            track_with(&[("ALBUM", "A"), ("ARTIST", "x"), ("DATE", "1"), ("GENRE", "b"), ("GENRE", "a")]),
        ]);
        assert_eq!(
            violations,
            vec![Violation::InconsistentGenre {
                values: vec!["a".to_string(), "b".to_string()],
            }]
        );
    }

    #[test]
    fn test_multiple_album_ids() {
        let violations = album_rules(vec![
            track_with(&[("ALBUM", "A"), ("ARTIST", "x"), ("DATE", "1"), ("MUSICBRAINZ_ALBUMID", "one")]),
            track_with(&[("ALBUM", "A"), ("ARTIST", "x"), ("DATE", "1"), ("MUSICBRAINZ_ALBUMID", "two")]),
        ]);
        assert_eq!(
            violations,
            vec![Violation::InconsistentTag {
                tag: TagName::MusicBrainzAlbumId,
                values: vec!["one".to_string(), "two".to_string()],
            }]
        );
    }

    #[test]
    fn test_missing_disc_numbers_are_skipped() {
        let violations = album_rules(vec![
            track_with(&[("ALBUM", "A"), ("ARTIST", "x"), ("DATE", "1")]),
            track_with(&[("ALBUM", "A"), ("ARTIST", "x"), ("DATE", "1")]),
        ]);
        assert!(violations.is_empty());
    }

    #[test]
    fn test_disc_numbers_starting_at_two() {
        let violations = album_rules(vec![
            disc_track("2", "1"),
            disc_track("3", "1"),
            disc_track("4", "1"),
        ]);
        assert_eq!(violations, vec![Violation::InvalidStartingDiscNumber { lowest: 2 }]);
    }

    #[test]
    fn test_gap_in_disc_numbers() {
        let violations = album_rules(vec![disc_track("1", "1"), disc_track("3", "1")]);
        assert_eq!(violations, vec![Violation::MissingDiscNumber { disc: 2 }]);
    }

    #[test]
    fn test_disc_zero_is_a_valid_start() {
        let violations = album_rules(vec![disc_track("0", "1"), disc_track("1", "1")]);
        assert!(violations.is_empty());
    }

    #[test]
    fn test_unparsable_disc_number_is_ignored_by_album_rules() {
        let violations = album_rules(vec![disc_track("1", "1"), disc_track("one", "2")]);
        assert!(violations.is_empty());
    }

    #[test]
    fn test_track_number_collision() {
        let violations = album_rules(vec![disc_track("1", "1"), disc_track("1", "1")]);
        assert_eq!(
            violations,
            vec![Violation::TrackNumberCollision {
                disc: 1,
                track: 1,
                count: 2,
            }]
        );
    }

    #[test]
    fn test_missing_first_track() {
        let violations = album_rules(vec![disc_track("1", "2"), disc_track("1", "3")]);
        assert_eq!(violations, vec![Violation::MissingTrackNumber { disc: 1, track: 1 }]);
    }

    #[test]
    fn test_huge_track_number_is_reported_once() {
        let violations = album_rules(vec![
            disc_track("1", "1"),
            disc_track("1", "2"),
            disc_track("1", "9223372036854775807"),
        ]);
        assert_eq!(
            violations,
            vec![Violation::NumberOutOfRange {
                tag: TagName::TrackNumber,
                value: i64::MAX,
                max: MAX_TRACK_NUMBER,
            }]
        );
    }

    #[test]
    fn test_out_of_range_disc_numbers_do_not_widen_the_gap_check() {
        let violations = album_rules(vec![
            disc_track("1", "1"),
            disc_track("-20000000", "1"),
            disc_track("20000000", "1"),
        ]);
        assert_eq!(
            violations,
            vec![
                Violation::NumberOutOfRange {
                    tag: TagName::DiscNumber,
                    value: -20_000_000,
                    max: MAX_DISC_NUMBER,
                },
                Violation::NumberOutOfRange {
                    tag: TagName::DiscNumber,
                    value: 20_000_000,
                    max: MAX_DISC_NUMBER,
                },
            ]
        );
    }

    #[test]
    fn test_track_numbers_are_per_disc() {
        let violations = album_rules(vec![
            disc_track("1", "1"),
            disc_track("1", "2"),
            disc_track("2", "1"),
        ]);
        assert!(violations.is_empty());
    }

    #[test]
    fn test_silence_tracks_suppress_missing_but_not_collisions() {
        let mut config = ValidationConfig::default();
        config.add_silence_entry("Someone/Record=1,2").unwrap();

        let album = album_of(vec![disc_track("1", "3"), disc_track("1", "3")]);
        assert_eq!(
            validate_album_tags(&album, &config),
            vec![Violation::TrackNumberCollision {
                disc: 1,
                track: 3,
                count: 2,
            }]
        );
    }

    #[test]
    fn test_silence_identity_uses_album_artist() {
        let mut config = ValidationConfig::default();
        config.add_silence_entry("The Band/Record=1").unwrap();

        let album = album_of(vec![track_with(&[
            ("ALBUM", "Record"),
            ("ARTIST", "Singer"),
            ("ALBUMARTIST", "The Band"),
            ("DATE", "2001"),
            ("DISCNUMBER", "1"),
            ("TRACKNUMBER", "2"),
        ])]);
        assert!(validate_album_tags(&album, &config).is_empty());
    }

    #[test]
    fn test_missing_artist_and_sort() {
        let track = track_with(&[
            ("TRACKNUMBER", "1"),
            ("TRACKTOTAL", "1"),
            ("ALBUM", "Record"),
            ("TITLE", "Song"),
            ("MUSICBRAINZ_ALBUMID", "abc-123"),
            ("DISCNUMBER", "1"),
        ]);
        assert_eq!(
            validate_track_tags(&track, &ValidationConfig::default()),
            vec![
                Violation::NotSingleTagValue {
                    tag: TagName::Artist,
                    values: vec![],
                },
                Violation::NotSingleTagValue {
                    tag: TagName::ArtistSort,
                    values: vec![],
                },
            ]
        );
    }

    #[test]
    fn test_album_id_exception() {
        let track = track_with(&[
            ("ARTIST", "King Size Slim"),
            ("ARTISTSORT", "King Size Slim"),
            ("TRACKNUMBER", "1"),
            ("TRACKTOTAL", "1"),
            ("ALBUM", "Live at The Man of Kent Alehouse"),
            ("TITLE", "Song"),
            ("DISCNUMBER", "1"),
        ]);
        let config = ValidationConfig {
            musicbrainz_exceptions: vec![AlbumKey {
                artist: "King Size Slim".to_string(),
                album: "Live at The Man of Kent Alehouse".to_string(),
            }],
            ..Default::default()
        };

        assert!(validate_track_tags(&track, &config).is_empty());
        assert_eq!(
            validate_track_tags(&track, &ValidationConfig::default()),
            vec![Violation::NotSingleTagValue {
                tag: TagName::MusicBrainzAlbumId,
                values: vec![],
            }]
        );
    }

    #[test]
    fn test_non_integer_tags_are_collected() {
        let mut track = complete_track(1, 1);
        track.stage(TagName::TrackNumber, vec!["one".to_string(), "2".to_string(), "x".to_string()]);

        let violations = validate_track_tags(&track, &ValidationConfig::default());
        assert!(violations.contains(&Violation::InvalidIntTag {
            tag: TagName::TrackNumber,
            values: vec!["one".to_string(), "x".to_string()],
        }));
    }

    #[test]
    fn test_identifier_values_reported_individually() {
        let mut track = complete_track(1, 1);
        track.stage(
            TagName::MusicBrainzArtistId,
            vec!["ok-1".to_string(), "not ok".to_string(), "http://x".to_string()],
        );

        let violations = validate_track_tags(&track, &ValidationConfig::default());
        assert_eq!(
            violations,
            vec![
                Violation::InvalidTagValue {
                    tag: TagName::MusicBrainzArtistId,
                    pattern: IDENTIFIER_PATTERN.to_string(),
                    value: "not ok".to_string(),
                },
                Violation::InvalidTagValue {
                    tag: TagName::MusicBrainzArtistId,
                    pattern: IDENTIFIER_PATTERN.to_string(),
                    value: "http://x".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_picture_must_be_jpeg_or_png() {
        let track = Track::new(
            "/music/a/01.flac",
            TagStore::default(),
            Some(Picture {
                data: b"GIF89a....".to_vec(),
                mime_type: "image/gif".to_string(),
                description: String::new(),
            }),
        );
        assert_eq!(
            picture(&track),
            Some(Violation::InvalidPictureType {
                detected: "image/gif".to_string(),
            })
        );
    }

    #[test]
    fn test_picture_declared_type_must_match() {
        let track = Track::new(
            "/music/a/01.flac",
            TagStore::default(),
            Some(Picture {
                data: PNG_BYTES.to_vec(),
                mime_type: "image/jpeg".to_string(),
                description: String::new(),
            }),
        );
        assert_eq!(
            picture(&track),
            Some(Violation::MismatchedPictureType {
                detected: "image/png".to_string(),
                declared: "image/jpeg".to_string(),
            })
        );
    }

    #[test]
    fn test_staged_picture_is_validated() {
        let mut track = complete_track(1, 1);
        track.set_picture(JPEG_BYTES.to_vec(), "http://img").unwrap();
        assert_eq!(validate_track(&track, &ValidationConfig::default()), vec![]);
    }

    proptest! {
        #[test]
        fn prop_single_album_and_date_are_valid(
            album in "[^\\x00]{1,20}",
            date in "[0-9]{4}(-[0-9]{2}-[0-9]{2})?",
            tracks in 1usize..6,
        ) {
            prop_assume!(date != ZERO_DATE);
            let tracks = (0..tracks)
                .map(|_| track_with(&[("ALBUM", album.as_str()), ("DATE", date.as_str())]))
                .collect();
            let violations = album_rules(tracks);
            let album_or_date_flagged = violations.iter().any(|v| matches!(
                v,
                Violation::NotSingleTagValue { tag: TagName::Album | TagName::Date, .. }
                    | Violation::InvalidValue { .. }
            ));
            prop_assert!(!album_or_date_flagged);
        }
    }
}
