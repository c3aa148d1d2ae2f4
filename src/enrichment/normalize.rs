//! Tag normalization, the first step of enrichment.
//!
//! Some taggers store MusicBrainz identifiers as page URLs rather than bare
//! IDs, and some fill empty fields with placeholder text. Both are fixed up
//! as staged edits so the rest of the pipeline only sees clean values.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{ConfigError, NormalizationConfig};
use crate::model::{TagName, Track};

static URL_FORMS: LazyLock<Vec<(TagName, Regex)>> = LazyLock::new(|| {
    let artist = r"^http://musicbrainz.org/artist/(.*)$";
    [
        (TagName::MusicBrainzAlbumId, r"^http://musicbrainz.org/release/(.*).html$"),
        (TagName::MusicBrainzAlbumArtistId, artist),
        (TagName::MusicBrainzArtistId, artist),
        (TagName::MusicBrainzTrackId, r"^http://musicbrainz.org/track/(.*)$"),
    ]
    .into_iter()
    .map(|(tag, pattern)| (tag, Regex::new(pattern).expect("URL pattern is valid")))
    .collect()
});

/// Rewrites URL-shaped identifiers and strips placeholder values.
#[derive(Debug, Clone, Default)]
pub struct TagNormalizer {
    placeholders: BTreeMap<TagName, Vec<String>>,
}

impl TagNormalizer {
    pub fn new(placeholders: BTreeMap<TagName, Vec<String>>) -> Self {
        Self { placeholders }
    }

    /// Build from config; placeholder keys must be audited tag names.
    pub fn from_config(config: &NormalizationConfig) -> Result<Self, ConfigError> {
        let placeholders = config
            .placeholder_values
            .iter()
            .map(|(key, values)| {
                key.parse::<TagName>()
                    .map(|tag| (tag, values.clone()))
                    .map_err(|e| ConfigError::InvalidValue(e.to_string()))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self::new(placeholders))
    }

    /// Stage corrected values for any tag that needs them.
    pub fn correct_tags(&self, track: &mut Track) {
        for (tag, pattern) in URL_FORMS.iter() {
            let values = track.tag(*tag);
            if !values.iter().any(|v| pattern.is_match(v)) {
                continue;
            }
            let corrected = values
                .iter()
                .map(|v| match pattern.captures(v) {
                    Some(caps) => caps[1].to_string(),
                    None => v.clone(),
                })
                .collect();
            track.stage(*tag, corrected);
        }

        for (tag, placeholders) in &self.placeholders {
            let values = track.tag(*tag);
            if !values.iter().any(|v| placeholders.contains(v)) {
                continue;
            }
            let kept = values
                .iter()
                .filter(|v| !placeholders.contains(v))
                .cloned()
                .collect();
            track.stage(*tag, kept);
        }
    }
}
