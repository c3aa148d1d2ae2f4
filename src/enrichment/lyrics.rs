//! Lyrics clean-up before staging.
//!
//! Catalog lyrics occasionally carry look-alike characters used as
//! watermarks, and sometimes belong to a different-language release of the
//! same song. Known markers are replaced; anything else outside Latin-1
//! (plus a few musical symbols and typographic dashes) discards the lyrics,
//! unless the artist is known to sing in another script.

use std::collections::BTreeSet;

/// Look-alike characters and their plain replacements.
const MARKERS: [(char, &str); 2] = [
    ('\u{0435}', "e"), // CYRILLIC SMALL LETTER IE
    ('\u{FFA0}', " "), // HALFWIDTH HANGUL FILLER
];

/// Non-Latin-1 characters that commonly appear in English lyrics.
const ALLOWED: [char; 6] = ['♪', '♫', '♬', '—', '–', '’'];

/// Whether `c` is outside Latin-1 and the allowlist.
pub fn is_foreign(c: char) -> bool {
    u32::from(c) > 0xFF && !ALLOWED.contains(&c)
}

/// Replace marker characters and reject foreign-script lyrics.
///
/// Returns an empty string when the lyrics were rejected.
pub fn tidy_lyrics(text: &str, international: bool) -> String {
    let mut text = text.to_string();
    for (marker, replacement) in MARKERS {
        if text.contains(marker) {
            text = text.replace(marker, replacement);
        }
    }

    if international || !text.chars().any(is_foreign) {
        return text;
    }

    let unknown: String = text
        .chars()
        .filter(|&c| is_foreign(c))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    tracing::info!(unknown = %unknown, lyrics = %text, "Skipped lyrics as it wasn't english");
    String::new()
}
