//! LRCLIB API Data Transfer Objects
//!
//! API Reference: https://lrclib.net/docs

use serde::{Deserialize, Serialize};

/// Response of `GET /api/get`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricsResponse {
    pub id: Option<u64>,
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub album_name: Option<String>,
    /// Duration in seconds
    pub duration: Option<f64>,
    #[serde(default)]
    pub instrumental: bool,
    pub plain_lyrics: Option<String>,
    /// LRC-formatted lyrics
    pub synced_lyrics: Option<String>,
}

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_lyrics() {
        let json = r#"{
            "id": 3396226,
            "trackName": "I Want to Live",
            "artistName": "Borislav Slavov",
            "albumName": "Baldur's Gate 3 (Original Game Soundtrack)",
            "duration": 233,
            "instrumental": false,
            "plainLyrics": "I feel your breath upon my neck\n...",
            "syncedLyrics": "[00:17.12] I feel your breath upon my neck\n..."
        }"#;

        let lyrics: LyricsResponse = serde_json::from_str(json).expect("Should parse lyrics");
        assert!(!lyrics.instrumental);
        assert!(lyrics.synced_lyrics.unwrap().starts_with("[00:17.12]"));
    }

    #[test]
    fn test_parse_instrumental() {
        let json = r#"{
            "id": 1,
            "instrumental": true,
            "plainLyrics": null,
            "syncedLyrics": null
        }"#;

        let lyrics: LyricsResponse = serde_json::from_str(json).expect("Should parse");
        assert!(lyrics.instrumental);
        assert!(lyrics.plain_lyrics.is_none());
    }
}
