//! Cover Art Archive API Data Transfer Objects
//!
//! The Cover Art Archive (https://coverartarchive.org) provides album artwork
//! for MusicBrainz releases. It's a free service with no API key required.
//!
//! API Reference: https://wiki.musicbrainz.org/Cover_Art_Archive/API

use serde::Deserialize;

/// Cover art listing for a release
#[derive(Debug, Clone, Deserialize)]
pub struct CoverArtResponse {
    /// Array of images for this release
    #[serde(default)]
    pub images: Vec<Image>,
}

/// A single cover art image
#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    /// Whether this is the front cover
    #[serde(default)]
    pub front: bool,
    /// URL to full-size image
    pub image: String,
}

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_cover_art_listing() {
        let json = r#"{
            "images": [
                {
                    "approved": true,
                    "back": false,
                    "comment": "",
                    "edit": 17034497,
                    "front": true,
                    "id": 829521842,
                    "image": "http://coverartarchive.org/release/r1/829521842.jpg",
                    "thumbnails": {
                        "250": "http://coverartarchive.org/release/r1/829521842-250.jpg",
                        "500": "http://coverartarchive.org/release/r1/829521842-500.jpg"
                    },
                    "types": ["Front"]
                },
                {
                    "front": false,
                    "image": "http://coverartarchive.org/release/r1/829521843.jpg",
                    "types": ["Back"]
                }
            ],
            "release": "http://musicbrainz.org/release/r1"
        }"#;

        let listing: CoverArtResponse = serde_json::from_str(json).expect("Should parse listing");
        assert_eq!(listing.images.len(), 2);
        assert!(listing.images[0].front);
        assert!(!listing.images[1].front);
        assert_eq!(
            listing.images[0].image,
            "http://coverartarchive.org/release/r1/829521842.jpg"
        );
    }

    #[test]
    fn test_parse_image_without_optional_fields() {
        let json = r#"{"images": [{"image": "http://img/1.png"}]}"#;
        let listing: CoverArtResponse = serde_json::from_str(json).expect("Should parse");
        assert!(!listing.images[0].front);
    }
}
