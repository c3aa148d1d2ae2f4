//! Adapter layer: Convert MusicBrainz DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! This isolates API changes - if MusicBrainz changes their response format,
//! only this file and dto.rs need to change.

use super::dto;
use crate::enrichment::domain::{Medium, Relation, Release, ReleaseGroup};

/// Convert a release response
pub fn to_release(release: dto::Release) -> Release {
    Release {
        id: release.id,
        title: release.title,
        country: release.country.filter(|c| !c.is_empty()),
        media: release
            .media
            .into_iter()
            .map(|m| Medium { format: m.format })
            .collect(),
        cover_art_count: release.cover_art_archive.map_or(0, |caa| caa.count),
        release_group_id: release.release_group.map(|rg| rg.id),
    }
}

/// Convert every release in a disc ID response
pub fn to_releases(response: dto::DiscIdResponse) -> Vec<Release> {
    response.releases.into_iter().map(to_release).collect()
}

/// Convert a release group response.
///
/// Only relations that point at a URL are kept.
pub fn to_release_group(group: dto::ReleaseGroup) -> ReleaseGroup {
    ReleaseGroup {
        id: group.id,
        genres: group.genres.into_iter().map(|g| g.name).collect(),
        relations: group
            .relations
            .into_iter()
            .filter_map(|rel| {
                rel.url.map(|url| Relation {
                    kind: rel.relation_type,
                    url: url.resource,
                })
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto_release(json: &str) -> dto::Release {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_release_without_cover_art_summary_has_zero_count() {
        let release = to_release(dto_release(r#"{"id": "r1", "title": "A"}"#));
        assert_eq!(release.cover_art_count, 0);
        assert_eq!(release.release_group_id, None);
        assert_eq!(release.country, None);
    }

    #[test]
    fn test_release_fields_are_carried() {
        let release = to_release(dto_release(
            r#"{
                "id": "r1",
                "title": "A",
                "country": "GB",
                "cover-art-archive": {"count": 2},
                "release-group": {"id": "rg1"},
                "media": [{"format": "CD"}]
            }"#,
        ));

        assert_eq!(release.country.as_deref(), Some("GB"));
        assert_eq!(release.cover_art_count, 2);
        assert_eq!(release.release_group_id.as_deref(), Some("rg1"));
        assert_eq!(release.media, vec![Medium { format: Some("CD".to_string()) }]);
    }

    #[test]
    fn test_empty_country_is_none() {
        let release = to_release(dto_release(r#"{"id": "r1", "title": "A", "country": ""}"#));
        assert_eq!(release.country, None);
    }

    #[test]
    fn test_release_group_keeps_url_relations() {
        let group: dto::ReleaseGroup = serde_json::from_str(
            r#"{
                "id": "rg1",
                "genres": [{"name": "rock"}, {"name": "art rock"}],
                "relations": [
                    {"type": "wikidata", "url": {"resource": "https://www.wikidata.org/wiki/Q1"}},
                    {"type": "other"}
                ]
            }"#,
        )
        .unwrap();

        let group = to_release_group(group);
        assert_eq!(group.genres, vec!["rock", "art rock"]);
        assert_eq!(group.relations.len(), 1);
        assert_eq!(group.url_for("wikidata"), Some("https://www.wikidata.org/wiki/Q1"));
    }
}
