//! Wikidata and Wikipedia API Data Transfer Objects
//!
//! Only the fields used to get from a release group's Wikidata item to the
//! album cover on its English Wikipedia article.
//!
//! API Reference:
//! - https://www.wikidata.org/wiki/Wikidata:REST_API
//! - https://www.mediawiki.org/wiki/API:Query

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Wikidata item restricted to `_fields=sitelinks`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WikidataItem {
    #[serde(default)]
    pub sitelinks: HashMap<String, SiteLink>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteLink {
    pub title: String,
    pub url: Option<String>,
}

/// `action=query` response with `formatversion=2`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryResponse {
    pub query: Option<Query>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Query {
    #[serde(default)]
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page {
    /// Missing pages have no id
    #[serde(default)]
    pub pageid: u64,
    pub title: String,
    pub original: Option<OriginalImage>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OriginalImage {
    pub source: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Category {
    pub ns: i32,
    pub title: String,
}
