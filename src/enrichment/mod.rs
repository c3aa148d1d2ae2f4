//! Catalog enrichment - fills in what a track's tags are missing from
//! remote music catalogs.
//!
//! # Architecture
//!
//! - **Domain models** (`domain.rs`) - our view of releases, covers, and lyrics
//! - **API DTOs** (`musicbrainz/dto.rs`, `coverart/dto.rs`, ...) - exact response shapes
//! - **Adapters** - convert DTOs to domain models
//! - **Clients** - one per catalog, all fetching through the shared
//!   [`RemoteCache`](crate::cache::RemoteCache)
//! - **Traits** (`traits.rs`) - the seams the pipeline depends on, mocked in tests
//! - **Pipeline** (`pipeline.rs`) - the ordered per-track steps
//!
//! ```ignore
//! let cache = Arc::new(RemoteCache::new(transport, config.catalogs.rate_limit())?);
//! let enricher = Enricher::new(Catalogs::from_config(&config.catalogs, cache), &config)?;
//! enricher.enrich_track(&mut track, &cancel).await?;
//! ```

pub mod coverart;
pub mod domain;
mod http;
pub mod identify;
pub mod lrclib;
pub mod lyrics;
pub mod musicbrainz;
pub mod normalize;
pub mod pipeline;
pub mod traits;
pub mod wikipedia;

pub use domain::{CoverImage, EnrichmentError, Lyrics, Release, ReleaseGroup};
pub use identify::{ReleaseCriterion, ReleaseSelector};
pub use normalize::TagNormalizer;
pub use pipeline::{Catalogs, Enricher};
