//! Core data model for the audit.
//!
//! Defines the in-memory representation of an album on disk:
//! - [`TagName`] / [`TagStore`] - the audited tag vocabulary and the raw comments
//! - [`Track`] - one audio file plus its staged edits
//! - [`Album`] - the tracks of one directory

mod album;
mod tag;
mod track;

pub use album::Album;
pub use tag::{TagName, TagStore, UnknownTag};
pub use track::{Picture, StagedEdits, Track, detect_image_type, is_supported_image};
