//! Tag consistency validation.
//!
//! Pure functions over the data model; no I/O. Callers get the complete list
//! of violations rather than the first failure.

mod rules;
mod violation;

pub use rules::{
    IDENTIFIER_PATTERN, ZERO_DATE, validate_album, validate_album_tags, validate_track,
    validate_track_tags,
};
pub use violation::Violation;
