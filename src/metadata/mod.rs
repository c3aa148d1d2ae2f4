//! FLAC tag reading and writing.
//!
//! Uses the lofty crate's FLAC support directly rather than its generic tag
//! layer, so Vorbis comment keys and repeated values survive a round trip
//! exactly as written.
//!
//! The [`TagCodec`] trait is the seam the album orchestrator writes through;
//! tests substitute an in-memory codec.

use std::fs::File;
use std::path::Path;

use lofty::config::{ParseOptions, WriteOptions};
use lofty::file::AudioFile;
use lofty::flac::FlacFile;
use lofty::ogg::{OggPictureStorage, VorbisComments};
use lofty::picture::{MimeType, Picture as LoftyPicture, PictureInformation, PictureType};

use crate::error::{Error, Result, ResultExt};
use crate::model::{Picture, TagStore, Track};

/// Reads and writes the tags of one kind of audio file.
pub trait TagCodec: Send + Sync {
    /// Whether `path` is a file this codec handles.
    fn recognizes(&self, path: &Path) -> bool;

    /// Read a file's comments and front cover.
    fn read(&self, path: &Path) -> Result<Track>;

    /// Rewrite a file with the track's pending comments and staged cover.
    fn write(&self, track: &Track) -> Result<()>;
}

/// Whether a path has a `.flac` extension, case-insensitively.
pub fn is_flac(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("flac"))
}

/// lofty-backed FLAC codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlacCodec;

impl FlacCodec {
    fn open(path: &Path) -> Result<FlacFile> {
        let mut file = File::open(path).with_context(format!("opening {}", path.display()))?;
        FlacFile::read_from(&mut file, ParseOptions::new().read_properties(false))
            .map_err(|e| Error::metadata(path, e.to_string()))
    }
}

impl TagCodec for FlacCodec {
    fn recognizes(&self, path: &Path) -> bool {
        is_flac(path)
    }

    fn read(&self, path: &Path) -> Result<Track> {
        let flac = Self::open(path)?;

        let tags = match flac.vorbis_comments() {
            Some(comments) => TagStore::from_comments(comments.items()),
            None => TagStore::default(),
        };

        let picture = flac
            .pictures()
            .iter()
            .map(|(picture, _)| picture)
            .find(|p| p.pic_type() == PictureType::CoverFront)
            .map(|p| Picture {
                data: p.data().to_vec(),
                mime_type: p.mime_type().map(|m| m.as_str().to_string()).unwrap_or_default(),
                description: p.description().unwrap_or_default().to_string(),
            });

        Ok(Track::new(path, tags, picture))
    }

    fn write(&self, track: &Track) -> Result<()> {
        let path = track.path();
        let mut flac = Self::open(path)?;

        let mut comments = VorbisComments::default();
        if let Some(existing) = flac.vorbis_comments() {
            comments.set_vendor(existing.vendor().to_string());
        }
        for (key, value) in track.pending_comments() {
            comments.push(key, value);
        }
        flac.set_vorbis_comments(comments);

        if let Some(picture) = &track.staged().picture {
            let mime = match picture.mime_type.as_str() {
                "image/png" => MimeType::Png,
                _ => MimeType::Jpeg,
            };
            // Source URL is only for logs; the written block has no description.
            let block = LoftyPicture::new_unchecked(
                PictureType::CoverFront,
                Some(mime),
                None,
                picture.data.clone(),
            );
            let info = PictureInformation::from_picture(&block)
                .map_err(|e| Error::metadata(path, e.to_string()))?;
            let existing = flac
                .pictures()
                .iter()
                .position(|(p, _)| p.pic_type() == PictureType::CoverFront);
            match existing {
                Some(index) => flac.set_picture(index, block, info),
                None => {
                    flac.insert_picture(block, Some(info))
                        .map_err(|e| Error::metadata(path, e.to_string()))?;
                }
            }
        }

        flac.save_to_path(path, WriteOptions::default())
            .map_err(|e| Error::metadata(path, e.to_string()))
    }
}
