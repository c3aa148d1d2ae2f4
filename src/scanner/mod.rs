//! Album directory discovery.
//!
//! Walks the tree under a root and classifies every directory: one holding
//! only files, at least one of them audio, is an album; anything with a
//! subdirectory or without audio is skipped. Non-audio files next to the
//! audio (cover.jpg, cue sheets, logs) are ignored.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use futures::stream::Stream;
use tokio::sync::mpsc;
use walkdir::WalkDir;

/// A directory to process as one album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumDir {
    pub path: PathBuf,
    /// Audio files, sorted by file name
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    HasSubdirectories,
    NoAudioFiles,
}

/// What the walk found at one directory.
#[derive(Debug)]
pub enum Discovery {
    Album(AlbumDir),
    Skipped { path: PathBuf, reason: SkipReason },
    Unreadable { path: PathBuf, error: io::Error },
}

/// Classify one directory.
pub fn classify(dir: &Path, is_audio: impl Fn(&Path) -> bool) -> io::Result<Discovery> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            return Ok(Discovery::Skipped {
                path: dir.to_path_buf(),
                reason: SkipReason::HasSubdirectories,
            });
        }
        files.push(entry.path());
    }

    files.retain(|path| is_audio(path));
    if files.is_empty() {
        return Ok(Discovery::Skipped {
            path: dir.to_path_buf(),
            reason: SkipReason::NoAudioFiles,
        });
    }
    files.sort();

    Ok(Discovery::Album(AlbumDir {
        path: dir.to_path_buf(),
        files,
    }))
}

/// Walks `root` recursively and yields a [`Discovery`] per directory.
///
/// The walk runs on the blocking pool; dropping the stream stops it.
pub fn scan<F>(root: PathBuf, is_audio: F) -> impl Stream<Item = Discovery>
where
    F: Fn(&Path) -> bool + Send + 'static,
{
    let (tx, rx) = mpsc::channel(100);

    tokio::task::spawn_blocking(move || {
        for entry in WalkDir::new(&root) {
            let discovery = match entry {
                Ok(entry) if entry.file_type().is_dir() => {
                    match classify(entry.path(), &is_audio) {
                        Ok(discovery) => discovery,
                        Err(error) => Discovery::Unreadable {
                            path: entry.path().to_path_buf(),
                            error,
                        },
                    }
                }
                Ok(_) => continue,
                Err(e) => Discovery::Unreadable {
                    path: e.path().map_or_else(|| root.clone(), Path::to_path_buf),
                    error: e.into(),
                },
            };

            if let Discovery::Skipped { path, reason } = &discovery {
                tracing::debug!(path = %path.display(), ?reason, "Skipping directory");
            }
            // Receiver dropped means nobody wants the rest of the walk.
            if tx.blocking_send(discovery).is_err() {
                break;
            }
        }
    });

    futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|discovery| (discovery, rx))
    })
}
