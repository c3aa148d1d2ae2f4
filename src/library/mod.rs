//! Album-level orchestration.
//!
//! Every album directory the scanner finds is read, enriched track by track,
//! validated as a whole, and then either committed or reported. Commit is
//! all-or-nothing per album: a single failing track keeps every other track
//! in the album untouched. Albums run concurrently up to the configured
//! parallelism and never affect each other.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::enrichment::Enricher;
use crate::error::{Error, TrackError};
use crate::metadata::TagCodec;
use crate::model::{Album, Track};
use crate::scanner::{self, AlbumDir, Discovery, SkipReason};
use crate::validation::{Violation, validate_album_tags, validate_track};

/// Written in dry-run logs for a tag staged with no values.
pub const TAG_REMOVED: &str = "__TAG_REMOVED__";

/// One reason an album was not committed.
#[derive(Debug, thiserror::Error)]
pub enum AlbumFailure {
    #[error("{track}: {error}")]
    Track { track: String, error: TrackError },

    #[error("{0}")]
    Violation(Violation),

    #[error("{0}")]
    Io(Error),

    #[error("{track}: failed to save: {error}")]
    Commit { track: String, error: Error },

    #[error("cancelled")]
    Cancelled,
}

/// Everything that went wrong with one album.
#[derive(Debug)]
pub struct AlbumError {
    pub path: PathBuf,
    pub failures: Vec<AlbumFailure>,
}

impl AlbumError {
    fn new(path: &Path, failures: Vec<AlbumFailure>) -> Self {
        Self {
            path: path.to_path_buf(),
            failures,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.failures
            .iter()
            .any(|f| matches!(f, AlbumFailure::Cancelled))
    }
}

impl fmt::Display for AlbumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "album {}: ", self.path.display())?;
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AlbumError {}

#[derive(Debug)]
pub enum ScanEvent {
    /// Album passed; `changed` tracks were saved (or logged in dry-run mode)
    Completed { path: PathBuf, changed: usize },
    Skipped { path: PathBuf, reason: SkipReason },
    Failed(AlbumError),
}

/// Totals for a finished scan.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub completed: usize,
    pub skipped: usize,
    pub tracks_changed: usize,
    pub failures: Vec<AlbumError>,
}

impl ScanReport {
    pub fn record(&mut self, event: ScanEvent) {
        match event {
            ScanEvent::Completed { changed, .. } => {
                self.completed += 1;
                self.tracks_changed += changed;
            }
            ScanEvent::Skipped { .. } => self.skipped += 1,
            ScanEvent::Failed(error) => self.failures.push(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} albums ok ({} tracks changed), {} failed, {} directories skipped",
            self.completed,
            self.tracks_changed,
            self.failures.len(),
            self.skipped
        )
    }
}

/// Reads, enriches, validates and commits albums.
pub struct Auditor {
    enricher: Enricher,
    codec: Arc<dyn TagCodec>,
    write: bool,
}

impl Auditor {
    pub fn new(enricher: Enricher, codec: Arc<dyn TagCodec>, write: bool) -> Self {
        Self {
            enricher,
            codec,
            write,
        }
    }

    /// Process one album directory end to end.
    ///
    /// Returns the number of tracks with committed changes.
    pub async fn process_album(
        &self,
        dir: &AlbumDir,
        cancel: &CancellationToken,
    ) -> Result<usize, AlbumError> {
        let mut album = self.read_album(dir, cancel).await?;
        if album.is_empty() {
            tracing::info!("No audio tracks found");
            return Ok(0);
        }

        let mut failures = Vec::new();
        for track in album.tracks_mut() {
            let name = track.name();
            let result = self
                .enricher
                .enrich_track(track, cancel)
                .instrument(tracing::info_span!("track", track = %name))
                .await;
            match result {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => {
                    return Err(AlbumError::new(dir.path.as_path(), vec![AlbumFailure::Cancelled]));
                }
                // Reported again by the album validation below.
                Err(TrackError::Validation(_)) => {}
                Err(error) => failures.push(AlbumFailure::Track { track: name, error }),
            }
        }

        failures.extend(self.validate(&album));
        if !failures.is_empty() {
            return Err(AlbumError::new(&dir.path, failures));
        }

        self.commit(album.tracks(), cancel)
            .await
            .map_err(|f| AlbumError::new(&dir.path, vec![f]))
    }

    async fn read_album(
        &self,
        dir: &AlbumDir,
        cancel: &CancellationToken,
    ) -> Result<Album, AlbumError> {
        let mut tracks = Vec::with_capacity(dir.files.len());
        for path in &dir.files {
            if cancel.is_cancelled() {
                return Err(AlbumError::new(&dir.path, vec![AlbumFailure::Cancelled]));
            }

            let codec = Arc::clone(&self.codec);
            let path = path.clone();
            let read = tokio::task::spawn_blocking(move || codec.read(&path))
                .await
                .map_err(|e| Error::Io(std::io::Error::other(e)))
                .and_then(|r| r);
            match read {
                Ok(track) => tracks.push(track),
                Err(e) => return Err(AlbumError::new(&dir.path, vec![AlbumFailure::Io(e)])),
            }
        }
        Ok(Album::new(&dir.path, tracks))
    }

    fn validate(&self, album: &Album) -> Vec<AlbumFailure> {
        let config = self.enricher.validation();
        let mut failures: Vec<AlbumFailure> = validate_album_tags(album, config)
            .into_iter()
            .map(AlbumFailure::Violation)
            .collect();

        for track in album.tracks() {
            let violations = validate_track(track, config);
            if !violations.is_empty() {
                failures.push(AlbumFailure::Track {
                    track: track.name(),
                    error: TrackError::Validation(violations),
                });
            }
        }
        failures
    }

    async fn commit(
        &self,
        tracks: &[Track],
        cancel: &CancellationToken,
    ) -> Result<usize, AlbumFailure> {
        let mut changed = 0;
        for track in tracks.iter().filter(|t| t.has_changes()) {
            if cancel.is_cancelled() {
                return Err(AlbumFailure::Cancelled);
            }
            changed += 1;
            if !self.write {
                log_staged_edits(track);
                continue;
            }

            tracing::warn!(track = %track.name(), "Saving changes to track");
            let codec = Arc::clone(&self.codec);
            let owned = track.clone();
            tokio::task::spawn_blocking(move || codec.write(&owned))
                .await
                .map_err(|e| Error::Io(std::io::Error::other(e)))
                .and_then(|r| r)
                .map_err(|error| AlbumFailure::Commit {
                    track: track.name(),
                    error,
                })?;
        }
        Ok(changed)
    }
}

/// Dry-run report of everything a track would have written.
fn log_staged_edits(track: &Track) {
    let staged = track.staged();
    let tags: Vec<String> = staged
        .tags
        .iter()
        .map(|(tag, values)| {
            let shown = if values.is_empty() {
                TAG_REMOVED.to_string()
            } else {
                values.join(",")
            };
            format!("{tag}={shown}")
        })
        .collect();

    match &staged.picture {
        Some(picture) => tracing::warn!(
            track = %track.name(),
            tags = %tags.join("; "),
            picture_url = %picture.description,
            picture_mime = %picture.mime_type,
            "Updated track"
        ),
        None => tracing::warn!(track = %track.name(), tags = %tags.join("; "), "Updated track"),
    }
}

/// Audits every album under `root`, yielding one event per directory.
///
/// Stops discovering new albums once `cancel` fires; albums already in
/// flight report cancellation as their failure.
pub fn audit_library(
    auditor: Arc<Auditor>,
    root: PathBuf,
    parallelism: usize,
    cancel: CancellationToken,
) -> impl Stream<Item = ScanEvent> {
    let codec = Arc::clone(&auditor.codec);
    scanner::scan(root, move |path| codec.recognizes(path))
        .take_until(cancel.clone().cancelled_owned())
        .map(move |discovery| {
            let auditor = Arc::clone(&auditor);
            let cancel = cancel.clone();
            async move {
                match discovery {
                    Discovery::Album(dir) => {
                        let span = tracing::info_span!("album", path = %dir.path.display());
                        match auditor.process_album(&dir, &cancel).instrument(span).await {
                            Ok(changed) => ScanEvent::Completed {
                                path: dir.path,
                                changed,
                            },
                            Err(error) => ScanEvent::Failed(error),
                        }
                    }
                    Discovery::Skipped { path, reason } => ScanEvent::Skipped { path, reason },
                    Discovery::Unreadable { path, error } => ScanEvent::Failed(AlbumError::new(
                        &path,
                        vec![AlbumFailure::Io(Error::Io(error))],
                    )),
                }
            }
        })
        .buffer_unordered(parallelism.max(1))
}

/// Run a whole scan and collect the results.
pub async fn run_scan(
    auditor: Arc<Auditor>,
    root: PathBuf,
    parallelism: usize,
    cancel: CancellationToken,
) -> ScanReport {
    let mut report = ScanReport::default();
    let events = audit_library(auditor, root, parallelism, cancel);
    let mut events = std::pin::pin!(events);
    while let Some(event) = events.next().await {
        if let ScanEvent::Failed(error) = &event {
            tracing::error!(error = %error, "Album failed");
        }
        report.record(event);
    }
    report
}
