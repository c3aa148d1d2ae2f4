//! Library audit command.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cache::{RemoteCache, ReqwestTransport};
use crate::config::{self, Config, ConfigError};
use crate::enrichment::{Catalogs, Enricher};
use crate::library::{self, Auditor};
use crate::metadata::FlacCodec;

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Root directory of the music library
    pub path: PathBuf,

    /// Write changes to the files rather than logging them
    #[arg(long, env = "FLAC_AUDIT_WRITE")]
    pub write: bool,

    /// Don't fetch missing lyrics
    #[arg(long)]
    pub no_lyrics: bool,

    /// Number of albums to process in parallel
    #[arg(long, env = "FLAC_AUDIT_PARALLELISM")]
    pub parallelism: Option<usize>,

    /// Artist whose lyrics are expected outside Latin-1 (repeatable, replaces the configured list)
    #[arg(long = "international-artist", value_name = "ARTIST")]
    pub international_artists: Vec<String>,

    /// Intentionally missing track numbers for an album (repeatable)
    #[arg(long = "silence", value_name = "ARTIST/ALBUM=N,N")]
    pub silence: Vec<String>,

    #[arg(long, hide = true)]
    pub musicbrainz_base_url: Option<String>,
    #[arg(long, hide = true)]
    pub coverart_base_url: Option<String>,
    #[arg(long, hide = true)]
    pub lrclib_base_url: Option<String>,
    #[arg(long, hide = true)]
    pub wikipedia_base_url: Option<String>,
    #[arg(long, hide = true)]
    pub wikidata_base_url: Option<String>,
}

impl ScanArgs {
    /// Layer command-line flags over the loaded configuration.
    pub fn apply(&self, config: &mut Config) -> Result<(), ConfigError> {
        if self.write {
            config.scan.write = true;
        }
        if self.no_lyrics {
            config.scan.fetch_lyrics = false;
        }
        if let Some(parallelism) = self.parallelism {
            if parallelism == 0 {
                return Err(ConfigError::InvalidValue("parallelism must be at least 1".to_string()));
            }
            config.scan.parallelism = parallelism;
        }
        if !self.international_artists.is_empty() {
            config.lyrics.international_artists = self.international_artists.clone();
        }
        for entry in &self.silence {
            config.validation.add_silence_entry(entry)?;
        }

        let catalogs = &mut config.catalogs;
        for (flag, target) in [
            (&self.musicbrainz_base_url, &mut catalogs.musicbrainz_base_url),
            (&self.coverart_base_url, &mut catalogs.coverart_base_url),
            (&self.lrclib_base_url, &mut catalogs.lrclib_base_url),
            (&self.wikipedia_base_url, &mut catalogs.wikipedia_base_url),
            (&self.wikidata_base_url, &mut catalogs.wikidata_base_url),
        ] {
            if let Some(url) = flag {
                *target = url.clone();
            }
        }
        Ok(())
    }
}

/// Audit the library under `args.path`.
///
/// Returns whether every album passed.
pub fn cmd_scan(rt: &Runtime, args: &ScanArgs, config_path: Option<&Path>) -> anyhow::Result<bool> {
    let mut config = config::load(config_path)?;
    args.apply(&mut config)?;

    rt.block_on(async {
        let cancel = CancellationToken::new();
        tokio::spawn(cancel_on_shutdown(cancel.clone()));

        let transport = ReqwestTransport::new(&config.catalogs.user_agent)
            .context("Failed to build HTTP client")?;
        let cache = Arc::new(RemoteCache::new(
            Arc::new(transport),
            config.catalogs.rate_limit(),
        )?);
        let enricher = Enricher::new(Catalogs::from_config(&config.catalogs, cache), &config)?;
        let auditor = Arc::new(Auditor::new(enricher, Arc::new(FlacCodec), config.scan.write));

        info!(
            path = %args.path.display(),
            write = config.scan.write,
            parallelism = config.scan.parallelism,
            "Starting scan"
        );
        let report =
            library::run_scan(auditor, args.path.clone(), config.scan.parallelism, cancel.clone())
                .await;

        if cancel.is_cancelled() {
            warn!("Scan interrupted");
        }
        println!("{report}");
        for failure in &report.failures {
            eprintln!("{failure}");
        }
        Ok::<_, anyhow::Error>(report.is_success())
    })
}

/// Cancel the scan on Ctrl-C, or SIGTERM on Unix.
async fn cancel_on_shutdown(cancel: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(e) => {
                warn!(error = %e, "Could not listen for SIGTERM");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    let _ = tokio::signal::ctrl_c().await;

    info!("Shutdown requested, cancelling");
    cancel.cancel();
}
