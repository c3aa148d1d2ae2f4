//! Configuration system using TOML files.
//!
//! Config is read from the OS-standard config directory unless a path is
//! given on the command line:
//! - Windows: %APPDATA%\flac-audit\config.toml
//! - macOS: ~/Library/Application Support/flac-audit/config.toml
//! - Linux: ~/.config/flac-audit/config.toml
//!
//! Every section has defaults, so a partial (or absent) file is fine.
//! Command-line flags are applied on top of whatever was loaded.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How the scan runs
    pub scan: ScanConfig,

    /// Lyrics filtering
    pub lyrics: LyricsConfig,

    /// Album exceptions consulted by validation
    pub validation: ValidationConfig,

    /// Placeholder values stripped during tag normalization
    pub normalization: NormalizationConfig,

    /// Tie-break criteria for ambiguous disc ID lookups
    pub identification: IdentificationConfig,

    /// Remote catalog endpoints
    pub catalogs: CatalogConfig,
}

/// Scan behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Persist staged edits; when false they are only logged
    pub write: bool,

    /// Fetch lyrics for tracks that have none
    pub fetch_lyrics: bool,

    /// Number of albums processed concurrently
    pub parallelism: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            write: false,
            fetch_lyrics: true,
            parallelism: default_parallelism(),
        }
    }
}

/// One less than the available cores, never below one.
pub fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

/// Lyrics settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    /// Artists whose lyrics are expected to contain non-Latin text
    pub international_artists: Vec<String>,
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            international_artists: vec!["BABYMETAL".to_string()],
        }
    }
}

/// An `(artist, album)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumKey {
    pub artist: String,
    pub album: String,
}

/// Exceptions to the validation rules
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// `artist/album` → track numbers intentionally absent from the album
    pub silence_tracks: HashMap<String, Vec<i64>>,

    /// Albums known to have no MusicBrainz entry
    pub musicbrainz_exceptions: Vec<AlbumKey>,
}

impl ValidationConfig {
    /// Intentionally-missing track numbers for an `artist/album` identity.
    pub fn silence_tracks_for(&self, identity: &str) -> &[i64] {
        self.silence_tracks
            .get(identity)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Parse and add a `artist/album=3,7` silence entry.
    pub fn add_silence_entry(&mut self, entry: &str) -> Result<(), ConfigError> {
        let (key, numbers) = entry
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidValue(entry.to_string()))?;

        let numbers = numbers
            .split(',')
            .map(|n| n.parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ConfigError::InvalidValue(entry.to_string()))?;

        self.silence_tracks
            .entry(key.to_string())
            .or_default()
            .extend(numbers);
        Ok(())
    }
}

/// Tag normalization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    /// Tag key → placeholder values removed from that tag
    pub placeholder_values: HashMap<String, Vec<String>>,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            placeholder_values: HashMap::from([("GENRE".to_string(), vec!["Unknown".to_string()])]),
        }
    }
}

/// Disc ID tie-break settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentificationConfig {
    /// The only media format accepted for a single-medium release
    pub media_format: String,

    /// Release countries accepted when several releases share a disc ID
    pub allowed_countries: Vec<String>,
}

impl Default for IdentificationConfig {
    fn default() -> Self {
        Self {
            media_format: "CD".to_string(),
            allowed_countries: vec!["XE".to_string(), "XW".to_string(), "GB".to_string()],
        }
    }
}

/// Remote catalog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub musicbrainz_base_url: String,
    pub coverart_base_url: String,
    pub lrclib_base_url: String,
    pub wikipedia_base_url: String,
    pub wikidata_base_url: String,

    /// User-Agent sent with every request (MusicBrainz requires one)
    pub user_agent: String,

    /// Minimum spacing between requests to the same host
    pub rate_limit_ms: u64,
}

impl CatalogConfig {
    pub fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            musicbrainz_base_url: "https://musicbrainz.org/ws/2".to_string(),
            coverart_base_url: "https://coverartarchive.org".to_string(),
            lrclib_base_url: "https://lrclib.net/api".to_string(),
            wikipedia_base_url: "https://en.wikipedia.org/w/api.php".to_string(),
            wikidata_base_url: "https://www.wikidata.org/w/rest.php/wikibase/v1/entities/items"
                .to_string(),
            user_agent: concat!(
                "flac-audit/",
                env!("CARGO_PKG_VERSION"),
                " (https://github.com/flac-audit)"
            )
            .to_string(),
            rate_limit_ms: 1000,
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("flac-audit"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration.
///
/// An explicit path must exist and parse. Without one, the default location
/// is tried and any problem there falls back to defaults with a warning.
pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        return load_from(path);
    }

    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Ok(Config::default());
    };

    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Ok(Config::default());
    }

    match load_from(&path) {
        Ok(config) => Ok(config),
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("Using default configuration");
            Ok(Config::default())
        }
    }
}

/// Load configuration from a specific file.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    let config = toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
    tracing::info!("Loaded config from {:?}", path);
    Ok(config)
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Rate limit interval must be greater than zero")]
    ZeroRateLimit,
}

// ============================================================================
// Tests
// ============================================================================
