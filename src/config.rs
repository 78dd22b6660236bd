//! Configuration types.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::{ConfigError, Result};

/// Which mail account the export run is for. Only used to name the cache and
/// output files so runs against different accounts never share state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gmail,
    Icloud,
    Outlook,
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gmail" => Ok(Self::Gmail),
            "icloud" => Ok(Self::Icloud),
            "outlook" => Ok(Self::Outlook),
            other => Err(ConfigError::InvalidValue {
                key: "MAILSIFT_PROVIDER".to_string(),
                message: format!("unknown provider {other:?} (expected gmail, icloud or outlook)"),
            }),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gmail => write!(f, "gmail"),
            Self::Icloud => write!(f, "icloud"),
            Self::Outlook => write!(f, "outlook"),
        }
    }
}

/// Exporter configuration.
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    /// Provider identity; keys the cache and output file names.
    pub provider: Provider,
    /// Directory of `.eml` files to process.
    pub maildir: PathBuf,
    /// Directory where the cache and output files are written.
    pub output_dir: PathBuf,
    /// Maximum number of messages processed per run.
    pub batch_size: usize,
    /// Emit a progress line every this many items.
    pub progress_interval: usize,
}

impl ExporterConfig {
    /// Build the configuration from environment variables.
    ///
    /// `MAILSIFT_MAILDIR` is required; everything else has a default.
    pub fn from_env() -> Result<Self> {
        let provider = std::env::var("MAILSIFT_PROVIDER")
            .unwrap_or_else(|_| "gmail".to_string())
            .parse()?;

        let maildir = std::env::var("MAILSIFT_MAILDIR")
            .map(PathBuf::from)
            .map_err(|_| ConfigError::MissingEnvVar("MAILSIFT_MAILDIR".to_string()))?;

        let output_dir = std::env::var("MAILSIFT_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        let batch_size = parse_env("MAILSIFT_BATCH_SIZE", 500)?;
        let progress_interval = parse_env("MAILSIFT_PROGRESS_INTERVAL", 100)?;

        Ok(Self {
            provider,
            maildir,
            output_dir,
            batch_size,
            progress_interval,
        })
    }

    /// Path of the persistent dedup cache for this provider.
    pub fn cache_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.cache.json", self.provider))
    }

    /// Path of the timestamped output file for a run starting at `now`.
    pub fn output_path(&self, now: DateTime<Utc>) -> PathBuf {
        self.output_dir.join(format!(
            "{}-{}.txt",
            self.provider,
            now.format("%Y%m%d-%H%M%S")
        ))
    }
}

fn parse_env(key: &str, default: usize) -> std::result::Result<usize, ConfigError> {
    match std::env::var(key) {
        Err(_) => Ok(default),
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a positive integer, got {raw:?}"),
        }),
    }
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Gmail,
            maildir: Path::new("./mail").to_path_buf(),
            output_dir: Path::new(".").to_path_buf(),
            batch_size: 500,
            progress_interval: 100,
        }
    }
}
