//! Rate table loading.
//!
//! This module provides the [`RateTableLoader`] type, which tries an ordered
//! list of [`RateSource`]s and returns the first rate table that loads.
//!
//! # Sources
//!
//! ```text
//! 1. --rates PATH / FISCAL_AUDIT_RATES   explicit file, when given
//! 2. inline JSON                          embedded by the host, when given
//! 3. ./data/aliquotas.json                default candidates
//!    <executable dir>/data/aliquotas.json
//!    /data/aliquotas.json
//! ```
//!
//! Files ending in `.yaml` or `.yml` are parsed as YAML, everything else as JSON.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{AuditError, AuditResult};

use super::types::RateTable;

/// File name of the default rate table.
pub const DEFAULT_RATE_FILE: &str = "aliquotas.json";

/// Where a rate table can be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateSource {
    /// JSON text already held in memory.
    Inline(String),
    /// A JSON or YAML file.
    File(PathBuf),
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateSource::Inline(_) => f.write_str("inline"),
            RateSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Loads a rate table from the first source that works.
///
/// # Example
///
/// ```no_run
/// use fiscal_audit::config::RateTableLoader;
///
/// # async fn run() -> fiscal_audit::error::AuditResult<()> {
/// let loader = RateTableLoader::new()
///     .with_file("./data/aliquotas.json")
///     .with_default_candidates();
/// let table = loader.load().await?;
/// println!("Loaded {} rate schedules", table.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RateTableLoader {
    sources: Vec<RateSource>,
}

impl RateTableLoader {
    /// Creates a loader with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a source.
    pub fn with_source(mut self, source: RateSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Appends a file source.
    pub fn with_file<P: Into<PathBuf>>(self, path: P) -> Self {
        self.with_source(RateSource::File(path.into()))
    }

    /// Appends an inline JSON source.
    pub fn with_inline(self, json: impl Into<String>) -> Self {
        self.with_source(RateSource::Inline(json.into()))
    }

    /// Appends the default file candidates, skipping any already present.
    pub fn with_default_candidates(mut self) -> Self {
        for candidate in default_candidates() {
            let source = RateSource::File(candidate);
            if !self.sources.contains(&source) {
                self.sources.push(source);
            }
        }
        self
    }

    /// Returns the configured sources in the order they are tried.
    pub fn sources(&self) -> &[RateSource] {
        &self.sources
    }

    /// Loads the rate table.
    ///
    /// Sources are tried in order; a failing source is logged and the next one
    /// is tried. Only the first successful table is returned.
    ///
    /// # Errors
    ///
    /// Returns `RateSourceUnavailable` listing every attempted source when none
    /// of them produced a table.
    pub async fn load(&self) -> AuditResult<RateTable> {
        let mut attempted = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            let name = source.to_string();
            match Self::load_source(source).await {
                Ok(table) => {
                    for warning in table.warnings() {
                        warn!(source = %name, "Rate table warning: {}", warning);
                    }
                    info!(source = %name, schedules = table.len(), "Rate table loaded");
                    return Ok(table);
                }
                Err(err) => {
                    warn!(source = %name, error = %err, "Rate table source failed");
                    attempted.push(name);
                }
            }
        }

        Err(AuditError::RateSourceUnavailable { attempted })
    }

    /// Loads one source.
    pub async fn load_source(source: &RateSource) -> AuditResult<RateTable> {
        match source {
            RateSource::Inline(json) => RateTable::from_json_str(json),
            RateSource::File(path) => {
                let source_name = path.display().to_string();
                debug!(path = %source_name, "Reading rate table file");

                let content = tokio::fs::read_to_string(path).await.map_err(|e| {
                    if e.kind() == ErrorKind::NotFound {
                        AuditError::RateSourceNotFound {
                            source_name: source_name.clone(),
                        }
                    } else {
                        AuditError::RateSourceReadError {
                            source_name: source_name.clone(),
                            message: e.to_string(),
                        }
                    }
                })?;

                Self::parse(path, &content)
            }
        }
    }

    fn parse(path: &Path, content: &str) -> AuditResult<RateTable> {
        let source_name = path.display().to_string();
        let is_yaml = path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml");

        let parsed = if is_yaml {
            serde_yaml::from_str(content).map_err(|e| e.to_string())
        } else {
            serde_json::from_str(content).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| AuditError::RateSourceParseError {
            source_name,
            message,
        })
    }
}

/// The default rate table locations, in the order they are tried.
pub fn default_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![Path::new("./data").join(DEFAULT_RATE_FILE)];

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(exe_dir.join("data").join(DEFAULT_RATE_FILE));
    }

    candidates.push(Path::new("/data").join(DEFAULT_RATE_FILE));
    candidates
}
