//! Error type shared by the archive's collaborators.
//!
//! Generation itself is pure computation; everything that can fail lives
//! around it (config files, the catalog, the response store, CSV export).

use std::io;
use std::path::PathBuf;

/// Errors raised while configuring, generating, storing or exporting responses.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// Reading or writing a file failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A JSON document could not be parsed or produced.
    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration values are inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The fragrance catalog breaks one of its invariants.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// A kiosk session cannot be turned into records.
    #[error("invalid kiosk session: {0}")]
    InvalidSession(String),

    /// The visitor-volume model has no growth weight for this year.
    #[error("no visitor growth weight is modeled for year {0}")]
    UnmodeledYear(i32),

    /// CSV export was asked for zero columns.
    #[error("at least one CSV column must be selected")]
    NoColumnsSelected,

    /// A column key or age group label was not recognised.
    #[error("unknown {kind} '{value}'")]
    UnknownLabel { kind: &'static str, value: String },
}

impl ArchiveError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
