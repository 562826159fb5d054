use std::path::PathBuf;
use thiserror::Error;

/// Failures while designing primers for a single amplicon. Every variant names the
/// amplicon so that a batch driver can report it and decide whether to continue.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DesignError {
    #[error("Invalid sequence for amplicon '{amplicon}': {reason}")]
    InvalidSequence { amplicon: String, reason: String },

    #[error("Empty primer candidate reached property calculation for amplicon '{amplicon}'")]
    EmptyCandidate { amplicon: String },

    #[error("No primer candidates could be enumerated for amplicon '{amplicon}'")]
    NoCandidates { amplicon: String },

    #[error("Invalid design parameters for amplicon '{amplicon}': {reason}")]
    InvalidParams { amplicon: String, reason: String },
}

impl DesignError {
    pub fn amplicon(&self) -> &str {
        match self {
            DesignError::InvalidSequence { amplicon, .. } => amplicon,
            DesignError::EmptyCandidate { amplicon } => amplicon,
            DesignError::NoCandidates { amplicon } => amplicon,
            DesignError::InvalidParams { amplicon, .. } => amplicon,
        }
    }
}

/// Failures while reading amplicons or parameters, or writing result tables.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("File I/O error for '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error for '{path}': {source}", path = path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("TOML parsing error for '{path}': {source}", path = path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Expected columns {expected:?}, but {found:?} detected")]
    UnexpectedColumns {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Missing column '{0}' in amplicon table")]
    MissingColumn(String),

    #[error("No amplicons found in '{path}'", path = path.display())]
    EmptyInput { path: PathBuf },

    #[error("Invalid parameters: {0}")]
    Params(String),
}
