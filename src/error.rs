//! Error types for generation and dataset loading.

use std::io;

/// Invalid generator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Record count must be at least one.
    ZeroOpportunities,
    /// Start date is not a `YYYY-MM-DD` calendar date.
    InvalidStartDate(String),
    /// Config file could not be parsed.
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroOpportunities => write!(f, "n_opportunities must be greater than zero"),
            Self::InvalidStartDate(s) => write!(f, "invalid start date {:?} (expected YYYY-MM-DD)", s),
            Self::Parse(msg) => write!(f, "invalid generator config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure of a generation run. Runs are all-or-nothing.
#[derive(Debug)]
pub enum GenerateError {
    Config(ConfigError),
    Io(io::Error),
}

impl std::fmt::Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration error: {}", e),
            Self::Io(e) => write!(f, "failed to write dataset: {}", e),
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<ConfigError> for GenerateError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<io::Error> for GenerateError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Failure while reading an exported dataset back in.
#[derive(Debug)]
pub enum DatasetError {
    Io(io::Error),
    /// File is empty.
    MissingHeader,
    /// Header does not match the export schema.
    SchemaMismatch { found: String },
    /// A data row could not be parsed. `line` is 1-based and counts the header.
    Row { line: usize, reason: String },
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read dataset: {}", e),
            Self::MissingHeader => write!(f, "dataset is empty (no header row)"),
            Self::SchemaMismatch { found } => write!(f, "unexpected dataset header: {}", found),
            Self::Row { line, reason } => write!(f, "line {}: {}", line, reason),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DatasetError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
