//! Error types for accord.

use thiserror::Error;

use crate::diagnostic::Diagnostic;

/// Result type for accord operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Invalid or contradictory selection settings. Always fatal.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    /// Overlap threshold outside `(0.5, 1.0]`.
    #[error("Overlap threshold {0} is out of range: it must be greater than 0.5 and at most 1.0 (or a percentage 51-100)")]
    ThresholdOutOfRange(f64),

    /// Average overlap threshold for groups outside `[0.0, 1.0]`.
    #[error("Average overlap threshold {0} is out of range: it must be between 0.0 and 1.0")]
    AverageThresholdOutOfRange(f64),

    /// The first tier of a manual pair was not given.
    #[error("The first tier for the comparison has not been specified")]
    MissingFirstTier,

    /// The second tier of a manual pair was not given.
    #[error("The second tier for the comparison has not been specified")]
    MissingSecondTier,

    /// A manual pair names the same tier twice within one document.
    #[error("Cannot compare tier \"{0}\" with itself")]
    IdenticalTiers(String),

    /// No tier (or tier seed) was selected.
    #[error("No tiers have been selected for the comparison")]
    NoTiersSelected,

    /// Same-name matching inside the current document.
    #[error("Cannot compare tiers with the same name in the same document")]
    SameNameWithinDocument,

    /// Same-name matching inside one file.
    #[error("Tiers with the same name cannot be in the same file")]
    SameNameInSameFile,

    /// Current-document scope without a document.
    #[error("No current document has been provided")]
    NoCurrentDocument,

    /// A file-based scope without files.
    #[error("No files have been selected")]
    NoFilesSelected,

    /// Across-files scope with fewer than two files.
    #[error("At least two files are needed to compare tiers across files, {0} selected")]
    TooFewFiles(usize),

    /// Across-files scope without PREFIX/SUFFIX file matching.
    #[error("Files can only be combined by a prefix or suffix, no file matching style specified")]
    MissingFileMatching,

    /// Two or more raters are required for a group.
    #[error("A group-wise comparison needs at least two tiers, {0} selected")]
    TooFewGroupTiers(usize),
}

/// Error type for accord operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No combination survived validation; every skip is listed.
    #[error("There are no segments for the agreement calculation, process stopped ({} diagnostics)", .0.len())]
    NothingToCompare(Vec<Diagnostic>),

    /// A named document could not be found or read.
    #[error("Data absent: {0}")]
    DataAbsent(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Core data error.
    #[error(transparent)]
    Core(#[from] accord_core::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON document or result error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML policy parse error.
    #[error("Policy parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML policy serialization error.
    #[error("Policy serialization error: {0}")]
    TomlWrite(#[from] toml::ser::Error),
}

impl Error {
    /// Create a data-absent error.
    #[must_use]
    pub fn data_absent(msg: impl Into<String>) -> Self {
        Self::DataAbsent(msg.into())
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this failure comes from the selection settings.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
