//! The document/tier contract the engine reads annotations through.
//!
//! These are plain data: how a document was stored or parsed is not the
//! engine's concern. Callers build them in memory or deserialize them.

use serde::{Deserialize, Serialize};

use crate::segment::Segment;

/// A named closed set of permissible annotation values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Vocabulary name.
    pub name: String,
    /// Entry values, in definition order.
    #[serde(default)]
    pub values: Vec<String>,
}

/// One layer of annotations produced by a single annotator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    /// Tier name.
    pub name: String,
    /// Annotator identifier; may be empty.
    #[serde(default)]
    pub annotator: String,
    /// Controlled vocabulary attached to the tier's type, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<Vocabulary>,
    /// Segments in time order.
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl Tier {
    /// Create a tier without annotator or vocabulary.
    #[must_use]
    pub fn new(name: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self {
            name: name.into(),
            annotator: String::new(),
            vocabulary: None,
            segments,
        }
    }

    /// Set the annotator.
    #[must_use]
    pub fn with_annotator(mut self, annotator: impl Into<String>) -> Self {
        self.annotator = annotator.into();
        self
    }

    /// Attach a controlled vocabulary.
    #[must_use]
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = Some(vocabulary);
        self
    }

    /// Whether the tier has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// An annotated document: a path and its tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Full path (or other stable identifier) of the source.
    #[serde(alias = "full_path")]
    pub path: String,
    /// Tiers in document order.
    #[serde(default)]
    pub tiers: Vec<Tier>,
}

impl Document {
    /// Create a document.
    #[must_use]
    pub fn new(path: impl Into<String>, tiers: Vec<Tier>) -> Self {
        Self {
            path: path.into(),
            tiers,
        }
    }

    /// Find a tier by exact name.
    #[must_use]
    pub fn tier(&self, name: &str) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.name == name)
    }

    /// Tier names in document order.
    #[must_use]
    pub fn tier_names(&self) -> Vec<String> {
        self.tiers.iter().map(|t| t.name.clone()).collect()
    }

    /// Last path component, used in report headers.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.path.as_str())
    }
}
