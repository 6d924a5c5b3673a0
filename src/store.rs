//! Loading documents for the file-based scopes.

use std::collections::HashMap;
use std::path::Path;

use accord_core::Document;

use crate::error::{Error, Result};

/// Opens documents by path.
pub trait DocumentStore: Send + Sync {
    /// Load the document at `path`.
    fn open(&self, path: &str) -> Result<Document>;
}

/// Reads documents serialized as JSON.
///
/// The document's `path` is replaced with the path it was opened from, so
/// reports and file matching always see the real location.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStore;

impl DocumentStore for JsonStore {
    fn open(&self, path: &str) -> Result<Document> {
        let content = std::fs::read_to_string(Path::new(path))?;
        let mut doc: Document = serde_json::from_str(&content)?;
        doc.path = path.to_string();
        log::debug!("Loaded {} with {} tiers", path, doc.tiers.len());
        Ok(doc)
    }
}

/// Serves documents held in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: HashMap<String, Document>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document under its own path.
    pub fn insert(&mut self, document: Document) {
        self.documents.insert(document.path.clone(), document);
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, document: Document) -> Self {
        self.insert(document);
        self
    }
}

impl FromIterator<Document> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        let mut store = Self::new();
        for doc in iter {
            store.insert(doc);
        }
        store
    }
}

impl DocumentStore for MemoryStore {
    fn open(&self, path: &str) -> Result<Document> {
        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| Error::data_absent(format!("no document at \"{path}\"")))
    }
}
