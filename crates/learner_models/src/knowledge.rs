//! Reference documents loaded from disk.

use derive_getters::Getters;
use learner_error::{ConfigError, LearnerResult};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

const EXTENSIONS: [&str; 3] = ["md", "markdown", "txt"];

/// One reference document.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Document {
    /// Human-readable origin, the file name for documents loaded from disk
    source: String,
    /// Document text
    text: String,
}

impl Document {
    /// Create a document.
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }
}

/// The corpus the retriever searches.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    documents: Vec<Document>,
}

impl KnowledgeBase {
    /// Build a knowledge base from documents already in memory.
    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Load every `.md`, `.markdown` and `.txt` file directly inside `dir`.
    ///
    /// Files are ordered by name so loading is deterministic. Empty files
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the directory cannot be read or holds no
    /// usable documents.
    #[instrument(skip(dir), fields(dir = %dir.as_ref().display()))]
    pub fn load_dir(dir: impl AsRef<Path>) -> LearnerResult<Self> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| {
            ConfigError::new(format!(
                "Failed to read knowledge directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let mut paths: Vec<_> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            })
            .collect();
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let source = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            match std::fs::read_to_string(&path) {
                Ok(text) if text.trim().is_empty() => {
                    debug!(source = %source, "Skipping empty document");
                }
                Ok(text) => documents.push(Document::new(source, text)),
                Err(e) => warn!(source = %source, error = %e, "Skipping unreadable document"),
            }
        }

        if documents.is_empty() {
            return Err(ConfigError::new(format!(
                "No documents found in knowledge directory {}",
                dir.display()
            ))
            .into());
        }

        info!(documents = documents.len(), "Knowledge base loaded");
        Ok(Self { documents })
    }

    /// The documents, in load order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether there are no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
