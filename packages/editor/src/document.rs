//! # Document Handle
//!
//! A Document is a single Java or Groovy source file together with its
//! parsed syntax tree. Documents are either memory-backed (tests, stdout
//! output) or file-backed (written back with [`Document::save`]).
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Parse → Mutate (splice text, re-parse) → Save
//! ```

use crate::mutations::{Mutation, TextEdit};
use crate::EditorError;
use jsoncreator_parser::ast::CompilationUnit;
use jsoncreator_parser::{parse_dialect, Dialect};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Editable source document
#[derive(Debug)]
pub struct Document {
    /// Path to source file
    pub path: PathBuf,

    /// Current version number (increments on each applied edit)
    pub version: u64,

    pub dialect: Dialect,

    source: String,
    unit: CompilationUnit,
    storage: DocumentStorage,
}

/// Storage backend for document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStorage {
    /// In-memory only
    Memory,

    /// File-backed, with unsaved changes flagged
    File { dirty: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    pub version: u64,
    /// False when the mutation turned out to be a no-op
    pub changed: bool,
}

/// Dialect implied by a file extension
pub fn dialect_for_path(path: &Path) -> Dialect {
    match path.extension().and_then(|e| e.to_str()) {
        Some("groovy") | Some("gvy") => Dialect::Groovy,
        _ => Dialect::Java,
    }
}

impl Document {
    /// Create document from source text (memory-backed)
    pub fn from_source(path: PathBuf, source: String) -> Result<Self, EditorError> {
        let dialect = dialect_for_path(&path);
        let unit = parse_dialect(&source, dialect)?;

        Ok(Self {
            path,
            version: 0,
            dialect,
            source,
            unit,
            storage: DocumentStorage::Memory,
        })
    }

    /// Load document from file (file-backed)
    pub fn load(path: PathBuf) -> Result<Self, EditorError> {
        let source = std::fs::read_to_string(&path)?;
        let mut document = Self::from_source(path, source)?;
        document.storage = DocumentStorage::File { dirty: false };
        debug!(path = %document.path.display(), "loaded document");
        Ok(document)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn unit(&self) -> &CompilationUnit {
        &self.unit
    }

    /// Apply a mutation. On failure the document is left unchanged.
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        let edit = mutation.edit(&self.source, &self.unit, self.dialect)?;
        match edit {
            Some(edit) => {
                self.splice(&edit)?;
                Ok(MutationResult {
                    version: self.version,
                    changed: true,
                })
            }
            None => Ok(MutationResult {
                version: self.version,
                changed: false,
            }),
        }
    }

    /// Apply mutations in order as one change; if any fails, none is kept
    pub fn apply_all(&mut self, mutations: Vec<Mutation>) -> Result<MutationResult, EditorError> {
        let source = self.source.clone();
        let unit = self.unit.clone();
        let version = self.version;
        let storage = self.storage;

        let mut changed = false;
        for mutation in mutations {
            match self.apply(mutation) {
                Ok(result) => changed |= result.changed,
                Err(err) => {
                    info!(path = %self.path.display(), error = %err, "rolling back edits");
                    self.source = source;
                    self.unit = unit;
                    self.version = version;
                    self.storage = storage;
                    return Err(err);
                }
            }
        }

        Ok(MutationResult {
            version: self.version,
            changed,
        })
    }

    fn splice(&mut self, edit: &TextEdit) -> Result<(), EditorError> {
        let mut source = self.source.clone();
        edit.apply_to(&mut source);
        // Re-parse before committing so a bad edit leaves the document intact
        let unit = parse_dialect(&source, self.dialect)?;

        debug!(
            offset = edit.range.start,
            removed = edit.range.len(),
            inserted = edit.text.len(),
            "spliced edit"
        );
        self.source = source;
        self.unit = unit;
        self.version += 1;
        if let DocumentStorage::File { dirty } = &mut self.storage {
            *dirty = true;
        }
        Ok(())
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        matches!(self.storage, DocumentStorage::File { dirty: true })
    }

    /// Write the source back to disk
    pub fn save(&mut self) -> Result<(), EditorError> {
        match &mut self.storage {
            DocumentStorage::File { dirty } => {
                std::fs::write(&self.path, &self.source)?;
                *dirty = false;
                info!(path = %self.path.display(), version = self.version, "saved document");
                Ok(())
            }
            DocumentStorage::Memory => Err(EditorError::NotFileBacked),
        }
    }
}
