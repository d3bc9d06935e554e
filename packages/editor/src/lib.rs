//! # jsoncreator editor
//!
//! Applies generated constructors to source documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: source text → CompilationUnit       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ generator: ClassDescriptor → prototypes     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document lifecycle + mutations      │
//! │  - Load/save documents                      │
//! │  - Splice text edits, re-parse              │
//! │  - All-or-nothing action application        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jsoncreator_editor::{Document, JsonCreatorAction};
//! use jsoncreator_generator::ClassIndex;
//!
//! let mut doc = Document::load("src/Point.java".into())?;
//! let action = JsonCreatorAction::default();
//! let index = ClassIndex::new();
//!
//! let members = action.candidates(&doc, &index, "Point")?;
//! action.perform(&mut doc, &index, "Point", &members)?;
//! doc.save()?;
//! ```

mod action;
mod document;
mod errors;
mod mutations;

pub use action::{ActionOutcome, JsonCreatorAction};
pub use document::{dialect_for_path, Document, DocumentStorage, MutationResult};
pub use errors::EditorError;
pub use mutations::{Mutation, MutationError, TextEdit};
