//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Parse error: {0}")]
    Parse(#[from] jsoncreator_parser::ParseError),

    #[error("Generation error: {0}")]
    Generate(#[from] jsoncreator_generator::GenerateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Class not found: {0}")]
    ClassNotFound(String),

    #[error("Cannot generate a JSON creator for {0}")]
    InvalidTarget(String),

    #[error("Document is not file-backed")]
    NotFileBacked,
}
