use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token at {pos}: expected {expected}, found {found}")]
    UnexpectedToken {
        pos: usize,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of file at {pos}")]
    UnexpectedEof { pos: usize },

    #[error("Invalid syntax at {pos}: {message}")]
    InvalidSyntax { pos: usize, message: String },

    #[error("Lexer error at {pos}")]
    LexerError { pos: usize },
}

impl ParseError {
    pub fn unexpected_token(pos: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::UnexpectedToken {
            pos,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unexpected_eof(pos: usize) -> Self {
        Self::UnexpectedEof { pos }
    }

    pub fn invalid_syntax(pos: usize, message: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            pos,
            message: message.into(),
        }
    }

    pub fn lexer_error(pos: usize) -> Self {
        Self::LexerError { pos }
    }

    /// Byte offset the error points at
    pub fn pos(&self) -> usize {
        match self {
            Self::UnexpectedToken { pos, .. }
            | Self::UnexpectedEof { pos }
            | Self::InvalidSyntax { pos, .. }
            | Self::LexerError { pos } => *pos,
        }
    }

    fn label(&self) -> String {
        match self {
            Self::UnexpectedToken { expected, found, .. } => {
                format!("expected {}, found {}", expected, found)
            }
            Self::UnexpectedEof { .. } => "file ends here".to_string(),
            Self::InvalidSyntax { message, .. } => message.clone(),
            Self::LexerError { .. } => "unrecognized character".to_string(),
        }
    }
}

#[cfg(feature = "pretty-errors")]
pub mod pretty {
    use super::ParseError;
    use ariadne::{Color, Label, Report, ReportKind, Source};

    /// Render a parse error against its source with ariadne
    pub fn format_error(error: &ParseError, file_name: &str, source: &str) -> String {
        let pos = error.pos().min(source.len());
        let end = (pos + 1).min(source.len()).max(pos);

        let mut output = Vec::new();
        let written = Report::build(ReportKind::Error, file_name, pos)
            .with_message(error.to_string())
            .with_label(
                Label::new((file_name, pos..end))
                    .with_message(error.label())
                    .with_color(Color::Red),
            )
            .finish()
            .write((file_name, Source::from(source)), &mut output);

        match written {
            Ok(()) => String::from_utf8_lossy(&output).into_owned(),
            Err(_) => error.to_string(),
        }
    }
}
