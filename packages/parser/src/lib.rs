pub mod tokenizer;
pub mod parser;
pub mod ast;
pub mod error;
pub mod serializer;

pub use tokenizer::{Token, tokenize};
pub use parser::{Dialect, Parser, parse, parse_member, parse_dialect};
pub use serializer::{Serializer, reindent, serialize_method};
pub use error::{ParseError, ParseResult};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenizer_basic() {
        let source = "class Point";
        let tokens = tokenize(source).unwrap();
        assert_eq!(tokens.len(), 2);
    }
}
