use logos::{Filter, Logos};
use std::fmt;

use crate::error::{ParseError, ParseResult};

fn doc_comment<'src>(lex: &mut logos::Lexer<'src, Token<'src>>) -> Filter<&'src str> {
    let slice = lex.slice();
    if slice.starts_with("/**") && slice != "/**/" {
        Filter::Emit(slice)
    } else {
        Filter::Skip
    }
}

/// Token types for the Java-family sources we edit
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
#[logos(skip(r"//[^\n]*", allow_greedy = true))]
pub enum Token<'src> {
    // Only `/** ... */` survives, other block comments are skipped
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", doc_comment)]
    DocComment(&'src str),

    // Keywords
    #[token("package")]
    Package,

    #[token("import")]
    Import,

    #[token("class")]
    Class,

    #[token("interface")]
    Interface,

    #[token("enum")]
    Enum,

    #[token("record")]
    Record,

    #[token("extends")]
    Extends,

    #[token("implements")]
    Implements,

    #[token("throws")]
    Throws,

    #[token("this")]
    This,

    #[token("super")]
    Super,

    // Identifiers (modifiers and primitive types included)
    #[regex(r"[\p{L}_$][\p{L}\p{N}_$]*", |lex| lex.slice())]
    Ident(&'src str),

    // String literals
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| lex.slice())]
    #[regex(r#""""([^"]|"[^"]|""[^"])*""""#, |lex| lex.slice())]
    String(&'src str),

    #[regex(r"'([^'\\\n]|\\.)*'", |lex| lex.slice())]
    Char(&'src str),

    // Numbers
    #[regex(r"[0-9][0-9_]*(\.[0-9_]+)?([eE][+-]?[0-9]+)?[lLfFdD]?", |lex| lex.slice())]
    #[regex(r"0[xX][0-9a-fA-F_]+[lL]?", |lex| lex.slice())]
    Number(&'src str),

    // Symbols
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("<")]
    LAngle,

    #[token(">")]
    RAngle,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token("...")]
    Ellipsis,

    #[token(".")]
    Dot,

    #[token("=")]
    Equals,

    #[token("@")]
    At,

    #[token("?")]
    Question,

    #[token(":")]
    Colon,

    #[token("&")]
    Amp,

    // Remaining operator characters, only ever consumed as raw text
    #[regex(r"[-+*/%!~|^]", |lex| lex.slice())]
    Operator(&'src str),
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::DocComment(_) => write!(f, "doc comment"),
            Token::Package => write!(f, "package"),
            Token::Import => write!(f, "import"),
            Token::Class => write!(f, "class"),
            Token::Interface => write!(f, "interface"),
            Token::Enum => write!(f, "enum"),
            Token::Record => write!(f, "record"),
            Token::Extends => write!(f, "extends"),
            Token::Implements => write!(f, "implements"),
            Token::Throws => write!(f, "throws"),
            Token::This => write!(f, "this"),
            Token::Super => write!(f, "super"),
            Token::Ident(s) => write!(f, "{}", s),
            Token::String(s) => write!(f, "{}", s),
            Token::Char(s) => write!(f, "{}", s),
            Token::Number(s) => write!(f, "{}", s),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LAngle => write!(f, "<"),
            Token::RAngle => write!(f, ">"),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),
            Token::Ellipsis => write!(f, "..."),
            Token::Dot => write!(f, "."),
            Token::Equals => write!(f, "="),
            Token::At => write!(f, "@"),
            Token::Question => write!(f, "?"),
            Token::Colon => write!(f, ":"),
            Token::Amp => write!(f, "&"),
            Token::Operator(s) => write!(f, "{}", s),
        }
    }
}

/// Tokenize source code into a vector of tokens with their byte ranges
pub fn tokenize(source: &str) -> ParseResult<Vec<(Token<'_>, std::ops::Range<usize>)>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(token) = lexer.next() {
        match token {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => return Err(ParseError::lexer_error(lexer.span().start)),
        }
    }

    Ok(tokens)
}
