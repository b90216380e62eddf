//! Definitions of types used in the libtrellis scanner.

use crate::common::Span;
use crate::utils::quote_literal;
use core::fmt;

/// The type of a [Token][Token].
#[derive(PartialEq, Clone, Debug)]
pub enum TokenType {
    /// A rule, label, or variable name.
    Ident(String),

    /// A quoted literal, with its escapes resolved.
    Str(String),

    /// A decimal integer, as written.
    Dec(String),

    /// A hexadecimal integer, as written without its `0x` prefix.
    Hex(String),

    /// = symbol
    Equal,

    /// | symbol
    Pipe,

    /// , symbol
    Comma,

    /// ? symbol
    Question,

    /// * symbol
    Star,

    /// + symbol
    Plus,

    /// ~ symbol
    Tilde,

    /// : symbol
    Colon,

    /// ( symbol
    OpenParen,

    /// ) symbol
    CloseParen,

    /// { symbol
    OpenBrace,

    /// } symbol
    CloseBrace,

    /// [ symbol
    OpenBracket,

    /// ] symbol
    CloseBracket,

    /// . symbol
    Dot,

    /// .. symbol
    DotDot,

    /// -> symbol
    Arrow,

    /// An invalid token.
    Invalid(String),

    /// End of file.
    EOF,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenType::*;
        match self {
            Ident(s) | Dec(s) => write!(f, "{}", s),
            Str(s) => write!(f, "{}", quote_literal(s)),
            Hex(s) => write!(f, "0x{}", s),
            Equal => write!(f, "="),
            Pipe => write!(f, "|"),
            Comma => write!(f, ","),
            Question => write!(f, "?"),
            Star => write!(f, "*"),
            Plus => write!(f, "+"),
            Tilde => write!(f, "~"),
            Colon => write!(f, ":"),
            OpenParen => write!(f, "("),
            CloseParen => write!(f, ")"),
            OpenBrace => write!(f, "{{"),
            CloseBrace => write!(f, "}}"),
            OpenBracket => write!(f, "["),
            CloseBracket => write!(f, "]"),
            Dot => write!(f, "."),
            DotDot => write!(f, ".."),
            Arrow => write!(f, "->"),
            Invalid(s) => write!(f, "Invalid({})", s),
            EOF => write!(f, "end of file"),
        }
    }
}

/// Describes a token in a trellis grammar.
#[derive(PartialEq, Clone, Debug)]
pub struct Token {
    /// The type of the token.
    pub ty: TokenType,
    /// The source span of the token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    pub fn new<Sp: Into<Span>>(ty: TokenType, span: Sp) -> Self {
        Self {
            ty,
            span: span.into(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.ty.fmt(f)
    }
}
