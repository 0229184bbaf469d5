//! Tokens and the shared token arena
//!
//! Every loaded source unit is tokenized once into a `Tokens` arena. Slots
//! and blocks never own token copies; they hold a `Body`, which is an arena
//! handle plus a `[start, end)` index range.

use std::fmt;
use std::ops::Range;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    Word,
    Number,
    String,
    Colon,
    Dot,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    End,
    If,
    Else,
    Do,
    True,
    False,
    Nil,
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Eof => "EOF",
            TokenKind::Word => "WORD",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Colon => "COLON",
            TokenKind::Dot => "DOT",
            TokenKind::LBracket => "LBRACKET",
            TokenKind::RBracket => "RBRACKET",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::End => "END",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::Do => "DO",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Nil => "NIL",
        }
    }

    /// Keyword kind for an exact whole-word match
    pub fn keyword(word: &str) -> Option<TokenKind> {
        match word {
            "end" => Some(TokenKind::End),
            "if" => Some(TokenKind::If),
            "else" => Some(TokenKind::Else),
            "do" => Some(TokenKind::Do),
            "true" => Some(TokenKind::True),
            "false" => Some(TokenKind::False),
            "nil" => Some(TokenKind::Nil),
            _ => None,
        }
    }

    /// Kinds that stand for a single literal value
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::Number | TokenKind::String | TokenKind::True | TokenKind::False | TokenKind::Nil
        )
    }
}

/// A token with source position information
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Present for words, numbers and strings (strings hold the unescaped text)
    pub text: Option<String>,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: Option<String>, line: usize, column: usize) -> Self {
        Token {
            kind,
            text,
            line,
            column,
        }
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// True for a `Word` token with exactly this text
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Word && self.text() == word
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            Some(text) => write!(f, "{}", text),
            None => write!(f, "<{}>", self.kind.name()),
        }
    }
}

/// Shared, immutable token arena for one source unit
pub type Tokens = Rc<[Token]>;

/// An executable token range inside an arena
///
/// Cloning a body only bumps the arena's reference count.
#[derive(Debug, Clone)]
pub struct Body {
    tokens: Tokens,
    start: usize,
    end: usize,
}

impl Body {
    /// Create a body over `[start, end)`; the range is clamped to the arena
    pub fn new(tokens: Tokens, start: usize, end: usize) -> Self {
        let end = end.min(tokens.len());
        let start = start.min(end);
        Body { tokens, start, end }
    }

    /// An empty body with no arena behind it
    pub fn empty() -> Self {
        Body {
            tokens: Rc::from(Vec::new()),
            start: 0,
            end: 0,
        }
    }

    pub fn tokens(&self) -> &Tokens {
        &self.tokens
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Token at an absolute arena index
    pub fn token(&self, index: usize) -> &Token {
        &self.tokens[index]
    }

    /// Tokens covered by this body
    pub fn slice(&self) -> &[Token] {
        &self.tokens[self.start..self.end]
    }

    /// A sub-range of the same arena
    pub fn sub(&self, start: usize, end: usize) -> Body {
        Body::new(Rc::clone(&self.tokens), start, end)
    }

    /// Same arena and same range
    pub fn same_range(&self, other: &Body) -> bool {
        Rc::ptr_eq(&self.tokens, &other.tokens) && self.start == other.start && self.end == other.end
    }
}
