//! Lexer for Pith source text
//!
//! Produces a flat token sequence ending in a single `Eof` token. Commas are
//! whitespace and `#` starts a comment that runs to the end of the line.
//!
//! Word characters are alphanumerics plus `_ - ? ! = < > + * /`, which is why
//! `!=`, `<=`, `empty?` and `count!` are single words. Keywords are only
//! recognized as exact whole words.
//!
//! An unexpected character is recorded in the error slot and skipped; lexing
//! carries on so the caller sees the complete token stream, but a loader must
//! treat the recorded error as a failed load.

use crate::error::ErrorSlot;
use crate::token::{Token, TokenKind};

/// Tokenize `source`, reporting bad characters into `errors`
pub fn tokenize(source: &str, errors: &mut ErrorSlot) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token(errors);
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            break;
        }
    }
    tokens
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '?' | '!' | '=' | '<' | '>' | '+' | '*' | '/')
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Lexer {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' | '\n' | ',' => {
                    self.advance();
                }
                '#' => {
                    while matches!(self.peek(), Some(c) if c != '\n') {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn next_token(&mut self, errors: &mut ErrorSlot) -> Token {
        loop {
            self.skip_whitespace();
            let (line, column) = (self.line, self.column);

            let Some(c) = self.peek() else {
                return Token::new(TokenKind::Eof, None, line, column);
            };

            let punct = match c {
                ':' => Some(TokenKind::Colon),
                '.' => Some(TokenKind::Dot),
                '[' => Some(TokenKind::LBracket),
                ']' => Some(TokenKind::RBracket),
                '{' => Some(TokenKind::LBrace),
                '}' => Some(TokenKind::RBrace),
                _ => None,
            };
            if let Some(kind) = punct {
                self.advance();
                return Token::new(kind, None, line, column);
            }

            if c == '"' {
                self.advance();
                let text = self.string_body();
                return Token::new(TokenKind::String, Some(text), line, column);
            }

            let starts_number = c.is_ascii_digit()
                || (c == '-' && self.peek_next().is_some_and(|n| n.is_ascii_digit()));
            if starts_number {
                let text = self.number();
                return Token::new(TokenKind::Number, Some(text), line, column);
            }

            if is_word_char(c) {
                let start = self.pos;
                while self.peek().is_some_and(is_word_char) {
                    self.advance();
                }
                let text: String = self.chars[start..self.pos].iter().collect();
                return match TokenKind::keyword(&text) {
                    Some(kind) => Token::new(kind, None, line, column),
                    None => Token::new(TokenKind::Word, Some(text), line, column),
                };
            }

            errors.set(format!("Unexpected character '{}' at line {}", c, line));
            self.advance();
        }
    }

    /// Read up to the closing quote (or end of input), processing escapes
    fn string_body(&mut self) -> String {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '"' {
                self.advance();
                break;
            }
            self.advance();
            if c == '\\' {
                if let Some(esc) = self.advance() {
                    text.push(match esc {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        other => other,
                    });
                    continue;
                }
            }
            text.push(c);
        }
        text
    }

    fn number(&mut self) -> String {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.advance();
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        self.chars[start..self.pos].iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut errors = ErrorSlot::new();
        tokenize(source, &mut errors).iter().map(|t| t.kind).collect()
    }

    fn texts(source: &str) -> Vec<String> {
        let mut errors = ErrorSlot::new();
        tokenize(source, &mut errors)
            .iter()
            .filter(|t| t.kind != TokenKind::Eof)
            .map(|t| t.to_string())
            .collect()
    }

    #[test]
    fn test_simple_words_and_numbers() {
        assert_eq!(
            kinds("1 2 add"),
            vec![TokenKind::Number, TokenKind::Number, TokenKind::Word, TokenKind::Eof]
        );
        assert_eq!(texts("1 2 add"), vec!["1", "2", "add"]);
    }

    #[test]
    fn test_operator_words_lex_as_single_words() {
        assert_eq!(texts("!= <= >= empty? count! a/b"), vec!["!=", "<=", ">=", "empty?", "count!", "a/b"]);
        assert!(kinds("!= <=").iter().take(2).all(|k| *k == TokenKind::Word));
    }

    #[test]
    fn test_negative_numbers_and_minus_word() {
        assert_eq!(kinds("-5 - -x"), vec![
            TokenKind::Number,
            TokenKind::Word,
            TokenKind::Word,
            TokenKind::Eof
        ]);
        assert_eq!(texts("-3.25 4."), vec!["-3.25", "4."]);
    }

    #[test]
    fn test_single_decimal_point() {
        // The second dot is punctuation
        assert_eq!(
            kinds("1.2.3"),
            vec![TokenKind::Number, TokenKind::Dot, TokenKind::Number, TokenKind::Eof]
        );
    }

    #[test]
    fn test_keywords_exact() {
        assert_eq!(
            kinds("if else end do true false nil ends"),
            vec![
                TokenKind::If,
                TokenKind::Else,
                TokenKind::End,
                TokenKind::Do,
                TokenKind::True,
                TokenKind::False,
                TokenKind::Nil,
                TokenKind::Word,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_comments_and_commas_are_whitespace() {
        assert_eq!(texts("[1, 2, 3] # trailing comment\n4"), vec!["<LBRACKET>", "1", "2", "3", "<RBRACKET>", "4"]);
    }

    #[test]
    fn test_string_escapes() {
        let mut errors = ErrorSlot::new();
        let tokens = tokenize(r#""a\nb\t\"q\" \\ \z""#, &mut errors);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text(), "a\nb\t\"q\" \\ z");
    }

    #[test]
    fn test_unterminated_string_runs_to_eof() {
        let mut errors = ErrorSlot::new();
        let tokens = tokenize("\"abc", &mut errors);
        assert_eq!(tokens[0].text(), "abc");
        assert_eq!(tokens[1].kind, TokenKind::Eof);
        assert!(!errors.has_error());
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("a: b.c [ ] { }"),
            vec![
                TokenKind::Word,
                TokenKind::Colon,
                TokenKind::Word,
                TokenKind::Dot,
                TokenKind::Word,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_positions_are_one_based() {
        let mut errors = ErrorSlot::new();
        let tokens = tokenize("app:\n  title: \"x\"", &mut errors);
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (1, 4));
        assert_eq!((tokens[2].line, tokens[2].column), (2, 3));
        assert_eq!((tokens[4].line, tokens[4].column), (2, 10));
    }

    #[test]
    fn test_unexpected_character_recorded_and_skipped() {
        let mut errors = ErrorSlot::new();
        let tokens = tokenize("1 @ 2", &mut errors);
        assert_eq!(errors.get(), Some("Unexpected character '@' at line 1"));
        let texts: Vec<_> = tokens.iter().map(|t| t.to_string()).collect();
        assert_eq!(texts, vec!["1", "2", "<EOF>"]);
    }
}
