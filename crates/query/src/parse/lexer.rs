//! Query tokenizer.
//!
//! The lexer walks the query text once, producing tokens with byte offsets.
//! Keywords are recognized case-insensitively; every operator has a Unicode
//! and an ASCII spelling. It is an iterator that yields `Eof` once and then
//! stops, and it stops right after the first error.

use super::token::{Keyword, Operator, Punct, Token, TokenKind};
use crate::error::{LexError, LexErrorKind};
use alloc::string::String;
use alloc::vec::Vec;

/// Returns true if `c` can start an identifier.
pub fn is_ident_start(c: char) -> bool {
    (c.is_alphabetic() || c == '_') && symbol_operator(c).is_none()
}

/// Returns true if `c` can continue an identifier.
pub fn is_ident_continue(c: char) -> bool {
    (c.is_alphanumeric() || c == '_') && symbol_operator(c).is_none()
}

/// Maps single-character Unicode operators.
fn symbol_operator(c: char) -> Option<Operator> {
    let op = match c {
        'σ' => Operator::Select,
        'π' => Operator::Project,
        'ρ' => Operator::Rename,
        '∪' => Operator::Union,
        '∩' => Operator::Intersect,
        '−' => Operator::Minus,
        '×' => Operator::Product,
        '⨝' | '⋈' => Operator::Join,
        '≠' => Operator::Ne,
        '≤' => Operator::Le,
        '≥' => Operator::Ge,
        '∧' => Operator::And,
        '∨' => Operator::Or,
        '¬' => Operator::Not,
        '→' => Operator::Arrow,
        _ => return None,
    };
    Some(op)
}

/// Tokenizer over a query string.
#[derive(Clone, Debug)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            done: false,
        }
    }

    /// Rewinds to the start of the input.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.done = false;
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(kind, start, self.pos - start)
    }

    /// Produces the next token.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        let start = self.pos;
        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(Token::new(TokenKind::Eof, start, 0)),
        };

        if let Some(op) = symbol_operator(c) {
            self.advance();
            return Ok(self.token(TokenKind::Op(op), start));
        }
        if is_ident_start(c) {
            return Ok(self.lex_word(start));
        }
        if c.is_ascii_digit() {
            return self.lex_number(start);
        }
        if c == '\'' || c == '"' {
            return self.lex_string(start, c);
        }

        self.advance();
        let kind = match c {
            '(' => TokenKind::Punct(Punct::LParen),
            ')' => TokenKind::Punct(Punct::RParen),
            '[' => TokenKind::Punct(Punct::LBracket),
            ']' => TokenKind::Punct(Punct::RBracket),
            ',' => TokenKind::Punct(Punct::Comma),
            '.' => TokenKind::Punct(Punct::Dot),
            '=' => TokenKind::Op(Operator::Eq),
            '!' if self.peek() == Some('=') => {
                self.advance();
                TokenKind::Op(Operator::Ne)
            }
            '<' => match self.peek() {
                Some('=') => {
                    self.advance();
                    TokenKind::Op(Operator::Le)
                }
                Some('>') => {
                    self.advance();
                    TokenKind::Op(Operator::Ne)
                }
                _ => TokenKind::Op(Operator::Lt),
            },
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Op(Operator::Ge)
                } else {
                    TokenKind::Op(Operator::Gt)
                }
            }
            '-' => {
                if self.peek() == Some('>') {
                    self.advance();
                    TokenKind::Op(Operator::Arrow)
                } else {
                    TokenKind::Op(Operator::Minus)
                }
            }
            other => {
                self.done = true;
                return Err(LexError::new(start, LexErrorKind::UnexpectedChar(other)));
            }
        };
        Ok(self.token(kind, start))
    }

    fn lex_word(&mut self, start: usize) -> Token {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }
        let word = &self.input[start..self.pos];
        let kind = match Keyword::lookup(word) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Ident(String::from(word)),
        };
        self.token(kind, start)
    }

    fn lex_number(&mut self, start: usize) -> Result<Token, LexError> {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        let is_float =
            self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit());
        if is_float {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text = &self.input[start..self.pos];
        let kind = if is_float {
            match text.parse::<f64>() {
                Ok(v) if v.is_finite() => TokenKind::Float(v),
                _ => return Err(self.out_of_range(start)),
            }
        } else {
            match text.parse::<i64>() {
                Ok(v) => TokenKind::Integer(v),
                Err(_) => return Err(self.out_of_range(start)),
            }
        };
        Ok(self.token(kind, start))
    }

    fn out_of_range(&mut self, start: usize) -> LexError {
        self.done = true;
        LexError::new(start, LexErrorKind::NumberOutOfRange)
    }

    fn unterminated(&mut self, start: usize) -> LexError {
        self.done = true;
        LexError::new(start, LexErrorKind::UnterminatedString)
    }

    fn lex_string(&mut self, start: usize, quote: char) -> Result<Token, LexError> {
        self.advance();
        let mut value = String::new();
        loop {
            match self.advance() {
                Some(c) if c == quote => break,
                Some('\\') => match self.advance() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(c) => value.push(c),
                    None => return Err(self.unterminated(start)),
                },
                Some(c) => value.push(c),
                None => return Err(self.unterminated(start)),
            }
        }
        Ok(self.token(TokenKind::Str(value), start))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.next_token();
        if matches!(&result, Ok(Token { kind: TokenKind::Eof, .. }) | Err(_)) {
            self.done = true;
        }
        Some(result)
    }
}

impl core::iter::FusedIterator for Lexer<'_> {}

/// Tokenizes a whole query. The last token is always `Eof`.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).collect()
}
