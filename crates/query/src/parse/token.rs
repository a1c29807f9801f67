//! Token definitions.

use crate::ast::CompareOp;
use alloc::format;
use alloc::string::String;
use core::fmt;

/// A token with its byte span in the query text.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub offset: usize,
    /// Length in bytes.
    pub len: usize,
}

impl Token {
    pub fn new(kind: TokenKind, offset: usize, len: usize) -> Self {
        Self { kind, offset, len }
    }
}

/// The kinds of token.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Integer(i64),
    Float(f64),
    Str(String),
    Keyword(Keyword),
    Op(Operator),
    Punct(Punct),
    Eof,
}

/// Reserved words. Matched case-insensitively.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyword {
    Select,
    Project,
    Rename,
    Union,
    Intersect,
    Minus,
    Diff,
    Times,
    Join,
    And,
    Or,
    Not,
    True,
    False,
}

impl Keyword {
    const ALL: [(&'static str, Keyword); 14] = [
        ("select", Keyword::Select),
        ("project", Keyword::Project),
        ("rename", Keyword::Rename),
        ("union", Keyword::Union),
        ("intersect", Keyword::Intersect),
        ("minus", Keyword::Minus),
        ("diff", Keyword::Diff),
        ("times", Keyword::Times),
        ("join", Keyword::Join),
        ("and", Keyword::And),
        ("or", Keyword::Or),
        ("not", Keyword::Not),
        ("true", Keyword::True),
        ("false", Keyword::False),
    ];

    /// Looks up a word, ignoring ASCII case.
    pub fn lookup(word: &str) -> Option<Keyword> {
        Self::ALL
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(word))
            .map(|(_, kw)| *kw)
    }

    /// Returns the canonical uppercase spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Select => "SELECT",
            Keyword::Project => "PROJECT",
            Keyword::Rename => "RENAME",
            Keyword::Union => "UNION",
            Keyword::Intersect => "INTERSECT",
            Keyword::Minus => "MINUS",
            Keyword::Diff => "DIFF",
            Keyword::Times => "TIMES",
            Keyword::Join => "JOIN",
            Keyword::And => "AND",
            Keyword::Or => "OR",
            Keyword::Not => "NOT",
            Keyword::True => "TRUE",
            Keyword::False => "FALSE",
        }
    }
}

/// Symbolic operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Select,
    Project,
    Rename,
    Union,
    Intersect,
    /// `−` or ASCII `-`. Also the sign of a negative literal.
    Minus,
    Product,
    Join,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Not,
    Arrow,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Select => "σ",
            Operator::Project => "π",
            Operator::Rename => "ρ",
            Operator::Union => "∪",
            Operator::Intersect => "∩",
            Operator::Minus => "−",
            Operator::Product => "×",
            Operator::Join => "⨝",
            Operator::Eq => "=",
            Operator::Ne => "≠",
            Operator::Lt => "<",
            Operator::Le => "≤",
            Operator::Gt => ">",
            Operator::Ge => "≥",
            Operator::And => "∧",
            Operator::Or => "∨",
            Operator::Not => "¬",
            Operator::Arrow => "→",
        }
    }
}

/// Punctuation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Punct {
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
}

impl Punct {
    pub fn as_str(&self) -> &'static str {
        match self {
            Punct::LParen => "(",
            Punct::RParen => ")",
            Punct::LBracket => "[",
            Punct::RBracket => "]",
            Punct::Comma => ",",
            Punct::Dot => ".",
        }
    }
}

/// Unary relational operators, however they are spelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Select,
    Project,
    Rename,
}

/// Binary relational operators, however they are spelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Union,
    Intersect,
    Difference,
    Product,
    Join,
}

impl BinaryOp {
    /// Binding strength. Higher binds tighter.
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Union | BinaryOp::Difference => 1,
            BinaryOp::Intersect => 2,
            BinaryOp::Product | BinaryOp::Join => 3,
        }
    }
}

impl TokenKind {
    /// Classifies the token as a unary relational operator.
    pub fn unary_op(&self) -> Option<UnaryOp> {
        match self {
            TokenKind::Op(Operator::Select) | TokenKind::Keyword(Keyword::Select) => {
                Some(UnaryOp::Select)
            }
            TokenKind::Op(Operator::Project) | TokenKind::Keyword(Keyword::Project) => {
                Some(UnaryOp::Project)
            }
            TokenKind::Op(Operator::Rename) | TokenKind::Keyword(Keyword::Rename) => {
                Some(UnaryOp::Rename)
            }
            _ => None,
        }
    }

    /// Classifies the token as a binary relational operator.
    pub fn binary_op(&self) -> Option<BinaryOp> {
        match self {
            TokenKind::Op(Operator::Union) | TokenKind::Keyword(Keyword::Union) => {
                Some(BinaryOp::Union)
            }
            TokenKind::Op(Operator::Intersect) | TokenKind::Keyword(Keyword::Intersect) => {
                Some(BinaryOp::Intersect)
            }
            TokenKind::Op(Operator::Minus)
            | TokenKind::Keyword(Keyword::Minus)
            | TokenKind::Keyword(Keyword::Diff) => Some(BinaryOp::Difference),
            TokenKind::Op(Operator::Product) | TokenKind::Keyword(Keyword::Times) => {
                Some(BinaryOp::Product)
            }
            TokenKind::Op(Operator::Join) | TokenKind::Keyword(Keyword::Join) => {
                Some(BinaryOp::Join)
            }
            _ => None,
        }
    }

    /// Classifies the token as a comparison operator.
    pub fn compare_op(&self) -> Option<CompareOp> {
        match self {
            TokenKind::Op(Operator::Eq) => Some(CompareOp::Eq),
            TokenKind::Op(Operator::Ne) => Some(CompareOp::Ne),
            TokenKind::Op(Operator::Lt) => Some(CompareOp::Lt),
            TokenKind::Op(Operator::Le) => Some(CompareOp::Le),
            TokenKind::Op(Operator::Gt) => Some(CompareOp::Gt),
            TokenKind::Op(Operator::Ge) => Some(CompareOp::Ge),
            _ => None,
        }
    }

    pub fn is_and(&self) -> bool {
        matches!(
            self,
            TokenKind::Op(Operator::And) | TokenKind::Keyword(Keyword::And)
        )
    }

    pub fn is_or(&self) -> bool {
        matches!(
            self,
            TokenKind::Op(Operator::Or) | TokenKind::Keyword(Keyword::Or)
        )
    }

    pub fn is_not(&self) -> bool {
        matches!(
            self,
            TokenKind::Op(Operator::Not) | TokenKind::Keyword(Keyword::Not)
        )
    }

    pub fn is_punct(&self, punct: Punct) -> bool {
        matches!(self, TokenKind::Punct(p) if *p == punct)
    }

    /// Describes the token for error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier {}", name),
            TokenKind::Integer(v) => format!("number {}", v),
            TokenKind::Float(v) => format!("number {}", v),
            TokenKind::Str(s) => format!("string {:?}", s),
            TokenKind::Keyword(kw) => format!("keyword {}", kw.as_str()),
            TokenKind::Op(op) => format!("'{}'", op.as_str()),
            TokenKind::Punct(p) => format!("'{}'", p.as_str()),
            TokenKind::Eof => String::from("end of input"),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
