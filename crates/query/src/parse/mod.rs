//! Query text to syntax tree: tokens, lexer and parser.

mod lexer;
mod parser;
mod token;

pub use lexer::{is_ident_continue, is_ident_start, tokenize, Lexer};
pub use parser::{parse, Parser, MAX_EXPR_DEPTH};
pub use token::{BinaryOp, Keyword, Operator, Punct, Token, TokenKind, UnaryOp};
