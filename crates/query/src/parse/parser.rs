//! Recursive descent parser for relational algebra.
//!
//! Grammar, loosest binding first; every binary level is left-associative:
//!
//! ```text
//! expr       := inter (('∪' | '−') inter)*
//! inter      := join ('∩' join)*
//! join       := unary (('×' | '⨝' cond?) unary)*
//! unary      := ('σ' params unary) | ('π' params unary) | ('ρ' params unary)
//!             | '(' expr ')' | NAME
//! cond       := '[' pred ']' | pred
//! pred       := and ('∨' and)*
//! and        := not ('∧' not)*
//! not        := '¬' not | cmp
//! cmp        := '(' pred ')' | operand (op operand)?
//! ```
//!
//! `params` may be wrapped in square brackets. An unbracketed join condition
//! is accepted only when it is a real predicate followed by the start of the
//! right operand; otherwise the join is natural.
//!
//! Every later stage walks the tree recursively, so the parser bounds both
//! its own nesting and the height of the tree it builds by
//! [`MAX_EXPR_DEPTH`]. Internally each rule returns its node together with
//! that node's height: leaves and comparisons are 1, every other node is one
//! more than its tallest child or predicate.

use super::lexer::tokenize;
use super::token::{BinaryOp, Keyword, Operator, Punct, Token, TokenKind, UnaryOp};
use crate::ast::{ColumnName, Operand, Predicate, RelExpr, RenamePair};
use crate::error::{ParseError, QueryError};
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use raqp_core::Value;

/// Maximum height of a parsed expression, counting relational and predicate
/// nodes on any root-to-leaf path. Parentheses count toward the same limit.
pub const MAX_EXPR_DEPTH: usize = 64;

/// Tokenizes and parses a query.
pub fn parse(input: &str) -> Result<RelExpr, QueryError> {
    let tokens = tokenize(input)?;
    Ok(Parser::new(tokens).parse_query()?)
}

/// Parser over a token stream ending in `Eof`.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(Token { kind: TokenKind::Eof, .. })) {
            let end = tokens.last().map(|t| t.offset + t.len).unwrap_or(0);
            tokens.push(Token::new(TokenKind::Eof, end, 0));
        }
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Parses a complete query; trailing tokens are an error.
    pub fn parse_query(&mut self) -> Result<RelExpr, ParseError> {
        let (expr, _) = self.parse_expr()?;
        if self.peek().kind != TokenKind::Eof {
            return Err(self.error(vec!["end of input", "∪", "∩", "−", "×", "⨝"]));
        }
        Ok(expr)
    }

    fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    fn peek_at(&self, ahead: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + ahead).min(last)]
    }

    fn advance(&mut self) -> &Token {
        let last = self.tokens.len() - 1;
        let idx = self.pos.min(last);
        if self.pos < last {
            self.pos += 1;
        }
        &self.tokens[idx]
    }

    fn error(&self, expected: Vec<&'static str>) -> ParseError {
        let token = self.peek();
        ParseError::new(token.offset, expected, token.kind.describe())
    }

    fn expect_punct(&mut self, punct: Punct) -> Result<(), ParseError> {
        if self.peek().kind.is_punct(punct) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(vec![punct.as_str()]))
        }
    }

    fn expect_ident(&mut self, what: &'static str) -> Result<String, ParseError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.error(vec![what])),
        }
    }

    fn too_deep(&self) -> ParseError {
        let token = self.peek();
        ParseError::new(
            token.offset,
            vec!["less deeply nested expression"],
            token.kind.describe(),
        )
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_EXPR_DEPTH {
            return Err(self.too_deep());
        }
        self.depth += 1;
        Ok(())
    }

    /// Returns the height of a node whose tallest child has height `child`.
    fn parent_height(&self, child: usize) -> Result<usize, ParseError> {
        if child >= MAX_EXPR_DEPTH {
            return Err(self.too_deep());
        }
        Ok(child + 1)
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_expr(&mut self) -> Result<(RelExpr, usize), ParseError> {
        let (mut left, mut height) = self.parse_intersect()?;
        while let Some(op @ (BinaryOp::Union | BinaryOp::Difference)) = self.peek().kind.binary_op()
        {
            self.advance();
            let (right, right_height) = self.parse_intersect()?;
            height = self.parent_height(height.max(right_height))?;
            left = RelExpr::binary(op, left, right);
        }
        Ok((left, height))
    }

    fn parse_intersect(&mut self) -> Result<(RelExpr, usize), ParseError> {
        let (mut left, mut height) = self.parse_join()?;
        while self.peek().kind.binary_op() == Some(BinaryOp::Intersect) {
            self.advance();
            let (right, right_height) = self.parse_join()?;
            height = self.parent_height(height.max(right_height))?;
            left = RelExpr::intersect(left, right);
        }
        Ok((left, height))
    }

    fn parse_join(&mut self) -> Result<(RelExpr, usize), ParseError> {
        let (mut left, mut height) = self.parse_unary()?;
        loop {
            match self.peek().kind.binary_op() {
                Some(BinaryOp::Product) => {
                    self.advance();
                    let (right, right_height) = self.parse_unary()?;
                    height = self.parent_height(height.max(right_height))?;
                    left = RelExpr::product(left, right);
                }
                Some(BinaryOp::Join) => {
                    self.advance();
                    let condition = self.parse_join_condition()?;
                    let (right, right_height) = self.parse_unary()?;
                    let tallest = height.max(right_height);
                    left = match condition {
                        Some((cond, cond_height)) => {
                            height = self.parent_height(tallest.max(cond_height))?;
                            RelExpr::theta_join(left, right, cond)
                        }
                        None => {
                            height = self.parent_height(tallest)?;
                            RelExpr::natural_join(left, right)
                        }
                    };
                }
                _ => return Ok((left, height)),
            }
        }
    }

    fn parse_join_condition(&mut self) -> Result<Option<(Predicate, usize)>, ParseError> {
        if self.peek().kind.is_punct(Punct::LBracket) {
            self.advance();
            let cond = self.predicate()?;
            self.expect_punct(Punct::RBracket)?;
            return Ok(Some(cond));
        }

        let start = self.pos;
        let depth = self.depth;
        match self.predicate() {
            Ok(cond) if !matches!(cond.0, Predicate::Operand(_)) && self.starts_unary() => {
                Ok(Some(cond))
            }
            _ => {
                self.pos = start;
                self.depth = depth;
                Ok(None)
            }
        }
    }

    /// Returns true if the next token can begin a relational operand.
    fn starts_unary(&self) -> bool {
        let kind = &self.peek().kind;
        matches!(kind, TokenKind::Ident(_))
            || kind.is_punct(Punct::LParen)
            || kind.unary_op().is_some()
    }

    fn parse_unary(&mut self) -> Result<(RelExpr, usize), ParseError> {
        if let Some(op) = self.peek().kind.unary_op() {
            self.advance();
            self.enter()?;
            let expr = match op {
                UnaryOp::Select => {
                    let (predicate, predicate_height) = self.bracketed(Self::predicate)?;
                    let (input, height) = self.parse_unary()?;
                    let height = self.parent_height(height.max(predicate_height))?;
                    (RelExpr::select(predicate, input), height)
                }
                UnaryOp::Project => {
                    let columns = self.bracketed(Self::parse_column_list)?;
                    let (input, height) = self.parse_unary()?;
                    (RelExpr::project(columns, input), self.parent_height(height)?)
                }
                UnaryOp::Rename => {
                    let mapping = self.bracketed(Self::parse_rename_list)?;
                    let (input, height) = self.parse_unary()?;
                    (RelExpr::rename(mapping, input), self.parent_height(height)?)
                }
            };
            self.leave();
            return Ok(expr);
        }

        match &self.peek().kind {
            TokenKind::Punct(Punct::LParen) => {
                self.advance();
                self.enter()?;
                let expr = self.parse_expr()?;
                self.expect_punct(Punct::RParen)?;
                self.leave();
                Ok(expr)
            }
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok((RelExpr::Relation(name), 1))
            }
            _ => Err(self.error(vec!["relation name", "(", "σ", "π", "ρ"])),
        }
    }

    /// Runs `f`, accepting an optional pair of square brackets around it.
    fn bracketed<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.peek().kind.is_punct(Punct::LBracket) {
            self.advance();
            let value = f(self)?;
            self.expect_punct(Punct::RBracket)?;
            Ok(value)
        } else {
            f(self)
        }
    }

    fn parse_column_list(&mut self) -> Result<Vec<ColumnName>, ParseError> {
        let mut columns = vec![self.parse_column_name()?];
        while self.peek().kind.is_punct(Punct::Comma) {
            self.advance();
            columns.push(self.parse_column_name()?);
        }
        Ok(columns)
    }

    fn parse_column_name(&mut self) -> Result<ColumnName, ParseError> {
        let first = self.expect_ident("column name")?;
        if self.peek().kind.is_punct(Punct::Dot) {
            self.advance();
            let name = self.expect_ident("column name")?;
            Ok(ColumnName::qualified(first, name))
        } else {
            Ok(ColumnName::new(first))
        }
    }

    fn parse_rename_list(&mut self) -> Result<Vec<RenamePair>, ParseError> {
        let mut pairs = vec![self.parse_rename_pair()?];
        while self.peek().kind.is_punct(Punct::Comma) {
            self.advance();
            pairs.push(self.parse_rename_pair()?);
        }
        Ok(pairs)
    }

    fn parse_rename_pair(&mut self) -> Result<RenamePair, ParseError> {
        let from = self.expect_ident("column name")?;
        if self.peek().kind != TokenKind::Op(Operator::Arrow) {
            return Err(self.error(vec!["→"]));
        }
        self.advance();
        let to = self.expect_ident("new column name")?;
        Ok(RenamePair { from, to })
    }

    /// Parses a predicate.
    pub fn parse_predicate(&mut self) -> Result<Predicate, ParseError> {
        self.predicate().map(|(predicate, _)| predicate)
    }

    fn predicate(&mut self) -> Result<(Predicate, usize), ParseError> {
        let (mut left, mut height) = self.parse_and()?;
        while self.peek().kind.is_or() {
            self.advance();
            let (right, right_height) = self.parse_and()?;
            height = self.parent_height(height.max(right_height))?;
            left = Predicate::or(left, right);
        }
        Ok((left, height))
    }

    fn parse_and(&mut self) -> Result<(Predicate, usize), ParseError> {
        let (mut left, mut height) = self.parse_not()?;
        while self.peek().kind.is_and() {
            self.advance();
            let (right, right_height) = self.parse_not()?;
            height = self.parent_height(height.max(right_height))?;
            left = Predicate::and(left, right);
        }
        Ok((left, height))
    }

    fn parse_not(&mut self) -> Result<(Predicate, usize), ParseError> {
        if self.peek().kind.is_not() {
            self.advance();
            self.enter()?;
            let (inner, height) = self.parse_not()?;
            self.leave();
            return Ok((Predicate::not(inner), self.parent_height(height)?));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<(Predicate, usize), ParseError> {
        if self.peek().kind.is_punct(Punct::LParen) {
            self.advance();
            self.enter()?;
            let inner = self.predicate()?;
            self.expect_punct(Punct::RParen)?;
            self.leave();
            return Ok(inner);
        }

        let left = self.parse_operand()?;
        match self.peek().kind.compare_op() {
            Some(op) => {
                self.advance();
                let right = self.parse_operand()?;
                Ok((Predicate::compare(left, op, right), 1))
            }
            None => Ok((Predicate::Operand(left), 1)),
        }
    }

    fn parse_operand(&mut self) -> Result<Operand, ParseError> {
        let literal = match &self.peek().kind {
            TokenKind::Ident(_) => return Ok(Operand::Column(self.parse_column_name()?)),
            TokenKind::Integer(v) => Value::Integer(*v),
            TokenKind::Float(v) => Value::Float(*v),
            TokenKind::Str(s) => Value::Text(s.clone()),
            TokenKind::Keyword(Keyword::True) => Value::Boolean(true),
            TokenKind::Keyword(Keyword::False) => Value::Boolean(false),
            TokenKind::Op(Operator::Minus) => {
                let negated = match &self.peek_at(1).kind {
                    TokenKind::Integer(v) => v.checked_neg().map(Value::Integer),
                    TokenKind::Float(v) => Some(Value::Float(-v)),
                    _ => None,
                };
                match negated {
                    Some(value) => {
                        self.advance();
                        value
                    }
                    None => return Err(self.error(vec!["column name", "literal"])),
                }
            }
            _ => return Err(self.error(vec!["column name", "literal"])),
        };
        self.advance();
        Ok(Operand::Literal(literal))
    }
}
