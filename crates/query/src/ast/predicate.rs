//! Predicate syntax trees.
//!
//! Predicates appear as selection conditions and theta-join conditions. They
//! are untyped here; the binder resolves columns and checks types.

use alloc::boxed::Box;
use alloc::string::String;
use core::cmp::Ordering;
use core::fmt;
use raqp_core::Value;

/// A possibly qualified column reference, such as `age` or `Employees.age`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColumnName {
    pub qualifier: Option<String>,
    pub name: String,
}

impl ColumnName {
    /// Creates an unqualified reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            qualifier: None,
            name: name.into(),
        }
    }

    /// Creates a reference qualified by a relation name.
    pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            qualifier: Some(qualifier.into()),
            name: name.into(),
        }
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(q) => write!(f, "{}.{}", q, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Comparison operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    /// Returns the normalized symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "≠",
            CompareOp::Lt => "<",
            CompareOp::Le => "≤",
            CompareOp::Gt => ">",
            CompareOp::Ge => "≥",
        }
    }

    /// Applies the operator to the outcome of a comparison. Incomparable
    /// values satisfy only `≠`.
    #[inline]
    pub fn holds(&self, ordering: Option<Ordering>) -> bool {
        match ordering {
            Some(ord) => match self {
                CompareOp::Eq => ord == Ordering::Equal,
                CompareOp::Ne => ord != Ordering::Equal,
                CompareOp::Lt => ord == Ordering::Less,
                CompareOp::Le => ord != Ordering::Greater,
                CompareOp::Gt => ord == Ordering::Greater,
                CompareOp::Ge => ord != Ordering::Less,
            },
            None => *self == CompareOp::Ne,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A comparison operand.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Column(ColumnName),
    Literal(Value),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Column(c) => c.fmt(f),
            Operand::Literal(Value::Text(s)) => {
                f.write_str("'")?;
                for c in s.chars() {
                    match c {
                        '\'' => f.write_str("\\'")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                f.write_str("'")
            }
            Operand::Literal(Value::Boolean(b)) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            Operand::Literal(v) => v.fmt(f),
        }
    }
}

/// A boolean condition over the columns of one row.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    Compare {
        left: Operand,
        op: CompareOp,
        right: Operand,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
    /// A bare operand, which must be Boolean.
    Operand(Operand),
}

impl Predicate {
    pub fn compare(left: Operand, op: CompareOp, right: Operand) -> Self {
        Predicate::Compare { left, op, right }
    }

    pub fn and(left: Predicate, right: Predicate) -> Self {
        Predicate::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Predicate, right: Predicate) -> Self {
        Predicate::Or(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Predicate) -> Self {
        Predicate::Not(Box::new(inner))
    }

    fn precedence(&self) -> u8 {
        match self {
            Predicate::Or(..) => 1,
            Predicate::And(..) => 2,
            Predicate::Not(_) => 3,
            Predicate::Compare { .. } | Predicate::Operand(_) => 4,
        }
    }

    fn fmt_child(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        if self.precedence() < min {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare { left, op, right } => write!(f, "{} {} {}", left, op, right),
            Predicate::And(l, r) => {
                l.fmt_child(f, 2)?;
                f.write_str(" ∧ ")?;
                r.fmt_child(f, 3)
            }
            Predicate::Or(l, r) => {
                l.fmt_child(f, 1)?;
                f.write_str(" ∨ ")?;
                r.fmt_child(f, 2)
            }
            Predicate::Not(inner) => {
                f.write_str("¬")?;
                inner.fmt_child(f, 3)
            }
            Predicate::Operand(o) => o.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn col(name: &str) -> Operand {
        Operand::Column(ColumnName::new(name))
    }

    fn lit(v: i64) -> Operand {
        Operand::Literal(Value::Integer(v))
    }

    #[test]
    fn test_compare_op_holds() {
        assert!(CompareOp::Le.holds(Some(Ordering::Equal)));
        assert!(CompareOp::Le.holds(Some(Ordering::Less)));
        assert!(!CompareOp::Lt.holds(Some(Ordering::Equal)));
        assert!(CompareOp::Ne.holds(None));
        assert!(!CompareOp::Eq.holds(None));
        assert!(!CompareOp::Ge.holds(None));
    }

    #[test]
    fn test_display_precedence() {
        let a = Predicate::compare(col("a"), CompareOp::Gt, lit(1));
        let b = Predicate::compare(col("b"), CompareOp::Eq, lit(2));
        let c = Predicate::compare(col("c"), CompareOp::Ne, lit(3));

        let p = Predicate::and(Predicate::or(a.clone(), b.clone()), c.clone());
        assert_eq!(p.to_string(), "(a > 1 ∨ b = 2) ∧ c ≠ 3");

        let p = Predicate::or(a.clone(), Predicate::and(b.clone(), c.clone()));
        assert_eq!(p.to_string(), "a > 1 ∨ b = 2 ∧ c ≠ 3");

        let p = Predicate::not(Predicate::and(a.clone(), b));
        assert_eq!(p.to_string(), "¬(a > 1 ∧ b = 2)");

        let p = Predicate::not(a);
        assert_eq!(p.to_string(), "¬a > 1");
    }

    #[test]
    fn test_literal_display() {
        let p = Predicate::compare(
            Operand::Column(ColumnName::qualified("R", "name")),
            CompareOp::Eq,
            Operand::Literal(Value::Text("O'Brien".into())),
        );
        assert_eq!(p.to_string(), "R.name = 'O\\'Brien'");
        assert_eq!(Operand::Literal(Value::Boolean(true)).to_string(), "TRUE");
        assert_eq!(Operand::Literal(Value::Float(2.0)).to_string(), "2.0");
    }
}
