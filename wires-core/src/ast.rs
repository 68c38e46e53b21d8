//! Schematic syntax tree.
//!
//! Nodes are built once by the parser and only read afterwards. Operands keep
//! the position of the token they came from so later stages can point back
//! into the source.

use core::fmt;

use crate::lexer::{Token, TokenKind};
use crate::span::Position;

/// The parsed circuit: statements in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schematic {
    pub statements: Vec<Statement>,
}

/// `<expression> -> <result>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub expression: Expression,
    pub result: WireRef,
}

impl Statement {
    pub fn position(&self) -> Position {
        self.expression.position()
    }
}

/// A wire named in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRef {
    pub name: String,
    pub position: Position,
}

impl From<Token> for WireRef {
    fn from(token: Token) -> Self {
        WireRef {
            name: token.spelling,
            position: token.position,
        }
    }
}

/// A decimal literal as written. Range checking happens when the graph is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub spelling: String,
    pub position: Position,
}

impl From<Token> for Literal {
    fn from(token: Token) -> Self {
        Literal {
            spelling: token.spelling,
            position: token.position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    Literal(Literal),
    Wire(WireRef),
}

impl Signal {
    pub fn position(&self) -> Position {
        match self {
            Signal::Literal(literal) => literal.position,
            Signal::Wire(wire) => wire.position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftOp {
    Lshift,
    Rshift,
}

impl UnaryOp {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "NOT" => Some(UnaryOp::Not),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            UnaryOp::Not => "NOT",
        }
    }
}

impl ComboOp {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "AND" => Some(ComboOp::And),
            "OR" => Some(ComboOp::Or),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            ComboOp::And => "AND",
            ComboOp::Or => "OR",
        }
    }
}

impl ShiftOp {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "LSHIFT" => Some(ShiftOp::Lshift),
            "RSHIFT" => Some(ShiftOp::Rshift),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            ShiftOp::Lshift => "LSHIFT",
            ShiftOp::Rshift => "RSHIFT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// Direct passthrough of a literal or another wire.
    Signal(Signal),
    Unary {
        op: UnaryOp,
        operand: WireRef,
    },
    Combo {
        left: WireRef,
        op: ComboOp,
        right: WireRef,
    },
    Shift {
        left: WireRef,
        op: ShiftOp,
        amount: Literal,
    },
}

impl Expression {
    /// Position of the first token of the expression.
    ///
    /// Unary expressions start at their keyword, which is not kept; the
    /// operand position is reported instead.
    pub fn position(&self) -> Position {
        match self {
            Expression::Signal(signal) => signal.position(),
            Expression::Unary { operand, .. } => operand.position,
            Expression::Combo { left, .. } | Expression::Shift { left, .. } => left.position,
        }
    }

    fn node_name(&self) -> &'static str {
        match self {
            Expression::Signal(_) => "SignalExpression",
            Expression::Unary { .. } => "UnaryExpression",
            Expression::Combo { .. } => "ComboExpression",
            Expression::Shift { .. } => "ShiftExpression",
        }
    }
}

// ---------------------------------------------------------------------
// Tree rendering
// ---------------------------------------------------------------------

fn line(f: &mut fmt::Formatter<'_>, depth: usize, text: impl fmt::Display) -> fmt::Result {
    writeln!(f, "{:width$}{text}", "", width = depth * 2)
}

fn leaf(kind: TokenKind, spelling: &str, position: Position) -> String {
    format!("({kind:?} '{spelling}' {position})")
}

fn wire_leaf(wire: &WireRef) -> String {
    leaf(TokenKind::Wire, &wire.name, wire.position)
}

fn literal_leaf(literal: &Literal) -> String {
    leaf(TokenKind::Number, &literal.spelling, literal.position)
}

impl Statement {
    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        line(f, depth, "Statement")?;
        let expression = &self.expression;
        line(f, depth + 1, expression.node_name())?;
        let inner = depth + 2;
        match expression {
            Expression::Signal(Signal::Literal(literal)) => line(f, inner, literal_leaf(literal))?,
            Expression::Signal(Signal::Wire(wire)) => line(f, inner, wire_leaf(wire))?,
            Expression::Unary { op, operand } => {
                line(f, inner, op.keyword())?;
                line(f, inner, wire_leaf(operand))?;
            }
            Expression::Combo { left, op, right } => {
                line(f, inner, wire_leaf(left))?;
                line(f, inner, op.keyword())?;
                line(f, inner, wire_leaf(right))?;
            }
            Expression::Shift { left, op, amount } => {
                line(f, inner, wire_leaf(left))?;
                line(f, inner, op.keyword())?;
                line(f, inner, literal_leaf(amount))?;
            }
        }
        line(f, depth + 1, "Result")?;
        line(f, depth + 2, wire_leaf(&self.result))
    }
}

/// Indented tree, one node per line, two spaces per level.
impl fmt::Display for Schematic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        line(f, 0, "Schematic")?;
        for statement in &self.statements {
            statement.write_tree(f, 1)?;
        }
        Ok(())
    }
}
