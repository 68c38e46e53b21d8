use thiserror::Error;

use crate::lexer::{Token, TokenKind, describe_kinds};
use crate::span::Position;

/// Failure while splitting the circuit text into tokens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("ambiguous token `{spelling}` at {position}: could be {}", describe_kinds(.kinds))]
    Ambiguous {
        position: Position,
        spelling: String,
        kinds: Vec<TokenKind>,
    },
    #[error("no token matches `{spelling}{found}` at {position}")]
    NoMatch {
        position: Position,
        found: char,
        spelling: String,
    },
    #[error("incomplete {kind} `{spelling}` at {position}")]
    UnterminatedToken {
        position: Position,
        spelling: String,
        kind: TokenKind,
    },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::Ambiguous { position, .. }
            | LexError::NoMatch { position, .. }
            | LexError::UnterminatedToken { position, .. } => *position,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            LexError::Ambiguous { .. } => "E0101",
            LexError::NoMatch { .. } => "E0102",
            LexError::UnterminatedToken { .. } => "E0103",
        }
    }
}

/// Failure while building the schematic from tokens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(
        "expected {} but found {} `{}` at {}",
        describe_kinds(.expected),
        .found.kind,
        .found.spelling,
        .found.position
    )]
    UnexpectedToken {
        expected: Vec<TokenKind>,
        found: Token,
    },
    #[error("unexpected end of input at {position}: expected {}", describe_kinds(.expected))]
    UnexpectedEndOfInput {
        expected: Vec<TokenKind>,
        position: Position,
    },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::UnexpectedToken { found, .. } => found.position,
            ParseError::UnexpectedEndOfInput { position, .. } => *position,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ParseError::UnexpectedToken { .. } => "E0201",
            ParseError::UnexpectedEndOfInput { .. } => "E0202",
        }
    }
}

/// Failure while building the wire graph or resolving a wire.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("wire `{name}` is never assigned{}", referenced_at(.position))]
    UndefinedWire {
        name: String,
        position: Option<Position>,
    },
    #[error("wire `{name}` is assigned at {first} and again at {second}")]
    DuplicateAssignment {
        name: String,
        first: Position,
        second: Position,
    },
    #[error("wire `{name}` depends on itself: {}", .cycle.join(" -> "))]
    CyclicDependency {
        name: String,
        cycle: Vec<String>,
        position: Position,
    },
    #[error("literal {literal} at {position} does not fit in 16 bits")]
    LiteralOutOfRange { literal: String, position: Position },
}

impl EvalError {
    pub fn position(&self) -> Option<Position> {
        match self {
            EvalError::UndefinedWire { position, .. } => *position,
            EvalError::DuplicateAssignment { second, .. } => Some(*second),
            EvalError::CyclicDependency { position, .. }
            | EvalError::LiteralOutOfRange { position, .. } => Some(*position),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            EvalError::UndefinedWire { .. } => "E0301",
            EvalError::DuplicateAssignment { .. } => "E0302",
            EvalError::CyclicDependency { .. } => "E0303",
            EvalError::LiteralOutOfRange { .. } => "E0304",
        }
    }
}

fn referenced_at(position: &Option<Position>) -> String {
    match position {
        Some(position) => format!(" (referenced at {position})"),
        None => String::new(),
    }
}

/// Any error produced by the evaluation pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),
}

impl CoreError {
    pub fn position(&self) -> Option<Position> {
        match self {
            CoreError::Lex(err) => Some(err.position()),
            CoreError::Parse(err) => Some(err.position()),
            CoreError::Eval(err) => err.position(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CoreError::Lex(err) => err.code(),
            CoreError::Parse(err) => err.code(),
            CoreError::Eval(err) => err.code(),
        }
    }
}
