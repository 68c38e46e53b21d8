//! Recursive-descent parser producing a [`Schematic`].
//!
//! ```text
//! Schematic  := Statement+
//! Statement  := Expression Arrow Wire
//! Expression := (Number | Wire)            -- followed by Arrow
//!             | UnaryGateKeyword Wire
//!             | Wire BinaryGateKeyword Wire
//!             | Wire ShiftGateKeyword Number
//! ```
//!
//! After a leading wire the next token picks the expression shape.

use std::iter::Peekable;
use std::vec::IntoIter;

use crate::ast::{ComboOp, Expression, Literal, Schematic, ShiftOp, Signal, Statement, UnaryOp, WireRef};
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::span::Position;

const EXPRESSION_START: &[TokenKind] = &[
    TokenKind::Number,
    TokenKind::Wire,
    TokenKind::UnaryGateKeyword,
];

const AFTER_WIRE_OPERAND: &[TokenKind] = &[
    TokenKind::Arrow,
    TokenKind::BinaryGateKeyword,
    TokenKind::ShiftGateKeyword,
];

/// Parse a whole token stream. At least one statement is required.
pub fn parse(tokens: Vec<Token>) -> Result<Schematic, ParseError> {
    let mut parser = Parser {
        tokens: tokens.into_iter().peekable(),
        end: Position::default(),
    };
    parser.schematic()
}

struct Parser {
    tokens: Peekable<IntoIter<Token>>,
    /// Position just past the last consumed token.
    end: Position,
}

impl Parser {
    fn schematic(&mut self) -> Result<Schematic, ParseError> {
        let mut statements = vec![self.statement()?];
        while self.tokens.peek().is_some() {
            statements.push(self.statement()?);
        }
        Ok(Schematic { statements })
    }

    fn statement(&mut self) -> Result<Statement, ParseError> {
        let expression = self.expression()?;
        self.expect(TokenKind::Arrow)?;
        let result = WireRef::from(self.expect(TokenKind::Wire)?);
        Ok(Statement { expression, result })
    }

    fn expression(&mut self) -> Result<Expression, ParseError> {
        let token = self.next(EXPRESSION_START)?;
        match token.kind {
            TokenKind::Number => {
                // A number can only be passed through.
                self.lookahead(&[TokenKind::Arrow])?;
                Ok(Expression::Signal(Signal::Literal(Literal::from(token))))
            }
            TokenKind::Wire => {
                let left = WireRef::from(token);
                match self.tokens.peek().map(|next| next.kind) {
                    Some(TokenKind::Arrow) => Ok(Expression::Signal(Signal::Wire(left))),
                    Some(TokenKind::BinaryGateKeyword) => self.combo_tail(left),
                    Some(TokenKind::ShiftGateKeyword) => self.shift_tail(left),
                    _ => Err(self.unexpected(AFTER_WIRE_OPERAND)),
                }
            }
            TokenKind::UnaryGateKeyword => {
                let Some(op) = UnaryOp::from_keyword(&token.spelling) else {
                    return Err(mismatch(TokenKind::UnaryGateKeyword, token));
                };
                let operand = WireRef::from(self.expect(TokenKind::Wire)?);
                Ok(Expression::Unary { op, operand })
            }
            _ => Err(ParseError::UnexpectedToken {
                expected: EXPRESSION_START.to_vec(),
                found: token,
            }),
        }
    }

    fn combo_tail(&mut self, left: WireRef) -> Result<Expression, ParseError> {
        let keyword = self.expect(TokenKind::BinaryGateKeyword)?;
        let Some(op) = ComboOp::from_keyword(&keyword.spelling) else {
            return Err(mismatch(TokenKind::BinaryGateKeyword, keyword));
        };
        let right = WireRef::from(self.expect(TokenKind::Wire)?);
        Ok(Expression::Combo { left, op, right })
    }

    fn shift_tail(&mut self, left: WireRef) -> Result<Expression, ParseError> {
        let keyword = self.expect(TokenKind::ShiftGateKeyword)?;
        let Some(op) = ShiftOp::from_keyword(&keyword.spelling) else {
            return Err(mismatch(TokenKind::ShiftGateKeyword, keyword));
        };
        let amount = Literal::from(self.expect(TokenKind::Number)?);
        Ok(Expression::Shift { left, op, amount })
    }

    /// Consume the next token if it is of `kind`.
    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        self.lookahead(&[kind])?;
        self.next(&[kind])
    }

    /// Fail unless the next token is one of `expected`; consumes nothing.
    fn lookahead(&mut self, expected: &[TokenKind]) -> Result<(), ParseError> {
        let accepted = self
            .tokens
            .peek()
            .is_some_and(|token| expected.contains(&token.kind));
        if accepted {
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn next(&mut self, expected: &[TokenKind]) -> Result<Token, ParseError> {
        let token = self
            .tokens
            .next()
            .ok_or_else(|| ParseError::UnexpectedEndOfInput {
                expected: expected.to_vec(),
                position: self.end,
            })?;
        self.end = Position::new(
            token.position.line,
            token.position.column + token.spelling.chars().count(),
        );
        Ok(token)
    }

    fn unexpected(&mut self, expected: &[TokenKind]) -> ParseError {
        match self.tokens.peek() {
            Some(found) => ParseError::UnexpectedToken {
                expected: expected.to_vec(),
                found: found.clone(),
            },
            None => ParseError::UnexpectedEndOfInput {
                expected: expected.to_vec(),
                position: self.end,
            },
        }
    }
}

fn mismatch(kind: TokenKind, found: Token) -> ParseError {
    ParseError::UnexpectedToken {
        expected: vec![kind],
        found,
    }
}
