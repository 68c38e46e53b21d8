//! End-to-end pipeline: text to resolved wire values.

use crate::ast::Schematic;
use crate::error::CoreError;
use crate::evaluator::{Graph, Order};
use crate::lexer::tokenize;
use crate::parser::parse;

/// A parsed circuit ready to be resolved.
#[derive(Debug, Clone)]
pub struct Circuit {
    schematic: Schematic,
    graph: Graph,
}

impl Circuit {
    /// Lex, parse and build the wire graph. Nothing is resolved yet.
    pub fn from_source(source: &str) -> Result<Self, CoreError> {
        let tokens = tokenize(source)?;
        let schematic = parse(tokens)?;
        let graph = Graph::build(&schematic)?;
        Ok(Circuit { schematic, graph })
    }

    pub fn schematic(&self) -> &Schematic {
        &self.schematic
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn resolve(&mut self, wire: &str) -> Result<u16, CoreError> {
        Ok(self.graph.resolve(wire)?)
    }

    /// Resolve `wires` in the given order, or every wire in `order` when
    /// `wires` is empty.
    pub fn report<S: AsRef<str>>(
        &mut self,
        wires: &[S],
        order: Order,
    ) -> Result<Vec<(String, u16)>, CoreError> {
        let values = if wires.is_empty() {
            self.graph.resolve_all(order)?
        } else {
            self.graph.resolve_wires(wires)?
        };
        Ok(values)
    }
}

/// Evaluate circuit text and report the requested wires.
pub fn evaluate<S: AsRef<str>>(
    source: &str,
    wires: &[S],
    order: Order,
) -> Result<Vec<(String, u16)>, CoreError> {
    Circuit::from_source(source)?.report(wires, order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EvalError, LexError, ParseError};

    #[test]
    fn stops_at_first_failing_stage() {
        let none: &[&str] = &[];
        assert!(matches!(
            evaluate("1 -> X", none, Order::Name),
            Err(CoreError::Lex(LexError::NoMatch { .. }))
        ));
        assert!(matches!(
            evaluate("1 ->", none, Order::Name),
            Err(CoreError::Parse(ParseError::UnexpectedEndOfInput { .. }))
        ));
        assert!(matches!(
            evaluate("1 -> a\n2 -> a", none, Order::Name),
            Err(CoreError::Eval(EvalError::DuplicateAssignment { .. }))
        ));
    }

    #[test]
    fn keeps_schematic_alongside_graph() {
        let mut circuit = Circuit::from_source("3 -> a\na LSHIFT 1 -> b\n").expect("build");
        assert_eq!(circuit.schematic().statements.len(), 2);
        assert_eq!(circuit.graph().len(), 2);
        assert_eq!(circuit.resolve("b"), Ok(6));
        assert_eq!(circuit.graph().gate_evaluations(), 2);
    }
}
