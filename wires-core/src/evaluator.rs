//! Wire graph construction and lazy 16-bit evaluation.
//!
//! [`Graph::build`] turns every statement into a [`Gate`] attached to the
//! wire it drives. Wires are created the first time any statement mentions
//! them, so a wire may be read before the statement assigning it appears.
//! Values are computed on demand and cached on the wire; a cached wire is
//! never evaluated again.

use std::collections::{HashMap, HashSet};

use crate::ast::{ComboOp, Expression, Literal, Schematic, ShiftOp, Signal, UnaryOp, WireRef};
use crate::error::EvalError;
use crate::span::Position;

/// Reduce a value to its low 16 bits (`value mod 65536`).
pub fn truncate16(value: u32) -> u16 {
    (value & 0xFFFF) as u16
}

/// Index of a wire inside its [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WireId(usize);

/// A gate operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Literal(u16),
    Wire(WireId),
}

/// The function driving a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Identity(Input),
    And(Input, Input),
    Or(Input, Input),
    Not(Input),
    Lshift(Input, Input),
    Rshift(Input, Input),
}

impl Gate {
    /// Operands in left-to-right order.
    pub fn inputs(&self) -> impl Iterator<Item = Input> {
        let (first, second) = match *self {
            Gate::Identity(input) | Gate::Not(input) => (input, None),
            Gate::And(l, r) | Gate::Or(l, r) | Gate::Lshift(l, r) | Gate::Rshift(l, r) => {
                (l, Some(r))
            }
        };
        core::iter::once(first).chain(second)
    }

    /// Wires this gate reads.
    pub fn wire_inputs(&self) -> impl Iterator<Item = WireId> {
        self.inputs().filter_map(|input| match input {
            Input::Wire(id) => Some(id),
            Input::Literal(_) => None,
        })
    }

    /// Compute the output given a way to read each operand.
    pub fn apply(&self, mut read: impl FnMut(Input) -> u16) -> u16 {
        match *self {
            Gate::Identity(input) => read(input),
            Gate::And(l, r) => read(l) & read(r),
            Gate::Or(l, r) => read(l) | read(r),
            Gate::Not(input) => truncate16(!u32::from(read(input))),
            Gate::Lshift(l, r) => {
                let (value, amount) = (read(l), read(r));
                if amount >= 16 {
                    0
                } else {
                    truncate16(u32::from(value) << amount)
                }
            }
            Gate::Rshift(l, r) => {
                let (value, amount) = (read(l), read(r));
                value.checked_shr(u32::from(amount)).unwrap_or(0)
            }
        }
    }
}

/// A named signal line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wire {
    name: String,
    producer: Option<Gate>,
    assigned_at: Option<Position>,
    first_seen: Position,
    value: Option<u16>,
}

impl Wire {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The gate driving this wire, if any statement assigns it.
    pub fn producer(&self) -> Option<Gate> {
        self.producer
    }

    /// Position of the assigned wire name in the assigning statement.
    pub fn assigned_at(&self) -> Option<Position> {
        self.assigned_at
    }

    /// Position of the first mention of this wire.
    pub fn first_seen(&self) -> Position {
        self.first_seen
    }

    /// The cached value, present once the wire has been resolved.
    pub fn value(&self) -> Option<u16> {
        self.value
    }
}

/// Ordering used when every wire is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    /// Ascending by wire name.
    #[default]
    Name,
    /// Order of first mention in the source.
    Source,
}

/// The wire table and the gates driving it.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    wires: Vec<Wire>,
    by_name: HashMap<String, WireId>,
    gate_evaluations: usize,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    wire: WireId,
    expanded: bool,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for a schematic.
    ///
    /// Fails on the second statement driving an already driven wire, and on
    /// literals that do not fit in 16 bits. Missing drivers are only noticed
    /// when a wire is resolved.
    pub fn build(schematic: &Schematic) -> Result<Graph, EvalError> {
        let mut graph = Graph::new();
        for statement in &schematic.statements {
            graph.assign(&statement.result, &statement.expression)?;
        }
        Ok(graph)
    }

    fn assign(&mut self, result: &WireRef, expression: &Expression) -> Result<(), EvalError> {
        let target = self.wire_id_or_insert(&result.name, result.position);
        if let Some(first) = self.wires[target.0].assigned_at {
            return Err(EvalError::DuplicateAssignment {
                name: result.name.clone(),
                first,
                second: result.position,
            });
        }

        let gate = self.gate_for(expression)?;
        let wire = &mut self.wires[target.0];
        wire.producer = Some(gate);
        wire.assigned_at = Some(result.position);
        Ok(())
    }

    fn gate_for(&mut self, expression: &Expression) -> Result<Gate, EvalError> {
        let gate = match expression {
            Expression::Signal(Signal::Literal(literal)) => {
                Gate::Identity(Input::Literal(literal_value(literal)?))
            }
            Expression::Signal(Signal::Wire(wire)) => Gate::Identity(self.input(wire)),
            Expression::Unary {
                op: UnaryOp::Not,
                operand,
            } => Gate::Not(self.input(operand)),
            Expression::Combo { left, op, right } => {
                let (l, r) = (self.input(left), self.input(right));
                match op {
                    ComboOp::And => Gate::And(l, r),
                    ComboOp::Or => Gate::Or(l, r),
                }
            }
            Expression::Shift { left, op, amount } => {
                let l = self.input(left);
                let r = Input::Literal(literal_value(amount)?);
                match op {
                    ShiftOp::Lshift => Gate::Lshift(l, r),
                    ShiftOp::Rshift => Gate::Rshift(l, r),
                }
            }
        };
        Ok(gate)
    }

    fn input(&mut self, wire: &WireRef) -> Input {
        Input::Wire(self.wire_id_or_insert(&wire.name, wire.position))
    }

    /// Look up a wire by name, adding it if it has not been seen.
    ///
    /// A freshly inserted wire has no producer; it only becomes resolvable
    /// once some statement assigns it.
    pub fn wire_id_or_insert(&mut self, name: &str, seen_at: Position) -> WireId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = WireId(self.wires.len());
        self.wires.push(Wire {
            name: name.to_string(),
            producer: None,
            assigned_at: None,
            first_seen: seen_at,
            value: None,
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn wire_id(&self, name: &str) -> Option<WireId> {
        self.by_name.get(name).copied()
    }

    pub fn wire(&self, id: WireId) -> &Wire {
        &self.wires[id.0]
    }

    /// Wires in order of first mention.
    pub fn wires(&self) -> impl Iterator<Item = &Wire> {
        self.wires.iter()
    }

    pub fn len(&self) -> usize {
        self.wires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    /// How many times a gate has been evaluated so far.
    pub fn gate_evaluations(&self) -> usize {
        self.gate_evaluations
    }

    pub fn resolve(&mut self, name: &str) -> Result<u16, EvalError> {
        let id = self
            .wire_id(name)
            .ok_or_else(|| EvalError::UndefinedWire {
                name: name.to_string(),
                position: None,
            })?;
        self.resolve_id(id)
    }

    /// Resolve a wire and everything it depends on.
    ///
    /// Dependencies are walked with an explicit stack, so chain length is not
    /// bounded by the call stack. Wires on the active path are tracked to
    /// report cycles.
    pub fn resolve_id(&mut self, id: WireId) -> Result<u16, EvalError> {
        if let Some(value) = self.wires[id.0].value {
            return Ok(value);
        }

        let mut stack = vec![Frame {
            wire: id,
            expanded: false,
        }];
        let mut active = HashSet::new();

        while let Some(frame) = stack.last_mut() {
            let current = frame.wire;
            let wire = &self.wires[current.0];
            if wire.value.is_some() {
                stack.pop();
                continue;
            }
            let gate = wire.producer.ok_or_else(|| EvalError::UndefinedWire {
                name: wire.name.clone(),
                position: Some(wire.first_seen),
            })?;

            if frame.expanded {
                let value = gate.apply(|input| self.read(input));
                self.wires[current.0].value = Some(value);
                self.gate_evaluations += 1;
                active.remove(&current);
                stack.pop();
                continue;
            }

            frame.expanded = true;
            active.insert(current);
            for dependency in gate.wire_inputs() {
                if self.wires[dependency.0].value.is_some() {
                    continue;
                }
                if active.contains(&dependency) {
                    return Err(self.cycle_error(&stack, dependency));
                }
                stack.push(Frame {
                    wire: dependency,
                    expanded: false,
                });
            }
        }

        Ok(self.read(Input::Wire(id)))
    }

    fn read(&self, input: Input) -> u16 {
        match input {
            Input::Literal(value) => value,
            Input::Wire(id) => self.wires[id.0]
                .value
                .expect("operands are resolved before their gate"),
        }
    }

    fn cycle_error(&self, stack: &[Frame], repeated: WireId) -> EvalError {
        // Expanded frames, bottom to top, form the path being resolved.
        let mut cycle: Vec<String> = stack
            .iter()
            .filter(|frame| frame.expanded)
            .map(|frame| frame.wire)
            .skip_while(|&wire| wire != repeated)
            .map(|wire| self.wires[wire.0].name.clone())
            .collect();
        let wire = &self.wires[repeated.0];
        cycle.push(wire.name.clone());
        EvalError::CyclicDependency {
            name: wire.name.clone(),
            cycle,
            position: wire.assigned_at.unwrap_or(wire.first_seen),
        }
    }

    /// Resolve every known wire.
    pub fn resolve_all(&mut self, order: Order) -> Result<Vec<(String, u16)>, EvalError> {
        let mut ids: Vec<WireId> = (0..self.wires.len()).map(WireId).collect();
        if order == Order::Name {
            ids.sort_by(|a, b| self.wires[a.0].name.cmp(&self.wires[b.0].name));
        }
        ids.into_iter()
            .map(|id| {
                let value = self.resolve_id(id)?;
                Ok((self.wires[id.0].name.clone(), value))
            })
            .collect()
    }

    /// Resolve the named wires, in the order given.
    pub fn resolve_wires<S: AsRef<str>>(
        &mut self,
        names: &[S],
    ) -> Result<Vec<(String, u16)>, EvalError> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                Ok((name.to_string(), self.resolve(name)?))
            })
            .collect()
    }
}

fn literal_value(literal: &Literal) -> Result<u16, EvalError> {
    literal
        .spelling
        .parse::<u16>()
        .map_err(|_| EvalError::LiteralOutOfRange {
            literal: literal.spelling.clone(),
            position: literal.position,
        })
}
