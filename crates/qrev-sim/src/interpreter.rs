//! Replay of compiled circuits and routine trees onto a program.

use tracing::{debug, instrument, trace};

use qrev_ir::{Circuit, IrError, Operation, Routine, RoutineOp, SubCircuit, WireId};

use crate::dispatch::{GateDispatcher, GateKind, GateOperation};
use crate::error::{SimError, SimResult};
use crate::program::ReversibleProgram;

/// What a single circuit operation amounts to in a classical replay.
#[derive(Debug)]
enum Step<'c> {
    /// Nothing to do (measurements).
    Skip,
    /// Reset each wire.
    Reset(&'c [WireId]),
    /// Replay a composite gate's body.
    Inline(&'c SubCircuit),
    /// Apply a primitive.
    Primitive(GateOperation),
}

/// Walks circuits and routines in declaration order, feeding every
/// primitive to a [`ReversibleProgram`].
pub struct CircuitInterpreter<'p> {
    program: &'p mut ReversibleProgram,
    dispatcher: GateDispatcher,
    /// Composite gates currently being inlined, outermost first.
    expanding: Vec<String>,
}

impl<'p> CircuitInterpreter<'p> {
    /// Create an interpreter writing into `program`.
    pub fn new(program: &'p mut ReversibleProgram) -> Self {
        Self {
            program,
            dispatcher: GateDispatcher::new(),
            expanding: Vec::new(),
        }
    }

    /// Replay a whole circuit.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    pub fn run(&mut self, circuit: &Circuit) -> SimResult<()> {
        self.replay(circuit, circuit.ops())
    }

    /// Replay `scope`, resolving gate names against `top`.
    ///
    /// Wires inside composite bodies are already global, so nested bodies
    /// are replayed as-is. A body that reaches its own gate again, directly
    /// or through other definitions, fails with [`SimError::RecursiveGate`].
    pub fn replay(&mut self, top: &Circuit, scope: &[Operation]) -> SimResult<()> {
        for op in scope {
            match self.classify(top, op)? {
                Step::Skip => trace!("skipping {}", op.name()),
                Step::Reset(wires) => {
                    for wire in wires {
                        self.program.apply(GateKind::Reset, &[wire.index()])?;
                    }
                }
                Step::Inline(body) => {
                    let name = op.name();
                    if self.expanding.iter().any(|open| open == name) {
                        return Err(SimError::RecursiveGate(name.to_string()));
                    }
                    debug!("Entering {} ({} ops)", name, body.len());
                    self.expanding.push(name.to_string());
                    let replayed = self.replay(top, body.ops());
                    self.expanding.pop();
                    replayed?;
                }
                Step::Primitive(gate) => {
                    self.program.apply_operation(gate)?;
                }
            }
        }
        Ok(())
    }

    fn classify<'c>(&self, top: &'c Circuit, op: &'c Operation) -> SimResult<Step<'c>> {
        match op {
            Operation::Measure { .. } => Ok(Step::Skip),
            Operation::Reset { wires } => Ok(Step::Reset(wires)),
            Operation::Gate { name, wires } => {
                let wires: Vec<usize> = wires.iter().map(|w| w.index()).collect();
                match top.gate_definition(name) {
                    Some(def) => match &def.implementation {
                        Some(body) => Ok(Step::Inline(body)),
                        None if def.is_custom_wrapper() => self
                            .dispatcher
                            .resolve_wrapper(name, def.subgate.as_deref(), &wires)
                            .map(Step::Primitive),
                        None => self.dispatcher.resolve(name, &wires).map(Step::Primitive),
                    },
                    None => self.dispatcher.resolve(name, &wires).map(Step::Primitive),
                }
            }
        }
    }

    /// Replay a routine tree with its local wires mapped onto `wires`.
    ///
    /// Local wire `i` maps to `wires[i]`. An empty `wires` maps every local
    /// wire onto itself.
    #[instrument(skip(self, routine, wires), fields(routine = routine.name()))]
    pub fn replay_routine(&mut self, routine: &Routine, wires: &[usize]) -> SimResult<()> {
        let map: Vec<usize> = if wires.is_empty() {
            (0..routine.arity()).collect()
        } else if wires.len() < routine.arity() {
            return Err(SimError::TooFewWires {
                routine: routine.name().to_string(),
                needed: routine.arity(),
                got: wires.len(),
            });
        } else {
            wires[..routine.arity()].to_vec()
        };
        self.replay_mapped(routine, &map)
    }

    fn replay_mapped(&mut self, routine: &Routine, map: &[usize]) -> SimResult<()> {
        for op in routine.ops() {
            let global = op
                .args()
                .iter()
                .map(|&arg| {
                    map.get(arg).copied().ok_or_else(|| {
                        SimError::Ir(IrError::LocalWireOutOfRange {
                            routine: routine.name().to_string(),
                            arity: map.len(),
                            arg,
                        })
                    })
                })
                .collect::<SimResult<Vec<usize>>>()?;
            match op {
                RoutineOp::Primitive { gate, .. } => {
                    let gate = self.dispatcher.resolve(gate, &global)?;
                    self.program.apply_operation(gate)?;
                }
                RoutineOp::Call { routine: callee, .. } => {
                    debug!("Entering routine {} on wires {:?}", callee.name(), global);
                    self.replay_mapped(callee, &global)?;
                }
            }
        }
        Ok(())
    }
}
