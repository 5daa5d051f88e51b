//! Uncompiled routine trees and their lowering to compiled circuits.
//!
//! A [`Routine`] works on its own local wire space `0..arity`. Calls to
//! nested routines carry the list of caller-local wires that the callee's
//! wires map onto, by position. [`Circuit::from_routine`] flattens this
//! into the global wire space of a compiled circuit, emitting one gate
//! definition per call site.

use std::ops::Range;
use std::sync::Arc;

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};
use crate::gate::{GateDefinition, SubCircuit};
use crate::operation::Operation;
use crate::wire::WireId;

/// Gate names that have no inverse in a classical replay.
const NON_INVERTIBLE: &[&str] = &["RESET"];

/// An operation within a routine, over routine-local wire indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutineOp {
    /// A primitive gate applied by name.
    Primitive {
        /// Gate name.
        gate: String,
        /// Local wires (controls first, targets last).
        args: Vec<usize>,
    },
    /// A call into a nested routine.
    Call {
        /// The called routine.
        routine: Arc<Routine>,
        /// Local wires the callee's wires `0..callee.arity` map onto.
        args: Vec<usize>,
    },
}

impl RoutineOp {
    /// Local wires used by this operation.
    pub fn args(&self) -> &[usize] {
        match self {
            RoutineOp::Primitive { args, .. } | RoutineOp::Call { args, .. } => args,
        }
    }
}

/// A routine: a named, reusable sequence of operations on local wires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routine {
    name: String,
    arity: usize,
    registers: Vec<Range<usize>>,
    ops: Vec<RoutineOp>,
}

impl Routine {
    /// Create an empty routine with no wires.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arity: 0,
            registers: vec![],
            ops: vec![],
        }
    }

    /// Allocate `n` new local wires, returned as a range.
    pub fn new_wires(&mut self, n: usize) -> Range<usize> {
        let range = self.arity..self.arity + n;
        self.arity += n;
        self.registers.push(range.clone());
        range
    }

    /// Apply a primitive gate to local wires.
    pub fn apply(
        &mut self,
        gate: impl Into<String>,
        args: impl IntoIterator<Item = usize>,
    ) -> IrResult<&mut Self> {
        let args: Vec<usize> = args.into_iter().collect();
        self.check_args(&args)?;
        self.ops.push(RoutineOp::Primitive {
            gate: gate.into(),
            args,
        });
        Ok(self)
    }

    /// Call a nested routine on local wires.
    pub fn call(
        &mut self,
        routine: impl Into<Arc<Routine>>,
        args: impl IntoIterator<Item = usize>,
    ) -> IrResult<&mut Self> {
        let routine = routine.into();
        let args: Vec<usize> = args.into_iter().collect();
        if args.len() != routine.arity {
            return Err(IrError::WireCountMismatch {
                gate_name: routine.name.clone(),
                expected: routine.arity,
                got: args.len(),
            });
        }
        self.check_args(&args)?;
        self.ops.push(RoutineOp::Call { routine, args });
        Ok(self)
    }

    fn check_args(&self, args: &[usize]) -> IrResult<()> {
        for (i, &arg) in args.iter().enumerate() {
            if arg >= self.arity {
                return Err(IrError::LocalWireOutOfRange {
                    routine: self.name.clone(),
                    arity: self.arity,
                    arg,
                });
            }
            if args[..i].contains(&arg) {
                return Err(IrError::DuplicateWire {
                    wire: WireId::from(arg),
                    gate_name: Some(self.name.clone()),
                });
            }
        }
        Ok(())
    }

    /// The inverse routine: operations in reverse order, nested calls inverted.
    ///
    /// Every primitive this crate emits is self-inverse; `RESET` is not and
    /// makes the routine non-invertible.
    pub fn dagger(&self) -> IrResult<Routine> {
        let mut ops = Vec::with_capacity(self.ops.len());
        for op in self.ops.iter().rev() {
            match op {
                RoutineOp::Primitive { gate, args } => {
                    if NON_INVERTIBLE.contains(&gate.as_str()) {
                        return Err(IrError::NotInvertible {
                            routine: self.name.clone(),
                            gate: gate.clone(),
                        });
                    }
                    ops.push(RoutineOp::Primitive {
                        gate: gate.clone(),
                        args: args.clone(),
                    });
                }
                RoutineOp::Call { routine, args } => {
                    ops.push(RoutineOp::Call {
                        routine: Arc::new(routine.dagger()?),
                        args: args.clone(),
                    });
                }
            }
        }
        Ok(Routine {
            name: format!("{}_DAG", self.name),
            arity: self.arity,
            registers: self.registers.clone(),
            ops,
        })
    }

    /// Get the routine name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of local wires.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Local wire groups, one per `new_wires` call.
    pub fn registers(&self) -> &[Range<usize>] {
        &self.registers
    }

    /// Operations in declaration order.
    pub fn ops(&self) -> &[RoutineOp] {
        &self.ops
    }
}

impl Circuit {
    /// Compile a routine tree into a circuit.
    ///
    /// Each `new_wires` group of the routine becomes a declared register.
    /// Nested calls become gate applications whose definitions carry the
    /// callee body already mapped into global wire indices.
    pub fn from_routine(routine: &Routine) -> IrResult<Circuit> {
        let mut circuit = Circuit::new(routine.name());
        for group in routine.registers() {
            circuit.add_qreg(u32::try_from(group.len()).map_err(|_| {
                IrError::InvalidRoutine(format!("register of {} wires", group.len()))
            })?);
        }
        let map: Vec<WireId> = (0..routine.arity()).map(WireId::from).collect();
        let mut counter = 0usize;
        for op in lower_ops(&mut circuit, routine, &map, &mut counter)? {
            circuit.push(op)?;
        }
        Ok(circuit)
    }
}

fn lower_ops(
    circuit: &mut Circuit,
    routine: &Routine,
    map: &[WireId],
    counter: &mut usize,
) -> IrResult<Vec<Operation>> {
    let mut lowered = Vec::with_capacity(routine.ops().len());
    for op in routine.ops() {
        let wires: Vec<WireId> = op.args().iter().map(|&a| map[a]).collect();
        match op {
            RoutineOp::Primitive { gate, .. } => {
                lowered.push(Operation::Gate {
                    name: gate.clone(),
                    wires,
                });
            }
            RoutineOp::Call { routine: callee, .. } => {
                let body = lower_ops(circuit, callee, &wires, counter)?;
                let key = format!("{}#{}", callee.name(), *counter);
                *counter += 1;
                circuit.define_gate(
                    GateDefinition::new(key.clone(), callee.arity())
                        .with_implementation(SubCircuit::new(body)),
                )?;
                lowered.push(Operation::Gate { name: key, wires });
            }
        }
    }
    Ok(lowered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swap_pair() -> Routine {
        let mut r = Routine::new("PAIR");
        let w = r.new_wires(2);
        r.apply("SWAP", [w.start, w.start + 1]).unwrap();
        r
    }

    #[test]
    fn test_builder_tracks_arity() {
        let mut r = Routine::new("r");
        let a = r.new_wires(3);
        let b = r.new_wires(2);
        assert_eq!(a, 0..3);
        assert_eq!(b, 3..5);
        assert_eq!(r.arity(), 5);
        assert_eq!(r.registers().len(), 2);
    }

    #[test]
    fn test_apply_rejects_bad_args() {
        let mut r = Routine::new("r");
        r.new_wires(2);
        assert!(matches!(
            r.apply("X", [2]),
            Err(IrError::LocalWireOutOfRange { arg: 2, .. })
        ));
        assert!(matches!(
            r.apply("CNOT", [1, 1]),
            Err(IrError::DuplicateWire { .. })
        ));
    }

    #[test]
    fn test_call_checks_arity() {
        let mut outer = Routine::new("outer");
        outer.new_wires(3);
        let err = outer.call(swap_pair(), [0, 1, 2]).unwrap_err();
        assert!(matches!(
            err,
            IrError::WireCountMismatch {
                expected: 2,
                got: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_dagger_reverses_order() {
        let mut r = Routine::new("r");
        r.new_wires(2);
        r.apply("X", [0]).unwrap().apply("CNOT", [0, 1]).unwrap();
        let inv = r.dagger().unwrap();
        assert_eq!(inv.name(), "r_DAG");
        let names: Vec<_> = inv
            .ops()
            .iter()
            .map(|op| match op {
                RoutineOp::Primitive { gate, .. } => gate.as_str(),
                RoutineOp::Call { .. } => "call",
            })
            .collect();
        assert_eq!(names, vec!["CNOT", "X"]);
    }

    #[test]
    fn test_dagger_rejects_reset() {
        let mut r = Routine::new("r");
        r.new_wires(1);
        r.apply("RESET", [0]).unwrap();
        assert!(matches!(r.dagger(), Err(IrError::NotInvertible { .. })));
    }

    #[test]
    fn test_lowering_maps_call_sites() {
        let mut outer = Routine::new("outer");
        outer.new_wires(2);
        outer.new_wires(2);
        outer.call(swap_pair(), [3, 1]).unwrap();
        outer.apply("X", [0]).unwrap();

        let circuit = Circuit::from_routine(&outer).unwrap();
        assert_eq!(circuit.num_wires(), 4);
        assert_eq!(circuit.qregs().len(), 2);
        assert_eq!(circuit.num_ops(), 2);

        let first = &circuit.ops()[0];
        assert_eq!(first.name(), "PAIR#0");
        assert_eq!(first.wires(), &[WireId(3), WireId(1)]);

        let def = circuit.gate_definition("PAIR#0").unwrap();
        let body = def.implementation.as_ref().unwrap();
        assert_eq!(body.ops()[0].wires(), &[WireId(3), WireId(1)]);
    }
}
