//! The reversible program: bit state, register catalog and gate history.

use std::ops::Range;

use serde::Serialize;
use tracing::{info, instrument, trace};

use qrev_ir::{Circuit, Routine};

use crate::bits::BitState;
use crate::convert::bitstring_from_bits;
use crate::dispatch::{GateKind, GateOperation};
use crate::error::{SimError, SimResult};
use crate::interpreter::CircuitInterpreter;
use crate::register::{RegisterCatalog, RegisterDescriptor, RegisterValue, RegisterValues};

/// Name of the catch-all register for wires beyond the declared registers.
pub const AUTO_ANCILLAE: &str = "auto_ancillae";

/// One entry of the gate history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedGate {
    /// The gate application as requested.
    pub op: GateOperation,
    /// Whether the control predicate held and the state was mutated.
    pub fired: bool,
}

/// Counts over the gate history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplayStats {
    /// Gates whose controls were all set.
    pub applied: usize,
    /// Gates recorded as no-ops.
    pub skipped: usize,
}

impl ReplayStats {
    /// Total number of recorded gates.
    pub fn total(&self) -> usize {
        self.applied + self.skipped
    }
}

/// A classical replay target for reversible circuits.
#[derive(Debug, Clone, Default)]
pub struct ReversibleProgram {
    state: BitState,
    catalog: RegisterCatalog,
    history: Vec<AppliedGate>,
}

impl ReversibleProgram {
    /// Create an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a program from a compiled circuit and replay it.
    ///
    /// One register is allocated per declared circuit register, named after
    /// the `layout` entry covering exactly the same bits. Wires beyond the
    /// declared registers land in [`AUTO_ANCILLAE`]. A non-empty `layout`
    /// then becomes the extraction catalog.
    #[instrument(skip(circuit, layout), fields(circuit = circuit.name()))]
    pub fn from_circuit(circuit: &Circuit, layout: &RegisterCatalog) -> SimResult<Self> {
        info!(
            "Replaying circuit with {} wires and {} operations",
            circuit.num_wires(),
            circuit.num_ops()
        );

        circuit.validate_registers()?;
        let mut program = Self::new();
        program.allocate_layout(
            circuit.qregs().iter().map(|qreg| qreg.range()),
            circuit.num_wires(),
            layout,
        )?;
        CircuitInterpreter::new(&mut program).run(circuit)?;
        program.finish(layout)?;
        Ok(program)
    }

    /// Build a program from a routine tree and replay it on fresh bits.
    #[instrument(skip(routine, layout), fields(routine = routine.name()))]
    pub fn from_routine(routine: &Routine, layout: &RegisterCatalog) -> SimResult<Self> {
        info!(
            "Replaying routine with {} wires and {} top-level operations",
            routine.arity(),
            routine.ops().len()
        );

        let mut program = Self::new();
        program.allocate_layout(routine.registers().iter().cloned(), routine.arity(), layout)?;
        CircuitInterpreter::new(&mut program).replay_routine(routine, &[])?;
        program.finish(layout)?;
        Ok(program)
    }

    fn allocate_layout(
        &mut self,
        ranges: impl Iterator<Item = Range<usize>>,
        total: usize,
        layout: &RegisterCatalog,
    ) -> SimResult<()> {
        for range in ranges {
            let name = layout
                .iter()
                .find(|d| d.range.resolved() == Some(range.clone()) && !self.catalog.contains(&d.name))
                .map(|d| d.name.clone());
            self.allocate_register(range.len(), name.as_deref())?;
        }
        if total > self.state.len() {
            let start = self.state.len();
            self.catalog
                .declare(RegisterDescriptor::unknown(AUTO_ANCILLAE, start))?;
            self.state.allocate(total - start);
            self.catalog.resolve_unknown(total);
        }
        Ok(())
    }

    fn finish(&mut self, layout: &RegisterCatalog) -> SimResult<()> {
        if !layout.is_empty() {
            self.adopt_layout(layout.clone())?;
        }
        let stats = self.stats();
        info!(
            "Replay completed: {} bits, {} gates fired, {} skipped",
            self.state.len(),
            stats.applied,
            stats.skipped
        );
        Ok(())
    }

    // =========================================================================
    // Registers
    // =========================================================================

    /// Append `count` zero bits as a new register.
    ///
    /// Without a name, the register is called `"{start}_{end}"` after its
    /// bit range.
    pub fn allocate_register(
        &mut self,
        count: usize,
        name: Option<&str>,
    ) -> SimResult<&RegisterDescriptor> {
        let start = self.state.len();
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("{}_{}", start, start + count),
        };
        if self.catalog.contains(&name) {
            return Err(SimError::DuplicateName(name));
        }
        let range = self.state.allocate(count);
        self.catalog.declare(RegisterDescriptor::bitstring(name, range))
    }

    /// Declare a register view over existing (or future) bits without
    /// allocating anything.
    pub fn declare_register(
        &mut self,
        descriptor: RegisterDescriptor,
    ) -> SimResult<&RegisterDescriptor> {
        self.catalog.declare(descriptor)
    }

    /// Replace the catalog with caller-supplied naming.
    ///
    /// Unknown sizes are closed at the current bit count, and the
    /// [`AUTO_ANCILLAE`] register is carried over when `layout` has no
    /// catch-all of its own.
    pub fn adopt_layout(&mut self, mut layout: RegisterCatalog) -> SimResult<()> {
        if !layout.has_unknown() && !layout.contains(AUTO_ANCILLAE) {
            if let Some(ancillae) = self.catalog.get(AUTO_ANCILLAE) {
                layout.declare(ancillae.clone())?;
            }
        }
        layout.resolve_unknown(self.state.len());
        self.catalog = layout;
        Ok(())
    }

    /// The register catalog.
    pub fn catalog(&self) -> &RegisterCatalog {
        &self.catalog
    }

    /// Mutable access to the register catalog.
    pub fn catalog_mut(&mut self) -> &mut RegisterCatalog {
        &mut self.catalog
    }

    // =========================================================================
    // Gates
    // =========================================================================

    /// Apply a primitive to a flat wire list, controls first.
    ///
    /// Returns whether the gate fired.
    pub fn apply(&mut self, kind: GateKind, wires: &[usize]) -> SimResult<bool> {
        let op = GateOperation::from_wires(kind, wires)?;
        self.apply_operation(op)
    }

    /// Apply a validated gate application.
    ///
    /// Every control bit is read before any target is touched. A gate whose
    /// controls are not all set leaves the state unchanged but is still
    /// recorded.
    pub fn apply_operation(&mut self, op: GateOperation) -> SimResult<bool> {
        let controls = op
            .controls()
            .iter()
            .map(|&c| self.state.read(c))
            .collect::<SimResult<Vec<bool>>>()?;
        for &t in op.targets() {
            self.state.read(t)?;
        }
        let fired = controls.iter().all(|&bit| bit);

        if fired {
            let targets = op.targets();
            match op.kind() {
                GateKind::Invert => {
                    for &t in targets {
                        self.state.invert(t)?;
                    }
                }
                GateKind::Swap => {
                    let &[a, b] = targets else {
                        return Err(SimError::ArityMismatch {
                            kind: GateKind::Swap,
                            expected: 2,
                            got: targets.len(),
                        });
                    };
                    self.state.swap(a, b)?;
                }
                GateKind::Reset => {
                    for &t in targets {
                        self.state.write(t, false)?;
                    }
                }
                GateKind::Identity => {}
            }
        }

        trace!(gate = %op, fired, "gate");
        self.history.push(AppliedGate { op, fired });
        Ok(fired)
    }

    /// Every gate applied so far, in order.
    pub fn history(&self) -> &[AppliedGate] {
        &self.history
    }

    /// Fired/skipped counts over the history.
    pub fn stats(&self) -> ReplayStats {
        let applied = self.history.iter().filter(|g| g.fired).count();
        ReplayStats {
            applied,
            skipped: self.history.len() - applied,
        }
    }

    // =========================================================================
    // Results
    // =========================================================================

    /// The bit state.
    pub fn state(&self) -> &BitState {
        &self.state
    }

    /// Number of allocated bits.
    pub fn num_bits(&self) -> usize {
        self.state.len()
    }

    /// The full state as a `0`/`1` string, index 0 first.
    pub fn result(&self) -> String {
        self.state.to_bitstring()
    }

    /// Raw bitstring of every register, in catalog order.
    pub fn slices(&self) -> SimResult<Vec<(String, String)>> {
        self.catalog
            .names()
            .map(|name| Ok((name.to_string(), self.slice_bits(name)?)))
            .collect()
    }

    /// Raw bitstring of the named registers, in the order given.
    pub fn filter_slices<S: AsRef<str>>(&self, names: &[S]) -> SimResult<Vec<(String, String)>> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                Ok((name.to_string(), self.slice_bits(name)?))
            })
            .collect()
    }

    fn slice_bits(&self, name: &str) -> SimResult<String> {
        let bits = self.state.read_range(self.catalog.slice(name)?)?;
        Ok(bitstring_from_bits(&bits))
    }

    /// Decode one register from the current state.
    pub fn extract(&self, name: &str) -> SimResult<RegisterValue> {
        self.catalog.extract(name, &self.state)
    }

    /// Decode every register from the current state.
    pub fn extract_all(&self) -> SimResult<RegisterValues> {
        self.catalog.extract_all(&self.state)
    }
}
