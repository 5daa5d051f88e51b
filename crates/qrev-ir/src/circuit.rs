//! Compiled circuit representation and builder API.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::GateDefinition;
use crate::operation::Operation;
use crate::wire::{QuantumRegister, WireId};

/// A compiled circuit.
///
/// Holds the declared wire count, the register slices the compiler
/// allocated, the top-level operation list and the gate definitions
/// referenced by name from that list (and from nested implementations).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Total number of wires, including ancillae introduced by the compiler.
    num_wires: u32,
    /// Register slices declared by the compiler.
    #[serde(default)]
    qregs: Vec<QuantumRegister>,
    /// Top-level operations in declaration order.
    #[serde(default)]
    ops: Vec<Operation>,
    /// Gate definitions by name.
    #[serde(default)]
    gates: FxHashMap<String, GateDefinition>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            num_wires: 0,
            qregs: vec![],
            ops: vec![],
            gates: FxHashMap::default(),
        }
    }

    /// Create a circuit with a single register of `num_wires` wires.
    pub fn with_size(name: impl Into<String>, num_wires: u32) -> Self {
        let mut circuit = Self::new(name);
        if num_wires > 0 {
            circuit.add_qreg(num_wires);
        }
        circuit
    }

    /// Allocate a register of `size` wires at the end of the circuit.
    pub fn add_qreg(&mut self, size: u32) -> Vec<WireId> {
        let reg = QuantumRegister::new(self.num_wires, size);
        self.num_wires += size;
        self.qregs.push(reg);
        reg.wires().collect()
    }

    /// Add wires that belong to no declared register.
    ///
    /// This is how compilers surface ancillae introduced by sub-circuits.
    pub fn add_ancillae(&mut self, count: u32) -> Vec<WireId> {
        let start = self.num_wires;
        self.num_wires += count;
        (start..self.num_wires).map(WireId).collect()
    }

    // =========================================================================
    // Gate definitions
    // =========================================================================

    /// Register a gate definition.
    pub fn define_gate(&mut self, definition: GateDefinition) -> IrResult<&mut Self> {
        if self.gates.contains_key(&definition.name) {
            return Err(IrError::DuplicateGate(definition.name));
        }
        if let Some(body) = &definition.implementation {
            for op in body {
                self.check_wires(op.name(), op.wires())?;
            }
        }
        self.gates.insert(definition.name.clone(), definition);
        Ok(self)
    }

    /// Look up a gate definition by name.
    pub fn gate_definition(&self, name: &str) -> Option<&GateDefinition> {
        self.gates.get(name)
    }

    /// Iterate over all gate definitions.
    pub fn gate_definitions(&self) -> impl Iterator<Item = &GateDefinition> {
        self.gates.values()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Apply a named gate to the given wires (controls first, targets last).
    pub fn gate(
        &mut self,
        name: impl Into<String>,
        wires: impl IntoIterator<Item = WireId>,
    ) -> IrResult<&mut Self> {
        let name = name.into();
        let wires: Vec<WireId> = wires.into_iter().collect();
        self.check_wires(&name, &wires)?;
        if let Some(def) = self.gates.get(&name) {
            if def.arity != wires.len() {
                return Err(IrError::WireCountMismatch {
                    gate_name: name,
                    expected: def.arity,
                    got: wires.len(),
                });
            }
        }
        self.ops.push(Operation::Gate { name, wires });
        Ok(self)
    }

    /// Apply NOT.
    pub fn x(&mut self, target: WireId) -> IrResult<&mut Self> {
        self.gate("X", [target])
    }

    /// Apply CNOT.
    pub fn cx(&mut self, control: WireId, target: WireId) -> IrResult<&mut Self> {
        self.gate("CNOT", [control, target])
    }

    /// Apply Toffoli.
    pub fn ccx(&mut self, c1: WireId, c2: WireId, target: WireId) -> IrResult<&mut Self> {
        self.gate("CCNOT", [c1, c2, target])
    }

    /// Apply SWAP.
    pub fn swap(&mut self, a: WireId, b: WireId) -> IrResult<&mut Self> {
        self.gate("SWAP", [a, b])
    }

    /// Apply Fredkin (controlled SWAP).
    pub fn cswap(&mut self, control: WireId, a: WireId, b: WireId) -> IrResult<&mut Self> {
        self.gate("C-SWAP", [control, a, b])
    }

    /// Apply identity.
    pub fn identity(&mut self, wire: WireId) -> IrResult<&mut Self> {
        self.gate("I", [wire])
    }

    /// Measure a wire into a classical bit.
    pub fn measure(&mut self, wire: WireId, clbit: u32) -> IrResult<&mut Self> {
        self.check_wires("measure", &[wire])?;
        self.ops.push(Operation::measure(wire, clbit));
        Ok(self)
    }

    /// Reset a wire to zero.
    pub fn reset(&mut self, wire: WireId) -> IrResult<&mut Self> {
        self.check_wires("reset", &[wire])?;
        self.ops.push(Operation::reset(wire));
        Ok(self)
    }

    /// Append an already-built operation.
    pub fn push(&mut self, op: Operation) -> IrResult<&mut Self> {
        self.check_wires(op.name(), op.wires())?;
        self.ops.push(op);
        Ok(self)
    }

    fn check_wires(&self, gate_name: &str, wires: &[WireId]) -> IrResult<()> {
        for (i, wire) in wires.iter().enumerate() {
            if wire.0 >= self.num_wires {
                return Err(IrError::WireNotFound {
                    wire: *wire,
                    num_wires: self.num_wires,
                    gate_name: Some(gate_name.to_string()),
                });
            }
            if wires[..i].contains(wire) {
                return Err(IrError::DuplicateWire {
                    wire: *wire,
                    gate_name: Some(gate_name.to_string()),
                });
            }
        }
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total number of wires.
    pub fn num_wires(&self) -> usize {
        self.num_wires as usize
    }

    /// Register slices declared by the compiler.
    pub fn qregs(&self) -> &[QuantumRegister] {
        &self.qregs
    }

    /// Check that every declared register lies within the circuit's wires.
    ///
    /// Builder methods keep this true; circuits read from files may not.
    pub fn validate_registers(&self) -> IrResult<()> {
        for qreg in &self.qregs {
            if qreg.range().end > self.num_wires() {
                return Err(IrError::RegisterOutOfRange {
                    start: qreg.start,
                    length: qreg.length,
                    num_wires: self.num_wires,
                });
            }
        }
        Ok(())
    }

    /// Top-level operations.
    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    /// Number of top-level operations.
    pub fn num_ops(&self) -> usize {
        self.ops.len()
    }

    /// Parse a circuit from JSON.
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    /// Serialize the circuit to pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}
