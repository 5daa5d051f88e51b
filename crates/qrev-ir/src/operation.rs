//! Circuit operations combining gate names with their wires.

use serde::{Deserialize, Serialize};

use crate::wire::WireId;

/// A single operation of a compiled circuit.
///
/// Gate operations reference their gate by name; the name is resolved either
/// through the circuit's gate definitions or by the consumer's primitive
/// table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Application of a named gate. Controls come first, targets last.
    Gate {
        /// Gate name as emitted by the compiler.
        name: String,
        /// Wires the gate acts on.
        wires: Vec<WireId>,
    },
    /// Measurement of wires into classical bits.
    Measure {
        /// Measured wires.
        wires: Vec<WireId>,
        /// Destination classical bits.
        #[serde(default)]
        clbits: Vec<u32>,
    },
    /// Reset of wires to zero.
    Reset {
        /// Reset wires.
        wires: Vec<WireId>,
    },
}

impl Operation {
    /// Create a gate operation.
    pub fn gate(name: impl Into<String>, wires: impl IntoIterator<Item = WireId>) -> Self {
        Operation::Gate {
            name: name.into(),
            wires: wires.into_iter().collect(),
        }
    }

    /// Create a measurement operation.
    pub fn measure(wire: WireId, clbit: u32) -> Self {
        Operation::Measure {
            wires: vec![wire],
            clbits: vec![clbit],
        }
    }

    /// Create a reset operation.
    pub fn reset(wire: WireId) -> Self {
        Operation::Reset { wires: vec![wire] }
    }

    /// Get the name of the operation.
    pub fn name(&self) -> &str {
        match self {
            Operation::Gate { name, .. } => name,
            Operation::Measure { .. } => "measure",
            Operation::Reset { .. } => "reset",
        }
    }

    /// Wires this operation touches.
    pub fn wires(&self) -> &[WireId] {
        match self {
            Operation::Gate { wires, .. }
            | Operation::Measure { wires, .. }
            | Operation::Reset { wires } => wires,
        }
    }

    /// Check if this is a gate application.
    pub fn is_gate(&self) -> bool {
        matches!(self, Operation::Gate { .. })
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self, Operation::Measure { .. })
    }

    /// Check if this is a reset.
    pub fn is_reset(&self) -> bool {
        matches!(self, Operation::Reset { .. })
    }
}
