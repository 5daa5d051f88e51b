//! Error types for the IR crate.

use crate::wire::WireId;
use thiserror::Error;

/// Errors that can occur while building circuits and routines.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Wire not declared in the circuit.
    #[error("Wire {wire} not found in circuit with {num_wires} wires{}", format_gate_context(.gate_name))]
    WireNotFound {
        /// The wire that was not found.
        wire: WireId,
        /// Number of wires the circuit declares.
        num_wires: u32,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// A declared register reaches past the last wire of the circuit.
    #[error("Register [{start}, +{length}) exceeds circuit with {num_wires} wires")]
    RegisterOutOfRange {
        /// First wire of the register.
        start: u32,
        /// Declared register length.
        length: u32,
        /// Number of wires the circuit declares.
        num_wires: u32,
    },

    /// Duplicate wire in a single operation.
    #[error("Duplicate wire {wire} in operation{}", format_gate_context(.gate_name))]
    DuplicateWire {
        /// The duplicate wire.
        wire: WireId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Gate applied with a wire count different from its definition.
    #[error("Gate '{gate_name}' requires {expected} wires, got {got}")]
    WireCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of wires.
        expected: usize,
        /// Actual number of wires provided.
        got: usize,
    },

    /// A gate definition with this name already exists.
    #[error("Gate '{0}' is already defined")]
    DuplicateGate(String),

    /// A routine argument refers to a local wire the routine does not own.
    #[error("Routine '{routine}' has arity {arity}, argument {arg} is out of range")]
    LocalWireOutOfRange {
        /// Name of the routine.
        routine: String,
        /// Declared routine arity.
        arity: usize,
        /// The offending local index.
        arg: usize,
    },

    /// Routine cannot be inverted (contains a non-invertible operation).
    #[error("Routine '{routine}' cannot be inverted: contains '{gate}'")]
    NotInvertible {
        /// Name of the routine.
        routine: String,
        /// The offending gate name.
        gate: String,
    },

    /// Routine construction parameters are invalid.
    #[error("Invalid routine: {0}")]
    InvalidRoutine(String),
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
