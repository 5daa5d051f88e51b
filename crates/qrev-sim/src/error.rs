//! Error types for the sim crate.

use thiserror::Error;

use crate::dispatch::GateKind;

/// Errors produced while building or replaying a reversible program.
///
/// None of these are recoverable mid-replay: a replay that fails leaves no
/// meaningful result.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// A register with this name is already declared.
    #[error("Register '{0}' is already declared")]
    DuplicateName(String),

    /// Extraction refers to a register that was never declared.
    #[error("Unknown register '{0}'")]
    UnknownRegister(String),

    /// Gate applied with the wrong number of targets.
    #[error("{kind} expects {expected} target wire(s), got {got}")]
    ArityMismatch {
        /// The primitive being applied.
        kind: GateKind,
        /// Number of targets the primitive takes.
        expected: usize,
        /// Number of targets supplied.
        got: usize,
    },

    /// Control and target wires are not disjoint.
    #[error("{kind}: wire {wire} is both a control and a target")]
    Overlap {
        /// The primitive being applied.
        kind: GateKind,
        /// The shared wire.
        wire: usize,
    },

    /// The gate is not classically reversible or cannot be resolved.
    #[error(
        "Unsupported gate '{0}': only X/NOT, SWAP, I, RESET and their controlled forms can be replayed"
    )]
    UnsupportedGate(String),

    /// Typed extraction over a slice that does not split into whole cells.
    #[error("Register '{name}' has {len} bits, cannot decode {count} x {width}-bit cells")]
    MalformedSlice {
        /// Register name.
        name: String,
        /// Slice length in bits.
        len: usize,
        /// Declared element count.
        count: usize,
        /// Declared element width.
        width: usize,
    },

    /// An unknown-size register whose upper bound was never resolved.
    #[error("Register '{0}' has an open range; resolve it against the total bit count first")]
    UnresolvedRegister(String),

    /// A composite gate whose body expands back into itself.
    #[error("Gate '{0}' is defined in terms of itself")]
    RecursiveGate(String),

    /// A wire index beyond the allocated bit state.
    #[error("Wire {wire} is out of range for a state of {len} bits")]
    WireOutOfRange {
        /// The offending wire.
        wire: usize,
        /// Current state length.
        len: usize,
    },

    /// A routine replay was handed fewer wires than the routine uses.
    #[error("Routine '{routine}' needs {needed} wires, got {got}")]
    TooFewWires {
        /// Routine name.
        routine: String,
        /// Routine arity.
        needed: usize,
        /// Wires supplied.
        got: usize,
    },

    /// A value does not fit in the requested number of bits.
    #[error("Value {value} does not fit in {bits} bits")]
    ValueTooWide {
        /// The value, as text (may be negative or a wide bitstring).
        value: String,
        /// Available bits.
        bits: usize,
    },

    /// A bitstring contained something other than '0' and '1'.
    #[error("Invalid bitstring '{0}'")]
    InvalidBitstring(String),

    /// Circuit IR error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qrev_ir::IrError),
}

/// Result type for simulator operations.
pub type SimResult<T> = Result<T, SimError>;
