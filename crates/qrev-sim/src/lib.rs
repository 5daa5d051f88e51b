//! `qrev-sim` — classical replay of reversible circuits.
//!
//! Circuits made only of classically-reversible gates (NOT and its
//! controlled forms, SWAP, RESET, identity) map basis states to basis
//! states, so they can be run on plain bits instead of amplitudes:
//!
//! - [`BitState`] holds the bits
//! - [`RegisterCatalog`] names ranges of bits and decodes them
//! - [`GateDispatcher`] turns gate names into [`GateOperation`]s
//! - [`ReversibleProgram`] applies them and keeps a history
//! - [`CircuitInterpreter`] walks compiled circuits and routine trees
//!
//! Any other gate fails the replay with [`SimError::UnsupportedGate`].
//!
//! # Quick start
//!
//! ```rust
//! use qrev_ir::{Circuit, WireId};
//! use qrev_sim::{RegisterCatalog, RegisterDescriptor, ReversibleProgram};
//!
//! let mut circuit = Circuit::new("add_one");
//! circuit.add_qreg(4);
//! circuit.add_qreg(2);
//! circuit.x(WireId(2)).unwrap();
//! circuit.x(WireId(3)).unwrap();
//! circuit.cx(WireId(3), WireId(4)).unwrap();
//!
//! let mut layout = RegisterCatalog::new();
//! layout.declare(RegisterDescriptor::integers("x", 0, 1, 4)).unwrap();
//! layout.declare(RegisterDescriptor::bitstring("y", 4..6)).unwrap();
//!
//! let program = ReversibleProgram::from_circuit(&circuit, &layout).unwrap();
//! assert_eq!(program.result(), "001110");
//! assert_eq!(program.extract("x").unwrap().to_string(), "(3,)");
//! assert_eq!(program.extract("y").unwrap().to_string(), "10");
//! ```

pub mod bits;
pub mod convert;
pub mod dispatch;
pub mod error;
pub mod inspect;
pub mod interpreter;
pub mod program;
pub mod register;

pub use bits::BitState;
pub use dispatch::{GateDispatcher, GateKind, GateOperation};
pub use error::{SimError, SimResult};
pub use inspect::{InspectionReport, ReportEntry};
pub use interpreter::CircuitInterpreter;
pub use program::{AUTO_ANCILLAE, AppliedGate, ReplayStats, ReversibleProgram};
pub use register::{
    BitRange, ElementType, Endianness, RegisterCatalog, RegisterDescriptor, RegisterValue,
    RegisterValues,
};
