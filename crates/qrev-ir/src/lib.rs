//! qrev Circuit Intermediate Representation
//!
//! This crate describes the circuits the reversible simulator consumes. It
//! does not know how to execute anything; it only records which named gates
//! are applied to which wires, in which order.
//!
//! # Core Components
//!
//! - **Wires**: [`WireId`] addresses a single wire, [`QuantumRegister`] a
//!   declared slice of wires
//! - **Operations**: [`Operation`] is a gate application, a measurement or a reset
//! - **Gate definitions**: [`GateDefinition`] names a composite gate (with an
//!   inlined [`SubCircuit`]) or a custom wrapper around a primitive
//! - **Circuit**: [`Circuit`] is the compiled form with global wire indices
//! - **Routines**: [`Routine`] is the uncompiled tree with local wire indices,
//!   lowered by [`Circuit::from_routine`]
//! - **Library**: [`library`] holds SWAP/X based reversible routines
//!
//! # Example: Rotating a register
//!
//! ```rust
//! use qrev_ir::{Circuit, library};
//!
//! let rot = library::rotate(5, 2).unwrap();
//! let circuit = Circuit::from_routine(&rot).unwrap();
//!
//! assert_eq!(circuit.num_wires(), 5);
//! assert_eq!(circuit.num_ops(), 3); // three reversals
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod library;
pub mod operation;
pub mod routine;
pub mod wire;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{GateDefinition, SubCircuit};
pub use operation::Operation;
pub use routine::{Routine, RoutineOp};
pub use wire::{QuantumRegister, WireId};
