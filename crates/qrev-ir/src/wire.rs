//! Wire identifiers and declared register slices.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Index of a wire within a circuit.
///
/// A wire corresponds 1:1 to a qubit position in the compiled circuit and to
/// a bit position in the simulator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireId(pub u32);

impl WireId {
    /// The wire index as a `usize`, for indexing bit state.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

impl From<u32> for WireId {
    fn from(id: u32) -> Self {
        WireId(id)
    }
}

impl From<usize> for WireId {
    fn from(id: usize) -> Self {
        WireId(u32::try_from(id).expect("WireId overflow: exceeds u32::MAX"))
    }
}

/// A register slice declared by the compiled circuit.
///
/// The compiler reports where it placed each allocated register; names and
/// element layout are supplied separately by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuantumRegister {
    /// First wire of the register.
    pub start: u32,
    /// Number of wires in the register.
    pub length: u32,
}

impl QuantumRegister {
    /// Create a new register slice.
    pub fn new(start: u32, length: u32) -> Self {
        Self { start, length }
    }

    /// The wires of the register as a half-open index range.
    pub fn range(&self) -> Range<usize> {
        let start = self.start as usize;
        start..start.saturating_add(self.length as usize)
    }

    /// Iterate over the wires of the register.
    ///
    /// Wires past `u32::MAX` cannot exist and are not yielded.
    pub fn wires(&self) -> impl Iterator<Item = WireId> + use<> {
        self.range()
            .map_while(|i| u32::try_from(i).ok())
            .map(WireId)
    }
}

impl fmt::Display for QuantumRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}..{})",
            self.start,
            u64::from(self.start) + u64::from(self.length)
        )
    }
}
