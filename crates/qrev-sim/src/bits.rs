//! Classical bit state replayed by the simulator.

use std::fmt;
use std::ops::Range;

use bit_vec::BitVec;

use crate::error::{SimError, SimResult};

/// An ordered, append-only sequence of classical bits.
///
/// Bits are appended by [`BitState::allocate`] and mutated in place
/// afterwards; the state never shrinks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitState {
    bits: BitVec,
}

impl BitState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self {
            bits: BitVec::new(),
        }
    }

    /// Append `n` zero bits, returning their index range.
    pub fn allocate(&mut self, n: usize) -> Range<usize> {
        let start = self.bits.len();
        self.bits.grow(n, false);
        start..start + n
    }

    /// Number of bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Check if no bits have been allocated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    #[inline]
    fn check(&self, i: usize) -> SimResult<()> {
        if i < self.bits.len() {
            Ok(())
        } else {
            Err(SimError::WireOutOfRange {
                wire: i,
                len: self.bits.len(),
            })
        }
    }

    /// Read bit `i`.
    #[inline]
    pub fn read(&self, i: usize) -> SimResult<bool> {
        self.bits.get(i).ok_or(SimError::WireOutOfRange {
            wire: i,
            len: self.bits.len(),
        })
    }

    /// Write bit `i`.
    #[inline]
    pub fn write(&mut self, i: usize, bit: bool) -> SimResult<()> {
        self.check(i)?;
        self.bits.set(i, bit);
        Ok(())
    }

    /// Flip bit `i`.
    #[inline]
    pub fn invert(&mut self, i: usize) -> SimResult<()> {
        let bit = self.read(i)?;
        self.bits.set(i, !bit);
        Ok(())
    }

    /// Exchange bits `i` and `j`.
    pub fn swap(&mut self, i: usize, j: usize) -> SimResult<()> {
        let a = self.read(i)?;
        let b = self.read(j)?;
        self.bits.set(i, b);
        self.bits.set(j, a);
        Ok(())
    }

    /// Read an ordered range of bits.
    pub fn read_range(&self, range: Range<usize>) -> SimResult<Vec<bool>> {
        if range.end > self.bits.len() {
            return Err(SimError::WireOutOfRange {
                wire: range.end.saturating_sub(1),
                len: self.bits.len(),
            });
        }
        Ok(range.map(|i| self.bits[i]).collect())
    }

    /// Iterate over all bits, index 0 first.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter()
    }

    /// Render as a `0`/`1` string, index 0 first.
    pub fn to_bitstring(&self) -> String {
        self.bits.iter().map(|b| if b { '1' } else { '0' }).collect()
    }
}

impl fmt::Display for BitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bitstring())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_appends_zeros() {
        let mut state = BitState::new();
        assert!(state.is_empty());
        assert_eq!(state.allocate(3), 0..3);
        assert_eq!(state.allocate(2), 3..5);
        assert_eq!(state.to_bitstring(), "00000");
    }

    #[test]
    fn test_primitives() {
        let mut state = BitState::new();
        state.allocate(4);
        state.invert(0).unwrap();
        state.write(2, true).unwrap();
        assert_eq!(state.to_bitstring(), "1010");

        state.swap(0, 1).unwrap();
        assert_eq!(state.to_bitstring(), "0110");
        assert_eq!(state.read_range(1..3).unwrap(), vec![true, true]);
        assert!(state.read(1).unwrap());
    }

    #[test]
    fn test_out_of_range() {
        let mut state = BitState::new();
        state.allocate(2);
        assert!(matches!(
            state.read(2),
            Err(SimError::WireOutOfRange { wire: 2, len: 2 })
        ));
        assert!(state.invert(5).is_err());
        assert!(state.swap(0, 2).is_err());
        assert!(state.read_range(1..3).is_err());
        // Failed swap leaves state untouched.
        assert_eq!(state.to_bitstring(), "00");
    }
}
