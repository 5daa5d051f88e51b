//! Classically-reversible routines built from SWAP, X and I.
//!
//! These are the wire-shuffling and initialization building blocks used by
//! larger data-structure circuits. All of them can be replayed exactly by a
//! bit-level simulator.

use crate::error::{IrError, IrResult};
use crate::routine::Routine;

/// Reverse the order of `n` wires with pairwise swaps.
///
/// A single wire gets an identity so the routine is never empty.
pub fn reverse(n: usize) -> IrResult<Routine> {
    if n == 0 {
        return Err(IrError::InvalidRoutine("reverse of zero wires".into()));
    }
    let mut routine = Routine::new("REVERSE");
    routine.new_wires(n);
    let mid = n / 2;
    if mid == 0 {
        routine.apply("I", [0])?;
        return Ok(routine);
    }
    for i in 0..mid {
        routine.apply("SWAP", [i, n - i - 1])?;
    }
    Ok(routine)
}

/// Rotate `n` wires by `d` positions using three reversals.
///
/// `d > 0` rotates left (wire `i` receives wire `i + d`), `d < 0` rotates
/// right. A rotation that is a multiple of `n` is an identity.
pub fn rotate(n: usize, d: i64) -> IrResult<Routine> {
    if n == 0 {
        return Err(IrError::InvalidRoutine("rotation of zero wires".into()));
    }
    let mut routine = Routine::new("ROT_D");
    let wires = routine.new_wires(n);
    let d1 = (d.unsigned_abs() % n as u64) as usize;
    if d1 == 0 {
        routine.apply("I", [wires.start])?;
        return Ok(routine);
    }
    routine.call(reverse(n)?, wires.clone())?;
    if d > 0 {
        routine.call(reverse(d1)?, n - d1..n)?;
        routine.call(reverse(n - d1)?, 0..n - d1)?;
    } else {
        routine.call(reverse(d1)?, 0..d1)?;
        routine.call(reverse(n - d1)?, d1..n)?;
    }
    Ok(routine)
}

/// Swap the matching wires of two registers of `cell_size` wires each.
pub fn swap_cells(cell_size: usize) -> IrResult<Routine> {
    if cell_size == 0 {
        return Err(IrError::InvalidRoutine("swap of empty cells".into()));
    }
    let mut routine = Routine::new("SWAP_QREG");
    let first = routine.new_wires(cell_size);
    let second = routine.new_wires(cell_size);
    for (a, b) in first.zip(second) {
        routine.apply("SWAP", [a, b])?;
    }
    Ok(routine)
}

/// Rotate `nregs` registers of `reg_size` wires each by `d` whole registers.
pub fn rotate_registers(nregs: usize, reg_size: usize, d: i64) -> IrResult<Routine> {
    let total = nregs * reg_size;
    if total == 0 {
        return Err(IrError::InvalidRoutine(
            "rotation of empty register array".into(),
        ));
    }
    let mut routine = Routine::new("ROT_REG_D");
    let wires = routine.new_wires(total);
    let shift = d
        .checked_mul(reg_size as i64)
        .ok_or_else(|| IrError::InvalidRoutine(format!("shift {d} overflows")))?;
    routine.call(rotate(total, shift)?, wires)?;
    Ok(routine)
}

/// Set `bits` wires, starting from zero, to the binary encoding of `value`.
///
/// In big-endian order wire 0 holds the most significant bit; in
/// little-endian order wire 0 holds the least significant bit.
pub fn initialize_from_int(value: u64, bits: usize, little_endian: bool) -> IrResult<Routine> {
    if bits == 0 || (bits < 64 && value >> bits != 0) {
        return Err(IrError::InvalidRoutine(format!(
            "value {value} does not fit in {bits} bits"
        )));
    }
    let mut routine = Routine::new("INIT_INT");
    routine.new_wires(bits);
    for wire in 0..bits {
        let shift = if little_endian { wire } else { bits - 1 - wire };
        if shift < 64 && (value >> shift) & 1 == 1 {
            routine.apply("X", [wire])?;
        }
    }
    Ok(routine)
}
