//! Conversions between integers, bitstrings and bit slices.
//!
//! Bitstrings are written most significant bit first unless
//! `little_endian` is set, in which case the string is reversed.

use crate::error::{SimError, SimResult};

/// Encode `value` on `max_bits` bits.
///
/// Negative values are encoded in two's complement.
pub fn bitstring_from_int(value: i64, max_bits: usize, little_endian: bool) -> SimResult<String> {
    let too_wide = || SimError::ValueTooWide {
        value: value.to_string(),
        bits: max_bits,
    };
    if max_bits == 0 || max_bits > 64 {
        return Err(too_wide());
    }
    let encoded = if value >= 0 {
        let v = value as u64;
        if max_bits < 64 && v >> max_bits != 0 {
            return Err(too_wide());
        }
        v
    } else {
        // -(2^(max_bits - 1)) is the smallest representable value.
        if max_bits < 64 && value < -(1i64 << (max_bits - 1)) {
            return Err(too_wide());
        }
        let mask = if max_bits == 64 {
            u64::MAX
        } else {
            (1u64 << max_bits) - 1
        };
        (value as u64) & mask
    };
    let mut bits: String = (0..max_bits)
        .rev()
        .map(|i| if (encoded >> i) & 1 == 1 { '1' } else { '0' })
        .collect();
    if little_endian {
        bits = bits.chars().rev().collect();
    }
    Ok(bits)
}

/// Flip every bit of a bitstring.
pub fn negated_bitstring(bits: &str) -> SimResult<String> {
    bits.chars()
        .map(|c| match c {
            '0' => Ok('1'),
            '1' => Ok('0'),
            _ => Err(SimError::InvalidBitstring(bits.to_string())),
        })
        .collect()
}

/// Parse a `0`/`1` string into bits.
pub fn bits_from_bitstring(bits: &str) -> SimResult<Vec<bool>> {
    bits.chars()
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            _ => Err(SimError::InvalidBitstring(bits.to_string())),
        })
        .collect()
}

/// Render bits as a `0`/`1` string.
pub fn bitstring_from_bits(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

/// Decode an unsigned integer from bits.
pub fn int_from_bits(bits: &[bool], little_endian: bool) -> SimResult<u64> {
    if bits.len() > 64 {
        return Err(SimError::ValueTooWide {
            value: bitstring_from_bits(bits),
            bits: 64,
        });
    }
    let fold = |acc: u64, b: &bool| (acc << 1) | u64::from(*b);
    Ok(if little_endian {
        bits.iter().rev().fold(0, fold)
    } else {
        bits.iter().fold(0, fold)
    })
}

/// Decode an unsigned integer from a bitstring.
pub fn int_from_bitstring(bits: &str, little_endian: bool) -> SimResult<u64> {
    int_from_bits(&bits_from_bitstring(bits)?, little_endian)
}

/// Decode `count` consecutive `width`-bit unsigned integers.
///
/// Fails if `bits` is shorter than `count * width` or a cell is empty.
pub fn ints_from_bits(
    bits: &[bool],
    count: usize,
    width: usize,
    little_endian: bool,
) -> SimResult<Vec<u64>> {
    (0..count)
        .map(|i| {
            let cell = bits
                .get(i * width..(i + 1) * width)
                .filter(|cell| !cell.is_empty())
                .ok_or_else(|| {
                    SimError::InvalidBitstring(format!(
                        "empty cell {i} of width {width} in '{}'",
                        bitstring_from_bits(bits)
                    ))
                })?;
            int_from_bits(cell, little_endian)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitstring_from_int() {
        assert_eq!(bitstring_from_int(5, 4, false).unwrap(), "0101");
        assert_eq!(bitstring_from_int(5, 4, true).unwrap(), "1010");
        assert_eq!(bitstring_from_int(0, 3, false).unwrap(), "000");
    }

    #[test]
    fn test_twos_complement() {
        assert_eq!(bitstring_from_int(-1, 4, false).unwrap(), "1111");
        assert_eq!(bitstring_from_int(-8, 4, false).unwrap(), "1000");
        assert!(bitstring_from_int(-9, 4, false).is_err());
    }

    #[test]
    fn test_too_wide() {
        assert!(matches!(
            bitstring_from_int(16, 4, false),
            Err(SimError::ValueTooWide { bits: 4, .. })
        ));
        assert!(bitstring_from_int(1, 0, false).is_err());
    }

    #[test]
    fn test_negation() {
        assert_eq!(negated_bitstring("0110").unwrap(), "1001");
        assert!(negated_bitstring("01x").is_err());
    }

    #[test]
    fn test_int_decoding() {
        assert_eq!(int_from_bitstring("1000", false).unwrap(), 8);
        assert_eq!(int_from_bitstring("1000", true).unwrap(), 1);
        assert_eq!(
            ints_from_bits(&bits_from_bitstring("010100001111").unwrap(), 3, 4, false).unwrap(),
            vec![5, 0, 15]
        );
    }

    #[test]
    fn test_ints_short_slice() {
        let bits = bits_from_bitstring("0101").unwrap();
        assert!(ints_from_bits(&bits, 2, 4, false).is_err());
        assert!(ints_from_bits(&bits, 1, 0, false).is_err());
    }
}
