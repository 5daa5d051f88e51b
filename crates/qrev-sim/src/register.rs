//! Named register bookkeeping and typed extraction.
//!
//! A [`RegisterCatalog`] maps register names to [`RegisterDescriptor`]s in
//! declaration order. Descriptors may alias each other's bits; only names
//! are unique.

use std::fmt;
use std::ops::Range;

use rustc_hash::FxHashMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::bits::BitState;
use crate::convert::{bitstring_from_bits, ints_from_bits};
use crate::error::{SimError, SimResult};

/// How the bits of a register are interpreted on extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Raw bits as booleans.
    Boolean,
    /// Fixed-width unsigned integers.
    Integer,
    /// Raw bits as a `0`/`1` string.
    #[default]
    Bitstring,
}

/// Bit order of integer cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    /// First bit of a cell is the most significant.
    #[default]
    Big,
    /// First bit of a cell is the least significant.
    Little,
}

/// A half-open bit range whose upper bound may still be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitRange {
    /// First bit.
    pub start: usize,
    /// One past the last bit, `None` while the size is unknown.
    pub end: Option<usize>,
}

impl BitRange {
    /// A closed range `start..end`.
    pub fn closed(start: usize, end: usize) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// A range open at the upper end.
    pub fn open(start: usize) -> Self {
        Self { start, end: None }
    }

    /// The concrete range, if the upper bound is known.
    pub fn resolved(&self) -> Option<Range<usize>> {
        self.end.map(|end| self.start..end)
    }

    /// Number of bits, if known.
    pub fn len(&self) -> Option<usize> {
        self.end.map(|end| end.saturating_sub(self.start))
    }

    /// Whether the range is known to be empty.
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }
}

impl From<Range<usize>> for BitRange {
    fn from(range: Range<usize>) -> Self {
        Self::closed(range.start, range.end)
    }
}

impl fmt::Display for BitRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}..{}", self.start, end),
            None => write!(f, "{}..", self.start),
        }
    }
}

/// A named register: where its bits live and how to read them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterDescriptor {
    /// Unique name.
    pub name: String,
    /// Bits covered by the register.
    pub range: BitRange,
    /// Number of repeated cells, if known.
    #[serde(default)]
    pub element_count: Option<usize>,
    /// Bits per cell, if known.
    #[serde(default)]
    pub element_width: Option<usize>,
    /// Interpretation of the bits.
    #[serde(default, rename = "type")]
    pub element_type: ElementType,
    /// Bit order of integer cells.
    #[serde(default)]
    pub endianness: Endianness,
    /// Size only known once the total bit count is known.
    #[serde(default)]
    pub unknown_size: bool,
}

impl RegisterDescriptor {
    /// A register read back as a bitstring.
    pub fn bitstring(name: impl Into<String>, range: Range<usize>) -> Self {
        let len = range.len();
        Self {
            name: name.into(),
            range: range.into(),
            element_count: Some(1),
            element_width: Some(len),
            element_type: ElementType::Bitstring,
            endianness: Endianness::Big,
            unknown_size: false,
        }
    }

    /// A register read back as booleans.
    pub fn booleans(name: impl Into<String>, range: Range<usize>) -> Self {
        let len = range.len();
        Self {
            element_count: Some(len),
            element_width: Some(1),
            element_type: ElementType::Boolean,
            ..Self::bitstring(name, range)
        }
    }

    /// An array of `count` unsigned integers of `width` bits starting at `start`.
    ///
    /// A size that overflows `usize` saturates the range; extraction then
    /// fails instead of reading a wrapped slice.
    pub fn integers(name: impl Into<String>, start: usize, count: usize, width: usize) -> Self {
        let end = count
            .checked_mul(width)
            .and_then(|len| start.checked_add(len))
            .unwrap_or(usize::MAX);
        Self {
            name: name.into(),
            range: BitRange::closed(start, end),
            element_count: Some(count),
            element_width: Some(width),
            element_type: ElementType::Integer,
            endianness: Endianness::Big,
            unknown_size: false,
        }
    }

    /// A catch-all register from `start` up to whatever the final bit count is.
    pub fn unknown(name: impl Into<String>, start: usize) -> Self {
        Self {
            name: name.into(),
            range: BitRange::open(start),
            element_count: None,
            element_width: None,
            element_type: ElementType::Bitstring,
            endianness: Endianness::Big,
            unknown_size: true,
        }
    }

    /// Set the bit order of integer cells.
    #[must_use]
    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    /// Decode bits according to this descriptor.
    pub fn decode(&self, bits: &[bool]) -> SimResult<RegisterValue> {
        if self.unknown_size {
            return Ok(RegisterValue::Bitstring(bitstring_from_bits(bits)));
        }
        match self.element_type {
            ElementType::Boolean => Ok(RegisterValue::Booleans(bits.to_vec())),
            ElementType::Bitstring => Ok(RegisterValue::Bitstring(bitstring_from_bits(bits))),
            ElementType::Integer => {
                let count = self.element_count.unwrap_or(1);
                let width = self
                    .element_width
                    .unwrap_or_else(|| if count == 0 { 0 } else { bits.len() / count });
                if width == 0 || count.checked_mul(width) != Some(bits.len()) {
                    return Err(SimError::MalformedSlice {
                        name: self.name.clone(),
                        len: bits.len(),
                        count,
                        width,
                    });
                }
                let little = self.endianness == Endianness::Little;
                ints_from_bits(bits, count, width, little).map(RegisterValue::Integers)
            }
        }
    }
}

/// A decoded register value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegisterValue {
    /// Raw bits as booleans.
    Booleans(Vec<bool>),
    /// Raw bits as a `0`/`1` string.
    Bitstring(String),
    /// Decoded unsigned integer cells.
    Integers(Vec<u64>),
}

impl RegisterValue {
    /// The integer cells, if this is an integer value.
    pub fn as_integers(&self) -> Option<&[u64]> {
        match self {
            RegisterValue::Integers(v) => Some(v),
            _ => None,
        }
    }

    /// The bitstring, if this is a bitstring value.
    pub fn as_bitstring(&self) -> Option<&str> {
        match self {
            RegisterValue::Bitstring(s) => Some(s),
            _ => None,
        }
    }

    /// The booleans, if this is a boolean value.
    pub fn as_booleans(&self) -> Option<&[bool]> {
        match self {
            RegisterValue::Booleans(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for RegisterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterValue::Booleans(bits) => {
                let parts: Vec<&str> = bits.iter().map(|&b| if b { "1" } else { "0" }).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            RegisterValue::Bitstring(s) => f.write_str(s),
            RegisterValue::Integers(values) if values.len() == 1 => write!(f, "({},)", values[0]),
            RegisterValue::Integers(values) => {
                let parts: Vec<String> = values.iter().map(u64::to_string).collect();
                write!(f, "({})", parts.join(", "))
            }
        }
    }
}

/// Decoded values by register name, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterValues {
    entries: Vec<(String, RegisterValue)>,
}

impl RegisterValues {
    /// Look up a value by register name.
    pub fn get(&self, name: &str) -> Option<&RegisterValue> {
        self.entries
            .iter()
            .find_map(|(n, v)| (n == name).then_some(v))
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no values.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegisterValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    fn push(&mut self, name: String, value: RegisterValue) {
        self.entries.push((name, value));
    }
}

impl Serialize for RegisterValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Ordered name → descriptor mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<RegisterDescriptor>",
    into = "Vec<RegisterDescriptor>"
)]
pub struct RegisterCatalog {
    entries: Vec<RegisterDescriptor>,
    index: FxHashMap<String, usize>,
}

impl RegisterCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a register.
    ///
    /// A descriptor with an open upper bound is treated as unknown-size,
    /// whatever its `unknown_size` flag says.
    pub fn declare(
        &mut self,
        mut descriptor: RegisterDescriptor,
    ) -> SimResult<&RegisterDescriptor> {
        descriptor.unknown_size |= descriptor.range.end.is_none();
        if self.index.contains_key(&descriptor.name) {
            return Err(SimError::DuplicateName(descriptor.name));
        }
        let idx = self.entries.len();
        self.index.insert(descriptor.name.clone(), idx);
        self.entries.push(descriptor);
        Ok(&self.entries[idx])
    }

    /// Declare an array of `count` cells of `width` bits starting at `start`,
    /// without allocating anything.
    ///
    /// A missing `width` or `count`, or `unknown_size`, yields a register
    /// open at the upper end, closed later by [`RegisterCatalog::resolve_unknown`].
    pub fn declare_array(
        &mut self,
        name: impl Into<String>,
        start: usize,
        count: Option<usize>,
        width: Option<usize>,
        element_type: ElementType,
        unknown_size: bool,
    ) -> SimResult<&RegisterDescriptor> {
        let name = name.into();
        let (count, width, range) = match (count, width) {
            (Some(n), Some(m)) if !unknown_size => {
                let end = n
                    .checked_mul(m)
                    .and_then(|len| start.checked_add(len))
                    .ok_or_else(|| SimError::MalformedSlice {
                        name: name.clone(),
                        len: usize::MAX,
                        count: n,
                        width: m,
                    })?;
                (Some(n), Some(m), BitRange::closed(start, end))
            }
            (n, Some(m)) => (n, Some(m), BitRange::open(start)),
            (_, None) => (None, None, BitRange::open(start)),
        };
        self.declare(RegisterDescriptor {
            name,
            range,
            element_count: count,
            element_width: width,
            element_type,
            endianness: Endianness::Big,
            unknown_size: range.end.is_none(),
        })
    }

    /// Close every open, unknown-size range at `total_bits`.
    pub fn resolve_unknown(&mut self, total_bits: usize) {
        for entry in &mut self.entries {
            if entry.unknown_size && entry.range.end.is_none() {
                entry.range.end = Some(total_bits.max(entry.range.start));
            }
        }
    }

    /// Look up a descriptor.
    pub fn get(&self, name: &str) -> Option<&RegisterDescriptor> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Whether a register with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// The concrete bit range of a register.
    pub fn slice(&self, name: &str) -> SimResult<Range<usize>> {
        let descriptor = self
            .get(name)
            .ok_or_else(|| SimError::UnknownRegister(name.to_string()))?;
        descriptor
            .range
            .resolved()
            .ok_or_else(|| SimError::UnresolvedRegister(name.to_string()))
    }

    /// Decode already-sliced bits with the named register's layout.
    pub fn extract_typed(&self, name: &str, bits: &[bool]) -> SimResult<RegisterValue> {
        self.get(name)
            .ok_or_else(|| SimError::UnknownRegister(name.to_string()))?
            .decode(bits)
    }

    /// Slice and decode one register from a bit state.
    pub fn extract(&self, name: &str, state: &BitState) -> SimResult<RegisterValue> {
        let bits = state.read_range(self.slice(name)?)?;
        self.extract_typed(name, &bits)
    }

    /// Slice and decode every register, in declaration order.
    pub fn extract_all(&self, state: &BitState) -> SimResult<RegisterValues> {
        let mut values = RegisterValues::default();
        for entry in &self.entries {
            values.push(entry.name.clone(), self.extract(&entry.name, state)?);
        }
        Ok(values)
    }

    /// Iterate over descriptors in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, RegisterDescriptor> {
        self.entries.iter()
    }

    /// Register names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Number of registers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any register still has an open upper bound.
    pub fn has_unknown(&self) -> bool {
        self.entries.iter().any(|e| e.unknown_size)
    }
}

impl TryFrom<Vec<RegisterDescriptor>> for RegisterCatalog {
    type Error = SimError;

    fn try_from(descriptors: Vec<RegisterDescriptor>) -> SimResult<Self> {
        let mut catalog = RegisterCatalog::new();
        for descriptor in descriptors {
            catalog.declare(descriptor)?;
        }
        Ok(catalog)
    }
}

impl From<RegisterCatalog> for Vec<RegisterDescriptor> {
    fn from(catalog: RegisterCatalog) -> Self {
        catalog.entries
    }
}

impl<'a> IntoIterator for &'a RegisterCatalog {
    type Item = &'a RegisterDescriptor;
    type IntoIter = std::slice::Iter<'a, RegisterDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::bits_from_bitstring;

    #[test]
    fn test_duplicate_name() {
        let mut catalog = RegisterCatalog::new();
        catalog
            .declare(RegisterDescriptor::bitstring("x", 0..4))
            .unwrap();
        let err = catalog
            .declare(RegisterDescriptor::bitstring("x", 4..6))
            .unwrap_err();
        assert!(matches!(err, SimError::DuplicateName(name) if name == "x"));
    }

    #[test]
    fn test_aliasing_is_allowed() {
        let mut catalog = RegisterCatalog::new();
        catalog
            .declare(RegisterDescriptor::bitstring("all", 0..8))
            .unwrap();
        catalog
            .declare(RegisterDescriptor::integers("low", 4, 1, 4))
            .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.slice("low").unwrap(), 4..8);
    }

    #[test]
    fn test_unknown_register() {
        let catalog = RegisterCatalog::new();
        assert!(matches!(
            catalog.slice("nope"),
            Err(SimError::UnknownRegister(_))
        ));
        assert!(matches!(
            catalog.extract_typed("nope", &[]),
            Err(SimError::UnknownRegister(_))
        ));
    }

    #[test]
    fn test_resolve_unknown() {
        let mut catalog = RegisterCatalog::new();
        catalog
            .declare(RegisterDescriptor::unknown("ancillae", 10))
            .unwrap();
        assert!(matches!(
            catalog.slice("ancillae"),
            Err(SimError::UnresolvedRegister(_))
        ));
        catalog.resolve_unknown(14);
        assert_eq!(catalog.slice("ancillae").unwrap(), 10..14);
    }

    #[test]
    fn test_declare_array_shapes() {
        let mut catalog = RegisterCatalog::new();
        let arr = catalog
            .declare_array("arr", 2, Some(3), Some(2), ElementType::Integer, false)
            .unwrap();
        assert_eq!(arr.range, BitRange::closed(2, 8));
        assert!(!arr.unknown_size);

        let open = catalog
            .declare_array("open", 8, Some(3), None, ElementType::Bitstring, false)
            .unwrap();
        assert!(open.unknown_size);
        assert_eq!(open.element_count, None);
    }

    #[test]
    fn test_open_range_from_yaml_is_resolved() {
        let yaml = "\
- name: x
  range: { start: 0, end: 4 }
- name: rest
  range: { start: 4, end: null }
";
        let mut catalog: RegisterCatalog = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(catalog.get("rest").unwrap().unknown_size);
        assert!(!catalog.get("x").unwrap().unknown_size);

        catalog.resolve_unknown(7);
        assert_eq!(catalog.slice("rest").unwrap(), 4..7);
    }

    #[test]
    fn test_oversized_array_is_rejected() {
        let mut catalog = RegisterCatalog::new();
        let err = catalog
            .declare_array("huge", 8, Some(usize::MAX), Some(2), ElementType::Integer, false)
            .unwrap_err();
        assert!(matches!(err, SimError::MalformedSlice { count: usize::MAX, width: 2, .. }));
        assert!(!catalog.contains("huge"));

        let desc = RegisterDescriptor::integers("wide", 1, usize::MAX, 2);
        assert_eq!(desc.range, BitRange::closed(1, usize::MAX));
        assert!(matches!(
            desc.decode(&[false; 4]),
            Err(SimError::MalformedSlice { .. })
        ));
    }

    #[test]
    fn test_integer_decoding() {
        let desc = RegisterDescriptor::integers("a", 0, 3, 4);
        let bits = bits_from_bitstring("010100001111").unwrap();
        assert_eq!(
            desc.decode(&bits).unwrap(),
            RegisterValue::Integers(vec![5, 0, 15])
        );

        let little = desc.clone().with_endianness(Endianness::Little);
        assert_eq!(
            little.decode(&bits).unwrap(),
            RegisterValue::Integers(vec![10, 0, 15])
        );
    }

    #[test]
    fn test_malformed_slice() {
        let desc = RegisterDescriptor::integers("a", 0, 3, 4);
        let bits = bits_from_bitstring("0101000011").unwrap();
        assert!(matches!(
            desc.decode(&bits),
            Err(SimError::MalformedSlice {
                len: 10,
                count: 3,
                width: 4,
                ..
            })
        ));
    }

    #[test]
    fn test_boolean_and_bitstring() {
        let bits = bits_from_bitstring("10").unwrap();
        let b = RegisterDescriptor::booleans("b", 0..2);
        assert_eq!(
            b.decode(&bits).unwrap(),
            RegisterValue::Booleans(vec![true, false])
        );
        let s = RegisterDescriptor::bitstring("s", 0..2);
        assert_eq!(s.decode(&bits).unwrap().as_bitstring(), Some("10"));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(RegisterValue::Integers(vec![3]).to_string(), "(3,)");
        assert_eq!(RegisterValue::Integers(vec![5, 0, 15]).to_string(), "(5, 0, 15)");
        assert_eq!(
            RegisterValue::Booleans(vec![true, false]).to_string(),
            "[1, 0]"
        );
        assert_eq!(RegisterValue::Bitstring("0011".into()).to_string(), "0011");
    }

    #[test]
    fn test_catalog_from_yaml() {
        let yaml = r"
- name: x
  range: { start: 0, end: 4 }
  element_count: 1
  element_width: 4
  type: integer
- name: anc
  range: { start: 4, end: null }
  unknown_size: true
";
        let catalog: RegisterCatalog = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["x", "anc"]);
        assert_eq!(catalog.get("x").unwrap().element_type, ElementType::Integer);
        assert!(catalog.has_unknown());

        let dup = "- { name: x, range: { start: 0, end: 1 } }\n- { name: x, range: { start: 1, end: 2 } }\n";
        assert!(serde_yaml_ng::from_str::<RegisterCatalog>(dup).is_err());
    }
}
