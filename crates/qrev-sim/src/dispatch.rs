//! Gate-name dispatch onto reversible primitives.
//!
//! Names are resolved against a fixed table built once per process. A name
//! that is not in the table may still resolve if it is a canonical base
//! name (`X`, `NOT`, `SWAP`, `I`) behind any repetition of `C` / `C-`
//! control prefixes, e.g. `CCCX` or `C-C-SWAP`.

use std::fmt;
use std::sync::LazyLock;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// A classically-reversible primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// Flip the target bit.
    Invert,
    /// Exchange two target bits.
    Swap,
    /// Set the target bit to zero.
    Reset,
    /// Do nothing.
    Identity,
}

impl GateKind {
    /// Number of target wires; any further wires are controls.
    #[inline]
    pub fn num_targets(self) -> usize {
        match self {
            GateKind::Swap => 2,
            GateKind::Invert | GateKind::Reset | GateKind::Identity => 1,
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GateKind::Invert => "INVERT",
            GateKind::Swap => "SWAP",
            GateKind::Reset => "RESET",
            GateKind::Identity => "IDENTITY",
        };
        f.write_str(name)
    }
}

/// A validated gate application: controls and targets are explicit and
/// disjoint, and the target count matches the primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGateOperation")]
pub struct GateOperation {
    kind: GateKind,
    controls: Vec<usize>,
    targets: Vec<usize>,
}

/// Unvalidated wire form of [`GateOperation`].
#[derive(Deserialize)]
struct RawGateOperation {
    kind: GateKind,
    #[serde(default)]
    controls: Vec<usize>,
    targets: Vec<usize>,
}

impl TryFrom<RawGateOperation> for GateOperation {
    type Error = SimError;

    fn try_from(raw: RawGateOperation) -> SimResult<Self> {
        Self::new(raw.kind, raw.controls, raw.targets)
    }
}

impl GateOperation {
    /// Build a gate application from explicit controls and targets.
    pub fn new(kind: GateKind, controls: Vec<usize>, targets: Vec<usize>) -> SimResult<Self> {
        if targets.len() != kind.num_targets() {
            return Err(SimError::ArityMismatch {
                kind,
                expected: kind.num_targets(),
                got: targets.len(),
            });
        }
        let control_set: FxHashSet<usize> = controls.iter().copied().collect();
        if let Some(&wire) = targets.iter().find(|t| control_set.contains(t)) {
            return Err(SimError::Overlap { kind, wire });
        }
        if targets.len() == 2 && targets[0] == targets[1] {
            return Err(SimError::Overlap {
                kind,
                wire: targets[0],
            });
        }
        Ok(Self {
            kind,
            controls,
            targets,
        })
    }

    /// Build a gate application from a flat wire list: the last
    /// `kind.num_targets()` wires are targets, the rest are controls.
    pub fn from_wires(kind: GateKind, wires: &[usize]) -> SimResult<Self> {
        let n = kind.num_targets();
        if wires.len() < n {
            return Err(SimError::ArityMismatch {
                kind,
                expected: n,
                got: wires.len(),
            });
        }
        let (controls, targets) = wires.split_at(wires.len() - n);
        Self::new(kind, controls.to_vec(), targets.to_vec())
    }

    /// Build an uncontrolled gate application.
    pub fn uncontrolled(kind: GateKind, targets: Vec<usize>) -> SimResult<Self> {
        Self::new(kind, vec![], targets)
    }

    /// The primitive.
    pub fn kind(&self) -> GateKind {
        self.kind
    }

    /// Control wires.
    pub fn controls(&self) -> &[usize] {
        &self.controls
    }

    /// Target wires.
    pub fn targets(&self) -> &[usize] {
        &self.targets
    }
}

impl fmt::Display for GateOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.kind, self.targets)?;
        if !self.controls.is_empty() {
            write!(f, " ctrl {:?}", self.controls)?;
        }
        Ok(())
    }
}

/// Canonical gate names and the primitive each one denotes.
const CANONICAL_NAMES: &[(&str, GateKind)] = &[
    ("X", GateKind::Invert),
    ("NOT", GateKind::Invert),
    ("CNOT", GateKind::Invert),
    ("C-NOT", GateKind::Invert),
    ("C-X", GateKind::Invert),
    ("CX", GateKind::Invert),
    ("CCNOT", GateKind::Invert),
    ("C-C-NOT", GateKind::Invert),
    ("C-CNOT", GateKind::Invert),
    ("C-C-X", GateKind::Invert),
    ("CCX", GateKind::Invert),
    ("SWAP", GateKind::Swap),
    ("I", GateKind::Identity),
    ("RESET", GateKind::Reset),
];

/// Bases that may sit behind an arbitrary run of control prefixes.
const CONTROLLABLE_BASES: &[(&str, GateKind)] = &[
    ("X", GateKind::Invert),
    ("NOT", GateKind::Invert),
    ("SWAP", GateKind::Swap),
    ("I", GateKind::Identity),
];

static GATE_TABLE: LazyLock<FxHashMap<&'static str, GateKind>> =
    LazyLock::new(|| CANONICAL_NAMES.iter().copied().collect());

/// Resolves gate names to reversible primitives.
#[derive(Debug, Clone, Copy, Default)]
pub struct GateDispatcher;

impl GateDispatcher {
    /// Create a dispatcher over the canonical table.
    pub fn new() -> Self {
        Self
    }

    /// Look up the primitive a name denotes, without any wires.
    pub fn kind_of(&self, name: &str) -> SimResult<GateKind> {
        if let Some(&kind) = GATE_TABLE.get(name) {
            return Ok(kind);
        }
        let base = strip_control_prefixes(name);
        if base.len() < name.len() {
            if let Some(&(_, kind)) = CONTROLLABLE_BASES.iter().find(|(b, _)| *b == base) {
                return Ok(kind);
            }
        }
        Err(SimError::UnsupportedGate(name.to_string()))
    }

    /// Whether a name resolves to a primitive.
    pub fn is_supported(&self, name: &str) -> bool {
        self.kind_of(name).is_ok()
    }

    /// Resolve a gate name and its flat wire list into a gate application.
    pub fn resolve(&self, name: &str, wires: &[usize]) -> SimResult<GateOperation> {
        let kind = self.kind_of(name)?;
        GateOperation::from_wires(kind, wires)
    }

    /// Resolve a custom wrapper through its underlying primitive name.
    ///
    /// Only one level of indirection is followed.
    pub fn resolve_wrapper(
        &self,
        name: &str,
        subgate: Option<&str>,
        wires: &[usize],
    ) -> SimResult<GateOperation> {
        match subgate {
            Some(sub) if name.starts_with('_') => self.resolve(sub, wires),
            _ => Err(SimError::UnsupportedGate(name.to_string())),
        }
    }

    /// The canonical gate names, in table order.
    pub fn supported_names(&self) -> impl Iterator<Item = (&'static str, GateKind)> {
        CANONICAL_NAMES.iter().copied()
    }
}

/// Strip any leading run of `C` / `C-` control markers.
fn strip_control_prefixes(name: &str) -> &str {
    let mut rest = name;
    while let Some(stripped) = rest.strip_prefix('C') {
        let stripped = stripped.strip_prefix('-').unwrap_or(stripped);
        if stripped.is_empty() {
            break;
        }
        rest = stripped;
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names() {
        let d = GateDispatcher::new();
        for name in ["X", "NOT", "CNOT", "C-NOT", "C-X", "CX", "CCNOT", "C-C-NOT", "C-CNOT", "C-C-X", "CCX"] {
            assert_eq!(d.kind_of(name).unwrap(), GateKind::Invert, "{name}");
        }
        assert_eq!(d.kind_of("SWAP").unwrap(), GateKind::Swap);
        assert_eq!(d.kind_of("I").unwrap(), GateKind::Identity);
        assert_eq!(d.kind_of("RESET").unwrap(), GateKind::Reset);
    }

    #[test]
    fn test_control_prefix_repetition() {
        let d = GateDispatcher::new();
        assert_eq!(d.kind_of("CCCX").unwrap(), GateKind::Invert);
        assert_eq!(d.kind_of("C-C-C-NOT").unwrap(), GateKind::Invert);
        assert_eq!(d.kind_of("CSWAP").unwrap(), GateKind::Swap);
        assert_eq!(d.kind_of("C-SWAP").unwrap(), GateKind::Swap);
        assert_eq!(d.kind_of("CI").unwrap(), GateKind::Identity);
    }

    #[test]
    fn test_unsupported_names() {
        let d = GateDispatcher::new();
        for name in ["H", "CH", "Z", "CZ", "x", "C", "C-", "SQRTSWAP", "PH", "_X"] {
            assert!(
                matches!(d.kind_of(name), Err(SimError::UnsupportedGate(_))),
                "{name}"
            );
        }
    }

    #[test]
    fn test_resolve_splits_controls() {
        let d = GateDispatcher::new();
        let op = d.resolve("CCX", &[4, 1, 7]).unwrap();
        assert_eq!(op.kind(), GateKind::Invert);
        assert_eq!(op.controls(), &[4, 1]);
        assert_eq!(op.targets(), &[7]);

        let swap = d.resolve("CSWAP", &[0, 2, 3]).unwrap();
        assert_eq!(swap.controls(), &[0]);
        assert_eq!(swap.targets(), &[2, 3]);
    }

    #[test]
    fn test_arity_and_overlap() {
        assert!(matches!(
            GateOperation::new(GateKind::Swap, vec![], vec![0, 1, 2]),
            Err(SimError::ArityMismatch {
                expected: 2,
                got: 3,
                ..
            })
        ));
        assert!(matches!(
            GateOperation::new(GateKind::Invert, vec![3], vec![3]),
            Err(SimError::Overlap { wire: 3, .. })
        ));
        assert!(matches!(
            GateOperation::from_wires(GateKind::Swap, &[1]),
            Err(SimError::ArityMismatch { .. })
        ));
    }

    #[test]
    fn test_wrapper_indirection() {
        let d = GateDispatcher::new();
        let op = d.resolve_wrapper("_MYCNOT", Some("CNOT"), &[0, 1]).unwrap();
        assert_eq!(op.controls(), &[0]);
        assert!(d.resolve_wrapper("MYCNOT", Some("CNOT"), &[0, 1]).is_err());
        assert!(d.resolve_wrapper("_MYCNOT", None, &[0, 1]).is_err());
        assert!(matches!(
            d.resolve_wrapper("_MYH", Some("H"), &[0]),
            Err(SimError::UnsupportedGate(name)) if name == "H"
        ));
    }
}
