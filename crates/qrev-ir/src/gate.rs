//! Gate definitions carried by a compiled circuit.

use serde::{Deserialize, Serialize};

use crate::operation::Operation;

/// The body of a gate, inlined into the enclosing circuit's wire space.
///
/// Wire indices inside a sub-circuit are global: the compiler has already
/// mapped them onto the wires of the enclosing circuit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubCircuit {
    ops: Vec<Operation>,
}

impl SubCircuit {
    /// Create a sub-circuit from its operations.
    pub fn new(ops: Vec<Operation>) -> Self {
        Self { ops }
    }

    /// The operations, in declaration order.
    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if the sub-circuit has no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Iterate over the operations.
    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.ops.iter()
    }
}

impl<'a> IntoIterator for &'a SubCircuit {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

impl FromIterator<Operation> for SubCircuit {
    fn from_iter<T: IntoIterator<Item = Operation>>(iter: T) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

/// A named gate known to a circuit.
///
/// A definition is one of:
/// - a composite gate with an `implementation`,
/// - a custom wrapper (by convention named with a leading underscore) whose
///   `subgate` names the primitive it stands for,
/// - a bare declaration, resolved by the consumer's primitive table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDefinition {
    /// Name of the gate.
    pub name: String,
    /// Number of wires the gate acts on.
    pub arity: usize,
    /// Inlined body, if the gate is composite.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation: Option<SubCircuit>,
    /// Underlying primitive gate name, for custom wrappers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subgate: Option<String>,
}

impl GateDefinition {
    /// Declare a gate without a body.
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
            implementation: None,
            subgate: None,
        }
    }

    /// Attach an inlined implementation.
    #[must_use]
    pub fn with_implementation(mut self, implementation: SubCircuit) -> Self {
        self.implementation = Some(implementation);
        self
    }

    /// Mark this gate as a wrapper around a primitive.
    #[must_use]
    pub fn with_subgate(mut self, subgate: impl Into<String>) -> Self {
        self.subgate = Some(subgate.into());
        self
    }

    /// Whether the name follows the custom-wrapper convention.
    pub fn is_custom_wrapper(&self) -> bool {
        self.name.starts_with('_')
    }
}
