//! Human-readable and serializable summaries of a replayed program.

use std::fmt;

use serde::Serialize;

use crate::error::SimResult;
use crate::program::{ReplayStats, ReversibleProgram};
use crate::register::{BitRange, RegisterValue};

/// One decoded register in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    /// Register name.
    pub name: String,
    /// Bits covered.
    pub range: BitRange,
    /// Decoded value.
    pub value: RegisterValue,
}

/// Snapshot of a replayed program: sizes, full state and every register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectionReport {
    /// Wires declared by the source circuit.
    pub num_qubits: usize,
    /// Bits allocated by the program.
    pub num_bits: usize,
    /// Full final state, index 0 first.
    pub state: String,
    /// Gate counts.
    pub stats: ReplayStats,
    /// Registers in catalog order.
    pub entries: Vec<ReportEntry>,
}

impl InspectionReport {
    /// Build a report for `program`, replayed from a source with
    /// `num_qubits` wires.
    pub fn new(program: &ReversibleProgram, num_qubits: usize) -> SimResult<Self> {
        let values = program.extract_all()?;
        let entries = program
            .catalog()
            .iter()
            .zip(values.iter())
            .map(|(descriptor, (_, value))| ReportEntry {
                name: descriptor.name.clone(),
                range: descriptor.range,
                value: value.clone(),
            })
            .collect();
        Ok(Self {
            num_qubits,
            num_bits: program.num_bits(),
            state: program.result(),
            stats: program.stats(),
            entries,
        })
    }
}

impl fmt::Display for InspectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "n qbits {}", self.num_qubits)?;
        writeln!(f, "n rbits {}", self.num_bits)?;
        writeln!(f, "{:<40} ->\t{}", "state obtained", self.state)?;
        for entry in &self.entries {
            writeln!(f, "{:<20} [{}] ->\t{}", entry.name, entry.range, entry.value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::GateKind;
    use crate::register::RegisterDescriptor;

    #[test]
    fn test_report_lines() {
        let mut program = ReversibleProgram::new();
        program.allocate_register(4, Some("x")).unwrap();
        program.apply(GateKind::Invert, &[3]).unwrap();
        program
            .declare_register(RegisterDescriptor::integers("n", 0, 1, 4))
            .unwrap();

        let report = InspectionReport::new(&program, 4).unwrap();
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.stats.applied, 1);

        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "n qbits 4");
        assert_eq!(lines[1], "n rbits 4");
        assert!(lines[2].starts_with("state obtained"));
        assert!(lines[2].ends_with("->\t0001"));
        assert!(lines[3].starts_with("x "));
        assert!(lines[3].ends_with("[0..4] ->\t0001"));
        assert!(lines[4].ends_with("[0..4] ->\t(1,)"));
    }

    #[test]
    fn test_report_serializes() {
        let mut program = ReversibleProgram::new();
        program.allocate_register(2, Some("b")).unwrap();
        let report = InspectionReport::new(&program, 2).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["state"], "00");
        assert_eq!(json["entries"][0]["name"], "b");
        assert_eq!(json["entries"][0]["value"], "00");
    }
}
