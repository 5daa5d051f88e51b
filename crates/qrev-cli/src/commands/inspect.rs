//! Inspect command implementation.

use anyhow::{Context, Result};

use qrev_sim::{InspectionReport, ReversibleProgram};

use super::common::{load_circuit, load_layout};
use crate::config::OutputFormat;

/// Execute the inspect command.
pub fn execute(input: &str, layout: Option<&str>, format: OutputFormat) -> Result<()> {
    let circuit = load_circuit(input)?;
    let layout = load_layout(layout)?;

    let program = ReversibleProgram::from_circuit(&circuit, &layout)
        .with_context(|| format!("Failed to replay {input}"))?;
    let report = InspectionReport::new(&program, circuit.num_wires())?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => print!("{report}"),
    }

    Ok(())
}
