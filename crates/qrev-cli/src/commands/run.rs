//! Run command implementation.

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;
use tracing::info;

use qrev_sim::{AppliedGate, RegisterValue, ReplayStats, ReversibleProgram};

use super::common::{load_circuit, load_layout, print_registers, registers_to_json};
use crate::config::OutputFormat;

#[derive(Serialize)]
struct RunOutput<'a> {
    circuit: &'a str,
    state: String,
    registers: serde_json::Map<String, serde_json::Value>,
    stats: ReplayStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    history: Option<&'a [AppliedGate]>,
}

/// Execute the run command.
pub fn execute(
    input: &str,
    layout: Option<&str>,
    format: OutputFormat,
    registers: &[String],
    show_history: bool,
) -> Result<()> {
    let circuit = load_circuit(input)?;
    let layout = load_layout(layout)?;
    info!(
        "Loaded {}: {} wires, {} ops, {} layout registers",
        input,
        circuit.num_wires(),
        circuit.num_ops(),
        layout.len()
    );

    let program = ReversibleProgram::from_circuit(&circuit, &layout)
        .with_context(|| format!("Failed to replay {input}"))?;

    let values: Vec<(String, RegisterValue)> = if registers.is_empty() {
        program
            .extract_all()?
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    } else {
        registers
            .iter()
            .map(|name| Ok((name.clone(), program.extract(name)?)))
            .collect::<Result<_>>()?
    };
    let entries = values.iter().map(|(name, value)| (name.as_str(), value));

    match format {
        OutputFormat::Json => {
            let output = RunOutput {
                circuit: circuit.name(),
                state: program.result(),
                registers: registers_to_json(entries)?,
                stats: program.stats(),
                history: show_history.then(|| program.history()),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => {
            println!(
                "{} Replayed {} ({} wires, {} ops)",
                style("→").cyan().bold(),
                style(input).green(),
                circuit.num_wires(),
                circuit.num_ops()
            );
            println!("\n  {:<20} {}", style("state").bold(), style(program.result()).cyan());
            print_registers(entries);

            let stats = program.stats();
            println!(
                "\n  Gates: {} fired, {} skipped",
                style(stats.applied).green(),
                style(stats.skipped).yellow()
            );

            if show_history {
                println!("\nHistory:");
                for (i, gate) in program.history().iter().enumerate() {
                    let mark = if gate.fired {
                        style("●").green()
                    } else {
                        style("○").dim()
                    };
                    println!("  {i:>5} {mark} {}", gate.op);
                }
            }
        }
    }

    Ok(())
}
