//! Gates command implementation.

use console::style;

use qrev_sim::GateDispatcher;

/// Execute the gates command.
pub fn execute() {
    let dispatcher = GateDispatcher::new();

    println!("{} Replayable gates:\n", style("qrev").cyan().bold());
    for (name, kind) in dispatcher.supported_names() {
        println!(
            "  {:<10} {:<10} {} target(s)",
            style(name).bold(),
            style(kind).yellow(),
            kind.num_targets()
        );
    }
    println!();
    println!("Any run of C / C- control prefixes before X, NOT, SWAP or I is accepted,");
    println!("e.g. CCCX or C-C-SWAP. Controls come first, targets last.");
    println!("Gates named _NAME are resolved through their declared subgate.");
}
