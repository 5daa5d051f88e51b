//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - classical replay of reversible circuits",
        style("qrev").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qrev-ir   Compiled circuits, routines and the routine library");
    println!("  qrev-sim  Bit-level simulator and register extraction");
    println!("  qrev-cli  Command-line interface");
    println!();
    println!("License:    {}", style(env!("CARGO_PKG_LICENSE")).dim());
}
