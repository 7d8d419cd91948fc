//! `version` subcommand.

use console::style;

pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!("{} {} - reversible debugger for assertion-extended QASM", style("Arvak").cyan().bold(), style(format!("v{version}")).yellow());
    println!();
    println!("Components:");
    println!("  arvak-qasm      Preprocessor, program model, assertion grammar");
    println!("  arvak-state     Complex amplitude and density-matrix utilities");
    println!("  arvak-engine    Reversible execution engine");
    println!("  arvak-diag      Static and dynamic diagnostics");
    println!("  arvak-compile   Assertion-free compilation pass");
    println!("  arvak-debugger  Public operation table");
    println!();
    println!("Repository: {}", style("https://github.com/hiq-lab/arvak").underlined());
    println!("License:    {}", style("Apache-2.0").dim());
}
