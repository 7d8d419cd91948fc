//! `run` subcommand: execute a program to completion, non-interactively.

use console::style;

use arvak_debugger::Debugger;

use super::{read_source, ExitCode};

pub fn execute(input: &str) -> ExitCode {
    let source = match read_source(input) {
        Ok(source) => source,
        Err(code) => return code,
    };

    let mut debugger = Debugger::init();
    if let Err(err) = debugger.load_code(&source) {
        crate::report_error("parse error", err);
        return ExitCode::ParseError;
    }

    let failures = match debugger.run_all() {
        Ok(count) => count,
        Err(err) => {
            crate::report_error("execution failed", err);
            return ExitCode::ParseError;
        }
    };

    if failures == 0 {
        println!("{} program finished, all assertions passed", style("✓").green().bold());
        ExitCode::Success
    } else {
        println!("{} {failures} assertion(s) failed", style("✗").red().bold());
        ExitCode::AssertionFailure
    }
}
