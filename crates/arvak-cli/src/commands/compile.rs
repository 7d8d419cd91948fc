//! `compile` subcommand: lower a program to assertion-free source text.

use console::style;

use arvak_compile::CompileSettings;
use arvak_debugger::Debugger;

use super::{read_source, ExitCode};

pub fn execute(input: &str, output: Option<&str>, opt: u8, slice_index: Option<usize>) -> ExitCode {
    let source = match read_source(input) {
        Ok(source) => source,
        Err(code) => return code,
    };

    let mut debugger = Debugger::init();
    if let Err(err) = debugger.load_code(&source) {
        crate::report_error("parse error", err);
        return ExitCode::ParseError;
    }

    let compiled = match debugger.compile(CompileSettings { opt, slice_index }) {
        Ok(text) => text,
        Err(err) => {
            crate::report_error("compilation failed", err);
            return ExitCode::ParseError;
        }
    };

    match output {
        Some(path) => {
            if let Err(err) = std::fs::write(path, &compiled) {
                crate::report_error("failed to write output file", err);
                return ExitCode::IoError;
            }
            println!("{} wrote {}", style("✓").green().bold(), path);
        }
        None => print!("{compiled}"),
    }

    ExitCode::Success
}
