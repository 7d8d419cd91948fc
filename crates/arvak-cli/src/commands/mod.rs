//! CLI subcommand implementations.

pub mod compile;
pub mod run;
pub mod version;

/// Process exit codes (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    ParseError = 1,
    AssertionFailure = 2,
    IoError = 3,
}

pub(crate) fn read_source(path: &str) -> Result<String, ExitCode> {
    std::fs::read_to_string(path).map_err(|err| {
        crate::report_error("failed to read input file", err);
        ExitCode::IoError
    })
}
