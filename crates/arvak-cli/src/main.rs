//! Arvak Command-Line Interface
//!
//! ```text
//! ↙↙↙↙↙↙↙↙↙↙↙↙↙↙↙↙↙↙↙↙↙↙↙↙→↗↗↑↑↑↗↑↑↑↑↗↗↙↙↙↙↙↙↙↙↙↙↙↙↙↙↙↙↙↙↙↙↙↙↙↙↙
//! ↙↗↗↗↗↗↗↗↗↗↗↗↗↗↗→↗↘↓↗↑↑↑↑↖↖          ←↑↑↑↑↑↗↘↙↘→→↗↗↗↗↗↗↗↗↗↗↗↗↗↙
//! ↙↗↗↗↗↗↗↗↗↗↗↗↗→→↗↑↑↑↑                      ↑↑↑↑↗↓↓→→→→↗↗↗↗↗↗↗↗↙
//! ↙↗↗↗↗↗↗→→→↗→→↑↑↑↑                 ↑↑↑↑↑       ↑↑↗↓↘↗→→→↗↗↗↗↗↗↙
//! ↙↗↗↗↗↗→↗↗→↘↗↑↑                   ↑↑↗↑↑↑↑↑↑↑←    ↑↑↑↗→↗↗→→↗↗↗↗↙
//!
//!                    A R V A K
//!          Reversible Debugger for Assertion-Extended QASM
//!            "Swift as the eternal steeds"
//! ```

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{compile, run, version};

/// Arvak - a reversible debugger for assertion-extended quantum programs.
#[derive(Parser)]
#[command(name = "arvak")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lower a program to assertion-free source text
    Compile {
        /// Input QASM source file
        #[arg(short, long)]
        input: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Optimization level (0 preserves layout, 1 coalesces disjoint gates)
        #[arg(long, default_value = "0")]
        opt: u8,

        /// Only emit the prefix before the (slice_index + 1)-th assertion
        #[arg(long)]
        slice_index: Option<usize>,
    },

    /// Run a program to completion, non-interactively
    Run {
        /// Input QASM source file
        #[arg(short, long)]
        input: String,
    },

    /// Show version information
    Version,
}

/// Exit codes (spec §6): 0 success, 1 parse error, 2 assertion failure, 3
/// I/O error.
fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let exit_code = match cli.command {
        Commands::Compile { input, output, opt, slice_index } => {
            compile::execute(&input, output.as_deref(), opt, slice_index)
        }
        Commands::Run { input } => run::execute(&input),
        Commands::Version => {
            version::execute();
            commands::ExitCode::Success
        }
    };

    std::process::exit(exit_code as i32);
}

pub(crate) fn report_error(prefix: &str, detail: impl std::fmt::Display) {
    eprintln!("{} {prefix}: {detail}", style("Error:").red().bold());
}
