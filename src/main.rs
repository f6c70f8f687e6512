#![allow(clippy::upper_case_acronyms)]

#[macro_use]
extern crate bitflags;
use crate::ic::{ICResult, Machine};
use clap::Parser;
use std::path::PathBuf;
use std::process;

mod ic;

/// Interpreter for INTCODE, the intermediate object format emitted by the
/// BCPL compiler.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// INTCODE object files, loaded in order into one memory image
    #[arg(value_name = "ICFILE", required = true)]
    icfiles: Vec<PathBuf>,

    /// Redirect the standard input stream of the guest program
    #[arg(short = 'i', value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Redirect the standard output stream of the guest program
    #[arg(short = 'o', value_name = "OUTPUT")]
    output: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    let mut machine = Machine::new();
    let status = match boot(&cli, &mut machine) {
        Ok(value) => i32::from(value),
        Err(error) => {
            machine.report_halt(&error);
            255
        }
    };
    machine.streams.flush();
    process::exit(status);
}

/// Redirects the standard streams, loads every object file into the shared
/// image and executes it.
fn boot(cli: &Cli, machine: &mut Machine) -> ICResult<i16> {
    if let Some(path) = &cli.input {
        machine.pipe_input(path)?;
    }
    if let Some(path) = &cli.output {
        machine.pipe_output(path)?;
    }
    for path in &cli.icfiles {
        machine.load_file(path)?;
    }
    machine.run()
}
