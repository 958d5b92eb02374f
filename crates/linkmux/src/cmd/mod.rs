use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod simulate;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the transmitter over a JSON scenario and print every cycle.
    Simulate(SimulateArgs),
    /// Classify the symbols in a capture file.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Simulate(args) => simulate::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Scenario file (JSON).
    pub scenario: PathBuf,
    /// Override the scenario's cycle count.
    #[arg(long)]
    pub cycles: Option<u64>,
    /// Also write every emitted symbol to a capture file.
    #[arg(long, value_name = "FILE")]
    pub capture: Option<PathBuf>,
    /// Exit with a failure code if payload chunks are left unsent.
    #[arg(long)]
    pub require_drained: bool,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Capture file written by `simulate --capture` or `--format raw`.
    pub capture: PathBuf,
    /// Fail on USER symbols whose checksum does not match their data.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
