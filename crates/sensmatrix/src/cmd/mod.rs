use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{Args, Subcommand};
use sensmatrix_sink::{DEFAULT_BASEDIR, DEFAULT_FILENAME_TEMPLATE};

use crate::exit::{CliError, CliResult};
use crate::output::OutputFormat;

pub mod decode;
pub mod record;
pub mod simulate;
pub mod source;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode frames, assemble 64-channel sweeps and append them to a CSV log.
    Record(RecordArgs),
    /// Print decoded (channel, value) readings.
    Decode(DecodeArgs),
    /// Write a synthetic sensor byte stream to stdout.
    Simulate(SimulateArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Record(args) => record::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Simulate(args) => simulate::run(args),
    }
}

#[derive(Args, Debug, Default)]
pub struct SimArgs {
    /// Seed for the synthetic sensor's value generator.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Synthetic sensor delay per read, in microseconds.
    #[arg(long, value_name = "MICROS", default_value = "100")]
    pub pace_us: u64,
}

/// Where protocol bytes come from. Falls back to the synthetic sensor.
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Read from a file or device node ("-" for stdin).
    #[arg(long, value_name = "PATH", conflicts_with = "serial")]
    pub input: Option<PathBuf>,
    /// Read from a serial port (requires the `serial` feature).
    #[arg(long, value_name = "PORT")]
    pub serial: Option<String>,
    /// Serial baud rate.
    #[arg(long, default_value = "115200")]
    pub baud: u32,
    #[command(flatten)]
    pub sim: SimArgs,
}

#[derive(Args, Debug)]
pub struct RecordArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Directory for CSV logs.
    #[arg(
        long,
        value_name = "DIR",
        env = "SENSMATRIX_BASEDIR",
        default_value = DEFAULT_BASEDIR
    )]
    pub basedir: PathBuf,
    /// strftime-style log file name, rendered once at startup.
    #[arg(
        long,
        value_name = "TEMPLATE",
        env = "SENSMATRIX_FILENAME",
        default_value = DEFAULT_FILENAME_TEMPLATE
    )]
    pub filename: String,
    /// Stop after writing N sweeps.
    #[arg(long)]
    pub sweeps: Option<u64>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Exit after decoding N frames.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub sim: SimArgs,
    /// Stop after N frames. Default: run until the reader goes away.
    #[arg(long)]
    pub frames: Option<u64>,
}

/// First Ctrl-C asks the loop to stop after the current frame; a second one
/// exits immediately, since a stalled source never returns to the loop.
pub fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        if !running.swap(false, Ordering::SeqCst) {
            std::process::exit(130);
        }
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
