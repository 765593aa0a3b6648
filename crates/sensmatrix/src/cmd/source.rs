use std::fs::File;
use std::io::{self, BufReader, Read};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use sensmatrix_sim::{FauxSensor, SimConfig};

use crate::cmd::{SimArgs, SourceArgs};
use crate::exit::{io_error, CliResult};

/// Open the byte source selected on the command line.
pub fn open(args: &SourceArgs) -> CliResult<Box<dyn Read>> {
    if let Some(port) = &args.serial {
        return open_serial(port, args.baud);
    }

    match &args.input {
        Some(path) if path.as_os_str() == "-" => {
            tracing::info!("reading protocol bytes from stdin");
            Ok(Box::new(io::stdin().lock()))
        }
        Some(path) => {
            let file = File::open(path)
                .map_err(|err| io_error(&format!("cannot open {}", path.display()), err))?;
            tracing::info!(path = %path.display(), "reading protocol bytes from file");
            Ok(Box::new(BufReader::new(file)))
        }
        None => {
            tracing::info!(seed = ?args.sim.seed, "no input given, using synthetic sensor");
            Ok(synthetic(&args.sim, None))
        }
    }
}

/// Build a synthetic sensor, seeded when a seed was given.
pub fn synthetic(args: &SimArgs, frames: Option<u64>) -> Box<dyn Read> {
    let config = SimConfig {
        pace: Duration::from_micros(args.pace_us),
        frames,
    };
    match args.seed {
        Some(seed) => Box::new(FauxSensor::with_rng(StdRng::seed_from_u64(seed), config)),
        None => Box::new(FauxSensor::with_config(config)),
    }
}

#[cfg(feature = "serial")]
const SERIAL_POLL: Duration = Duration::from_millis(500);

#[cfg(feature = "serial")]
fn open_serial(port: &str, baud: u32) -> CliResult<Box<dyn Read>> {
    let link = serialport::new(port, baud)
        .timeout(SERIAL_POLL)
        .open()
        .map_err(|err| {
            crate::exit::CliError::new(
                crate::exit::FAILURE,
                format!("cannot open serial port {port}: {err}"),
            )
        })?;
    tracing::info!(port, baud, "reading protocol bytes from serial port");
    Ok(Box::new(SerialLink { port: link }))
}

#[cfg(not(feature = "serial"))]
fn open_serial(port: &str, _baud: u32) -> CliResult<Box<dyn Read>> {
    Err(crate::exit::CliError::new(
        crate::exit::USAGE,
        format!("cannot open {port}: built without serial support (enable the `serial` feature)"),
    ))
}

/// Serial port whose read timeouts are retried, so reads block until data arrives.
#[cfg(feature = "serial")]
struct SerialLink {
    port: Box<dyn serialport::SerialPort>,
}

#[cfg(feature = "serial")]
impl Read for SerialLink {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.port.read(buf) {
                Err(err) if err.kind() == io::ErrorKind::TimedOut => continue,
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use sensmatrix_frame::{read_frame, CHANNEL_COUNT};

    use super::*;

    #[test]
    fn seeded_synthetic_sources_match() {
        let args = SimArgs {
            seed: Some(42),
            pace_us: 0,
        };
        let mut a = synthetic(&args, Some(10));
        let mut b = synthetic(&args, Some(10));
        let mut wa = Vec::new();
        let mut wb = Vec::new();
        a.read_to_end(&mut wa).unwrap();
        b.read_to_end(&mut wb).unwrap();
        assert_eq!(wa.len(), 30);
        assert_eq!(wa, wb);
    }

    #[test]
    fn synthetic_is_default_source() {
        let args = SourceArgs {
            sim: SimArgs {
                seed: Some(1),
                pace_us: 0,
            },
            ..SourceArgs::default()
        };
        let mut source = open(&args).unwrap();
        for channel in 0..CHANNEL_COUNT as u8 {
            assert_eq!(read_frame(&mut source).unwrap().channel, channel);
        }
    }

    #[test]
    fn missing_input_file_fails() {
        let args = SourceArgs {
            input: Some("/nonexistent/sensmatrix/input.bin".into()),
            ..SourceArgs::default()
        };
        let err = open(&args).err().expect("open should fail");
        assert_eq!(err.code, crate::exit::FAILURE);
    }

    #[cfg(not(feature = "serial"))]
    #[test]
    fn serial_without_feature_is_usage_error() {
        let args = SourceArgs {
            serial: Some("/dev/ttyUSB0".to_string()),
            ..SourceArgs::default()
        };
        let err = open(&args).err().expect("open should fail");
        assert_eq!(err.code, crate::exit::USAGE);
    }
}
