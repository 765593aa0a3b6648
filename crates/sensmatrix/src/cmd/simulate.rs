use std::io::{self, Write};

use crate::cmd::{source, SimulateArgs};
use crate::exit::{io_error, CliResult, SUCCESS};

pub fn run(args: SimulateArgs) -> CliResult<i32> {
    let mut sensor = source::synthetic(&args.sim, args.frames);
    let mut stdout = io::stdout().lock();

    let result = io::copy(&mut sensor, &mut stdout).and_then(|bytes| {
        stdout.flush()?;
        Ok(bytes)
    });

    match result {
        Ok(bytes) => {
            tracing::debug!(bytes, "synthetic stream finished");
            Ok(SUCCESS)
        }
        // The consumer hung up; that is how an unbounded stream normally ends.
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(SUCCESS),
        Err(err) => Err(io_error("simulate failed", err)),
    }
}
