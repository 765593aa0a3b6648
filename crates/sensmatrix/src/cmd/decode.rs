use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sensmatrix_frame::{FrameError, FrameReader, CHANNEL_COUNT};

use crate::cmd::{install_ctrlc_handler, source, DecodeArgs};
use crate::exit::{frame_error, CliResult, SUCCESS};
use crate::output::{print_reading, print_readings_table, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let source = source::open(&args.source)?;
    let mut reader = FrameReader::new(source);

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    // Table output is emitted one sweep-sized block at a time.
    let mut pending_rows = Vec::with_capacity(CHANNEL_COUNT);
    let mut printed = 0usize;

    while running.load(Ordering::SeqCst) {
        if args.count.is_some_and(|count| printed >= count) {
            break;
        }

        let reading = match reader.read_frame() {
            Ok(reading) => reading,
            Err(FrameError::EndOfStream) => break,
            Err(err) => return Err(frame_error("decode failed", err)),
        };

        match format {
            OutputFormat::Table => {
                pending_rows.push(reading);
                if pending_rows.len() == CHANNEL_COUNT {
                    print_readings_table(&pending_rows);
                    pending_rows.clear();
                }
            }
            _ => print_reading(&reading, format),
        }
        printed = printed.saturating_add(1);
    }

    if !pending_rows.is_empty() {
        print_readings_table(&pending_rows);
    }

    let stats = reader.stats();
    tracing::info!(
        frames = stats.frames,
        discarded = stats.discarded,
        resyncs = stats.resyncs,
        "decode finished"
    );
    Ok(SUCCESS)
}
