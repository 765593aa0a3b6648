use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use sensmatrix::Recorder;
use sensmatrix_sink::{LogConfig, LogWriter};

use crate::cmd::{install_ctrlc_handler, source, RecordArgs};
use crate::exit::{pipeline_error, sink_error, CliResult, SUCCESS};
use crate::output::{print_summary, OutputFormat};

pub fn run(args: RecordArgs, format: OutputFormat) -> CliResult<i32> {
    let config = LogConfig::default()
        .with_basedir(&args.basedir)
        .with_filename_template(&args.filename);
    let writer = LogWriter::new(config).map_err(|err| sink_error("log setup failed", err))?;
    let path = writer.path().to_path_buf();

    let source = source::open(&args.source)?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut recorder = Recorder::new(source, writer);
    let summary = recorder
        .run(args.sweeps, &running)
        .map_err(|err| pipeline_error("record failed", err))?;
    recorder
        .finish()
        .map_err(|err| pipeline_error("closing log failed", err))?;

    print_summary(&summary, &path, format);
    Ok(SUCCESS)
}
