use std::io::IsTerminal;
use std::path::Path;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use sensmatrix::{RecordSummary, StopReason};
use sensmatrix_frame::Reading;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ReadingOutput {
    channel: u8,
    value: u16,
}

#[derive(Serialize)]
struct SummaryOutput<'a> {
    path: String,
    frames: u64,
    sweeps: u64,
    discarded: u64,
    resyncs: u64,
    overwrites: u64,
    pending: usize,
    reason: &'a str,
}

/// Print one decoded reading as it arrives. Table output is buffered by the caller.
pub fn print_reading(reading: &Reading, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ReadingOutput {
                channel: reading.channel,
                value: reading.value,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Pretty => {
            println!("channel={:>2} value={:>4}", reading.channel, reading.value);
        }
        OutputFormat::Table => {}
    }
}

pub fn print_readings_table(readings: &[Reading]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["CHANNEL", "VALUE"]);
    for reading in readings {
        table.add_row(vec![reading.channel.to_string(), reading.value.to_string()]);
    }
    println!("{table}");
}

pub fn print_summary(summary: &RecordSummary, path: &Path, format: OutputFormat) {
    let reason = reason_name(summary.reason);
    match format {
        OutputFormat::Json => {
            let out = SummaryOutput {
                path: path.display().to_string(),
                frames: summary.frames,
                sweeps: summary.sweeps,
                discarded: summary.discarded,
                resyncs: summary.resyncs,
                overwrites: summary.overwrites,
                pending: summary.pending,
                reason,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"])
                .add_row(vec!["path".to_string(), path.display().to_string()])
                .add_row(vec!["frames".to_string(), summary.frames.to_string()])
                .add_row(vec!["sweeps".to_string(), summary.sweeps.to_string()])
                .add_row(vec!["discarded".to_string(), summary.discarded.to_string()])
                .add_row(vec!["resyncs".to_string(), summary.resyncs.to_string()])
                .add_row(vec!["overwrites".to_string(), summary.overwrites.to_string()])
                .add_row(vec!["pending".to_string(), summary.pending.to_string()])
                .add_row(vec!["reason".to_string(), reason.to_string()]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "path={} frames={} sweeps={} discarded={} resyncs={} overwrites={} pending={} reason={}",
                path.display(),
                summary.frames,
                summary.sweeps,
                summary.discarded,
                summary.resyncs,
                summary.overwrites,
                summary.pending,
                reason
            );
        }
    }
}

fn reason_name(reason: StopReason) -> &'static str {
    match reason {
        StopReason::SweepLimit => "sweep-limit",
        StopReason::EndOfStream => "end-of-stream",
        StopReason::Stopped => "interrupted",
    }
}
