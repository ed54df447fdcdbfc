use std::io::{self, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use marmdds_frame::FrameSpec;
use serde::Serialize;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Reply bytes verbatim (dry run: the encoded frame).
    Raw,
    Json,
    Table,
    Pretty,
}

/// What was (or would be) uploaded.
#[derive(Debug, Clone, Serialize)]
pub struct UploadSummary {
    pub device: String,
    pub mode: &'static str,
    pub mode_code: u8,
    pub format: &'static str,
    pub format_index: u8,
    pub period: u32,
    pub prescaler: u16,
    pub sample_bytes: usize,
    pub frame_size: usize,
}

impl UploadSummary {
    pub fn new(device: String, spec: &FrameSpec, sample_bytes: usize, frame_size: usize) -> Self {
        Self {
            device,
            mode: spec.mode.name(),
            mode_code: spec.mode.code(),
            format: spec.format.name(),
            format_index: spec.format.index(),
            period: spec.period,
            prescaler: spec.prescaler,
            sample_bytes,
            frame_size,
        }
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("DEVICE", self.device.clone()),
            ("MODE", format!("{} ({})", self.mode, self.mode_code)),
            ("FORMAT", format!("{} ({})", self.format, self.format_index)),
            ("PERIOD", self.period.to_string()),
            ("PRESCALER", self.prescaler.to_string()),
            ("SAMPLE BYTES", self.sample_bytes.to_string()),
            ("FRAME SIZE", self.frame_size.to_string()),
        ]
    }
}

#[derive(Serialize)]
struct ReplyOutput<'a> {
    upload: &'a UploadSummary,
    reply_size: usize,
    reply: String,
}

pub fn print_reply<W: Write>(
    out: &mut W,
    reply: &[u8],
    summary: &UploadSummary,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Raw => print_raw(out, reply),
        OutputFormat::Json => {
            let body = ReplyOutput {
                upload: summary,
                reply_size: reply.len(),
                reply: reply_preview(reply),
            };
            writeln!(
                out,
                "{}",
                serde_json::to_string(&body).unwrap_or_else(|_| "{}".to_string())
            )
        }
        OutputFormat::Table => {
            let mut table = summary_table(summary);
            table.add_row(vec!["REPLY".to_string(), reply_preview(reply)]);
            writeln!(out, "{table}")
        }
        OutputFormat::Pretty => writeln!(
            out,
            "device={} frame={}B samples={}B reply={}",
            summary.device,
            summary.frame_size,
            summary.sample_bytes,
            reply_preview(reply)
        ),
    }
}

/// Describe a frame without sending it. Raw output writes the frame itself.
pub fn print_dry_run<W: Write>(
    out: &mut W,
    frame: &[u8],
    summary: &UploadSummary,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Raw => print_raw(out, frame),
        OutputFormat::Json => writeln!(
            out,
            "{}",
            serde_json::to_string(summary).unwrap_or_else(|_| "{}".to_string())
        ),
        OutputFormat::Table => writeln!(out, "{}", summary_table(summary)),
        OutputFormat::Pretty => writeln!(
            out,
            "mode={} format={} period={} prescaler={} samples={}B frame={}B",
            summary.mode,
            summary.format,
            summary.period,
            summary.prescaler,
            summary.sample_bytes,
            summary.frame_size
        ),
    }
}

pub fn print_raw<W: Write>(out: &mut W, data: &[u8]) -> io::Result<()> {
    out.write_all(data)?;
    out.flush()
}

fn summary_table(summary: &UploadSummary) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["FIELD", "VALUE"]);
    for (field, value) in summary.rows() {
        table.add_row(vec![field.to_string(), value]);
    }
    table
}

fn reply_preview(reply: &[u8]) -> String {
    match std::str::from_utf8(reply) {
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", reply.len()),
    }
}
