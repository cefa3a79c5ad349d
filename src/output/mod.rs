//! Output formatting module.
//!
//! Renders scan events and trails as plain text, JSON or CSV. Every renderer
//! writes to a generic [`Write`] so the CLI can target stdout and tests can
//! target a buffer.

mod csv_format;
mod json_format;
mod plain;

pub use json_format::write_json;
pub use plain::{print_error, print_info, print_success, print_warning};

use crate::cli::OutputFormat;
use crate::contracts::{ScanEvent, Trail};
use std::io::{self, Write};

/// Print one completed scan.
pub fn print_scan(event: &ScanEvent, format: OutputFormat) -> io::Result<()> {
    write_scan(&mut io::stdout().lock(), event, format)
}

pub fn write_scan<W: Write>(out: &mut W, event: &ScanEvent, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => plain::write_scan(out, event),
        OutputFormat::Json => json_format::write_json(out, event),
        OutputFormat::Csv => csv_format::write_clues(out, event),
    }
}

/// Print a list of scans, newest first as given.
pub fn print_history(events: &[ScanEvent], format: OutputFormat) -> io::Result<()> {
    write_history(&mut io::stdout().lock(), events, format)
}

pub fn write_history<W: Write>(
    out: &mut W,
    events: &[ScanEvent],
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Plain => plain::write_history(out, events),
        OutputFormat::Json => json_format::write_json(out, &events),
        OutputFormat::Csv => csv_format::write_scans(out, events),
    }
}

pub fn print_trails(trails: &[Trail], format: OutputFormat) -> io::Result<()> {
    write_trails(&mut io::stdout().lock(), trails, format)
}

pub fn write_trails<W: Write>(out: &mut W, trails: &[Trail], format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => plain::write_trails(out, trails),
        OutputFormat::Json => json_format::write_json(out, &trails),
        OutputFormat::Csv => csv_format::write_trails(out, trails),
    }
}

/// Print a single trail with its spots.
pub fn print_trail(trail: &Trail, format: OutputFormat) -> io::Result<()> {
    let mut out = io::stdout().lock();
    match format {
        OutputFormat::Plain => plain::write_trail(&mut out, trail),
        OutputFormat::Json => json_format::write_json(&mut out, trail),
        OutputFormat::Csv => csv_format::write_spots(&mut out, trail),
    }
}
