//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::contracts::{ScanEvent, Trail};
use console::style;
use std::io::{self, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Print a completed scan and its clues.
pub fn write_scan<W: Write>(out: &mut W, event: &ScanEvent) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out, "                    {} Scan", style("ferthe").cyan().bold())?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    let here = event.location();
    writeln!(out, "  {} {}", style("Scan ID:").bold(), style(event.id().short()).dim())?;
    writeln!(
        out,
        "  {} {}",
        style("Trail:").bold(),
        event.trail_id().map_or("(all trails)", |t| t.as_str())
    )?;
    writeln!(
        out,
        "  {} {:.5}, {:.5}",
        style("Location:").bold(),
        here.lat,
        here.lon
    )?;
    writeln!(out, "  {} {} m", style("Radius:").bold(), event.radius_used())?;
    writeln!(out)?;

    if event.clues().is_empty() {
        writeln!(out, "  {}", style("Nothing nearby. Keep walking.").dim())?;
    } else {
        writeln!(out, "  {}", style(THIN_RULE).dim())?;
        writeln!(
            out,
            "  {:<24}  {:>10}  {:>9}",
            style("SPOT").bold(),
            style("DISTANCE").bold(),
            style("DIRECTION").bold()
        )?;
        writeln!(out, "  {}", style(THIN_RULE).dim())?;

        for clue in event.clues() {
            let distance = here.distance_to(&clue.location);
            let direction = here.direction_to(&clue.location);
            let within = distance <= clue.discovery_radius;
            let distance_text = format!("{distance:.0} m");
            writeln!(
                out,
                "  {:<24}  {:>10}  {:>9}",
                truncate_string(clue.spot_id.as_str(), 24),
                if within {
                    style(distance_text).green().bold()
                } else {
                    style(distance_text).yellow()
                },
                direction.direction
            )?;
        }

        writeln!(out, "  {}", style(THIN_RULE).dim())?;
    }

    writeln!(out)?;
    Ok(())
}

/// Print one summary line per scan.
pub fn write_history<W: Write>(out: &mut W, events: &[ScanEvent]) -> io::Result<()> {
    if events.is_empty() {
        writeln!(out, "{}", style("No scans recorded yet.").dim())?;
        return Ok(());
    }

    for event in events {
        let marker = if event.successful() {
            style("●").green()
        } else {
            style("○").dim()
        };
        writeln!(
            out,
            "{} {}  {}  {}",
            marker,
            style(event.id().short()).dim(),
            event.scanned_at().format("%Y-%m-%d %H:%M"),
            event.summary()
        )?;
    }
    Ok(())
}

pub fn write_trails<W: Write>(out: &mut W, trails: &[Trail]) -> io::Result<()> {
    if trails.is_empty() {
        writeln!(out, "{}", style("No trails known.").dim())?;
        return Ok(());
    }

    for trail in trails {
        writeln!(
            out,
            "{:<20} {}  {}",
            style(trail.id.as_str()).cyan(),
            trail.name,
            style(format!("({} spots)", trail.spots.len())).dim()
        )?;
    }
    Ok(())
}

/// Print a trail with its options and spots.
pub fn write_trail<W: Write>(out: &mut W, trail: &Trail) -> io::Result<()> {
    let center = trail.center();
    writeln!(out, "{} {}", style(&trail.name).cyan().bold(), style(&trail.slug).dim())?;
    if let Some(description) = &trail.description {
        writeln!(out, "  {description}")?;
    }
    writeln!(
        out,
        "  {} {:.5}, {:.5}",
        style("Center:").bold(),
        center.lat,
        center.lon
    )?;
    writeln!(
        out,
        "  {} scanner {} m, discovery {} m",
        style("Radii:").bold(),
        trail.options.scanner_radius,
        trail.options.discovery_radius
    )?;
    writeln!(out)?;
    for spot in &trail.spots {
        writeln!(
            out,
            "  {} {:<24} {:.5}, {:.5}",
            style("•").dim(),
            spot.name,
            spot.location.lat,
            spot.location.lon
        )?;
    }
    Ok(())
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Truncate to at most `max_len` characters, adding an ellipsis if truncated.
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
