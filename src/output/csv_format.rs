//! CSV output formatting.

use crate::contracts::{ScanEvent, Trail};
use std::io::{self, Write};

/// One row per clue of a single scan.
pub fn write_clues<W: Write>(out: &mut W, event: &ScanEvent) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["spot_id", "lat", "lon", "distance_m", "discovery_radius"])?;

    let here = event.location();
    for clue in event.clues() {
        wtr.write_record([
            clue.spot_id.as_str(),
            &clue.location.lat.to_string(),
            &clue.location.lon.to_string(),
            &format!("{:.0}", here.distance_to(&clue.location)),
            &clue.discovery_radius.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// One row per scan.
pub fn write_scans<W: Write>(out: &mut W, events: &[ScanEvent]) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record([
        "id",
        "account_id",
        "trail_id",
        "scanned_at",
        "radius_used",
        "successful",
        "clues",
    ])?;

    for event in events {
        wtr.write_record([
            event.id().to_string().as_str(),
            event.account_id().as_str(),
            event.trail_id().map_or("", |t| t.as_str()),
            &event.scanned_at().to_rfc3339(),
            &event.radius_used().to_string(),
            &event.successful().to_string(),
            &event.clues().len().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_trails<W: Write>(out: &mut W, trails: &[Trail]) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["id", "slug", "name", "spots", "center_lat", "center_lon"])?;

    for trail in trails {
        let center = trail.center();
        wtr.write_record([
            trail.id.as_str(),
            &trail.slug,
            &trail.name,
            &trail.spots.len().to_string(),
            &center.lat.to_string(),
            &center.lon.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_spots<W: Write>(out: &mut W, trail: &Trail) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["id", "slug", "name", "lat", "lon"])?;

    for spot in &trail.spots {
        wtr.write_record([
            spot.id.as_str(),
            &spot.slug,
            &spot.name,
            &spot.location.lat.to_string(),
            &spot.location.lon.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{Clue, ScanRequest};
    use crate::types::{AccountId, GeoLocation, SpotId, TrailId};

    #[test]
    fn test_scan_rows() {
        let event = ScanEvent::record(
            &ScanRequest::new(
                AccountId::new("acc").unwrap(),
                Some(TrailId::new("city").unwrap()),
            ),
            GeoLocation::new(0.0, 0.0).unwrap(),
            500.0,
            vec![Clue::new(
                SpotId::new("s-1").unwrap(),
                GeoLocation::new(0.001, 0.0).unwrap(),
                25.0,
            )],
        );

        let mut buf = Vec::new();
        write_scans(&mut buf, std::slice::from_ref(&event)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("id,account_id,trail_id"));
        assert!(lines[1].contains(",acc,city,"));
        assert!(lines[1].ends_with(",500,true,1"));

        let mut buf = Vec::new();
        write_clues(&mut buf, &event).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("s-1,0.001,0,111,25"));
    }
}
