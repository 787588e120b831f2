use crate::metadata::CaptureDate;
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDateTime};
use exif::{In, Reader, Tag};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub fn read_capture_date(path: &Path) -> Result<Option<CaptureDate>> {
    let file = File::open(path)
        .with_context(|| format!("could not open file for EXIF: {}", path.display()))?;
    let mut buf = BufReader::new(file);
    let exif = Reader::new()
        .read_from_container(&mut buf)
        .with_context(|| format!("could not parse EXIF: {}", path.display()))?;

    let Some(field) = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY) else {
        return Ok(None);
    };
    let raw = field.display_value().to_string();

    Ok(parse_date(&raw).map(|dt| CaptureDate {
        year: dt.year(),
        month: dt.format("%b").to_string(),
    }))
}

fn parse_date(input: &str) -> Option<NaiveDateTime> {
    let normalized = input.trim().trim_matches('"');

    let candidates = [
        "%Y:%m:%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    candidates
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(normalized, fmt).ok())
}
