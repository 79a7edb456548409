//! File input and output helpers for survey and calibration data.

use std::fs::File;
use std::io::{self, Read, Write};

use crate::error::{GeorefError, Result};

pub mod geojson;
pub mod placed;
pub mod sdi;
pub mod survey;

/// Reads a file to string.
pub fn read_to_string(path: &str) -> io::Result<String> {
    let mut buffer = String::new();
    File::open(path)?.read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Reads a file as a vector of lines.
pub fn read_lines(path: &str) -> io::Result<Vec<String>> {
    Ok(read_to_string(path)?
        .lines()
        .map(|line| line.to_string())
        .collect())
}

/// Writes a string to a file, replacing any existing contents.
pub fn write_string(path: &str, contents: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())
}

/// Splits one CSV record into fields, honoring double-quoted fields with
/// doubled-quote escapes.
pub fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

/// Renders one field for a CSV record, quoting it when it contains the
/// delimiter, a quote, or a line break.
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub(crate) fn parse_f64(value: &str, row: usize, field: &str) -> Result<f64> {
    value.trim().parse().map_err(|_| GeorefError::Parse {
        row,
        field: field.to_string(),
        value: value.to_string(),
    })
}

pub(crate) fn parse_opt_f64(value: &str, row: usize, field: &str) -> Result<Option<f64>> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse_f64(value, row, field).map(Some)
    }
}

/// Parses a non-negative integer field, as reported survey distances are
/// whole units.
pub(crate) fn parse_distance(value: &str, row: usize, field: &str) -> Result<i64> {
    let parsed: i64 = value.trim().parse().map_err(|_| GeorefError::Parse {
        row,
        field: field.to_string(),
        value: value.to_string(),
    })?;
    if parsed < 0 {
        return Err(GeorefError::Parse {
            row,
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_record_plain() {
        assert_eq!(split_record("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn split_record_quoted() {
        assert_eq!(
            split_record("a,\"b, with comma\",\"say \"\"hi\"\"\""),
            vec!["a", "b, with comma", "say \"hi\""]
        );
    }

    #[test]
    fn split_record_trailing_empty_field() {
        assert_eq!(split_record("a,,"), vec!["a", "", ""]);
    }

    #[test]
    fn csv_field_quotes_when_needed() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn parse_distance_rejects_negatives_and_fractions() {
        assert!(parse_distance("250", 2, "CUM_DIST").is_ok());
        assert!(parse_distance("-1", 2, "CUM_DIST").is_err());
        assert!(parse_distance("12.5", 2, "CUM_DIST").is_err());
    }
}
