//! Survey data input rows.

use crate::error::{GeorefError, Result};
use crate::geometry::Point;
use crate::io::{parse_distance, parse_opt_f64, read_lines, split_record};

/// Column names required in a survey data file. Extra columns are ignored.
pub const SURVEY_COLUMNS: [&str; 8] = [
    "LLID_num", "STREAM", "TRIB_TO", "CUM_DIST", "X", "Y", "XY_Note", "COMMENT",
];

const POOL_COLUMN: &str = "Pool_num";

/// One record of field survey data.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyRow {
    /// Location id of the stream; empty when the crew left it blank.
    pub location_id: String,
    pub stream_name: String,
    pub trib_to: String,
    /// Pool number, carried for diagnostics only.
    pub pool: String,
    /// Reported cumulative distance.
    pub cum_dist: i64,
    /// Sync coordinate, present only when both X and Y were recorded.
    pub coord: Option<Point>,
    pub xy_note: String,
    pub comment: String,
}

/// Reads survey rows from a CSV file in input order. Columns are located by
/// header name; every column in [`SURVEY_COLUMNS`] must be present.
pub fn read_survey_csv(path: &str) -> Result<Vec<SurveyRow>> {
    let lines = read_lines(path)?;
    let header = match lines.first() {
        Some(line) => split_record(line),
        None => {
            return Err(GeorefError::Format {
                reason: format!("{path}: file is empty"),
            })
        }
    };
    let find = |name: &str| -> Result<usize> {
        header
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| GeorefError::Format {
                reason: format!("{path}: missing required column {name}"),
            })
    };
    let llid = find("LLID_num")?;
    let stream_name = find("STREAM")?;
    let trib_to = find("TRIB_TO")?;
    let cum_dist = find("CUM_DIST")?;
    let x = find("X")?;
    let y = find("Y")?;
    let xy_note = find("XY_Note")?;
    let comment = find("COMMENT")?;
    let pool = header.iter().position(|h| h.trim() == POOL_COLUMN);

    let mut rows = Vec::new();
    for (index, line) in lines.iter().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let row = index + 1;
        let fields = split_record(line);
        if fields.len() < header.len() {
            return Err(GeorefError::Format {
                reason: format!(
                    "{path} row {row}: expected {} fields, found {}",
                    header.len(),
                    fields.len()
                ),
            });
        }
        let coord = match (
            parse_opt_f64(&fields[x], row, "X")?,
            parse_opt_f64(&fields[y], row, "Y")?,
        ) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            // Either coordinate alone means no usable sync location.
            _ => None,
        };
        rows.push(SurveyRow {
            location_id: fields[llid].trim().to_string(),
            stream_name: fields[stream_name].clone(),
            trib_to: fields[trib_to].clone(),
            pool: pool.map(|i| fields[i].clone()).unwrap_or_default(),
            cum_dist: parse_distance(&fields[cum_dist], row, "CUM_DIST")?,
            coord,
            xy_note: fields[xy_note].clone(),
            comment: fields[comment].clone(),
        });
    }
    Ok(rows)
}
