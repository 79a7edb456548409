//! Stream distance information codec: the reviewable CSV form of a
//! calibration table, one row per segment.

use std::fmt::Write as _;

use log::warn;

use crate::calibration::{
    CalibrationConfig, CalibrationSegment, CalibrationTable, StreamCalibration, SyncPoint,
};
use crate::error::{GeorefError, Result};
use crate::geometry::Point;
use crate::io::{csv_field, parse_f64, parse_opt_f64, read_lines, split_record, write_string};

/// Column names of the persisted table, in order.
pub const SDI_COLUMNS: [&str; 16] = [
    "LocationID",
    "Stream_Name",
    "Trib_To",
    "Begin_Survey_Cum_Dist",
    "Begin_Streamline_Cum_Dist",
    "Begin_X_coord",
    "Begin_Y_coord",
    "Begin_XY_Note",
    "Begin_Comment",
    "End_Survey_Cum_Dist",
    "End_Streamline_Cum_Dist",
    "End_X_coord",
    "End_Y_coord",
    "End_XY_Note",
    "End_Comment",
    "Adj_Factor",
];

/// Writes the calibration table, fully replacing the file. Rows are ordered
/// by location id, then segment order.
pub fn write_sdi_csv(
    path: &str,
    table: &CalibrationTable,
    config: &CalibrationConfig,
) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "{}", SDI_COLUMNS.join(","));
    for stream in table.iter() {
        for segment in &stream.segments {
            let mut fields: Vec<String> = Vec::with_capacity(SDI_COLUMNS.len());
            // Leading apostrophe keeps spreadsheet tools from rewriting long
            // numeric ids in exponent form.
            fields.push(format!("'{}'", stream.id));
            fields.push(stream.name.clone());
            fields.push(stream.trib_to.clone());
            push_sync_point(&mut fields, Some(&segment.begin), config.default_begin_dist);
            push_sync_point(&mut fields, segment.end.as_ref(), config.default_end_dist);
            fields.push(segment.factor.to_string());
            let rendered: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
            let _ = writeln!(out, "{}", rendered.join(","));
        }
    }
    write_string(path, &out)?;
    Ok(())
}

fn push_sync_point(fields: &mut Vec<String>, point: Option<&SyncPoint>, sentinel_dist: f64) {
    match point {
        Some(p) => {
            fields.push(p.survey_dist.to_string());
            fields.push(p.stream_dist.to_string());
            match p.coord {
                Some(c) => {
                    fields.push(c.x.to_string());
                    fields.push(c.y.to_string());
                }
                None => {
                    fields.push(String::new());
                    fields.push(String::new());
                }
            }
            fields.push(p.xy_note.clone());
            fields.push(p.comment.clone());
        }
        None => {
            fields.push(sentinel_dist.to_string());
            fields.push(sentinel_dist.to_string());
            for _ in 0..4 {
                fields.push(String::new());
            }
        }
    }
}

struct SyncColumns {
    prefix: &'static str,
    survey: usize,
    stream: usize,
    x: usize,
    y: usize,
    note: usize,
    comment: usize,
}

struct Columns {
    id: usize,
    name: usize,
    trib_to: usize,
    begin: SyncColumns,
    end: SyncColumns,
    factor: usize,
}

fn find_column(header: &[String], name: &str, path: &str) -> Result<usize> {
    header
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| GeorefError::Format {
            reason: format!("{path}: missing required column {name}"),
        })
}

fn locate_sync(header: &[String], prefix: &'static str, path: &str) -> Result<SyncColumns> {
    Ok(SyncColumns {
        prefix,
        survey: find_column(header, &format!("{prefix}Survey_Cum_Dist"), path)?,
        stream: find_column(header, &format!("{prefix}Streamline_Cum_Dist"), path)?,
        x: find_column(header, &format!("{prefix}X_coord"), path)?,
        y: find_column(header, &format!("{prefix}Y_coord"), path)?,
        note: find_column(header, &format!("{prefix}XY_Note"), path)?,
        comment: find_column(header, &format!("{prefix}Comment"), path)?,
    })
}

fn locate(header: &[String], path: &str) -> Result<Columns> {
    Ok(Columns {
        id: find_column(header, "LocationID", path)?,
        name: find_column(header, "Stream_Name", path)?,
        trib_to: find_column(header, "Trib_To", path)?,
        begin: locate_sync(header, "Begin_", path)?,
        end: locate_sync(header, "End_", path)?,
        factor: find_column(header, "Adj_Factor", path)?,
    })
}

fn read_sync_point(fields: &[String], cols: &SyncColumns, row: usize) -> Result<SyncPoint> {
    let prefix = cols.prefix;
    let survey = parse_f64(
        &fields[cols.survey],
        row,
        &format!("{prefix}Survey_Cum_Dist"),
    )?;
    let stream = parse_f64(
        &fields[cols.stream],
        row,
        &format!("{prefix}Streamline_Cum_Dist"),
    )?;
    let x = parse_opt_f64(&fields[cols.x], row, &format!("{prefix}X_coord"))?;
    let y = parse_opt_f64(&fields[cols.y], row, &format!("{prefix}Y_coord"))?;
    let coord = match (x, y) {
        (Some(x), Some(y)) => Some(Point::new(x, y)),
        (None, None) => None,
        (Some(_), None) => {
            return Err(GeorefError::Parse {
                row,
                field: format!("{prefix}Y_coord"),
                value: String::new(),
            })
        }
        (None, Some(_)) => {
            return Err(GeorefError::Parse {
                row,
                field: format!("{prefix}X_coord"),
                value: String::new(),
            })
        }
    };
    Ok(SyncPoint::new(
        coord,
        survey,
        stream,
        fields[cols.note].clone(),
        fields[cols.comment].clone(),
    ))
}

/// Reads a calibration table, regrouping contiguous rows that share a
/// location id. An id that reappears non-contiguously replaces the earlier
/// entry with a warning, mirroring the builder.
pub fn read_sdi_csv(path: &str, config: &CalibrationConfig) -> Result<CalibrationTable> {
    let lines = read_lines(path)?;
    let header = match lines.first() {
        Some(line) => split_record(line),
        None => {
            return Err(GeorefError::Format {
                reason: format!("{path}: file is empty"),
            })
        }
    };
    let cols = locate(&header, path)?;

    let mut table = CalibrationTable::new();
    let mut current: Option<StreamCalibration> = None;
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
        let id = fields[cols.id].trim().trim_matches('\'').to_string();
        let begin = read_sync_point(&fields, &cols.begin, row)?;
        let end_survey = parse_f64(&fields[cols.end.survey], row, "End_Survey_Cum_Dist")?;
        let end = if end_survey == config.default_end_dist {
            None
        } else {
            Some(read_sync_point(&fields, &cols.end, row)?)
        };
        let factor = parse_f64(&fields[cols.factor], row, "Adj_Factor")?;

        let mut stream = match current.take() {
            Some(s) if s.id == id => s,
            other => {
                if let Some(done) = other {
                    store(&mut table, done);
                }
                StreamCalibration::new(
                    id,
                    fields[cols.name].clone(),
                    fields[cols.trib_to].clone(),
                )
            }
        };
        stream.segments.push(CalibrationSegment { begin, end, factor });
        current = Some(stream);
    }
    if let Some(done) = current {
        store(&mut table, done);
    }
    Ok(table)
}

fn store(table: &mut CalibrationTable, stream: StreamCalibration) {
    let id = stream.id.clone();
    if table.insert(stream).is_some() {
        warn!(
            "location id {:?} reappeared after other streams in the table; earlier rows replaced",
            id
        );
    }
}
