//! Places survey rows onto stream geometry using a calibration table.

use log::{info, warn};

use crate::builder::GeometryProvider;
use crate::calibration::{CalibrationConfig, CalibrationTable};
use crate::error::Result;
use crate::geometry::{Point, Polyline};
use crate::io::survey::SurveyRow;

/// A survey row located on its stream.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedPoint {
    /// Position on the stream geometry.
    pub point: Point,
    pub location_id: String,
    pub stream_name: String,
    pub trib_to: String,
    pub pool: String,
    /// Distance as reported by the survey.
    pub survey_dist: i64,
    /// Calibrated distance along the stream geometry.
    pub adjusted_dist: f64,
    pub xy_note: String,
    pub comment: String,
}

/// Converts survey rows into placed points. Rows without a location id are
/// skipped with a warning; a location id missing from the table or from the
/// geometry source is fatal, so a run never yields a partially calibrated
/// dataset.
pub fn place_survey_points<P: GeometryProvider>(
    rows: &[SurveyRow],
    table: &CalibrationTable,
    provider: &P,
    config: &CalibrationConfig,
) -> Result<Vec<PlacedPoint>> {
    let mut placed = Vec::new();
    let mut current: Option<(String, Polyline)> = None;
    for (index, row) in rows.iter().enumerate() {
        if row.location_id.is_empty() {
            warn!(
                "no location id for stream {:?} trib to {:?}, pool {:?}; skipping row {}",
                row.stream_name,
                row.trib_to,
                row.pool,
                index + 1
            );
            continue;
        }
        let geometry = match current.take() {
            Some((id, geometry)) if id == row.location_id => geometry,
            _ => {
                info!(
                    "georeferencing {} trib to {}",
                    row.stream_name, row.trib_to
                );
                provider.find_geometry(&row.location_id)?
            }
        };
        let adjusted = table.resolve(&row.location_id, row.cum_dist as f64, config)?;
        let point = provider.point_at_distance(&geometry, adjusted)?;
        placed.push(PlacedPoint {
            point,
            location_id: row.location_id.clone(),
            stream_name: row.stream_name.clone(),
            trib_to: row.trib_to.clone(),
            pool: row.pool.clone(),
            survey_dist: row.cum_dist,
            adjusted_dist: adjusted,
            xy_note: row.xy_note.clone(),
            comment: row.comment.clone(),
        });
        current = Some((row.location_id.clone(), geometry));
    }
    Ok(placed)
}
