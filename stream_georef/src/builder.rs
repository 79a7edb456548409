//! Builds calibration tables from ordered survey rows.

use log::warn;

use crate::calibration::{
    CalibrationConfig, CalibrationSegment, CalibrationTable, StreamCalibration, SyncPoint,
};
use crate::error::{GeorefError, Result};
use crate::geometry::{Point, Polyline, Projection};
use crate::io::survey::SurveyRow;

/// Source of stream geometry and point projection, kept behind a trait so
/// the calibration engine can be exercised without a live geometry store.
pub trait GeometryProvider {
    /// Returns the polyline for the stream with the given location id.
    /// Fails with a lookup error when no stream matches.
    fn find_geometry(&self, id: &str) -> Result<Polyline>;

    /// Projects a coordinate onto the stream geometry. `geographic` marks
    /// lat/long input that must be reprojected into the geometry's
    /// reference system first.
    fn project_point(
        &self,
        geometry: &Polyline,
        x: f64,
        y: f64,
        geographic: bool,
    ) -> Result<Projection>;

    /// Returns the point at the given distance along the stream geometry.
    fn point_at_distance(&self, geometry: &Polyline, distance: f64) -> Result<Point>;
}

/// Progress of segment construction within one stream group.
#[derive(Debug)]
enum SegmentState {
    /// No rows seen for the stream yet.
    AwaitingFirstPoint,
    /// A segment is open; its begin was the last control point seen.
    SegmentOpen { begin: SyncPoint },
    /// Rows without coordinates arrived since the segment opened; a closing
    /// control point is still owed.
    AwaitingClose { begin: SyncPoint },
}

/// One contiguous block of rows sharing a location id, under construction.
struct GroupState {
    stream: StreamCalibration,
    state: SegmentState,
    /// Stream geometry, fetched on the first coordinate-bearing row and
    /// dropped with the group.
    geometry: Option<Polyline>,
}

impl GroupState {
    fn new(stream: StreamCalibration) -> Self {
        Self {
            stream,
            state: SegmentState::AwaitingFirstPoint,
            geometry: None,
        }
    }
}

/// Derives per-segment distance adjustment factors from survey rows and the
/// stream geometry.
pub struct CalibrationBuilder<'a, P: GeometryProvider> {
    provider: &'a P,
    config: CalibrationConfig,
    geographic_coords: bool,
}

impl<'a, P: GeometryProvider> CalibrationBuilder<'a, P> {
    /// Creates a builder. `geographic_coords` is true when survey x/y values
    /// are lat/long decimal degrees rather than stream-layer coordinates.
    pub fn new(provider: &'a P, config: CalibrationConfig, geographic_coords: bool) -> Self {
        Self {
            provider,
            config,
            geographic_coords,
        }
    }

    /// Builds the calibration table from survey rows ordered by stream and
    /// cumulative distance. Rows for one stream must be contiguous; a
    /// location id that reappears later replaces its earlier calibration
    /// with a warning.
    pub fn build(&self, rows: &[SurveyRow]) -> Result<CalibrationTable> {
        let mut table = CalibrationTable::new();
        let mut group: Option<GroupState> = None;
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
            let mut active = match group.take() {
                Some(g) if g.stream.id == row.location_id => g,
                other => {
                    if let Some(done) = other {
                        self.finish_group(done, &mut table);
                    }
                    GroupState::new(StreamCalibration::new(
                        row.location_id.clone(),
                        row.stream_name.clone(),
                        row.trib_to.clone(),
                    ))
                }
            };
            self.push_row(&mut active, row)?;
            group = Some(active);
        }
        if let Some(done) = group {
            self.finish_group(done, &mut table);
        }
        Ok(table)
    }

    /// Advances the group's segment state with one survey row.
    fn push_row(&self, group: &mut GroupState, row: &SurveyRow) -> Result<()> {
        let survey_dist = row.cum_dist as f64;
        let control = match row.coord {
            Some(coord) => {
                let projection = self.project_row(group, coord)?;
                Some(SyncPoint::new(
                    Some(coord),
                    survey_dist,
                    projection.distance,
                    row.xy_note.clone(),
                    row.comment.clone(),
                ))
            }
            None => None,
        };
        let state = std::mem::replace(&mut group.state, SegmentState::AwaitingFirstPoint);
        group.state = match (state, control) {
            (SegmentState::AwaitingFirstPoint, Some(begin)) => SegmentState::SegmentOpen { begin },
            (SegmentState::AwaitingFirstPoint, None) => SegmentState::AwaitingClose {
                begin: SyncPoint::from_survey_dist(
                    survey_dist,
                    row.xy_note.clone(),
                    row.comment.clone(),
                ),
            },
            (
                SegmentState::SegmentOpen { begin } | SegmentState::AwaitingClose { begin },
                Some(end),
            ) => {
                let begin = self.close_segment(&mut group.stream, begin, end)?;
                SegmentState::SegmentOpen { begin }
            }
            (
                SegmentState::SegmentOpen { begin } | SegmentState::AwaitingClose { begin },
                None,
            ) => SegmentState::AwaitingClose { begin },
        };
        Ok(())
    }

    /// Fetches the group's geometry on first use and projects a coordinate
    /// onto it.
    fn project_row(&self, group: &mut GroupState, coord: Point) -> Result<Projection> {
        let geometry = match group.geometry.take() {
            Some(geometry) => geometry,
            None => self.provider.find_geometry(&group.stream.id)?,
        };
        let projection =
            self.provider
                .project_point(&geometry, coord.x, coord.y, self.geographic_coords)?;
        group.geometry = Some(geometry);
        Ok(projection)
    }

    /// Closes the open segment at `end`, appends it to the stream, and
    /// returns the sync point that begins the next segment.
    fn close_segment(
        &self,
        stream: &mut StreamCalibration,
        begin: SyncPoint,
        end: SyncPoint,
    ) -> Result<SyncPoint> {
        let span = end.survey_dist - begin.survey_dist;
        if span == 0.0 {
            return Err(GeorefError::DegenerateSegment {
                id: stream.id.clone(),
                survey_dist: end.survey_dist,
            });
        }
        if span < 0.0 {
            warn!(
                "location id {:?}: survey distance drops from {} to {}; input rows are not sorted",
                stream.id, begin.survey_dist, end.survey_dist
            );
        }
        if end.stream_dist < begin.stream_dist {
            warn!(
                "location id {:?}: stream distance drops from {} to {} between survey \
                 distances {} and {}; flagged for review",
                stream.id, begin.stream_dist, end.stream_dist, begin.survey_dist, end.survey_dist
            );
        }
        let factor = (end.stream_dist - begin.stream_dist) / span;
        stream.segments.push(CalibrationSegment {
            begin,
            end: Some(end.clone()),
            factor,
        });
        Ok(end)
    }

    /// Emits the trailing open-end segment and stores the finished stream.
    fn finish_group(&self, group: GroupState, table: &mut CalibrationTable) {
        let mut stream = group.stream;
        match group.state {
            SegmentState::AwaitingFirstPoint => {}
            SegmentState::SegmentOpen { begin } | SegmentState::AwaitingClose { begin } => {
                stream.segments.push(CalibrationSegment {
                    begin,
                    end: None,
                    factor: self.config.default_factor,
                });
            }
        }
        let id = stream.id.clone();
        if table.insert(stream).is_some() {
            warn!(
                "location id {:?} reappeared after other streams; earlier calibration replaced",
                id
            );
        }
    }
}
