//! Calibration table data model and distance referencing.

use std::collections::BTreeMap;

use crate::error::{GeorefError, Result};
use crate::geometry::Point;

/// Control point tying a reported survey distance to the distance measured
/// along the stream geometry at the same location.
///
/// Sync points are created by the calibration builder and never mutated
/// afterwards; the referencer reads them only.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SyncPoint {
    /// Planar coordinate of the control point, when one was recorded.
    pub coord: Option<Point>,
    /// Field note attached to the coordinate columns.
    pub xy_note: String,
    /// Cumulative distance reported by the survey crew.
    pub survey_dist: f64,
    /// Cumulative distance measured along the stream polyline.
    pub stream_dist: f64,
    /// Free-text survey comment.
    pub comment: String,
}

impl SyncPoint {
    pub fn new(
        coord: Option<Point>,
        survey_dist: f64,
        stream_dist: f64,
        xy_note: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            coord,
            xy_note: xy_note.into(),
            survey_dist,
            stream_dist,
            comment: comment.into(),
        }
    }

    /// Control point for a row without coordinates: the stream distance is
    /// assumed equal to the reported distance until a later control point
    /// closes the segment.
    pub fn from_survey_dist(
        survey_dist: f64,
        xy_note: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self::new(None, survey_dist, survey_dist, xy_note, comment)
    }
}

/// Survey-distance interval with a linear correction factor.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CalibrationSegment {
    pub begin: SyncPoint,
    /// Closing control point, or `None` for the open end of a stream.
    pub end: Option<SyncPoint>,
    /// Multiplier applied to reported distances within this segment.
    pub factor: f64,
}

impl CalibrationSegment {
    /// Whether `survey_dist` falls inside this segment. Both bounds are
    /// inclusive; an open end matches everything at or beyond its begin.
    pub fn contains(&self, survey_dist: f64) -> bool {
        survey_dist >= self.begin.survey_dist
            && self
                .end
                .as_ref()
                .map_or(true, |end| survey_dist <= end.survey_dist)
    }

    fn adjust(&self, survey_dist: f64) -> f64 {
        self.begin.stream_dist + (survey_dist - self.begin.survey_dist) * self.factor
    }
}

/// Defaults applied when a factor or boundary cannot be computed from data.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CalibrationConfig {
    /// Factor used for open-end segments and out-of-range fallback.
    pub default_factor: f64,
    /// Survey distance written for an absent begin point.
    pub default_begin_dist: f64,
    /// Sentinel survey distance written for an open segment end.
    pub default_end_dist: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            default_factor: 1.0,
            default_begin_dist: 0.0,
            default_end_dist: 999_999.0,
        }
    }
}

/// Distance calibration for a single stream.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StreamCalibration {
    /// Location id of the stream.
    pub id: String,
    /// Stream name.
    pub name: String,
    /// Name of the stream this one drains into; free text with no
    /// referential meaning.
    pub trib_to: String,
    /// Segments ordered by begin survey distance, contiguous, ending with
    /// one open-end segment for tables produced by the builder.
    pub segments: Vec<CalibrationSegment>,
}

impl StreamCalibration {
    pub fn new(id: impl Into<String>, name: impl Into<String>, trib_to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            trib_to: trib_to.into(),
            segments: Vec::new(),
        }
    }

    /// Converts a reported survey distance into a stream distance using the
    /// first segment whose range contains it. Distances outside every
    /// segment extrapolate from the nearest segment start with the default
    /// factor.
    pub fn resolve(&self, survey_dist: f64, config: &CalibrationConfig) -> f64 {
        for segment in &self.segments {
            if segment.contains(survey_dist) {
                return segment.adjust(survey_dist);
            }
        }
        let before_first = self
            .segments
            .first()
            .map_or(false, |s| survey_dist < s.begin.survey_dist);
        let nearest = if before_first {
            self.segments.first()
        } else {
            self.segments.last()
        };
        match nearest {
            Some(segment) => {
                let anchor = if before_first {
                    &segment.begin
                } else {
                    segment.end.as_ref().unwrap_or(&segment.begin)
                };
                anchor.stream_dist + (survey_dist - anchor.survey_dist) * config.default_factor
            }
            None => survey_dist,
        }
    }
}

/// Calibration data for every surveyed stream, keyed by location id.
///
/// Built once per run, optionally persisted and hand-edited, then used
/// read-only while georeferencing.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CalibrationTable {
    streams: BTreeMap<String, StreamCalibration>,
}

impl CalibrationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a stream calibration, returning the entry it replaced.
    pub fn insert(&mut self, stream: StreamCalibration) -> Option<StreamCalibration> {
        self.streams.insert(stream.id.clone(), stream)
    }

    pub fn get(&self, id: &str) -> Option<&StreamCalibration> {
        self.streams.get(id)
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Streams in location-id order.
    pub fn iter(&self) -> impl Iterator<Item = &StreamCalibration> {
        self.streams.values()
    }

    /// Converts a reported survey distance on the given stream into a
    /// distance along the stream geometry. An id absent from the table is a
    /// lookup error, never a silent default.
    pub fn resolve(&self, id: &str, survey_dist: f64, config: &CalibrationConfig) -> Result<f64> {
        let stream = self.streams.get(id).ok_or_else(|| GeorefError::Lookup {
            id: id.to_string(),
        })?;
        Ok(stream.resolve(survey_dist, config))
    }
}
