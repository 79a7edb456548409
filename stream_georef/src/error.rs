//! Error taxonomy shared across the calibration and georeferencing passes.

use thiserror::Error;

/// Fatal conditions surfaced to the caller. Warning-level conditions (rows
/// without a location id, ambiguous geometry matches, non-monotonic stream
/// distances) are logged and never appear here.
#[derive(Debug, Error)]
pub enum GeorefError {
    /// Malformed numeric or required text field in an input or table row.
    #[error("row {row}: invalid {field}: {value:?}")]
    Parse {
        row: usize,
        field: String,
        value: String,
    },

    /// Referenced location id is absent from the geometry source or the
    /// calibration table.
    #[error("no entry for location id {id:?}")]
    Lookup { id: String },

    /// Input file or persisted table is structurally inconsistent.
    #[error("{reason}")]
    Format { reason: String },

    /// Two adjacent control points share the same reported survey distance,
    /// leaving the adjustment factor undefined.
    #[error(
        "location id {id:?}: control points at survey distance {survey_dist} \
         form a zero-width segment"
    )]
    DegenerateSegment { id: String, survey_dist: f64 },

    /// A coordinate could not be transformed between reference systems.
    #[error("cannot transform ({x}, {y}) to {to}")]
    Transform { x: f64, y: f64, to: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GeorefError>;
