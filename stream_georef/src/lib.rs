//! Core library for georeferencing stream survey data.
//!
//! Field crews walking a stream report cumulative distances that drift from
//! the distances measured on the stream's mapped geometry. This crate builds
//! a table of per-segment distance adjustment factors from sparse control
//! points, persists it as a reviewable CSV, and applies the reviewed factors
//! to relocate arbitrary survey records onto the stream geometry.

pub mod builder;
pub mod calibration;
pub mod crs;
pub mod error;
pub mod geometry;
pub mod io;
pub mod placement;
pub mod streams;

pub use builder::{CalibrationBuilder, GeometryProvider};
pub use calibration::{
    CalibrationConfig, CalibrationSegment, CalibrationTable, StreamCalibration, SyncPoint,
};
pub use error::{GeorefError, Result};
