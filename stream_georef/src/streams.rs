//! Stream network backing the geometry provider.

use log::warn;

use crate::builder::GeometryProvider;
use crate::crs::Crs;
use crate::error::{GeorefError, Result};
use crate::geometry::{Point, Polyline, Projection};

/// A single stream polyline keyed by location id, with distance originating
/// at the stream mouth.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamFeature {
    pub id: String,
    pub name: String,
    pub geometry: Polyline,
}

/// Stream polylines for a watershed, all in one reference system.
#[derive(Debug, Clone)]
pub struct StreamNetwork {
    streams: Vec<StreamFeature>,
    crs: Crs,
}

impl StreamNetwork {
    pub fn new(streams: Vec<StreamFeature>, crs: Crs) -> Self {
        Self { streams, crs }
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

impl GeometryProvider for StreamNetwork {
    fn find_geometry(&self, id: &str) -> Result<Polyline> {
        let mut matches = self.streams.iter().filter(|s| s.id == id);
        let first = matches.next().ok_or_else(|| GeorefError::Lookup {
            id: id.to_string(),
        })?;
        if matches.next().is_some() {
            warn!("multiple streams match location id {:?}; using the first", id);
        }
        Ok(first.geometry.clone())
    }

    fn project_point(
        &self,
        geometry: &Polyline,
        x: f64,
        y: f64,
        geographic: bool,
    ) -> Result<Projection> {
        let (px, py) = if geographic {
            Crs::wgs84()
                .transform_point(&self.crs, x, y)
                .ok_or_else(|| GeorefError::Transform {
                    x,
                    y,
                    to: self.crs.definition().to_string(),
                })?
        } else {
            (x, y)
        };
        geometry
            .project(Point::new(px, py))
            .ok_or_else(|| GeorefError::Format {
                reason: "stream geometry has no segments to project onto".to_string(),
            })
    }

    fn point_at_distance(&self, geometry: &Polyline, distance: f64) -> Result<Point> {
        geometry.point_at(distance).ok_or_else(|| GeorefError::Format {
            reason: "stream geometry has no vertices".to_string(),
        })
    }
}
