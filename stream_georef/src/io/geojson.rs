//! GeoJSON reader for the stream network.

use geojson::{GeoJson, Value};

use crate::crs::Crs;
use crate::error::{GeorefError, Result};
use crate::geometry::{Point, Polyline};
use crate::io::read_to_string;
use crate::streams::{StreamFeature, StreamNetwork};

/// Feature property carrying the stream location id.
pub const LOCATION_ID_PROPERTY: &str = "LocationID";

const STREAM_NAME_PROPERTY: &str = "Stream_Name";

/// Reads a stream network from a GeoJSON file of LineString features. Every
/// feature must carry a `LocationID` property and at least two positions;
/// coordinates are taken to be in `crs`.
pub fn read_streams_geojson(path: &str, crs: Crs) -> Result<StreamNetwork> {
    let contents = read_to_string(path)?;
    let geojson: GeoJson = contents.parse().map_err(|e| GeorefError::Format {
        reason: format!("{path}: {e}"),
    })?;
    let collection = match geojson {
        GeoJson::FeatureCollection(collection) => collection,
        _ => {
            return Err(GeorefError::Format {
                reason: format!("{path}: expected a FeatureCollection"),
            })
        }
    };
    let mut streams = Vec::new();
    for (index, feature) in collection.features.into_iter().enumerate() {
        let geometry = match feature.geometry {
            Some(geometry) => geometry,
            None => {
                return Err(GeorefError::Format {
                    reason: format!("{path}: feature {index} has no geometry"),
                })
            }
        };
        let line = match geometry.value {
            Value::LineString(line) => line,
            _ => {
                return Err(GeorefError::Format {
                    reason: format!("{path}: feature {index} is not a LineString"),
                })
            }
        };
        if line.len() < 2 {
            return Err(GeorefError::Format {
                reason: format!("{path}: feature {index} has fewer than two vertices"),
            });
        }
        let mut vertices = Vec::with_capacity(line.len());
        for position in &line {
            if position.len() < 2 {
                return Err(GeorefError::Format {
                    reason: format!("{path}: feature {index} has an incomplete position"),
                });
            }
            vertices.push(Point::new(position[0], position[1]));
        }
        let properties = feature.properties.unwrap_or_default();
        let id = properties
            .get(LOCATION_ID_PROPERTY)
            .map(property_text)
            .unwrap_or_default();
        if id.is_empty() {
            return Err(GeorefError::Format {
                reason: format!(
                    "{path}: feature {index} has no {LOCATION_ID_PROPERTY} property"
                ),
            });
        }
        let name = properties
            .get(STREAM_NAME_PROPERTY)
            .map(property_text)
            .unwrap_or_default();
        streams.push(StreamFeature {
            id,
            name,
            geometry: Polyline::new(vertices),
        });
    }
    Ok(StreamNetwork::new(streams, crs))
}

fn property_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
