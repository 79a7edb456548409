//! Output writers for georeferenced survey points.

use std::fmt::Write as _;

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};

use crate::error::Result;
use crate::io::{csv_field, write_string};
use crate::placement::PlacedPoint;

/// Column names of the placed-point CSV output.
pub const PLACED_COLUMNS: [&str; 10] = [
    "X",
    "Y",
    "LocationID",
    "Stream_Name",
    "Trib_To",
    "Pool_num",
    "Survey_Cum_Dist",
    "Streamline_Cum_Dist",
    "XY_Note",
    "Comment",
];

/// Writes placed points as CSV, fully replacing the file.
pub fn write_placed_csv(path: &str, points: &[PlacedPoint]) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "{}", PLACED_COLUMNS.join(","));
    for p in points {
        let fields = [
            p.point.x.to_string(),
            p.point.y.to_string(),
            format!("'{}'", p.location_id),
            p.stream_name.clone(),
            p.trib_to.clone(),
            p.pool.clone(),
            p.survey_dist.to_string(),
            p.adjusted_dist.to_string(),
            p.xy_note.clone(),
            p.comment.clone(),
        ];
        let rendered: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
        let _ = writeln!(out, "{}", rendered.join(","));
    }
    write_string(path, &out)?;
    Ok(())
}

/// Writes placed points as a GeoJSON FeatureCollection, fully replacing the
/// file.
pub fn write_placed_geojson(path: &str, points: &[PlacedPoint]) -> Result<()> {
    let features = points
        .iter()
        .map(|p| {
            let mut properties = JsonObject::new();
            properties.insert("LocationID".to_string(), p.location_id.clone().into());
            properties.insert("Stream_Name".to_string(), p.stream_name.clone().into());
            properties.insert("Trib_To".to_string(), p.trib_to.clone().into());
            properties.insert("Pool_num".to_string(), p.pool.clone().into());
            properties.insert("Survey_Cum_Dist".to_string(), p.survey_dist.into());
            properties.insert("Streamline_Cum_Dist".to_string(), p.adjusted_dist.into());
            properties.insert("XY_Note".to_string(), p.xy_note.clone().into());
            properties.insert("Comment".to_string(), p.comment.clone().into());
            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(vec![p.point.x, p.point.y]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();
    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    write_string(path, &GeoJson::from(collection).to_string())?;
    Ok(())
}
