use std::collections::HashMap;

use stream_georef::builder::{CalibrationBuilder, GeometryProvider};
use stream_georef::calibration::CalibrationConfig;
use stream_georef::error::{GeorefError, Result};
use stream_georef::geometry::{Point, Polyline, Projection, Side};
use stream_georef::io::survey::SurveyRow;

/// Provider that reports pre-seeded stream distances keyed by coordinate,
/// standing in for point-on-line projection.
struct FixedProvider {
    distances: HashMap<(i64, i64), f64>,
}

impl FixedProvider {
    fn new(entries: &[((f64, f64), f64)]) -> Self {
        let distances = entries
            .iter()
            .map(|((x, y), d)| ((*x as i64, *y as i64), *d))
            .collect();
        Self { distances }
    }
}

impl GeometryProvider for FixedProvider {
    fn find_geometry(&self, _id: &str) -> Result<Polyline> {
        Ok(Polyline::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10_000.0, 0.0),
        ]))
    }

    fn project_point(
        &self,
        _geometry: &Polyline,
        x: f64,
        y: f64,
        _geographic: bool,
    ) -> Result<Projection> {
        let distance = *self
            .distances
            .get(&(x as i64, y as i64))
            .ok_or_else(|| GeorefError::Lookup {
                id: format!("({x}, {y})"),
            })?;
        Ok(Projection {
            point: Point::new(x, y),
            distance,
            offset: 0.0,
            side: Side::On,
        })
    }

    fn point_at_distance(&self, geometry: &Polyline, distance: f64) -> Result<Point> {
        geometry
            .point_at(distance)
            .ok_or_else(|| GeorefError::Format {
                reason: "empty geometry".to_string(),
            })
    }
}

fn row(id: &str, dist: i64, coord: Option<(f64, f64)>) -> SurveyRow {
    SurveyRow {
        location_id: id.to_string(),
        stream_name: "Bear Creek".to_string(),
        trib_to: "Wolf River".to_string(),
        pool: String::new(),
        cum_dist: dist,
        coord: coord.map(|(x, y)| Point::new(x, y)),
        xy_note: String::new(),
        comment: String::new(),
    }
}

#[test]
fn sparse_control_points_yield_closed_and_open_segments() {
    let provider = FixedProvider::new(&[((10.0, 10.0), 0.0), ((20.0, 20.0), 1100.0)]);
    let config = CalibrationConfig::default();
    let builder = CalibrationBuilder::new(&provider, config, false);
    let rows = vec![
        row("100", 0, Some((10.0, 10.0))),
        row("100", 500, None),
        row("100", 1000, Some((20.0, 20.0))),
    ];
    let table = builder.build(&rows).unwrap();
    let stream = table.get("100").unwrap();
    assert_eq!(stream.segments.len(), 2);

    let closed = &stream.segments[0];
    assert!((closed.begin.survey_dist - 0.0).abs() < 1e-9);
    assert!((closed.factor - 1.1).abs() < 1e-9);
    let end = closed.end.as_ref().unwrap();
    assert!((end.survey_dist - 1000.0).abs() < 1e-9);
    assert!((end.stream_dist - 1100.0).abs() < 1e-9);

    let open = &stream.segments[1];
    assert!(open.end.is_none());
    assert!((open.begin.survey_dist - 1000.0).abs() < 1e-9);
    assert!((open.begin.stream_dist - 1100.0).abs() < 1e-9);
    assert!((open.factor - 1.0).abs() < 1e-9);

    assert!((table.resolve("100", 750.0, &config).unwrap() - 825.0).abs() < 1e-9);
    assert!((table.resolve("100", 1200.0, &config).unwrap() - 1300.0).abs() < 1e-9);
}

#[test]
fn segments_are_contiguous_and_ordered() {
    let provider = FixedProvider::new(&[
        ((1.0, 1.0), 0.0),
        ((2.0, 2.0), 400.0),
        ((3.0, 3.0), 1050.0),
    ]);
    let config = CalibrationConfig::default();
    let builder = CalibrationBuilder::new(&provider, config, false);
    let rows = vec![
        row("100", 0, Some((1.0, 1.0))),
        row("100", 300, Some((2.0, 2.0))),
        row("100", 700, None),
        row("100", 1000, Some((3.0, 3.0))),
    ];
    let table = builder.build(&rows).unwrap();
    let stream = table.get("100").unwrap();
    assert_eq!(stream.segments.len(), 3);
    for pair in stream.segments.windows(2) {
        let end = pair[0].end.as_ref().unwrap();
        assert_eq!(*end, pair[1].begin);
        assert!(pair[0].begin.survey_dist < pair[1].begin.survey_dist);
    }
    assert!(stream.segments[2].end.is_none());
}

#[test]
fn group_without_coordinates_gets_identity_open_segment() {
    let provider = FixedProvider::new(&[]);
    let config = CalibrationConfig::default();
    let builder = CalibrationBuilder::new(&provider, config, false);
    let rows = vec![row("100", 120, None), row("100", 480, None)];
    let table = builder.build(&rows).unwrap();
    let stream = table.get("100").unwrap();
    assert_eq!(stream.segments.len(), 1);
    let only = &stream.segments[0];
    assert!(only.end.is_none());
    assert!(only.begin.coord.is_none());
    assert!((only.begin.survey_dist - 120.0).abs() < 1e-9);
    assert!((only.begin.stream_dist - 120.0).abs() < 1e-9);
    assert!((table.resolve("100", 400.0, &config).unwrap() - 400.0).abs() < 1e-9);
}

#[test]
fn single_row_group_gets_one_open_segment() {
    let provider = FixedProvider::new(&[((5.0, 5.0), 90.0)]);
    let config = CalibrationConfig::default();
    let builder = CalibrationBuilder::new(&provider, config, false);
    let table = builder.build(&[row("100", 100, Some((5.0, 5.0)))]).unwrap();
    let stream = table.get("100").unwrap();
    assert_eq!(stream.segments.len(), 1);
    assert!(stream.segments[0].end.is_none());
    assert!((stream.segments[0].begin.stream_dist - 90.0).abs() < 1e-9);
}

#[test]
fn rows_without_location_id_are_skipped() {
    let provider = FixedProvider::new(&[((5.0, 5.0), 90.0)]);
    let config = CalibrationConfig::default();
    let builder = CalibrationBuilder::new(&provider, config, false);
    let rows = vec![row("", 0, None), row("100", 100, Some((5.0, 5.0)))];
    let table = builder.build(&rows).unwrap();
    assert_eq!(table.len(), 1);
    assert!(table.get("100").is_some());
}

#[test]
fn equal_survey_distances_are_a_degenerate_segment() {
    let provider = FixedProvider::new(&[((1.0, 1.0), 0.0), ((2.0, 2.0), 50.0)]);
    let config = CalibrationConfig::default();
    let builder = CalibrationBuilder::new(&provider, config, false);
    let rows = vec![
        row("100", 300, Some((1.0, 1.0))),
        row("100", 300, Some((2.0, 2.0))),
    ];
    let err = builder.build(&rows).unwrap_err();
    assert!(matches!(
        err,
        GeorefError::DegenerateSegment { ref id, survey_dist } if id == "100" && survey_dist == 300.0
    ));
}

#[test]
fn reappearing_location_id_keeps_last_contiguous_block() {
    let provider = FixedProvider::new(&[((1.0, 1.0), 10.0), ((2.0, 2.0), 20.0)]);
    let config = CalibrationConfig::default();
    let builder = CalibrationBuilder::new(&provider, config, false);
    let rows = vec![
        row("100", 100, Some((1.0, 1.0))),
        row("200", 0, None),
        row("100", 700, Some((2.0, 2.0))),
    ];
    let table = builder.build(&rows).unwrap();
    assert_eq!(table.len(), 2);
    let stream = table.get("100").unwrap();
    assert_eq!(stream.segments.len(), 1);
    assert!((stream.segments[0].begin.survey_dist - 700.0).abs() < 1e-9);
    assert!((stream.segments[0].begin.stream_dist - 20.0).abs() < 1e-9);
}

#[test]
fn missing_stream_geometry_is_fatal() {
    struct NoStreams;
    impl GeometryProvider for NoStreams {
        fn find_geometry(&self, id: &str) -> Result<Polyline> {
            Err(GeorefError::Lookup { id: id.to_string() })
        }
        fn project_point(
            &self,
            _geometry: &Polyline,
            _x: f64,
            _y: f64,
            _geographic: bool,
        ) -> Result<Projection> {
            unreachable!("projection is never reached without geometry")
        }
        fn point_at_distance(&self, _geometry: &Polyline, _distance: f64) -> Result<Point> {
            unreachable!("placement is never reached without geometry")
        }
    }
    let config = CalibrationConfig::default();
    let builder = CalibrationBuilder::new(&NoStreams, config, false);
    let err = builder
        .build(&[row("100", 0, Some((1.0, 1.0)))])
        .unwrap_err();
    assert!(matches!(err, GeorefError::Lookup { id } if id == "100"));
}
