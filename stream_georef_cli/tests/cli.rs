use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

const STREAMS: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "LocationID": "100", "Stream_Name": "Bear Creek" },
      "geometry": { "type": "LineString", "coordinates": [[0, 0], [2000, 0]] }
    }
  ]
}"#;

const SURVEY: &str = "\
LLID_num,STREAM,TRIB_TO,Pool_num,CUM_DIST,X,Y,XY_Note,COMMENT
100,Bear Creek,Wolf River,1,0,0,5,at mouth,
100,Bear Creek,Wolf River,2,500,,,,
100,Bear Creek,Wolf River,3,1000,1100,5,at bridge,
";

fn cmd() -> Command {
    Command::cargo_bin("stream_georef_cli").unwrap()
}

#[test]
fn builds_factors_and_georeferences() {
    let dir = assert_fs::TempDir::new().unwrap();
    let streams = dir.child("streams.geojson");
    streams.write_str(STREAMS).unwrap();
    let survey = dir.child("survey.csv");
    survey.write_str(SURVEY).unwrap();
    let sdi = dir.child("sdi.csv");
    let output = dir.child("placed.csv");

    cmd()
        .args([
            "calibration-factors",
            streams.path().to_str().unwrap(),
            survey.path().to_str().unwrap(),
            sdi.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    // Both x,y rows project straight down onto the stream line, so the
    // closed segment gets factor (1100 - 0) / (1000 - 0).
    sdi.assert(predicate::str::contains("'100'"));
    sdi.assert(predicate::str::contains(",1.1"));
    sdi.assert(predicate::str::contains("999999"));

    cmd()
        .args([
            "georeference",
            streams.path().to_str().unwrap(),
            survey.path().to_str().unwrap(),
            sdi.path().to_str().unwrap(),
            output.path().to_str().unwrap(),
        ])
        .assert()
        .success();

    let contents = std::fs::read_to_string(output.path()).unwrap();
    let xs: Vec<f64> = contents
        .lines()
        .skip(1)
        .map(|line| line.split(',').next().unwrap().parse().unwrap())
        .collect();
    assert_eq!(xs.len(), 3);
    assert!((xs[0] - 0.0).abs() < 1e-6);
    assert!((xs[1] - 550.0).abs() < 1e-6);
    assert!((xs[2] - 1100.0).abs() < 1e-6);
}

#[test]
fn georeference_writes_geojson_when_asked() {
    let dir = assert_fs::TempDir::new().unwrap();
    let streams = dir.child("streams.geojson");
    streams.write_str(STREAMS).unwrap();
    let survey = dir.child("survey.csv");
    survey.write_str(SURVEY).unwrap();
    let sdi = dir.child("sdi.csv");
    let output = dir.child("placed.geojson");

    cmd()
        .args([
            "calibration-factors",
            streams.path().to_str().unwrap(),
            survey.path().to_str().unwrap(),
            sdi.path().to_str().unwrap(),
        ])
        .assert()
        .success();

    cmd()
        .args([
            "georeference",
            streams.path().to_str().unwrap(),
            survey.path().to_str().unwrap(),
            sdi.path().to_str().unwrap(),
            output.path().to_str().unwrap(),
            "--format",
            "geojson",
        ])
        .assert()
        .success();

    output.assert(predicate::str::contains("FeatureCollection"));
    output.assert(predicate::str::contains("Streamline_Cum_Dist"));
}

#[test]
fn missing_input_file_exits_with_failure() {
    let dir = assert_fs::TempDir::new().unwrap();
    let survey = dir.child("survey.csv");
    survey.write_str(SURVEY).unwrap();

    cmd()
        .args([
            "calibration-factors",
            dir.child("no_streams.geojson").path().to_str().unwrap(),
            survey.path().to_str().unwrap(),
            dir.child("sdi.csv").path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot find file"));
}

#[test]
fn survey_stream_missing_from_geometry_exits_with_failure() {
    let dir = assert_fs::TempDir::new().unwrap();
    let streams = dir.child("streams.geojson");
    streams
        .write_str(&STREAMS.replace("\"100\"", "\"999\""))
        .unwrap();
    let survey = dir.child("survey.csv");
    survey.write_str(SURVEY).unwrap();

    cmd()
        .args([
            "calibration-factors",
            streams.path().to_str().unwrap(),
            survey.path().to_str().unwrap(),
            dir.child("sdi.csv").path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("location id"));
}
