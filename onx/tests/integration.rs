//! Tests d'intégration sur des fichiers d'export complets

use std::path::PathBuf;

fn write_fixture(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("onx_parse_{}_{}", std::process::id(), name));
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_parse_kml_file() {
    let path = write_fixture(
        "export.kml",
        r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <Folder>
      <name>Stands</name>
      <Placemark>
        <name>Stand: ladder north</name>
        <Point><coordinates>-77.401234,41.201234,0</coordinates></Point>
      </Placemark>
      <Placemark>
        <name>Stand: climber</name>
        <Point><coordinates>-77.402,41.202,0</coordinates></Point>
      </Placemark>
    </Folder>
    <Placemark>
      <name>Bedding: hemlock bench</name>
      <Polygon><outerBoundaryIs><LinearRing>
        <coordinates>-77.40,41.20,0 -77.41,41.20,0 -77.41,41.21,0 -77.40,41.20,0</coordinates>
      </LinearRing></outerBoundaryIs></Polygon>
    </Placemark>
  </Document>
</kml>"#,
    );

    let features = onx::parse_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(features.len(), 3);
    assert_eq!(features[0].name, "Stand: ladder north");
    assert_eq!(
        features[0].props.get("folder_hint").and_then(|v| v.as_str()),
        Some("Stands")
    );
    assert_eq!(features[2].name, "Bedding: hemlock bench");
    assert_eq!(features[2].geometry_type(), "Polygon");
    assert!(features[2].props.get("folder_hint").is_none());
}

#[test]
fn test_parse_gpx_file() {
    let path = write_fixture(
        "export.gpx",
        r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="onX Hunt" xmlns="http://www.topografix.com/GPX/1/1">
  <wpt lat="41.21" lon="-77.42"><name>Scrape: fresh</name></wpt>
  <trk>
    <name>Trail: deer main</name>
    <trkseg>
      <trkpt lat="41.20" lon="-77.40"></trkpt>
      <trkpt lat="41.21" lon="-77.41"></trkpt>
      <trkpt lat="41.22" lon="-77.42"></trkpt>
    </trkseg>
  </trk>
</gpx>"#,
    );

    let features = onx::parse_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(features.len(), 2);
    assert_eq!(features[0].name, "Scrape: fresh");
    assert_eq!(features[0].geometry_type(), "Point");
    assert_eq!(features[1].name, "Trail: deer main");
    match &features[1].geometry.value {
        geojson::Value::LineString(coords) => assert_eq!(coords.len(), 3),
        other => panic!("Expected LineString, got {:?}", other),
    }
}
