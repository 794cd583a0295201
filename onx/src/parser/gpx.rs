//! Parser GPX (waypoints, traces, routes)

use geojson::Geometry;
use serde_json::{Map, Value};
use tracing::debug;

use crate::types::ParsedFeature;
use crate::OnxError;

/// Parse un document GPX et retourne les features extraites.
///
/// Les waypoints deviennent des Points (avec leur horodatage dans
/// `props["time"]`, utilisé plus loin pour dater les chasses), les traces
/// et routes des LineStrings.
///
/// # Errors
///
/// Retourne `OnxError::Gpx` si le document est illisible.
pub fn parse_gpx(text: &str) -> Result<Vec<ParsedFeature>, OnxError> {
    let document = gpx::read(text.as_bytes())?;
    let mut out = Vec::new();

    for waypoint in &document.waypoints {
        let mut props = Map::new();
        if let Some(time) = waypoint.time.as_ref() {
            match time.format() {
                Ok(stamp) => {
                    props.insert("time".to_string(), Value::String(stamp));
                }
                Err(e) => debug!("Unreadable waypoint time: {}", e),
            }
        }
        out.push(ParsedFeature {
            name: waypoint.name.as_deref().unwrap_or("").trim().to_string(),
            desc: waypoint.description.clone(),
            geometry: Geometry::new(geojson::Value::from(&waypoint.point())),
            props,
        });
    }

    for track in &document.tracks {
        let Some(geometry) = track_geometry(track) else {
            continue;
        };
        out.push(ParsedFeature {
            name: track.name.as_deref().unwrap_or("").trim().to_string(),
            desc: track.description.clone(),
            geometry,
            props: Map::new(),
        });
    }

    for route in &document.routes {
        let line = route.linestring();
        if line.0.is_empty() {
            continue;
        }
        out.push(ParsedFeature {
            name: route.name.as_deref().unwrap_or("").trim().to_string(),
            desc: route.description.clone(),
            geometry: Geometry::new(geojson::Value::from(&line)),
            props: Map::new(),
        });
    }

    Ok(out)
}

/// Géométrie d'une trace: LineString pour un segment unique.
///
/// Les traces multi-segments deviennent des MultiLineStrings, hors
/// sous-ensemble onX; le classifieur les rejettera.
fn track_geometry(track: &gpx::Track) -> Option<Geometry> {
    let segments: Vec<geo::LineString> = track
        .segments
        .iter()
        .map(|segment| segment.linestring())
        .filter(|line| !line.0.is_empty())
        .collect();

    match segments.len() {
        0 => None,
        1 => Some(Geometry::new(geojson::Value::from(&segments[0]))),
        _ => Some(Geometry::new(geojson::Value::from(&geo::MultiLineString::new(segments)))),
    }
}
