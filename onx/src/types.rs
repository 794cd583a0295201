//! Types de données pour le crate onx

use geojson::Geometry;
use serde_json::{Map, Value};

/// Une feature extraite d'un export onX (placemark KML, waypoint ou trace GPX)
#[derive(Debug, Clone)]
pub struct ParsedFeature {
    /// Nom saisi dans l'application onX (trimé, peut être vide)
    pub name: String,

    /// Description libre (devient `notes` après classification)
    pub desc: Option<String>,

    /// Géométrie GeoJSON, copiée telle quelle dans la feature finale
    pub geometry: Geometry,

    /// Propriétés source supplémentaires (`folder_hint`, `time`, ...)
    pub props: Map<String, Value>,
}

impl ParsedFeature {
    /// Nom GeoJSON du type de géométrie
    pub fn geometry_type(&self) -> &'static str {
        match self.geometry.value {
            geojson::Value::Point(_) => "Point",
            geojson::Value::MultiPoint(_) => "MultiPoint",
            geojson::Value::LineString(_) => "LineString",
            geojson::Value::MultiLineString(_) => "MultiLineString",
            geojson::Value::Polygon(_) => "Polygon",
            geojson::Value::MultiPolygon(_) => "MultiPolygon",
            geojson::Value::GeometryCollection(_) => "GeometryCollection",
        }
    }
}
