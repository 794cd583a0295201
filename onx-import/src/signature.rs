//! Signatures de déduplication (géométrie + nom)
//!
//! Les coordonnées sont arrondies à 6 décimales (~0.1 m) pour absorber le
//! bruit flottant des reprojections. Seules les extrémités sont retenues
//! pour les lignes, et le premier sommet de l'anneau extérieur pour les
//! polygones: les ré-exports onX d'une même trace peuvent varier en
//! densité de sommets, une comparaison exacte sous-détecterait les
//! doublons.

use geojson::Feature;
use serde_json::Value;

/// Signature d'une feature candidate à l'import
pub fn feature_signature(feature: &Feature) -> String {
    let value = serde_json::to_value(feature).unwrap_or(Value::Null);
    value_signature(&value)
}

/// Signature d'une feature JSON déjà persistée.
///
/// Tolérante: une entrée malformée retombe sur la forme `geom:` au lieu
/// d'échouer.
pub fn value_signature(feature: &Value) -> String {
    let name = feature
        .pointer("/properties/name")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_lowercase();
    let geometry_type = feature
        .pointer("/geometry/type")
        .and_then(Value::as_str)
        .unwrap_or("Unknown");
    let coordinates = feature.pointer("/geometry/coordinates");

    match geometry_type {
        "Point" => {
            let coord = coordinates.map(number_array).unwrap_or_default();
            if coord.len() >= 2 {
                return format!("pt:{},{}:{}", round6(coord[0]), round6(coord[1]), name);
            }
        }
        "LineString" => {
            let coords: Vec<Vec<f64>> = coordinates
                .and_then(Value::as_array)
                .map(|items| items.iter().map(number_array).collect())
                .unwrap_or_default();
            if coords.len() < 2 {
                return format!("line:{}", name);
            }
            return format!(
                "line:{}-{}:{}",
                join_rounded(&coords[0]),
                join_rounded(&coords[coords.len() - 1]),
                name
            );
        }
        "Polygon" => {
            let first = coordinates
                .and_then(Value::as_array)
                .and_then(|rings| rings.first())
                .and_then(Value::as_array)
                .and_then(|ring| ring.first())
                .map(number_array)
                .unwrap_or_default();
            return format!("poly:{}:{}", join_rounded(&first), name);
        }
        _ => {}
    }

    format!("geom:{}:{}", geometry_type, name)
}

fn number_array(value: &Value) -> Vec<f64> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(Value::as_f64).collect())
        .unwrap_or_default()
}

/// Arrondi à 6 décimales
fn round6(n: f64) -> f64 {
    (n * 1e6).round() / 1e6
}

fn join_rounded(coord: &[f64]) -> String {
    coord
        .iter()
        .map(|n| round6(*n).to_string())
        .collect::<Vec<_>>()
        .join(",")
}
