//! Classification des features onX vers les couches du projet
//!
//! Niveaux évalués dans l'ordre, le premier qui aboutit gagne:
//!
//! 1. Préfixe exact du nom (`"scrape: fresh"` → scrapes); un préfixe
//!    reconnu court-circuite toutes les heuristiques
//! 2. Indice de dossier KML (sous-chaîne)
//! 3. Sous-chaîne du nom complet
//! 4. Repli par géométrie: LineString → couche des traces, Polygon →
//!    open_woods, Point → échec
//!
//! Sans heuristiques (`use_heuristics = false`), seul le niveau 1 est
//! évalué.

mod builders;
mod rules;

use geojson::Feature;
use onx::ParsedFeature;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::catalog::GeometryKind;
use crate::options::ImportOptions;
use crate::signature::feature_signature;

/// Résultat d'une classification réussie
#[derive(Debug, Clone)]
pub struct MappedFeature {
    /// Identifiant de la couche cible
    pub layer_id: &'static str,

    /// Feature GeoJSON matérialisée (géométrie copiée, propriétés dérivées)
    pub feature: Feature,

    /// Signature de déduplication
    pub signature: String,
}

/// Classifie une feature parsée, ou `None` si elle est inclassable
pub fn classify(parsed: &ParsedFeature, opts: &ImportOptions) -> Option<MappedFeature> {
    let name = parsed.name.to_lowercase().trim().to_string();
    let (prefix, tail) = split_name(&name);
    let geometry = geometry_kind(&parsed.geometry);

    // Niveau 1: préfixe exact
    let mut layer = rules::match_prefix(&prefix, geometry);
    let mut properties = layer.and_then(|id| builders::build(id, geometry, &tail));
    if properties.is_none() {
        // Préfixe reconnu mais géométrie refusée: pas un match
        layer = None;
    }

    if layer.is_none() {
        if !opts.use_heuristics {
            return None;
        }

        // Niveau 2: indice de dossier KML
        if let Some(hint) = parsed.props.get("folder_hint").and_then(Value::as_str) {
            layer = rules::match_substring(&hint.to_lowercase(), geometry);
        }

        // Niveau 3: sous-chaîne du nom complet
        if layer.is_none() {
            layer = rules::match_substring(&name, geometry);
        }

        // Niveau 4: repli par géométrie
        if layer.is_none() {
            layer = match geometry {
                Some(GeometryKind::LineString) => Some(opts.tracks_target.layer_id()),
                Some(GeometryKind::Polygon) => Some("open_woods"),
                _ => None,
            };
        }

        properties = layer.map(|id| builders::build(id, geometry, &tail).unwrap_or_default());
    }

    let layer = layer?;
    let mut properties = properties.unwrap_or_default();

    // Notes depuis la description source
    properties.insert(
        "notes".to_string(),
        Value::String(parsed.desc.clone().unwrap_or_default()),
    );

    // Chasses GPX: date et heure locales depuis l'horodatage du point
    if layer == "hunts" {
        apply_hunt_time(&mut properties, &parsed.props, &opts.time_zone);
    }

    finalize_metadata(&mut properties, parsed, opts);

    let feature = Feature {
        bbox: None,
        geometry: Some(parsed.geometry.clone()),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    };
    let signature = feature_signature(&feature);

    Some(MappedFeature {
        layer_id: layer,
        feature,
        signature,
    })
}

/// Découpe le nom normalisé en préfixe et tail sur le premier `:`
fn split_name(name: &str) -> (String, String) {
    match name.split_once(':') {
        Some((prefix, tail)) => (prefix.trim().to_string(), tail.trim().to_string()),
        None => (name.trim().to_string(), String::new()),
    }
}

fn geometry_kind(geometry: &geojson::Geometry) -> Option<GeometryKind> {
    match geometry.value {
        geojson::Value::Point(_) => Some(GeometryKind::Point),
        geojson::Value::LineString(_) => Some(GeometryKind::LineString),
        geojson::Value::Polygon(_) => Some(GeometryKind::Polygon),
        _ => None,
    }
}

/// Convertit l'horodatage GPX d'une chasse vers le fuseau configuré et
/// renseigne `date`/`start_time` (valeurs calendaires locales, pas UTC).
///
/// Tout échec de conversion est avalé: la date retombera sur celle de
/// l'import.
fn apply_hunt_time(properties: &mut Map<String, Value>, source: &Map<String, Value>, time_zone: &str) {
    let Some(raw) = source.get("time").and_then(Value::as_str) else {
        return;
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return;
    }
    let Ok(instant) = chrono::DateTime::parse_from_rfc3339(raw) else {
        debug!("Unparseable hunt time: {}", raw);
        return;
    };
    let Ok(zone) = time_zone.parse::<chrono_tz::Tz>() else {
        warn!("Unknown time zone: {}", time_zone);
        return;
    };
    let local = instant.with_timezone(&zone);
    properties.insert(
        "date".to_string(),
        Value::String(local.format("%Y-%m-%d").to_string()),
    );
    properties.insert(
        "start_time".to_string(),
        Value::String(local.format("%H:%M").to_string()),
    );
}

/// Métadonnées communes: nom, date par défaut, provenance d'import
fn finalize_metadata(properties: &mut Map<String, Value>, parsed: &ParsedFeature, opts: &ImportOptions) {
    if !properties.contains_key("name") {
        properties.insert("name".to_string(), Value::String(parsed.name.clone()));
    }
    if !properties.contains_key("date") {
        if let Ok(stamp) = chrono::DateTime::parse_from_rfc3339(&opts.import_timestamp) {
            let date = stamp.with_timezone(&chrono::Utc).format("%Y-%m-%d");
            properties.insert("date".to_string(), Value::String(date.to_string()));
        }
    }
    properties.insert(
        "imported_by".to_string(),
        Value::String(opts.active_user.clone()),
    );
    properties.insert(
        "imported_at".to_string(),
        Value::String(opts.import_timestamp.clone()),
    );
    properties
        .entry("created_by")
        .or_insert_with(|| Value::String(opts.active_user.clone()));
    properties
        .entry("created_at")
        .or_insert_with(|| Value::String(opts.import_timestamp.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::TracksTarget;
    use geojson::Geometry;

    fn point(x: f64, y: f64) -> Geometry {
        Geometry::new(geojson::Value::Point(vec![x, y]))
    }

    fn line() -> Geometry {
        Geometry::new(geojson::Value::LineString(vec![
            vec![0.0, 0.0],
            vec![1.0, 1.0],
        ]))
    }

    fn polygon() -> Geometry {
        Geometry::new(geojson::Value::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 0.0],
        ]]))
    }

    fn parsed(name: &str, geometry: Geometry) -> ParsedFeature {
        ParsedFeature {
            name: name.to_string(),
            desc: None,
            geometry,
            props: Map::new(),
        }
    }

    fn opts() -> ImportOptions {
        ImportOptions {
            input_files: Vec::new(),
            tracks_target: TracksTarget::Trails,
            time_zone: "America/New_York".to_string(),
            use_heuristics: true,
            only_points: false,
            active_user: "Tester".to_string(),
            import_timestamp: "2025-01-01T12:00:00.000Z".to_string(),
        }
    }

    fn prop(mapped: &MappedFeature, key: &str) -> Value {
        mapped
            .feature
            .properties
            .as_ref()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or(Value::Null)
    }

    #[test]
    fn test_prefix_wins_over_heuristics() {
        let mapped = classify(&parsed("Stand: climber", point(0.0, 0.0)), &opts()).unwrap();
        assert_eq!(mapped.layer_id, "stands");
        assert_eq!(prop(&mapped, "stand_type"), "climber");
        assert_eq!(prop(&mapped, "name"), "Stand: climber");
    }

    #[test]
    fn test_scrape_example() {
        let mapped = classify(&parsed("Scrape: Fresh", point(0.0, 0.0)), &opts()).unwrap();
        assert_eq!(mapped.layer_id, "scrapes");
        assert_eq!(prop(&mapped, "freshness"), "fresh");
        assert_eq!(prop(&mapped, "name"), "Scrape: Fresh");
        assert_eq!(prop(&mapped, "notes"), "");
    }

    #[test]
    fn test_trail_example() {
        let mapped = classify(&parsed("Trail: deer main", line()), &opts()).unwrap();
        assert_eq!(mapped.layer_id, "trails");
        assert_eq!(prop(&mapped, "trail_type"), "deer");
        assert_eq!(prop(&mapped, "prominence"), "main");
    }

    #[test]
    fn test_bedding_polygon_example() {
        let mapped = classify(&parsed("Bedding: hemlock", polygon()), &opts()).unwrap();
        assert_eq!(mapped.layer_id, "bedding_areas");
        assert_eq!(prop(&mapped, "cover_type"), "hemlocks");
    }

    #[test]
    fn test_bedding_point_goes_to_beds() {
        let mapped = classify(&parsed("Bedding: spot", point(0.0, 0.0)), &opts()).unwrap();
        assert_eq!(mapped.layer_id, "beds_points");
    }

    #[test]
    fn test_geometry_gated_prefix_falls_through() {
        // "trail:" sur un Point: le préfixe est rejeté, les heuristiques
        // n'aboutissent pas non plus (aucun repli pour un Point)
        assert!(classify(&parsed("trail: something", point(0.0, 0.0)), &opts()).is_none());
    }

    #[test]
    fn test_strict_mode_rejects_without_prefix() {
        let strict = ImportOptions {
            use_heuristics: false,
            ..opts()
        };
        assert!(classify(&parsed("random name", point(0.0, 0.0)), &strict).is_none());
        // Préfixe valide mais géométrie refusée: échec dur en mode strict
        assert!(classify(&parsed("trail: x", point(0.0, 0.0)), &strict).is_none());
        // Le préfixe exact reste accepté
        assert!(classify(&parsed("scrape: fresh", point(0.0, 0.0)), &strict).is_some());
    }

    #[test]
    fn test_folder_hint_tier() {
        let mut feature = parsed("", point(0.0, 0.0));
        feature.props.insert(
            "folder_hint".to_string(),
            Value::String("Scrapes".to_string()),
        );
        let mapped = classify(&feature, &opts()).unwrap();
        assert_eq!(mapped.layer_id, "scrapes");
    }

    #[test]
    fn test_name_substring_tier() {
        let mapped = classify(&parsed("big scrape by the creek", point(0.0, 0.0)), &opts()).unwrap();
        assert_eq!(mapped.layer_id, "scrapes");
    }

    #[test]
    fn test_geometry_fallback() {
        assert!(classify(&parsed("", point(0.0, 0.0)), &opts()).is_none());

        let mapped = classify(&parsed("", polygon()), &opts()).unwrap();
        assert_eq!(mapped.layer_id, "open_woods");

        let mapped = classify(&parsed("", line()), &opts()).unwrap();
        assert_eq!(mapped.layer_id, "trails");

        let to_paths = ImportOptions {
            tracks_target: TracksTarget::AnimalPaths,
            ..opts()
        };
        let mapped = classify(&parsed("", line()), &to_paths).unwrap();
        assert_eq!(mapped.layer_id, "animal_paths");
        assert_eq!(prop(&mapped, "confidence"), "observed");
    }

    #[test]
    fn test_hunt_time_converted_to_zone() {
        let mut feature = parsed("Hunt: morning sit", point(0.0, 0.0));
        feature.props.insert(
            "time".to_string(),
            Value::String("2025-01-10T12:15:00Z".to_string()),
        );
        let mapped = classify(&feature, &opts()).unwrap();
        assert_eq!(mapped.layer_id, "hunts");
        // 12:15 UTC = 07:15 en heure de l'Est (EST)
        assert_eq!(prop(&mapped, "date"), "2025-01-10");
        assert_eq!(prop(&mapped, "start_time"), "07:15");
    }

    #[test]
    fn test_hunt_bad_time_swallowed() {
        let mut feature = parsed("Hunt: evening", point(0.0, 0.0));
        feature
            .props
            .insert("time".to_string(), Value::String("not a date".to_string()));
        let mapped = classify(&feature, &opts()).unwrap();
        assert_eq!(mapped.layer_id, "hunts");
        // Date par défaut: jour UTC de l'import
        assert_eq!(prop(&mapped, "date"), "2025-01-01");
        assert!(mapped
            .feature
            .properties
            .as_ref()
            .unwrap()
            .get("start_time")
            .is_none());
    }

    #[test]
    fn test_import_metadata() {
        let mapped = classify(&parsed("Rub: 8in", point(0.0, 0.0)), &opts()).unwrap();
        assert_eq!(mapped.layer_id, "rubs");
        assert_eq!(prop(&mapped, "diameter_in"), 8);
        assert_eq!(prop(&mapped, "imported_by"), "Tester");
        assert_eq!(prop(&mapped, "imported_at"), "2025-01-01T12:00:00.000Z");
        assert_eq!(prop(&mapped, "created_by"), "Tester");
        assert_eq!(prop(&mapped, "date"), "2025-01-01");
    }

    #[test]
    fn test_notes_from_description() {
        let mut feature = parsed("Scrape: fresh", point(0.0, 0.0));
        feature.desc = Some("under the apple tree".to_string());
        let mapped = classify(&feature, &opts()).unwrap();
        assert_eq!(prop(&mapped, "notes"), "under the apple tree");
    }

    #[test]
    fn test_signature_attached() {
        let mapped = classify(&parsed("Scrape: fresh", point(-77.123456, 41.5)), &opts()).unwrap();
        assert_eq!(mapped.signature, "pt:-77.123456,41.5:scrape: fresh");
    }

    #[test]
    fn test_acorn_flat_example() {
        let mapped = classify(&parsed("flat: acorn 4/5", polygon()), &opts()).unwrap();
        assert_eq!(mapped.layer_id, "acorn_flats");
        assert_eq!(prop(&mapped, "acorn_density_0_5"), 4);
    }

    #[test]
    fn test_multiline_geometry_unclassifiable() {
        let multi = Geometry::new(geojson::Value::MultiLineString(vec![
            vec![vec![0.0, 0.0], vec![1.0, 1.0]],
            vec![vec![2.0, 2.0], vec![3.0, 3.0]],
        ]));
        assert!(classify(&parsed("", multi), &opts()).is_none());
    }
}
