//! Jeu de cas fixes exerçant le classifieur, sans I/O fichier
//!
//! Exposé en bibliothèque (retour structuré) et via la sous-commande
//! `selftest` du binaire.

use geojson::Geometry;
use onx::ParsedFeature;
use serde_json::{json, Map, Value};

use crate::classify::classify;
use crate::options::{ImportOptions, TracksTarget};

/// Résultat du self-test
#[derive(Debug)]
pub struct SelfTestOutcome {
    /// Nombre de cas passés
    pub passed: usize,
    /// Cas échoués, avec raison
    pub failures: Vec<String>,
}

struct Case {
    name: &'static str,
    parsed: ParsedFeature,
    use_heuristics: bool,
    expect_layer: Option<&'static str>,
    expect_props: Vec<(&'static str, Value)>,
}

fn point() -> Geometry {
    Geometry::new(geojson::Value::Point(vec![-77.4, 41.2]))
}

fn line() -> Geometry {
    Geometry::new(geojson::Value::LineString(vec![
        vec![-77.4, 41.2],
        vec![-77.5, 41.3],
    ]))
}

fn polygon() -> Geometry {
    Geometry::new(geojson::Value::Polygon(vec![vec![
        vec![-77.4, 41.2],
        vec![-77.5, 41.2],
        vec![-77.5, 41.3],
        vec![-77.4, 41.2],
    ]]))
}

fn feature(name: &str, geometry: Geometry) -> ParsedFeature {
    ParsedFeature {
        name: name.to_string(),
        desc: None,
        geometry,
        props: Map::new(),
    }
}

fn feature_with_time(name: &str, geometry: Geometry, time: &str) -> ParsedFeature {
    let mut parsed = feature(name, geometry);
    parsed
        .props
        .insert("time".to_string(), Value::String(time.to_string()));
    parsed
}

fn cases() -> Vec<Case> {
    vec![
        Case {
            name: "stand: climber -> stands",
            parsed: feature("stand: climber", point()),
            use_heuristics: true,
            expect_layer: Some("stands"),
            expect_props: vec![("stand_type", json!("climber"))],
        },
        Case {
            name: "scrape: fresh -> scrapes",
            parsed: feature("scrape: fresh", point()),
            use_heuristics: true,
            expect_layer: Some("scrapes"),
            expect_props: vec![("freshness", json!("fresh"))],
        },
        Case {
            name: "rub: 8in -> rubs",
            parsed: feature("rub: 8in", point()),
            use_heuristics: true,
            expect_layer: Some("rubs"),
            expect_props: vec![("diameter_in", json!(8))],
        },
        Case {
            name: "trail: deer main (LineString) -> trails",
            parsed: feature("trail: deer main", line()),
            use_heuristics: true,
            expect_layer: Some("trails"),
            expect_props: vec![("trail_type", json!("deer")), ("prominence", json!("main"))],
        },
        Case {
            name: "bedding: hemlock (Polygon) -> bedding_areas",
            parsed: feature("bedding: hemlock", polygon()),
            use_heuristics: true,
            expect_layer: Some("bedding_areas"),
            expect_props: vec![("cover_type", json!("hemlocks"))],
        },
        Case {
            name: "flat: acorn 4/5 (Polygon) -> acorn_flats",
            parsed: feature("flat: acorn 4/5", polygon()),
            use_heuristics: true,
            expect_layer: Some("acorn_flats"),
            expect_props: vec![("acorn_density_0_5", json!(4))],
        },
        Case {
            name: "trail prefix with Point geometry is rejected",
            parsed: feature("trail: by the creek", point()),
            use_heuristics: true,
            expect_layer: None,
            expect_props: Vec::new(),
        },
        Case {
            name: "unnamed Point has no fallback",
            parsed: feature("", point()),
            use_heuristics: true,
            expect_layer: None,
            expect_props: Vec::new(),
        },
        Case {
            name: "unnamed Polygon falls back to open_woods",
            parsed: feature("", polygon()),
            use_heuristics: true,
            expect_layer: Some("open_woods"),
            expect_props: Vec::new(),
        },
        Case {
            name: "no prefix in strict mode -> null",
            parsed: feature("nice little spot by the creek", line()),
            use_heuristics: false,
            expect_layer: None,
            expect_props: Vec::new(),
        },
        Case {
            name: "GPX hunt time converted to local zone",
            parsed: feature_with_time("hunt: morning sit", point(), "2025-01-10T12:15:00Z"),
            use_heuristics: true,
            expect_layer: Some("hunts"),
            expect_props: vec![("date", json!("2025-01-10")), ("start_time", json!("07:15"))],
        },
    ]
}

/// Exécute tous les cas et retourne le décompte
pub fn run() -> SelfTestOutcome {
    let base_opts = ImportOptions {
        input_files: Vec::new(),
        tracks_target: TracksTarget::Trails,
        time_zone: "America/New_York".to_string(),
        use_heuristics: true,
        only_points: false,
        active_user: "Tester".to_string(),
        import_timestamp: "2025-01-01T12:00:00.000Z".to_string(),
    };

    let cases = cases();
    let total = cases.len();
    let mut failures = Vec::new();

    for case in cases {
        let opts = ImportOptions {
            use_heuristics: case.use_heuristics,
            ..base_opts.clone()
        };
        if let Err(reason) = check_case(&case, &opts) {
            failures.push(format!("{}: {}", case.name, reason));
        }
    }

    SelfTestOutcome {
        passed: total - failures.len(),
        failures,
    }
}

/// Évalue un cas; un seul échec (le premier) est rapporté par cas
fn check_case(case: &Case, opts: &ImportOptions) -> Result<(), String> {
    let mapped = classify(&case.parsed, opts);

    let Some(expected_layer) = case.expect_layer else {
        return match mapped {
            Some(mapped) => Err(format!("expected no classification, got {}", mapped.layer_id)),
            None => Ok(()),
        };
    };

    let Some(mapped) = mapped else {
        return Err(format!("expected {}, got nothing", expected_layer));
    };

    if mapped.layer_id != expected_layer {
        return Err(format!("expected {}, got {}", expected_layer, mapped.layer_id));
    }

    let properties = mapped.feature.properties.as_ref();
    for (key, expected) in &case.expect_props {
        let actual = properties.and_then(|p| p.get(*key));
        if actual != Some(expected) {
            return Err(format!("expected {}={}, got {:?}", key, expected, actual));
        }
    }

    // Le nom source est toujours préservé
    let name = properties.and_then(|p| p.get("name")).and_then(Value::as_str);
    if name != Some(case.parsed.name.as_str()) {
        return Err(format!("name not preserved ({:?})", name));
    }

    if mapped.signature.is_empty() {
        return Err("signature not generated".to_string());
    }

    Ok(())
}
