//! Constructeurs de propriétés par couche
//!
//! Une fois la couche choisie, ses champs sont dérivés du texte situé
//! après le préfixe (`tail`). Un constructeur retourne `None` quand la
//! géométrie n'est pas acceptée par sa couche.

use regex::Regex;
use serde_json::{Map, Number, Value};

use crate::catalog::GeometryKind;

/// Construit les propriétés dérivées d'une couche.
///
/// Les couches absentes du match (beds_points, hunts, animal_sightings,
/// cibles de repli) n'ont aucun champ dérivé.
pub fn build(
    layer: &str,
    geometry: Option<GeometryKind>,
    tail: &str,
) -> Option<Map<String, Value>> {
    let mut props = Map::new();

    match layer {
        "stands" => {
            insert_stand_type(&mut props, tail);
        }
        "tree_stands" => {
            require(geometry, GeometryKind::Polygon)?;
            insert_stand_type(&mut props, tail);
        }
        "scrapes" => {
            if tail.contains("fresh") {
                props.insert("freshness".to_string(), "fresh".into());
            } else if tail.contains("recent") {
                props.insert("freshness".to_string(), "recent".into());
            }
        }
        "rubs" => {
            insert_first_number(&mut props, "diameter_in", tail);
        }
        "trees_points" => {
            // Le tail devient un slug d'espèce ("red oak" → "red_oak")
            let species = tail.split_whitespace().collect::<Vec<_>>().join("_");
            props.insert("species".to_string(), Value::String(species));
        }
        "trails" => {
            require(geometry, GeometryKind::LineString)?;
            let trail_type = if tail.contains("atv") {
                "atv"
            } else if tail.contains("deer") {
                "deer"
            } else {
                "foot"
            };
            props.insert("trail_type".to_string(), trail_type.into());
            let prominence = if tail.contains("faint") { "faint" } else { "main" };
            props.insert("prominence".to_string(), prominence.into());
        }
        "bedding_areas" => {
            require(geometry, GeometryKind::Polygon)?;
            if tail.contains("hemlock") {
                props.insert("cover_type".to_string(), "hemlocks".into());
            }
        }
        "acorn_flats" => {
            require(geometry, GeometryKind::Polygon)?;
            insert_first_number(&mut props, "acorn_density_0_5", tail);
        }
        "open_woods" => {
            require(geometry, GeometryKind::Polygon)?;
            insert_first_number(&mut props, "openness_1_5", tail);
        }
        "big_rocks" => {
            if tail.contains("boulder") {
                props.insert("rock_type".to_string(), "boulder".into());
            }
        }
        "cliffs" | "ravines" | "streams" => {
            require(geometry, GeometryKind::LineString)?;
        }
        "animal_paths" => {
            require(geometry, GeometryKind::LineString)?;
            props.insert("confidence".to_string(), "observed".into());
        }
        _ => {}
    }

    Some(props)
}

fn require(geometry: Option<GeometryKind>, expected: GeometryKind) -> Option<()> {
    (geometry == Some(expected)).then_some(())
}

fn insert_stand_type(props: &mut Map<String, Value>, tail: &str) {
    let stand_type = ["climber", "shanty", "blind", "saddle"]
        .into_iter()
        .find(|kind| tail.contains(kind));
    if let Some(stand_type) = stand_type {
        props.insert("stand_type".to_string(), stand_type.into());
    }
}

/// Extrait le premier token numérique du tail ("8in buck rub" → 8)
fn first_number(text: &str) -> Option<f64> {
    let Ok(re) = Regex::new(r"(\d+(?:\.\d+)?)") else {
        return None;
    };
    re.find(text)?.as_str().parse().ok()
}

fn insert_first_number(props: &mut Map<String, Value>, key: &str, tail: &str) {
    let Some(n) = first_number(tail) else { return };
    let number = if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Number::from(n as i64)
    } else {
        match Number::from_f64(n) {
            Some(number) => number,
            None => return,
        }
    };
    props.insert(key.to_string(), Value::Number(number));
}
