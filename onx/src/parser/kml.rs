//! Parser KML avec fallbacks regex
//!
//! Les exports KML d'onX varient d'une version à l'autre; trois stratégies
//! en cascade maximisent l'extraction sans jamais échouer sur un fichier
//! dont une paire nom/coordonnées reste récupérable:
//!
//! 1. Parsing KML complet (crate `kml`), avec index des dossiers construit
//!    par un scan séparé du texte brut
//! 2. Si la conversion ne produit aucune feature: scan regex des blocs
//!    `Placemark` basiques (nom + Point)
//! 3. Si le parsing XML échoue: même scan regex sur le texte brut

use std::collections::HashMap;

use geojson::Geometry;
use kml::types::Geometry as KmlGeometry;
use kml::Kml;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::types::ParsedFeature;
use crate::OnxError;

/// Parse un document KML et retourne les features extraites.
///
/// # Errors
///
/// Retourne `OnxError::Kml` uniquement si le parsing XML échoue ET que le
/// scan regex de secours ne trouve aucun placemark.
pub fn parse_kml(text: &str) -> Result<Vec<ParsedFeature>, OnxError> {
    match text.parse::<Kml>() {
        Ok(document) => {
            let hints = folder_hints(text);
            let mut out = Vec::new();
            collect_features(&document, &hints, &mut out);

            // Certains exports onX ont une structure non standard que la
            // conversion ne reconnaît pas: tenter le scan regex
            if out.is_empty() {
                out = scan_point_placemarks(text);
            }
            Ok(out)
        }
        Err(e) => {
            debug!("KML parse failed, trying regex fallback: {}", e);
            let out = scan_point_placemarks(text);
            if out.is_empty() {
                return Err(OnxError::Kml(e.to_string()));
            }
            Ok(out)
        }
    }
}

/// Parcourt l'arbre KML et convertit chaque placemark en `ParsedFeature`
fn collect_features(node: &Kml, hints: &HashMap<String, String>, out: &mut Vec<ParsedFeature>) {
    match node {
        Kml::KmlDocument(doc) => {
            for child in &doc.elements {
                collect_features(child, hints, out);
            }
        }
        Kml::Document { elements, .. } => {
            for child in elements {
                collect_features(child, hints, out);
            }
        }
        Kml::Folder(folder) => {
            for child in &folder.elements {
                collect_features(child, hints, out);
            }
        }
        Kml::Placemark(placemark) => {
            // Placemark sans géométrie exploitable: ignoré
            let Some(geometry) = placemark.geometry.as_ref().and_then(convert_geometry) else {
                return;
            };
            let name = placemark
                .name
                .as_deref()
                .unwrap_or("")
                .trim()
                .to_string();
            let mut props = Map::new();
            if let Some(folder) = hints.get(&name) {
                props.insert("folder_hint".to_string(), Value::String(folder.clone()));
            }
            out.push(ParsedFeature {
                name,
                desc: placemark.description.clone(),
                geometry,
                props,
            });
        }
        _ => {}
    }
}

/// Convertit une géométrie KML en géométrie GeoJSON.
///
/// Seuls Point, LineString et Polygon sont retenus (sous-ensemble onX).
fn convert_geometry(geometry: &KmlGeometry) -> Option<Geometry> {
    let value = match geometry {
        KmlGeometry::Point(point) => geojson::Value::from(&geo::Point::from(point.clone())),
        KmlGeometry::LineString(line) => {
            geojson::Value::from(&geo::LineString::from(line.clone()))
        }
        KmlGeometry::Polygon(polygon) => geojson::Value::from(&geo::Polygon::from(polygon.clone())),
        _ => return None,
    };
    Some(Geometry::new(value))
}

/// Construit l'index nom de placemark → nom du dossier englobant le plus
/// proche, par scan du texte brut.
///
/// Best-effort: un document mal imbriqué donne un index partiel ou vide,
/// jamais une erreur (les indices de dossier sont optionnels).
fn folder_hints(xml: &str) -> HashMap<String, String> {
    let mut hints = HashMap::new();
    // Pile des dossiers ouverts; None tant que leur <name> n'a pas été vu
    let mut folders: Vec<Option<String>> = Vec::new();
    let mut in_placemark = false;
    let mut placemark_name: Option<String> = None;

    let mut rest = xml;
    while let Some(open) = rest.find('<') {
        rest = &rest[open..];

        // Sections à ignorer: CDATA et commentaires
        if let Some(after) = rest.strip_prefix("<![CDATA[") {
            rest = after.find("]]>").map(|p| &after[p + 3..]).unwrap_or("");
            continue;
        }
        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.find("-->").map(|p| &after[p + 3..]).unwrap_or("");
            continue;
        }

        let Some(close) = rest.find('>') else { break };
        let tag = &rest[1..close];
        let self_closing = tag.ends_with('/');
        rest = &rest[close + 1..];

        if tag_is(tag, "Folder") {
            if !self_closing {
                folders.push(None);
            }
        } else if tag_is(tag, "/Folder") {
            folders.pop();
        } else if tag_is(tag, "Placemark") {
            if !self_closing {
                in_placemark = true;
                placemark_name = None;
            }
        } else if tag_is(tag, "/Placemark") {
            if let Some(name) = placemark_name.take() {
                let folder = folders.iter().rev().flatten().next();
                if let Some(folder) = folder {
                    hints.insert(name, folder.clone());
                }
            }
            in_placemark = false;
        } else if tag_is(tag, "name") && !self_closing {
            let Some(end) = rest.find("</name>") else { break };
            let text = rest[..end].trim().to_string();
            rest = &rest[end + "</name>".len()..];
            if text.is_empty() {
                continue;
            }
            if in_placemark {
                // Premier <name> du placemark uniquement
                if placemark_name.is_none() {
                    placemark_name = Some(text);
                }
            } else if let Some(top) = folders.last_mut() {
                if top.is_none() {
                    *top = Some(text);
                }
            }
        }
    }

    hints
}

/// Teste le nom d'un tag XML en tenant compte des attributs
fn tag_is(tag: &str, name: &str) -> bool {
    match tag.strip_prefix(name) {
        Some(after) => matches!(after.chars().next(), None | Some(' ' | '\t' | '\r' | '\n' | '/')),
        None => false,
    }
}

/// Scan regex de secours: extrait les blocs Placemark contenant un nom et
/// un Point (exports onX simples)
fn scan_point_placemarks(text: &str) -> Vec<ParsedFeature> {
    let Ok(re) = Regex::new(
        r"(?is)<Placemark.*?<name>(.*?)</name>.*?<Point>.*?<coordinates>\s*([-0-9.]+),\s*([-0-9.]+)[^<]*</coordinates>.*?</Placemark>",
    ) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for caps in re.captures_iter(text) {
        let name = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
        let lon: f64 = match caps.get(2).and_then(|m| m.as_str().parse().ok()) {
            Some(n) => n,
            None => continue,
        };
        let lat: f64 = match caps.get(3).and_then(|m| m.as_str().parse().ok()) {
            Some(n) => n,
            None => continue,
        };
        if !lon.is_finite() || !lat.is_finite() {
            continue;
        }
        out.push(ParsedFeature {
            name: name.to_string(),
            desc: None,
            geometry: Geometry::new(geojson::Value::Point(vec![lon, lat])),
            props: Map::new(),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_KML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>My Export</name>
    <Folder>
      <name>Scrapes</name>
      <Placemark>
        <name>Scrape: Fresh</name>
        <description>By the oak</description>
        <Point><coordinates>-77.123456,41.5,0</coordinates></Point>
      </Placemark>
    </Folder>
    <Placemark>
      <name>Trail: deer main</name>
      <LineString><coordinates>-77.1,41.5,0 -77.2,41.6,0</coordinates></LineString>
    </Placemark>
  </Document>
</kml>"#;

    #[test]
    fn test_parse_simple_export() {
        let features = parse_kml(SIMPLE_KML).unwrap();
        assert_eq!(features.len(), 2);

        assert_eq!(features[0].name, "Scrape: Fresh");
        assert_eq!(features[0].desc.as_deref(), Some("By the oak"));
        assert_eq!(features[0].geometry_type(), "Point");
        assert_eq!(
            features[0].props.get("folder_hint").and_then(|v| v.as_str()),
            Some("Scrapes")
        );

        assert_eq!(features[1].name, "Trail: deer main");
        assert_eq!(features[1].geometry_type(), "LineString");
        assert!(features[1].props.get("folder_hint").is_none());
    }

    #[test]
    fn test_folder_hints_nested() {
        let xml = r#"<kml><Folder><name>Outer</name><Folder>
            <Placemark><name>A</name><Point><coordinates>0,0</coordinates></Point></Placemark>
        </Folder></Folder></kml>"#;
        let hints = folder_hints(xml);
        // Le dossier interne n'a pas de nom: le plus proche nommé est Outer
        assert_eq!(hints.get("A").map(String::as_str), Some("Outer"));
    }

    #[test]
    fn test_folder_hints_ignore_cdata() {
        let xml = r#"<kml><Folder><name>Spots</name>
            <Placemark><name>B</name>
            <description><![CDATA[<Placemark><name>fake</name></Placemark>]]></description>
            </Placemark></Folder></kml>"#;
        let hints = folder_hints(xml);
        assert_eq!(hints.get("B").map(String::as_str), Some("Spots"));
        assert!(hints.get("fake").is_none());
    }

    #[test]
    fn test_fallback_on_unconverted_structure() {
        // MultiGeometry n'est pas retenu par la conversion: le scan regex
        // récupère quand même la paire nom/coordonnées
        let xml = r#"<kml xmlns="http://www.opengis.net/kml/2.2"><Document>
            <Placemark><name>Spot: field edge</name>
              <MultiGeometry><Point><coordinates>-77.2,41.4,0</coordinates></Point></MultiGeometry>
            </Placemark>
        </Document></kml>"#;
        let features = parse_kml(xml).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].name, "Spot: field edge");
        assert_eq!(features[0].geometry_type(), "Point");
    }

    #[test]
    fn test_fallback_on_malformed_xml() {
        let xml = r#"<kml><Placemark><name>Rub: 8in</name>
            <Point><coordinates>-77.5,41.9,0</coordinates></Point>
        </Placemark></bad></kml>"#;
        let features = parse_kml(xml).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].name, "Rub: 8in");
        match &features[0].geometry.value {
            geojson::Value::Point(coords) => {
                assert_eq!(coords[0], -77.5);
                assert_eq!(coords[1], 41.9);
            }
            other => panic!("Expected Point, got {:?}", other),
        }
    }

    #[test]
    fn test_unrecoverable_document_fails() {
        let result = parse_kml("not xml at all");
        assert!(result.is_err());
    }

    #[test]
    fn test_placemark_without_geometry_skipped() {
        let xml = r#"<kml xmlns="http://www.opengis.net/kml/2.2"><Document>
            <Placemark><name>No geometry here</name></Placemark>
            <Placemark><name>Stand: ladder</name>
              <Point><coordinates>-77.0,41.0,0</coordinates></Point>
            </Placemark>
        </Document></kml>"#;
        let features = parse_kml(xml).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].name, "Stand: ladder");
    }
}
