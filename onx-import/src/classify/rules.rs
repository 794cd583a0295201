//! Tables de correspondance mot-clé → couche
//!
//! Une seule table ordonnée, partagée par les trois niveaux de
//! classification (préfixe exact, indice de dossier, sous-chaîne du nom).
//! La première règle qui matche gagne; une règle dont la contrainte de
//! géométrie rejette la feature ne passe pas la main aux règles suivantes.

use crate::catalog::GeometryKind;

/// Cible d'une règle, éventuellement dépendante de la géométrie
#[derive(Debug, Clone, Copy)]
pub enum RuleTarget {
    /// Toujours la même couche
    Fixed(&'static str),
    /// Polygon → première couche, sinon seconde
    PolygonOr(&'static str, &'static str),
    /// LineString obligatoire
    LineOnly(&'static str),
    /// Polygon obligatoire
    PolygonOnly(&'static str),
}

impl RuleTarget {
    /// Résout la couche cible pour une géométrie donnée
    pub fn resolve(self, geometry: Option<GeometryKind>) -> Option<&'static str> {
        match self {
            RuleTarget::Fixed(id) => Some(id),
            RuleTarget::PolygonOr(polygon, other) => {
                if geometry == Some(GeometryKind::Polygon) {
                    Some(polygon)
                } else {
                    Some(other)
                }
            }
            RuleTarget::LineOnly(id) => {
                (geometry == Some(GeometryKind::LineString)).then_some(id)
            }
            RuleTarget::PolygonOnly(id) => (geometry == Some(GeometryKind::Polygon)).then_some(id),
        }
    }
}

/// Règle de classification
pub struct Rule {
    /// Mots-clés (au singulier) déclenchant la règle
    pub keywords: &'static [&'static str],

    /// Couche cible
    pub target: RuleTarget,
}

/// Table ordonnée des règles
pub const RULES: &[Rule] = &[
    Rule {
        keywords: &["stand"],
        target: RuleTarget::PolygonOr("tree_stands", "stands"),
    },
    Rule {
        keywords: &["spot"],
        target: RuleTarget::Fixed("stands"),
    },
    Rule {
        keywords: &["scrape"],
        target: RuleTarget::Fixed("scrapes"),
    },
    Rule {
        keywords: &["rub"],
        target: RuleTarget::Fixed("rubs"),
    },
    Rule {
        keywords: &["tree"],
        target: RuleTarget::Fixed("trees_points"),
    },
    Rule {
        keywords: &["trail"],
        target: RuleTarget::LineOnly("trails"),
    },
    Rule {
        keywords: &["bedding"],
        target: RuleTarget::PolygonOr("bedding_areas", "beds_points"),
    },
    Rule {
        keywords: &["bed"],
        target: RuleTarget::Fixed("beds_points"),
    },
    Rule {
        keywords: &["flat", "acorn"],
        target: RuleTarget::PolygonOnly("acorn_flats"),
    },
    Rule {
        keywords: &["open"],
        target: RuleTarget::PolygonOnly("open_woods"),
    },
    Rule {
        keywords: &["rock"],
        target: RuleTarget::Fixed("big_rocks"),
    },
    Rule {
        keywords: &["cliff"],
        target: RuleTarget::LineOnly("cliffs"),
    },
    Rule {
        keywords: &["ravine"],
        target: RuleTarget::LineOnly("ravines"),
    },
    Rule {
        keywords: &["stream", "creek"],
        target: RuleTarget::LineOnly("streams"),
    },
    Rule {
        keywords: &["hunt"],
        target: RuleTarget::Fixed("hunts"),
    },
    Rule {
        keywords: &["sighting"],
        target: RuleTarget::Fixed("animal_sightings"),
    },
];

/// Niveau préfixe: égalité exacte, après retrait d'un `s` final
/// (pluriel/singulier traités indifféremment)
pub fn match_prefix(prefix: &str, geometry: Option<GeometryKind>) -> Option<&'static str> {
    if prefix.is_empty() {
        return None;
    }
    let singular = prefix.strip_suffix('s').unwrap_or(prefix);
    RULES
        .iter()
        .find(|rule| rule.keywords.contains(&singular))
        .and_then(|rule| rule.target.resolve(geometry))
}

/// Niveaux dossier et nom: recherche de sous-chaîne
pub fn match_substring(text: &str, geometry: Option<GeometryKind>) -> Option<&'static str> {
    if text.is_empty() {
        return None;
    }
    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|keyword| text.contains(keyword)))
        .and_then(|rule| rule.target.resolve(geometry))
}
