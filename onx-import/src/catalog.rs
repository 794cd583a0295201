//! Catalogue statique des couches du projet
//!
//! Chaque couche est adossée à son propre document GeoJSON dans `data/`,
//! impose un type de géométrie et reconnaît un ensemble de propriétés
//! (utilisé par les formulaires d'édition; l'import n'a besoin que du
//! fichier et de la géométrie).

/// Type de géométrie imposé par une couche
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
}

impl GeometryKind {
    /// Nom GeoJSON du type
    pub fn as_str(self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
        }
    }
}

/// Définition d'une couche
#[derive(Debug, Clone, Copy)]
pub struct LayerDef {
    /// Identifiant stable de la couche
    pub id: &'static str,

    /// Nom du document GeoJSON dans `data/`
    pub file: &'static str,

    /// Géométrie attendue
    pub geometry: GeometryKind,

    /// Propriétés reconnues (hors métadonnées communes name/date/notes)
    pub fields: &'static [&'static str],
}

/// Toutes les couches connues, dans l'ordre d'empilement de la carte
pub const LAYERS: &[LayerDef] = &[
    LayerDef {
        id: "property_boundary",
        file: "property_boundary.geojson",
        geometry: GeometryKind::Polygon,
        fields: &["acres"],
    },
    LayerDef {
        id: "streams",
        file: "streams.geojson",
        geometry: GeometryKind::LineString,
        fields: &["flow_type", "crossing_easy", "water_depth_cm", "photos"],
    },
    LayerDef {
        id: "cliffs",
        file: "cliffs.geojson",
        geometry: GeometryKind::LineString,
        fields: &["height_est_ft", "hazard", "photos"],
    },
    LayerDef {
        id: "ravines",
        file: "ravines.geojson",
        geometry: GeometryKind::LineString,
        fields: &["depth_est_ft", "passable", "photos"],
    },
    LayerDef {
        id: "trails",
        file: "trails.geojson",
        geometry: GeometryKind::LineString,
        fields: &["trail_type", "prominence", "condition", "driveable"],
    },
    LayerDef {
        id: "tree_stands",
        file: "tree_stands.geojson",
        geometry: GeometryKind::Polygon,
        fields: &[
            "dominant_species",
            "oak_density_0_5",
            "canopy_density_0_5",
            "stand_type",
            "photos",
            "area_acres",
        ],
    },
    LayerDef {
        id: "open_woods",
        file: "open_woods.geojson",
        geometry: GeometryKind::Polygon,
        fields: &["openness_1_5", "understory_1_5", "area_acres"],
    },
    LayerDef {
        id: "cover_points",
        file: "cover_points.geojson",
        geometry: GeometryKind::Point,
        fields: &["cover_type", "date", "photos"],
    },
    LayerDef {
        id: "acorn_flats",
        file: "acorn_flats.geojson",
        geometry: GeometryKind::Polygon,
        fields: &[
            "oak_density_0_5",
            "acorn_density_0_5",
            "sign_level",
            "photos",
            "area_acres",
        ],
    },
    LayerDef {
        id: "bedding_areas",
        file: "bedding_areas.geojson",
        geometry: GeometryKind::Polygon,
        fields: &["cover_type", "size_acres", "freshness", "photos"],
    },
    LayerDef {
        id: "trees_points",
        file: "trees_points.geojson",
        geometry: GeometryKind::Point,
        fields: &[
            "species_group",
            "species_name",
            "species_other",
            "species",
            "acorn_density_0_5",
            "mast_presence",
            "photos",
        ],
    },
    LayerDef {
        id: "beds_points",
        file: "beds_points.geojson",
        geometry: GeometryKind::Point,
        fields: &["freshness", "hair_present", "date", "photos"],
    },
    LayerDef {
        id: "mast_check_points",
        file: "mast_check_points.geojson",
        geometry: GeometryKind::Point,
        fields: &["oak_species", "acorn_density_0_5", "date", "photos"],
    },
    LayerDef {
        id: "big_rocks",
        file: "big_rocks.geojson",
        geometry: GeometryKind::Point,
        fields: &["rock_type", "size_m", "provides_cover", "vantage", "photos"],
    },
    LayerDef {
        id: "scrapes",
        file: "scrapes.geojson",
        geometry: GeometryKind::Point,
        fields: &["freshness", "size_class", "licking_branch", "date", "photos"],
    },
    LayerDef {
        id: "rubs",
        file: "rubs.geojson",
        geometry: GeometryKind::Point,
        fields: &["diameter_in", "height_in", "direction_bearing", "date", "photos"],
    },
    LayerDef {
        id: "stands",
        file: "stands.geojson",
        geometry: GeometryKind::Point,
        fields: &["stand_type", "good_winds", "access_notes", "photos"],
    },
    LayerDef {
        id: "animal_sign",
        file: "animal_sign.geojson",
        geometry: GeometryKind::Point,
        fields: &[
            "sign_id",
            "species",
            "sign_type",
            "freshness",
            "track_size_class",
            "direction_bearing",
            "scat_size_class",
            "scat_composition",
            "date",
            "photos",
        ],
    },
    LayerDef {
        id: "animal_paths",
        file: "animal_paths.geojson",
        geometry: GeometryKind::LineString,
        fields: &["path_id", "hunt_id", "species", "confidence", "start_time", "end_time"],
    },
    LayerDef {
        id: "hunts",
        file: "hunts.geojson",
        geometry: GeometryKind::Point,
        fields: &[
            "hunt_id",
            "user_name",
            "date",
            "start_time",
            "end_time",
            "wind_dir_deg",
            "wind_speed_mph",
            "temp_f",
            "pressure_inhg",
            "stand_or_blind",
        ],
    },
    LayerDef {
        id: "harvests",
        file: "harvests.geojson",
        geometry: GeometryKind::Point,
        fields: &[
            "harvest_id",
            "hunt_id",
            "species",
            "sex",
            "weight_lbs",
            "weapon",
            "age_estimate",
            "points",
            "beard_length_in",
            "spur_length_in",
            "shot_distance_yards",
            "date",
            "photos",
        ],
    },
    LayerDef {
        id: "animal_sightings",
        file: "animal_sightings.geojson",
        geometry: GeometryKind::Point,
        fields: &[
            "sighting_id",
            "hunt_id",
            "species",
            "sex",
            "age_class",
            "count",
            "behavior",
            "time_of_day",
            "terrain_use",
            "direction_bearing",
            "wind_relation",
            "distance_yards",
            "photos",
        ],
    },
];

/// Recherche une couche par identifiant
pub fn layer_by_id(id: &str) -> Option<&'static LayerDef> {
    LAYERS.iter().find(|layer| layer.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_by_id() {
        let scrapes = layer_by_id("scrapes").unwrap();
        assert_eq!(scrapes.file, "scrapes.geojson");
        assert_eq!(scrapes.geometry, GeometryKind::Point);

        let trails = layer_by_id("trails").unwrap();
        assert_eq!(trails.geometry, GeometryKind::LineString);

        assert!(layer_by_id("nonexistent").is_none());
    }

    #[test]
    fn test_layer_files_unique() {
        for (i, a) in LAYERS.iter().enumerate() {
            for b in &LAYERS[i + 1..] {
                assert_ne!(a.id, b.id, "duplicate layer id");
                assert_ne!(a.file, b.file, "duplicate layer file");
            }
        }
    }

    #[test]
    fn test_all_files_are_geojson() {
        for layer in LAYERS {
            assert!(layer.file.ends_with(".geojson"), "{}", layer.file);
        }
    }
}
