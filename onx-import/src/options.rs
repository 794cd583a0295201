//! Options d'un run d'import

use std::path::PathBuf;

/// Couche cible des traces GPS sans préfixe ni mot-clé reconnu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TracksTarget {
    /// Sentiers
    #[default]
    Trails,
    /// Passages d'animaux
    AnimalPaths,
}

impl TracksTarget {
    /// Identifiant de la couche cible
    pub fn layer_id(self) -> &'static str {
        match self {
            TracksTarget::Trails => "trails",
            TracksTarget::AnimalPaths => "animal_paths",
        }
    }
}

/// Options complètes d'un import onX
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Fichiers source (.kml / .gpx)
    pub input_files: Vec<PathBuf>,

    /// Couche des traces sans classification
    pub tracks_target: TracksTarget,

    /// Fuseau horaire IANA appliqué aux horodatages de chasse GPX
    pub time_zone: String,

    /// Heuristiques de classification (dossier, sous-chaînes, géométrie)
    pub use_heuristics: bool,

    /// Ne retenir que les géométries Point
    pub only_points: bool,

    /// Utilisateur actif, enregistré comme imported_by/created_by
    pub active_user: String,

    /// Horodatage ISO du run, attribué à toutes les features importées
    pub import_timestamp: String,
}
