//! Interface vers la couche hôte (dialogues, rafraîchissement carte)
//!
//! Implémentée par l'UI de l'application; les tests utilisent des stubs.

use std::path::PathBuf;

/// Filtre d'extensions pour le sélecteur de fichiers
#[derive(Debug, Clone)]
pub struct FileFilter {
    /// Libellé affiché
    pub name: String,
    /// Extensions acceptées, sans le point
    pub extensions: Vec<String>,
}

/// Services fournis par la couche hôte
pub trait Platform {
    /// Ouvre un sélecteur de fichiers; liste vide si l'utilisateur annule
    fn choose_files(&self, filters: &[FileFilter]) -> Vec<PathBuf>;

    /// Signale aux couches cartographiques de recharger leurs données
    fn layers_reload(&self) {}
}
