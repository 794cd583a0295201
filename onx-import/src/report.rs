//! Rapport d'import onX
//!
//! Ce module fournit la structure accumulée pendant un run d'import
//! (compteurs par couche, doublons, inconnus, erreurs, warnings) et sa
//! persistance en JSON horodaté dans `imports/`.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::store::ProjectStore;

/// Feature non classifiable
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnknownFeature {
    /// Nom de la feature source
    pub name: String,
    /// Raison de l'échec de classification
    pub reason: String,
    /// Type de géométrie rencontré
    pub geometry_type: String,
}

/// Erreur attachée à un fichier source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileError {
    /// Fichier source concerné
    pub file: String,
    /// Message d'erreur
    pub error: String,
}

/// Rapport complet d'un run d'import
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Nombre de features ajoutées, par couche
    pub counts_by_layer: BTreeMap<String, u64>,
    /// Features classifiées mais rejetées comme doublons
    pub duplicates: u64,
    /// Features non classifiables
    pub unknown: Vec<UnknownFeature>,
    /// Erreurs par fichier source
    pub errors: Vec<FileError>,
    /// Avertissements libres
    pub warnings: Vec<String>,
}

impl Default for ImportReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportReport {
    /// Crée un rapport vide (avec l'avertissement photos, systématique
    /// pour ce format d'export)
    pub fn new() -> Self {
        Self {
            counts_by_layer: BTreeMap::new(),
            duplicates: 0,
            unknown: Vec::new(),
            errors: Vec::new(),
            warnings: vec!["Photos are not included in onX exports".to_string()],
        }
    }

    /// Enregistre une feature ajoutée
    pub fn record_import(&mut self, layer_id: &str) {
        *self.counts_by_layer.entry(layer_id.to_string()).or_default() += 1;
    }

    /// Enregistre un doublon rejeté
    pub fn record_duplicate(&mut self) {
        self.duplicates += 1;
    }

    /// Enregistre une feature non classifiable
    pub fn record_unknown(&mut self, name: &str, reason: &str, geometry_type: &str) {
        self.unknown.push(UnknownFeature {
            name: name.to_string(),
            reason: reason.to_string(),
            geometry_type: geometry_type.to_string(),
        });
    }

    /// Enregistre une erreur de fichier ou de feature
    pub fn record_error(&mut self, file: String, error: String) {
        self.errors.push(FileError { file, error });
    }

    /// Enregistre un avertissement
    pub fn record_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Nombre total de features ajoutées
    pub fn total_imported(&self) -> u64 {
        self.counts_by_layer.values().sum()
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{} imported, {} duplicates, {} unknown, {} errors",
            self.total_imported(),
            self.duplicates,
            self.unknown.len(),
            self.errors.len()
        )
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("ONX IMPORT REPORT");
        println!("{}", "=".repeat(60));

        println!("\n--- SUMMARY ---");
        println!("{}", self.summary());

        if !self.counts_by_layer.is_empty() {
            println!("\n--- BY LAYER ---");
            for (layer, count) in &self.counts_by_layer {
                println!("  {}: {}", layer, count);
            }
        }

        if !self.unknown.is_empty() {
            println!("\n--- UNKNOWN ({}) ---", self.unknown.len());
            for entry in self.unknown.iter().take(10) {
                println!("  \"{}\" ({}): {}", entry.name, entry.geometry_type, entry.reason);
            }
            if self.unknown.len() > 10 {
                println!("  ... and {} more", self.unknown.len() - 10);
            }
        }

        if !self.errors.is_empty() {
            println!("\n--- ERRORS ({}) ---", self.errors.len());
            for entry in self.errors.iter().take(20) {
                println!("  [{}] {}", entry.file, entry.error);
            }
            if self.errors.len() > 20 {
                println!("  ... and {} more", self.errors.len() - 20);
            }
        }

        if !self.warnings.is_empty() {
            println!("\n--- WARNINGS ({}) ---", self.warnings.len());
            for warning in &self.warnings {
                println!("  {}", warning);
            }
        }

        println!("\n{}", "=".repeat(60));
    }
}

/// Persiste le rapport en JSON indenté, sous un chemin horodaté.
///
/// Un rapport par run, jamais écrasé ni fusionné. Retourne le chemin
/// relatif du document créé.
pub fn write_report(
    store: &ProjectStore,
    report: &ImportReport,
    import_timestamp: &str,
) -> Result<String> {
    let stamp: String = import_timestamp
        .chars()
        .map(|c| if c == ':' || c == '.' { '-' } else { c })
        .collect();
    let relative = format!("imports/import_report_{}.json", stamp);
    let serialized = serde_json::to_string_pretty(report)?;
    store.write_text(&relative, &serialized)?;
    Ok(relative)
}
