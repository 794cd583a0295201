//! Orchestration d'un run d'import onX
//!
//! Parsing → classification → déduplication → écriture, séquentiellement
//! et dans l'ordre des fichiers d'entrée. Chaque échec reste local à son
//! fichier ou sa feature: un run ne s'interrompt jamais en cours de route.

use std::path::Path;

use anyhow::{bail, Result};
use chrono::{SecondsFormat, Utc};
use onx::{OnxError, ParsedFeature};
use tracing::{info, warn};

use crate::catalog;
use crate::classify::classify;
use crate::dedupe::is_duplicate;
use crate::options::{ImportOptions, TracksTarget};
use crate::platform::{FileFilter, Platform};
use crate::report::{write_report, ImportReport};
use crate::store::ProjectStore;
use crate::writer::append_to_layer;

/// Exécute un import complet et retourne le rapport accumulé.
///
/// Le rapport n'est pas persisté ici: c'est la responsabilité de
/// l'appelant (voir [`run_import_with_dialog`]).
pub fn import_onx(opts: &ImportOptions, store: &ProjectStore) -> ImportReport {
    let mut report = ImportReport::new();

    // 1. Parser tous les fichiers, ordre préservé
    let mut parsed_all: Vec<(&Path, ParsedFeature)> = Vec::new();
    for file in &opts.input_files {
        match onx::parse_file(file) {
            Ok(features) => {
                info!(file = %file.display(), count = features.len(), "Parsed input file");
                parsed_all.extend(features.into_iter().map(|pf| (file.as_path(), pf)));
            }
            Err(OnxError::UnsupportedExtension(_)) => {
                report.record_warning(format!("Unsupported file: {}", file.display()));
            }
            Err(e) => {
                warn!(file = %file.display(), "Parse failed: {}", e);
                report.record_error(file.display().to_string(), e.to_string());
            }
        }
    }

    // 2. Classifier puis écrire, une feature à la fois
    for (file, parsed) in &parsed_all {
        if let Err(e) = import_one(parsed, opts, store, &mut report) {
            report.record_error(file.display().to_string(), e.to_string());
        }
    }

    report
}

/// Pipeline d'une seule feature: filtre, classification, dédup, écriture
fn import_one(
    parsed: &ParsedFeature,
    opts: &ImportOptions,
    store: &ProjectStore,
    report: &mut ImportReport,
) -> Result<()> {
    if opts.only_points && !matches!(parsed.geometry.value, geojson::Value::Point(_)) {
        // Exclue silencieusement: comptée nulle part
        return Ok(());
    }

    let Some(mapped) = classify(parsed, opts) else {
        report.record_unknown(
            &parsed.name,
            "no prefix or unsupported geometry",
            parsed.geometry_type(),
        );
        return Ok(());
    };

    let Some(layer) = catalog::layer_by_id(mapped.layer_id) else {
        report.record_unknown(
            &parsed.name,
            &format!("no layer config for {}", mapped.layer_id),
            parsed.geometry_type(),
        );
        return Ok(());
    };

    if is_duplicate(store, layer.file, &mapped.signature) {
        report.record_duplicate();
        return Ok(());
    }

    append_to_layer(store, layer.file, &mapped.feature)?;
    report.record_import(mapped.layer_id);
    Ok(())
}

/// Réglages du point d'entrée interactif
#[derive(Debug, Clone)]
pub struct DialogSettings {
    /// Couche des traces sans classification
    pub tracks_target: TracksTarget,
    /// Fuseau horaire IANA; défaut America/New_York
    pub time_zone: Option<String>,
    /// Heuristiques de classification
    pub use_heuristics: bool,
    /// Ne retenir que les Points
    pub only_points: bool,
    /// Utilisateur actif (obligatoire)
    pub active_user: String,
}

impl Default for DialogSettings {
    fn default() -> Self {
        Self {
            tracks_target: TracksTarget::Trails,
            time_zone: None,
            use_heuristics: true,
            only_points: false,
            active_user: String::new(),
        }
    }
}

/// Point d'entrée interactif: choix des fichiers, import, rapport,
/// rechargement des couches.
///
/// Retourne le chemin relatif du rapport, ou `None` si l'utilisateur
/// annule le sélecteur (aucun effet de bord dans ce cas).
///
/// # Errors
///
/// Échoue si `active_user` est vide: l'import n'attribue jamais de
/// features à un utilisateur anonyme.
pub fn run_import_with_dialog(
    platform: &dyn Platform,
    store: &ProjectStore,
    settings: &DialogSettings,
) -> Result<Option<String>> {
    let inputs = platform.choose_files(&[FileFilter {
        name: "onX Exports".to_string(),
        extensions: vec!["kml".to_string(), "gpx".to_string()],
    }]);
    if inputs.is_empty() {
        return Ok(None);
    }

    if settings.active_user.trim().is_empty() {
        bail!("Active user required for import");
    }

    let opts = ImportOptions {
        input_files: inputs,
        tracks_target: settings.tracks_target,
        time_zone: settings
            .time_zone
            .clone()
            .unwrap_or_else(|| "America/New_York".to_string()),
        use_heuristics: settings.use_heuristics,
        only_points: settings.only_points,
        active_user: settings.active_user.clone(),
        import_timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    let report = import_onx(&opts, store);
    let relative = write_report(store, &report, &opts.import_timestamp)?;
    info!(report = relative.as_str(), "Import complete: {}", report.summary());

    platform.layers_reload();
    Ok(Some(relative))
}
