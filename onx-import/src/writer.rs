//! Ajout de features aux documents de couches
//!
//! Les documents ne sont jamais réécrits ni purgés par l'import: on ne
//! fait qu'ajouter. Un document absent est créé au premier ajout.

use anyhow::{Context, Result};
use geojson::Feature;
use serde_json::{json, Value};
use tracing::warn;

use crate::store::ProjectStore;

/// Ajoute une feature au document d'une couche.
///
/// Un document présent mais illisible est une erreur remontée à
/// l'orchestrateur (jamais écrasé silencieusement).
pub fn append_to_layer(store: &ProjectStore, layer_file: &str, feature: &Feature) -> Result<()> {
    let relative = format!("data/{}", layer_file);
    let feature_value = serde_json::to_value(feature).context("Failed to serialize feature")?;

    let collection = match store.read_text(&relative) {
        Ok(text) => {
            let mut collection: Value = serde_json::from_str(&text)
                .with_context(|| format!("Corrupt layer document: {}", relative))?;
            let features = collection
                .get_mut("features")
                .and_then(Value::as_array_mut)
                .with_context(|| format!("Layer document has no features array: {}", relative))?;
            features.push(feature_value);
            collection
        }
        Err(_) => json!({ "type": "FeatureCollection", "features": [feature_value] }),
    };

    let serialized = serde_json::to_string_pretty(&collection)?;
    if let Err(e) = store.atomic_write_text(&relative, &serialized) {
        warn!(
            "Atomic write failed for {}, falling back to plain write: {}",
            relative, e
        );
        store.write_text(&relative, &serialized)?;
    }
    Ok(())
}
