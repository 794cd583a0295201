//! Détection de doublons contre les documents déjà persistés
//!
//! La comparaison se fait par égalité stricte de signatures. Un document
//! absent ou corrompu équivaut à une collection vide: la déduplication ne
//! bloque jamais un import.

use serde_json::Value;
use tracing::debug;

use crate::signature::value_signature;
use crate::store::ProjectStore;

/// Vérifie si une signature existe déjà dans le document d'une couche
pub fn is_duplicate(store: &ProjectStore, layer_file: &str, signature: &str) -> bool {
    let text = match store.read_text(&format!("data/{}", layer_file)) {
        Ok(text) => text,
        Err(_) => return false,
    };
    let collection: Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(e) => {
            debug!("Unreadable layer document {}: {}", layer_file, e);
            return false;
        }
    };
    collection
        .get("features")
        .and_then(Value::as_array)
        .map(|features| features.iter().any(|f| value_signature(f) == signature))
        .unwrap_or(false)
}
