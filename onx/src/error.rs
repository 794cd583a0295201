//! Types d'erreurs pour le crate onx

use thiserror::Error;

/// Erreurs pouvant survenir lors du parsing d'un export onX
#[derive(Debug, Error)]
pub enum OnxError {
    /// Erreur d'I/O lors de la lecture du fichier source
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document KML illisible (parsing XML et fallback regex vides)
    #[error("Failed to parse KML: {0}")]
    Kml(String),

    /// Document GPX illisible
    #[error("Failed to parse GPX: {0}")]
    Gpx(#[from] gpx::errors::GpxError),

    /// Extension de fichier non supportée
    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),
}
