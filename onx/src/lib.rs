//! # onx
//!
//! Parser pour les fichiers d'export onX Hunt (KML/GPX).
//!
//! ## Features
//!
//! - Conversion KML/GPX vers des features GeoJSON uniformes
//! - Index des dossiers KML (indice de classification secondaire)
//! - Fallbacks regex pour les exports KML non standards
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::path::Path;
//!
//! let features = onx::parse_file(Path::new("export.kml"))?;
//! for feature in &features {
//!     println!("{}: {}", feature.name, feature.geometry_type());
//! }
//! ```

pub mod error;
pub mod parser;
pub mod types;

pub use error::OnxError;
pub use parser::gpx::parse_gpx;
pub use parser::kml::parse_kml;
pub use types::ParsedFeature;

use std::path::Path;

/// Parse un fichier d'export onX en dispatchant selon l'extension
/// (insensible à la casse).
///
/// # Errors
///
/// - `OnxError::UnsupportedExtension` si l'extension n'est ni kml ni gpx
///   (vérifiée avant toute lecture)
/// - `OnxError::Io` si le fichier est illisible
/// - `OnxError::Kml` / `OnxError::Gpx` si le contenu est irrécupérable
pub fn parse_file(path: &Path) -> Result<Vec<ParsedFeature>, OnxError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "kml" => {
            let text = std::fs::read_to_string(path)?;
            parse_kml(&text)
        }
        "gpx" => {
            let text = std::fs::read_to_string(path)?;
            parse_gpx(&text)
        }
        other => Err(OnxError::UnsupportedExtension(other.to_string())),
    }
}
