//! # onx-import
//!
//! Import d'exports onX Hunt (KML/GPX) vers les documents GeoJSON par
//! couche d'un projet, avec classification heuristique, déduplication par
//! signatures et rapport d'import.
//!
//! ## Features
//!
//! - Classification par niveaux: préfixe exact, dossier KML, mots-clés,
//!   repli par géométrie
//! - Déduplication géométrie+nom (arrondi 6 décimales)
//! - Écritures append-only, atomiques quand possible
//! - Rapport JSON horodaté par run
//!
//! ## Usage CLI
//!
//! ```bash
//! # Import de fichiers dans un projet
//! onx-import import --project ./my-land --user Fabien export1.kml tracks.gpx
//!
//! # Cas fixes du classifieur
//! onx-import selftest
//! ```

pub mod catalog;
pub mod classify;
pub mod cli;
pub mod dedupe;
pub mod import;
pub mod options;
pub mod platform;
pub mod report;
pub mod selftest;
pub mod signature;
pub mod store;
pub mod writer;

pub use classify::{classify, MappedFeature};
pub use import::{import_onx, run_import_with_dialog, DialogSettings};
pub use options::{ImportOptions, TracksTarget};
pub use platform::{FileFilter, Platform};
pub use report::{write_report, ImportReport};
pub use store::ProjectStore;
