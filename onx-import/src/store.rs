//! Accès aux documents texte d'un projet
//!
//! Tous les chemins sont relatifs à la racine du projet. L'écriture
//! atomique passe par un fichier temporaire renommé ensuite; le Writer
//! retombe sur l'écriture simple si elle échoue.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Racine d'un projet sur disque
#[derive(Debug, Clone)]
pub struct ProjectStore {
    root: PathBuf,
}

impl ProjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lit un document texte du projet
    pub fn read_text(&self, relative: &str) -> io::Result<String> {
        fs::read_to_string(self.root.join(relative))
    }

    /// Écrit un document texte, en créant les répertoires parents
    pub fn write_text(&self, relative: &str, text: &str) -> io::Result<()> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, text)
    }

    /// Écriture atomique: fichier temporaire puis rename
    pub fn atomic_write_text(&self, relative: &str, text: &str) -> io::Result<()> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document");
        let tmp = path.with_file_name(format!("{}.tmp", file_name));
        fs::write(&tmp, text)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        Ok(())
    }
}
