//! module.rs — Chargement et cache des modules sources.
//!
//! Un `Module` retient à la fois la source originale (pour l'affichage et
//! le rapport d'erreurs) et sa version instrumentée (servie à la VM). Le
//! `ModuleCache` évite de relire et ré-instrumenter un module déjà vu : la
//! VM hôte redemande le même module à chaque `import`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::instrumenter;
use crate::line_mapper::LineMapper;

/// Extension de fichier attendue pour les modules sources.
pub const MODULE_EXTENSION: &str = "wren";

/// Un module chargé : sa source originale, ligne par ligne, et sa version
/// instrumentée prête à être interprétée par la VM.
#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    original_lines: Vec<String>,
    instrumented_source: String,
}

impl Module {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn original_lines(&self) -> &[String] {
        &self.original_lines
    }

    pub fn original_line(&self, index: usize) -> Option<&str> {
        self.original_lines.get(index).map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.original_lines.len()
    }

    /// Source instrumentée, prête à être remise à la VM via `load_module`.
    pub fn instrumented_source(&self) -> &str {
        &self.instrumented_source
    }
}

/// Cache des modules par nom, avec support du mode désinstrumenté.
///
/// Chaque module n'est lu et instrumenté qu'une fois ; les appels suivants
/// retournent une copie de la source déjà calculée, à l'image de
/// `load_module_code` qui alloue un nouveau buffer à chaque requête de la VM.
#[derive(Debug, Default)]
pub struct ModuleCache {
    modules: HashMap<String, Module>,
    search_dir: Option<PathBuf>,
}

impl ModuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cherche les fichiers `<name>.wren` dans `dir` plutôt que dans le
    /// répertoire courant.
    pub fn with_search_dir(dir: impl Into<PathBuf>) -> Self {
        Self { modules: HashMap::new(), search_dir: Some(dir.into()) }
    }

    fn module_path(&self, name: &str) -> PathBuf {
        let file_name = format!("{name}.{MODULE_EXTENSION}");
        match &self.search_dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    /// Charge `name` depuis le cache, ou depuis disque et l'instrumente si
    /// absent. Retourne `None` si le fichier n'existe pas, à l'image du
    /// sentinel de "module introuvable" attendu par la VM hôte.
    ///
    /// Lorsque `instrumentation_enabled` vaut `false`, la source servie est
    /// la source originale telle quelle et aucune entrée n'est ajoutée à
    /// `line_mapper` (qui doit avoir été désactivé par l'appelant).
    pub fn get_or_load(
        &mut self,
        name: &str,
        line_mapper: &mut LineMapper,
        instrumentation_enabled: bool,
    ) -> Option<String> {
        if let Some(module) = self.modules.get(name) {
            return Some(module.instrumented_source.clone());
        }

        let path = self.module_path(name);
        let original_lines = read_lines(&path)?;

        let instrumented_source = if instrumentation_enabled {
            instrumenter::instrument(name, &original_lines, line_mapper).join("\n")
        } else {
            original_lines.join("\n")
        };

        let module = Module { name: name.to_string(), original_lines, instrumented_source };
        self.modules.insert(name.to_string(), module);
        self.modules.get(name).map(|m| m.instrumented_source.clone())
    }

    pub fn get(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }
}

fn read_lines(path: &Path) -> Option<Vec<String>> {
    let content = fs::read_to_string(path).ok()?;
    Some(content.lines().map(str::to_owned).collect())
}
