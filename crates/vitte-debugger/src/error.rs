//! error.rs — Taxonomie d'erreurs du débogueur.
//!
//! Distingue ce qui est récupérable localement (`LoadError`, `LayoutError`)
//! de ce qui doit remonter tel quel à l'appelant (`FatalError`). Le
//! `QuitSignal` n'est volontairement pas une variante de ce type : ce n'est
//! pas une erreur mais le seul mécanisme d'annulation de la boucle de
//! contrôle (voir `control::QuitSignal`).

use thiserror::Error;

/// Erreur produite par les sous-systèmes du débogueur.
#[derive(Debug, Error)]
pub enum DebuggerError {
    /// Module introuvable ou extension native invalide.
    #[error("load error: {0}")]
    Load(String),

    /// `layout.json` malformé ou pourcentages invalides.
    #[error("layout error: {0}")]
    Layout(String),

    /// Erreur remontée par la VM hôte (compilation, exécution, pile).
    #[error("script error in module '{module}' at line {line}: {message}")]
    Script { module: String, line: usize, message: String },

    /// Erreur de bas niveau (E/S, etc.) sans catégorie plus précise.
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, DebuggerError>;
