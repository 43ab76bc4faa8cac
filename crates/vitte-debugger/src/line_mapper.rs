//! line_mapper.rs — Registre `LineId → LineDetails` (table des lignes).
//!
//! Conceptuellement unique par processus, mais implémenté ici comme une
//! valeur ordinaire plutôt qu'un singleton global : le binaire
//! (`vitte-dbg`) en possède une seule instance et la fait transiter
//! explicitement à travers les appels.

use std::collections::HashMap;

use crate::line_id::LineId;

/// Détails associés à un `LineId` enregistré par l'instrumenteur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDetails {
    /// Nom du module propriétaire de la ligne.
    pub module: String,
    /// Position du probe dans la source instrumentée.
    pub instrumented_line_index: usize,
    /// Position de la ligne originale correspondante.
    pub original_line_index: usize,
}

/// Table bidirectionnelle entre identifiants de probe et positions sources.
#[derive(Debug, Default)]
pub struct LineMapper {
    lines: HashMap<LineId, LineDetails>,
    disabled: bool,
}

impl LineMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enregistre (ou remplace) l'entrée pour `id`.
    pub fn add_line(
        &mut self,
        id: LineId,
        module: impl Into<String>,
        instrumented_line_index: usize,
        original_line_index: usize,
    ) {
        self.lines.insert(
            id,
            LineDetails { module: module.into(), instrumented_line_index, original_line_index },
        );
    }

    /// Résout un `LineId` en détails de source. `O(1)` attendu.
    pub fn lookup(&self, id: LineId) -> Option<&LineDetails> {
        self.lines.get(&id)
    }

    /// Résout `(module, instrumented_idx)` en détails de source.
    ///
    /// Un simple parcours linéaire suffit : n'est invoqué que lors du
    /// rapport d'erreur de la VM, jamais sur le chemin chaud des probes.
    /// Quand la table est désactivée, retourne une correspondance
    /// identité (`original_line_index == instrumented_line_index`).
    pub fn reverse_lookup(&self, module_name: &str, instrumented_idx: usize) -> Option<LineDetails> {
        if self.disabled {
            return Some(LineDetails {
                module: module_name.to_string(),
                instrumented_line_index: instrumented_idx,
                original_line_index: instrumented_idx,
            });
        }
        self.lines
            .values()
            .find(|d| d.module == module_name && d.instrumented_line_index == instrumented_idx)
            .cloned()
    }

    /// Désactive la table (idempotent). Les lookups par id restent
    /// fonctionnels mais le reverse-lookup devient une identité.
    pub fn disable(&mut self) {
        self.disabled = true;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
