//! breakpoint.rs — Ensemble des points d'arrêt, par module.
//!
//! Un point d'arrêt est identifié par `(module, ligne originale)`. Pas de
//! conditions ni de compteurs : la boucle de contrôle s'arrête quand une
//! ligne probée correspond à une entrée de cet ensemble, rien de plus.

use std::collections::BTreeSet;
use std::collections::HashMap;

/// Ensemble des points d'arrêt actifs, indexés par module.
#[derive(Debug, Default, Clone)]
pub struct BreakpointSet {
    by_module: HashMap<String, BTreeSet<usize>>,
}

impl BreakpointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute un point d'arrêt sur la ligne originale `line` de `module`.
    /// Retourne `true` s'il n'était pas déjà présent.
    pub fn add(&mut self, module: impl Into<String>, line: usize) -> bool {
        self.by_module.entry(module.into()).or_default().insert(line)
    }

    /// Retire le point d'arrêt ; retourne `true` s'il existait.
    pub fn remove(&mut self, module: &str, line: usize) -> bool {
        match self.by_module.get_mut(module) {
            Some(set) => {
                let removed = set.remove(&line);
                if set.is_empty() {
                    self.by_module.remove(module);
                }
                removed
            }
            None => false,
        }
    }

    /// Bascule l'état du point d'arrêt ; retourne le nouvel état (`true` =
    /// désormais actif).
    pub fn toggle(&mut self, module: impl Into<String>, line: usize) -> bool {
        let module = module.into();
        if self.is_breakpoint(&module, line) {
            self.remove(&module, line);
            false
        } else {
            self.add(module, line);
            true
        }
    }

    pub fn is_breakpoint(&self, module: &str, line: usize) -> bool {
        self.by_module.get(module).is_some_and(|set| set.contains(&line))
    }

    /// Lignes en point d'arrêt pour `module`, en ordre croissant.
    pub fn lines_for(&self, module: &str) -> Vec<usize> {
        self.by_module.get(module).map(|set| set.iter().copied().collect()).unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.by_module.clear();
    }

    pub fn clear_module(&mut self, module: &str) {
        self.by_module.remove(module);
    }

    pub fn is_empty(&self) -> bool {
        self.by_module.values().all(BTreeSet::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_query() {
        let mut bp = BreakpointSet::new();
        assert!(bp.add("Foo", 3));
        assert!(bp.is_breakpoint("Foo", 3));
        assert!(!bp.is_breakpoint("Foo", 4));
        assert!(!bp.is_breakpoint("Bar", 3));
    }

    #[test]
    fn add_twice_returns_false_second_time() {
        let mut bp = BreakpointSet::new();
        assert!(bp.add("Foo", 3));
        assert!(!bp.add("Foo", 3));
    }

    #[test]
    fn toggle_flips_state() {
        let mut bp = BreakpointSet::new();
        assert!(bp.toggle("Foo", 1));
        assert!(bp.is_breakpoint("Foo", 1));
        assert!(!bp.toggle("Foo", 1));
        assert!(!bp.is_breakpoint("Foo", 1));
    }

    #[test]
    fn lines_for_are_sorted() {
        let mut bp = BreakpointSet::new();
        bp.add("Foo", 9);
        bp.add("Foo", 2);
        bp.add("Foo", 5);
        assert_eq!(bp.lines_for("Foo"), vec![2, 5, 9]);
    }

    #[test]
    fn remove_cleans_up_empty_module_entry() {
        let mut bp = BreakpointSet::new();
        bp.add("Foo", 1);
        assert!(bp.remove("Foo", 1));
        assert!(bp.is_empty());
        assert!(!bp.remove("Foo", 1));
    }
}
