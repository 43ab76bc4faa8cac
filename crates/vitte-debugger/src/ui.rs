//! ui.rs — Contrat de collaboration avec l'interface utilisateur.
//!
//! Le débogueur ne prescrit aucun rendu : terminal, TUI, ou pilotage par
//! tests. `UiCollaborator` fixe seulement les points d'entrée que la boucle
//! de contrôle (`control::DebugSession`) invoque à chaque suspension. Les
//! points d'arrêt sont une propriété de l'UI : c'est elle qui les bascule
//! sur commande de l'opératrice, la boucle de contrôle ne fait que
//! l'interroger via `is_breakpoint`.

use std::sync::OnceLock;

use regex::Regex;

use crate::control::DebugAction;

/// Ce que la boucle de contrôle attend d'une interface utilisateur.
pub trait UiCollaborator {
    /// Affiche le module `name` (source originale), si ce n'est pas déjà fait.
    fn load_module(&mut self, name: &str);

    /// Met en surbrillance `original_line_index` dans `module`.
    fn highlight_line(&mut self, module: &str, original_line_index: usize);

    /// Présente les variables en scope, sous la forme brute
    /// `"nom=valeur|nom=valeur"` émise par l'instrumenteur.
    fn set_variables(&mut self, var_data: &str);

    /// Requête pure : `line` (ligne originale) de `module` est-elle un
    /// point d'arrêt actif ? L'UI est seule propriétaire de cet état.
    fn is_breakpoint(&self, module: &str, line: usize) -> bool;

    /// Ajoute une ligne à la sortie du programme (écritures `System.print`).
    fn append_output(&mut self, text: &str) {
        let _ = text;
    }

    /// Bloque jusqu'à ce que l'utilisatrice choisisse la prochaine action.
    /// Peut gérer en interne la navigation, le bascule de points d'arrêt et
    /// le changement de focus de panneau sans retourner (`DebugAction::None`
    /// n'est vu que par l'UI elle-même).
    fn event_loop(&mut self) -> DebugAction;
}

fn variable_token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\w+)=(.*)$").unwrap())
}

/// Tokenize la chaîne de variables émise par un probe (`"x=1|y=2"`) en
/// paires `(nom, valeur)`, dans l'ordre d'apparition. Un jeton qui ne
/// correspond pas à `^(\w+)=(.*)$` est silencieusement ignoré plutôt que de
/// faire échouer tout l'affichage pour une seule variable malformée.
pub fn parse_variables(var_data: &str) -> Vec<(String, String)> {
    var_data
        .split('|')
        .filter_map(|token| {
            let caps = variable_token_regex().captures(token)?;
            Some((caps[1].to_string(), caps[2].to_string()))
        })
        .collect()
}

#[cfg(test)]
mod variable_tests {
    use super::*;

    #[test]
    fn parses_well_formed_pairs() {
        let pairs = parse_variables("x=1|y=hello");
        assert_eq!(pairs, vec![("x".to_string(), "1".to_string()), ("y".to_string(), "hello".to_string())]);
    }

    #[test]
    fn empty_string_yields_no_pairs() {
        assert!(parse_variables("").is_empty());
    }

    #[test]
    fn malformed_token_is_skipped() {
        let pairs = parse_variables("x=1|not_a_pair|y=2");
        assert_eq!(pairs, vec![("x".to_string(), "1".to_string()), ("y".to_string(), "2".to_string())]);
    }

    #[test]
    fn value_may_contain_equals_signs() {
        let pairs = parse_variables("expr=a=b");
        assert_eq!(pairs, vec![("expr".to_string(), "a=b".to_string())]);
    }
}
