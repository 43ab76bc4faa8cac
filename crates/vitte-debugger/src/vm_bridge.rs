//! vm_bridge.rs — Façade d'intégration avec la VM hôte du langage cible.
//!
//! La VM elle-même est externe à ce crate : elle expose un point
//! d'enregistrement de méthode étrangère (`bind_foreign_method`) et un
//! point de rapport d'erreur. Ce module fournit les constantes et la
//! logique de correspondance nécessaires à l'hôte pour brancher le
//! débogueur sans connaître ses détails internes, ainsi qu'une VM
//! factice (`MockVm`) suffisante pour exercer la boucle de contrôle en
//! test.

use crate::control::{DebugSession, QuitSignal};
use crate::line_mapper::LineMapper;
use crate::ui::UiCollaborator;

/// Nom du module synthétique important la classe de callback.
pub const FACADE_MODULE: &str = "gubed";
/// Nom de la classe exposant la méthode étrangère de callback.
pub const FACADE_CLASS: &str = "Gubedder";
/// Signature (nom + arité) de la méthode étrangère de callback.
pub const FACADE_SIGNATURE: &str = "callback(_,_)";

/// Code source de la classe facade, interprété comme module `gubed` avant
/// tout module utilisateur.
pub const FACADE_CLASS_CODE: &str =
    "class Gubedder {\n\tforeign static callback(line_id, var_data)\n}\n";

/// Catégorie d'erreur rapportée par la VM hôte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptErrorKind {
    Compile,
    Runtime,
    StackTrace,
}

/// Identifie si une clé `module.class.signature` désigne le callback du
/// débogueur, auquel cas l'hôte doit brancher `DebugSession::on_probe`
/// plutôt que déléguer à ses propres méthodes étrangères.
pub fn is_debug_callback(module: &str, class: &str, signature: &str) -> bool {
    module == FACADE_MODULE && class == FACADE_CLASS && signature == FACADE_SIGNATURE
}

/// Reformate une erreur remontée par la VM en rattachant la ligne
/// instrumentée à sa ligne source originale.
///
/// Quand la table des lignes est désactivée (instrumentation désactivée),
/// `reverse_lookup` est une identité et la ligne rapportée est déjà la
/// bonne. Quand elle est active mais qu'aucune entrée exacte n'existe pour
/// `(module, instrumented_line)` — une ligne vide ou un en-tête de classe,
/// par exemple, qui ne porte aucun probe — le diagnostic est supprimé
/// silencieusement plutôt que de deviner une correspondance : c'est le
/// comportement de l'implémentation d'origine (SPEC_FULL §9, "reverse-mapping
/// a line without a probe").
pub fn format_script_error(
    line_mapper: &LineMapper,
    kind: ScriptErrorKind,
    module: &str,
    instrumented_line: usize,
    message: &str,
) -> Option<String> {
    let original_line = line_mapper.reverse_lookup(module, instrumented_line)?.original_line_index;

    Some(match kind {
        ScriptErrorKind::Compile => {
            format!("[{module} line {original_line}] Compile error: {message}")
        }
        ScriptErrorKind::Runtime => {
            format!("{message}\n[{module} line {original_line}] in {module}")
        }
        ScriptErrorKind::StackTrace => {
            format!("[{module} line {original_line}] in {message}")
        }
    })
}

/// VM factice pilotée en test : ne parse ni n'exécute réellement de
/// script, se contente de rejouer chaque appel `Gubedder.callback(...)`
/// rencontré dans une source instrumentée, dans l'ordre lexical, comme le
/// ferait un interpréteur qui exécute chaque ligne séquentiellement.
pub struct MockVm;

impl MockVm {
    /// Exécute `instrumented_source` en rejouant ses probes sur `session`.
    /// S'arrête immédiatement si `QuitSignal` est levé, à l'image du
    /// traitement silencieux que fait l'intégrateur VM hôte.
    pub fn run<U: UiCollaborator>(
        instrumented_source: &str,
        session: &mut DebugSession<U>,
    ) -> Result<(), QuitSignal> {
        for line in instrumented_source.lines() {
            let trimmed = line.trim_start();
            let Some(rest) = trimmed.strip_prefix("Gubedder.callback(") else { continue };
            let Some(args) = rest.strip_suffix(')') else { continue };
            let mut parts = args.splitn(2, ',');
            let Some(line_id_str) = parts.next() else { continue };
            let var_data = parts.next().unwrap_or("\"\"").trim();
            let Ok(line_id) = line_id_str.trim().parse::<u64>() else { continue };

            session.on_probe(line_id, var_data)?;
        }
        Ok(())
    }
}
