//! control.rs — Boucle de contrôle du débogueur.
//!
//! Reçoit le callback de probe émis par la VM, décide s'il faut suspendre
//! l'exécution (`Mode`), pilote la collaboratrice UI, et traduit sa
//! décision (`DebugAction`) en transition d'état ou en annulation.
//!
//! Le modèle de concurrence est volontairement coopératif et mono-thread :
//! la VM appelle le callback directement depuis son interpréteur, qui
//! rappelle l'UI de façon bloquante et réentrante. Aucun verrou n'est
//! nécessaire.

use std::fmt;

use crate::line_mapper::LineMapper;
use crate::ui::UiCollaborator;

/// Mode d'exécution courant de la session de débogage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Suspend à chaque probe rencontrée.
    Step,
    /// Ne suspend que sur un point d'arrêt actif.
    Continue,
}

/// Décision renvoyée par la collaboratrice UI à l'issue d'une suspension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugAction {
    /// Repasse (ou reste) en mode pas-à-pas.
    Step,
    /// Repasse (ou reste) en mode continu.
    Continue,
    /// Termine la session : déclenche un déroulement via `QuitSignal`.
    Quit,
    /// Aucune action : conserve le mode courant sans action explicite.
    None,
}

/// Signal d'arrêt volontaire de la session, propagé jusqu'au seul site
/// d'appel qui interprète le script en cours (`run_module` côté intégrateur
/// VM). Ce n'est pas une erreur : c'est le seul mécanisme de
/// désescalade de la boucle de contrôle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuitSignal;

impl fmt::Display for QuitSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "debug session terminated by quit request")
    }
}

impl std::error::Error for QuitSignal {}

/// État mutable d'une session de débogage : mode courant et table des
/// lignes. Les points d'arrêt ne sont pas dupliqués ici : ils sont portés
/// par la collaboratrice UI (voir `UiCollaborator::is_breakpoint`), seule
/// habilitée à les modifier, et simplement interrogés à chaque probe.
/// Passé explicitement au callback de probe par l'intégration VM hôte.
pub struct DebugSession<U: UiCollaborator> {
    mode: Mode,
    line_mapper: LineMapper,
    ui: U,
}

impl<U: UiCollaborator> DebugSession<U> {
    pub fn new(ui: U) -> Self {
        Self { mode: Mode::Step, line_mapper: LineMapper::new(), ui }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn line_mapper(&self) -> &LineMapper {
        &self.line_mapper
    }

    pub fn line_mapper_mut(&mut self) -> &mut LineMapper {
        &mut self.line_mapper
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    /// Point d'entrée appelé par la VM hôte à chaque probe atteint.
    ///
    /// `var_data` est la chaîne déjà formatée par l'instrumenteur
    /// (`"nom=valeur|nom=valeur"`). Retourne `Err(QuitSignal)` si
    /// l'utilisatrice a demandé l'arrêt de la session.
    pub fn on_probe(&mut self, line_id: u64, var_data: &str) -> Result<(), QuitSignal> {
        let details = match self.line_mapper.lookup(line_id) {
            Some(d) => d.clone(),
            None => return Ok(()),
        };

        let at_breakpoint = self.ui.is_breakpoint(&details.module, details.original_line_index);
        if self.mode == Mode::Continue && !at_breakpoint {
            return Ok(());
        }

        self.ui.load_module(&details.module);
        self.ui.highlight_line(&details.module, details.original_line_index);
        self.ui.set_variables(var_data);

        let action = self.ui.event_loop();
        self.apply(action)
    }

    fn apply(&mut self, action: DebugAction) -> Result<(), QuitSignal> {
        match action {
            DebugAction::Step => {
                self.mode = Mode::Step;
                Ok(())
            },
            DebugAction::Continue => {
                self.mode = Mode::Continue;
                Ok(())
            },
            DebugAction::Quit => Err(QuitSignal),
            DebugAction::None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::tests::ScriptedUi;

    fn session_with(ui: ScriptedUi) -> DebugSession<ScriptedUi> {
        let mut session = DebugSession::new(ui);
        session.line_mapper_mut().add_line(1, "Foo", 1, 0);
        session.line_mapper_mut().add_line(2, "Foo", 2, 1);
        session
    }

    #[test]
    fn step_mode_pauses_on_every_probe() {
        let mut session = session_with(ScriptedUi::new(vec![DebugAction::Step, DebugAction::Step]));
        session.on_probe(1, "\"\"").unwrap();
        session.on_probe(2, "\"\"").unwrap();
        assert_eq!(session.ui().pause_count(), 2);
    }

    #[test]
    fn continue_mode_only_pauses_on_breakpoint() {
        let ui = ScriptedUi::new(vec![DebugAction::Continue, DebugAction::None]).with_breakpoint("Foo", 1);
        let mut session = session_with(ui);
        session.on_probe(1, "\"\"").unwrap(); // line_id 1 -> original line 0, no breakpoint there
        assert_eq!(session.mode(), Mode::Continue);
        assert_eq!(session.ui().pause_count(), 0);
        session.on_probe(2, "\"\"").unwrap(); // original line 1 has a breakpoint
        assert_eq!(session.ui().pause_count(), 1);
    }

    #[test]
    fn quit_propagates_as_signal() {
        let mut session = session_with(ScriptedUi::new(vec![DebugAction::Quit]));
        let result = session.on_probe(1, "\"\"");
        assert_eq!(result, Err(QuitSignal));
    }

    #[test]
    fn unknown_line_id_is_a_silent_noop() {
        let mut session = session_with(ScriptedUi::new(vec![]));
        session.on_probe(999, "\"\"").unwrap();
        assert_eq!(session.ui().pause_count(), 0);
    }
}
