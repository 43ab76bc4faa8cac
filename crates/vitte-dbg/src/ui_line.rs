//! ui_line.rs — Collaboratrice UI texte, ligne par ligne.
//!
//! `vitte-debugger` ne prescrit aucun rendu : la couche de fenêtres à
//! cellules, paires de couleurs et mise en page issue d'un template JSON
//! (le `conwin`/`ui.cpp` de l'implémentation d'origine) reste un
//! collaborateur externe que ce dépôt ne réimplémente pas. `LineUi` est une
//! implémentation volontairement minimale de `UiCollaborator` : elle
//! affiche le contexte source et les variables sur la sortie standard et
//! lit une commande par ligne sur l'entrée, suffisant pour piloter
//! `vitte-dbg` depuis un terminal ordinaire ou un script de test.

use std::fs;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use vitte_debugger::breakpoint::BreakpointSet;
use vitte_debugger::control::DebugAction;
use vitte_debugger::layout::Node;
use vitte_debugger::module::MODULE_EXTENSION;
use vitte_debugger::ui::{parse_variables, UiCollaborator};

/// Nombre de lignes de contexte affichées de part et d'autre de la ligne
/// mise en surbrillance.
const CONTEXT_RADIUS: usize = 1;

/// Collaboratrice UI texte : un flux d'entrée pour les commandes, un flux
/// de sortie pour l'affichage.
pub struct LineUi<R, W> {
    input: R,
    output: W,
    search_dir: PathBuf,
    breakpoints: BreakpointSet,
    current_module: Option<String>,
    current_lines: Vec<String>,
    pane_ids: Vec<String>,
    panes_announced: bool,
}

impl<R: BufRead, W: Write> LineUi<R, W> {
    pub fn new(input: R, output: W, search_dir: PathBuf, layout: &Node) -> Self {
        let pane_ids = layout
            .resolve(0, 0, 100, 100)
            .map(|rects| rects.into_iter().filter_map(|r| r.id).collect())
            .unwrap_or_default();
        Self {
            input,
            output,
            search_dir,
            breakpoints: BreakpointSet::new(),
            current_module: None,
            current_lines: Vec::new(),
            pane_ids,
            panes_announced: false,
        }
    }

    fn announce_panes_once(&mut self) {
        if self.panes_announced {
            return;
        }
        self.panes_announced = true;
        if !self.pane_ids.is_empty() {
            let _ = writeln!(self.output, "panes: {}", self.pane_ids.join(", "));
        }
    }

    fn toggle_breakpoint(&mut self, original_line_index: usize) {
        let Some(module) = self.current_module.clone() else { return };
        let active = self.breakpoints.toggle(module, original_line_index);
        let state = if active { "set" } else { "cleared" };
        let _ = writeln!(self.output, "breakpoint {state} at line {}", original_line_index + 1);
    }
}

impl<R: BufRead, W: Write> UiCollaborator for LineUi<R, W> {
    fn load_module(&mut self, name: &str) {
        self.announce_panes_once();
        if self.current_module.as_deref() == Some(name) {
            return;
        }
        let path = self.search_dir.join(format!("{name}.{MODULE_EXTENSION}"));
        self.current_lines =
            fs::read_to_string(&path).map(|s| s.lines().map(str::to_owned).collect()).unwrap_or_default();
        self.current_module = Some(name.to_string());
        let _ = writeln!(self.output, "-- {name} --");
    }

    fn highlight_line(&mut self, module: &str, original_line_index: usize) {
        self.load_module(module);
        let start = original_line_index.saturating_sub(CONTEXT_RADIUS);
        let end = (original_line_index + CONTEXT_RADIUS + 1).min(self.current_lines.len());
        for (offset, line) in self.current_lines[start..end].iter().enumerate() {
            let idx = start + offset;
            let marker = if idx == original_line_index { "=>" } else { "  " };
            let _ = writeln!(self.output, "{marker} {:>4} | {line}", idx + 1);
        }
    }

    fn set_variables(&mut self, var_data: &str) {
        let pairs = parse_variables(var_data);
        if pairs.is_empty() {
            return;
        }
        let rendered: Vec<String> = pairs.into_iter().map(|(name, value)| format!("{name}={value}")).collect();
        let _ = writeln!(self.output, "vars: {}", rendered.join(", "));
    }

    fn is_breakpoint(&self, module: &str, line: usize) -> bool {
        self.breakpoints.is_breakpoint(module, line)
    }

    fn append_output(&mut self, text: &str) {
        let _ = write!(self.output, "{text}");
    }

    fn event_loop(&mut self) -> DebugAction {
        loop {
            let _ = write!(self.output, "(gubed) ");
            let _ = self.output.flush();

            let mut line = String::new();
            let bytes_read = self.input.read_line(&mut line).unwrap_or(0);
            if bytes_read == 0 {
                // EOF: no operator left to drive the session, quit cleanly.
                return DebugAction::Quit;
            }

            match line.trim() {
                "s" | "step" => return DebugAction::Step,
                "c" | "continue" => return DebugAction::Continue,
                "q" | "quit" => return DebugAction::Quit,
                rest if rest == "b" || rest.starts_with("b ") => {
                    if let Some(n) = rest.trim_start_matches('b').trim().parse::<usize>().ok().filter(|n| *n >= 1)
                    {
                        self.toggle_breakpoint(n - 1);
                    } else {
                        let _ = writeln!(self.output, "usage: b <line>");
                    }
                },
                _ => {
                    let _ = writeln!(self.output, "commands: s(tep) c(ontinue) b <line> q(uit)");
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use vitte_debugger::layout::default_layout;

    fn ui_with(input: &str, dir: &std::path::Path) -> LineUi<Cursor<Vec<u8>>, Vec<u8>> {
        let layout = default_layout();
        LineUi::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), dir.to_path_buf(), &layout)
    }

    #[test]
    fn step_command_returns_step() {
        let tmp = tempfile::tempdir().unwrap();
        let mut ui = ui_with("s\n", tmp.path());
        assert_eq!(ui.event_loop(), DebugAction::Step);
    }

    #[test]
    fn unrecognized_then_continue() {
        let tmp = tempfile::tempdir().unwrap();
        let mut ui = ui_with("bogus\nc\n", tmp.path());
        assert_eq!(ui.event_loop(), DebugAction::Continue);
        let out = String::from_utf8(ui.output).unwrap();
        assert!(out.contains("commands:"));
    }

    #[test]
    fn eof_quits() {
        let tmp = tempfile::tempdir().unwrap();
        let mut ui = ui_with("", tmp.path());
        assert_eq!(ui.event_loop(), DebugAction::Quit);
    }

    #[test]
    fn breakpoint_toggle_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("Foo.wren"), "class Foo {\n  bar() {\n    var y = 1\n  }\n}\n").unwrap();
        let mut ui = ui_with("b 3\nb 3\nq\n", tmp.path());
        ui.load_module("Foo");
        assert!(!ui.is_breakpoint("Foo", 2));
        assert_eq!(ui.event_loop(), DebugAction::Quit);
        // toggled on then off by the two "b 3" commands before quitting
        assert!(!ui.is_breakpoint("Foo", 2));
    }

    #[test]
    fn highlight_line_shows_context_with_marker() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("Foo.wren"), "class Foo {\n  bar() {\n    var y = 1\n  }\n}\n").unwrap();
        let mut ui = ui_with("", tmp.path());
        ui.highlight_line("Foo", 2);
        let out = String::from_utf8(ui.output).unwrap();
        assert!(out.contains("=>    3 | "));
    }

    #[test]
    fn set_variables_renders_parsed_pairs() {
        let tmp = tempfile::tempdir().unwrap();
        let mut ui = ui_with("", tmp.path());
        ui.set_variables("x=1|y=2");
        let out = String::from_utf8(ui.output).unwrap();
        assert!(out.contains("vars: x=1, y=2"));
    }

    #[test]
    fn append_output_forwards_text_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let mut ui = ui_with("", tmp.path());
        ui.append_output("hello\n");
        ui.append_output("world\n");
        let out = String::from_utf8(ui.output).unwrap();
        assert_eq!(out, "hello\nworld\n");
    }
}
