//! `gubed` — binaire du débogueur interactif Vitte-Script.
//!
//! Toute la logique vit dans `vitte_dbg` (lib). Ce binaire ne fait que
//! transmettre les arguments du processus à [`vitte_dbg::run`].

use std::process::ExitCode;

fn main() -> ExitCode {
    let mut args = std::env::args();
    let program_name = args.next().unwrap_or_else(|| "gubed".to_string());
    let rest: Vec<String> = args.collect();
    vitte_dbg::run(&program_name, &rest)
}
