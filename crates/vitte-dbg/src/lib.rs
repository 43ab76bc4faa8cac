//! vitte-dbg — bibliothèque interne du binaire `gubed`.
//!
//! Assemble les briques de `vitte-debugger` (instrumenteur, table des
//! lignes, cache de modules, boucle de contrôle) avec une collaboratrice
//! UI texte ([`ui_line::LineUi`]) et les points d'intégration externes
//! listés par la spécification : lecture optionnelle de `layout.json`,
//! balayage des extensions natives du répertoire courant, et le parsing
//! d'arguments `-di`/`-h` ([`cli`]).
//!
//! `main.rs` ne fait que transmettre `std::env::args()` à [`run`].
//!
//! Le balayage des extensions natives au démarrage appelle une API non sûre
//! héritée de `vitte-debugger` (chargement de bibliothèques dynamiques
//! tierces) : ce crate n'interdit donc pas `unsafe_code`, à l'image de
//! `vitte-debugger` lui-même pour sa feature `extensions`.

pub mod cli;
pub mod ui_line;

use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};

use vitte_debugger::control::DebugSession;
use vitte_debugger::extension::NativeExtensionRegistry;
use vitte_debugger::layout::{self, Node};
use vitte_debugger::module::ModuleCache;
use vitte_debugger::vm_bridge::MockVm;

use cli::{parse_args, usage, CliOptions, ParseOutcome};
use ui_line::LineUi;

/// Initialise le logger selon la feature `trace`, au même niveau que le
/// reste de l'écosystème Vitte.
pub fn init_logger() {
    #[cfg(feature = "trace")]
    {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
            .format_timestamp_secs()
            .try_init();
    }
}

/// Point d'entrée appelé par `main.rs`. `program_name` sert uniquement au
/// texte d'usage ; `args` exclut ce nom.
pub fn run(program_name: &str, args: &[String]) -> ExitCode {
    match parse_args(args) {
        ParseOutcome::Help => {
            print!("{}", usage(program_name));
            ExitCode::from(0)
        },
        ParseOutcome::UsageError(message) => {
            if !message.is_empty() {
                eprintln!("{message}");
            }
            eprint!("{}", usage(program_name));
            ExitCode::from(1)
        },
        ParseOutcome::Run(opts) => match execute(opts) {
            Ok(()) => ExitCode::from(0),
            Err(err) => {
                eprintln!("Error: {err:#}");
                ExitCode::from(1)
            },
        },
    }
}

fn execute(opts: CliOptions) -> Result<()> {
    init_logger();

    let cwd = std::env::current_dir().context("reading current directory")?;

    let mut extensions = NativeExtensionRegistry::new();
    // The embedded VM is an external collaborator (see SPEC_FULL §6): a real
    // integration would hand its own handle to `Initialize`. This binary has
    // no VM of its own to offer, so extensions are scanned and initialized
    // against a null placeholder, matching the debugger's contract without
    // pretending to own VM lifecycle it does not have.
    if let Err(err) = unsafe { extensions.load_dir(&cwd, std::ptr::null_mut()) } {
        log_warn(&format!("scanning native extensions: {err}"));
    }

    let layout = resolve_layout();

    let stdin = io::stdin();
    let ui = LineUi::new(BufReader::new(stdin.lock()), io::stdout(), cwd.clone(), &layout);
    let mut session = DebugSession::new(ui);
    if opts.disable_instrumentation {
        session.line_mapper_mut().disable();
    }

    let mut cache = ModuleCache::with_search_dir(cwd);
    let source = cache
        .get_or_load(&opts.script, session.line_mapper_mut(), !opts.disable_instrumentation)
        .ok_or_else(|| anyhow!("module '{}' not found", opts.script))?;

    match MockVm::run(&source, &mut session) {
        Ok(()) => Ok(()),
        // A quit request is not a script error: it is the only way to abort
        // a running script interactively.
        Err(_quit_signal) => Ok(()),
    }
}

/// Résout `layout.json`, si présent et valide, ou le layout par défaut
/// sinon. Le chemin suit `$HOME/.gubed/layout.json`
/// (`%USERPROFILE%\.gubed\layout.json` sous Windows).
fn resolve_layout() -> Node {
    layout_path().and_then(|p| std::fs::read_to_string(p).ok()).map_or_else(layout::default_layout, |json| {
        layout::load_layout(&json)
    })
}

fn layout_path() -> Option<PathBuf> {
    let home_var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    let home = std::env::var_os(home_var)?;
    Some(PathBuf::from(home).join(".gubed").join("layout.json"))
}

fn log_warn(message: &str) {
    #[cfg(feature = "trace")]
    log::warn!("{message}");
    #[cfg(not(feature = "trace"))]
    let _ = message;
}
