//! vitte-debugger — débogueur source-level pour Vitte-Script.
//!
//! Organisation, de la source au pilotage :
//! - [`line_id`] : calcul de l'identifiant de site de probe (`LineId`).
//! - [`line_mapper`] : table `LineId → LineDetails`, et son inverse.
//! - [`instrumenter`] : réécriture de la source avec probes insérées.
//! - [`module`] : lecture et cache des modules sources.
//! - [`breakpoint`] : ensemble des points d'arrêt par module.
//! - [`control`] : boucle de contrôle (`Mode`, `DebugAction`, `QuitSignal`).
//! - [`ui`] : contrat que la boucle de contrôle attend de l'interface.
//! - [`vm_bridge`] : constantes et logique de branchement à la VM hôte.
//! - [`layout`] : schéma de mise en page JSON de l'UI (feature `std`).
//! - [`extension`] : chargement d'extensions natives (feature `extensions`).
//! - [`error`] : taxonomie d'erreurs commune au crate.

pub mod breakpoint;
pub mod control;
pub mod error;
pub mod instrumenter;
pub mod layout;
pub mod line_id;
pub mod line_mapper;
pub mod module;
pub mod ui;
pub mod vm_bridge;

#[cfg(feature = "extensions")]
pub mod extension;

/// Réexports pratiques pour les consommatrices du crate.
pub mod prelude {
    pub use crate::breakpoint::BreakpointSet;
    pub use crate::control::{DebugAction, DebugSession, Mode, QuitSignal};
    pub use crate::error::{DebuggerError, Result};
    pub use crate::instrumenter::instrument;
    pub use crate::line_id::{compute_line_id, LineId};
    pub use crate::line_mapper::{LineDetails, LineMapper};
    pub use crate::module::{Module, ModuleCache};
    pub use crate::ui::UiCollaborator;
    pub use crate::vm_bridge::{is_debug_callback, FACADE_CLASS, FACADE_CLASS_CODE, FACADE_MODULE, FACADE_SIGNATURE};

    #[cfg(feature = "extensions")]
    pub use crate::extension::{NativeExtension, NativeExtensionRegistry};
}
