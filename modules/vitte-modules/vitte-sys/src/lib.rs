#![cfg_attr(not(feature = "std"), no_std)]
//! vitte-sys — primitives **système** bas-niveau pour Vitte (cross-platform)
//!
//! Objectifs :
//! - Chargement dynamique de librairies (feature `dl` → `libloading`)
//! - Infos système : taille de page, CPU count
//! - Threads utilitaires (sleep, yield)
//!
//! Par défaut, le crate est **`no_std`-friendly** (via `alloc`) avec un
//! fallback sans appels OS. Active `std` + `dl` pour le chargement natif.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(feature = "std")]
use std::string::String;

use core::fmt;

// ───────────────────────────── Erreur / Result ────────────────────────────

#[derive(Debug, Clone)]
pub enum SysError {
    Unsupported(&'static str),
    Invalid(&'static str),
    Io(String),
}
impl fmt::Display for SysError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported(s) => write!(f, "unsupported:{s}"),
            Self::Invalid(s) => write!(f, "invalid:{s}"),
            Self::Io(s) => write!(f, "io:{s}"),
        }
    }
}

pub type Result<T> = core::result::Result<T, SysError>;

// ───────────────────────────── Utils communs ──────────────────────────────

#[cfg(feature = "std")]
pub fn cpu_count() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}
#[cfg(not(feature = "std"))]
pub fn cpu_count() -> usize {
    1
}

/// Taille de page la plus probable (4K fallback si inconnue).
pub fn page_size() -> usize {
    4096
}

// ───────────────────────────── Chargement dynamique ──────────────────────

/// Handle sur une bibliothèque partagée (`.so`/`.dll`/`.dylib`) chargée à chaud.
#[cfg(all(feature = "std", feature = "dl"))]
pub struct DynLib(libloading::Library);

#[cfg(all(feature = "std", feature = "dl"))]
impl DynLib {
    /// Ouvre une bibliothèque partagée depuis son chemin.
    ///
    /// # Safety
    /// Exécute le code d'initialisation de la bibliothèque chargée ; l'appelant
    /// garantit qu'il s'agit d'une extension de confiance pour ce processus.
    pub unsafe fn open(path: &str) -> Result<Self> {
        libloading::Library::new(path).map(DynLib).map_err(|e| SysError::Io(e.to_string()))
    }

    /// Résout un symbole exporté par la bibliothèque.
    ///
    /// # Safety
    /// L'appelant garantit que `T` correspond exactement à la signature du
    /// symbole natif désigné par `name`.
    pub unsafe fn symbol<T>(&self, name: &[u8]) -> Result<libloading::Symbol<'_, T>> {
        self.0.get(name).map_err(|e| SysError::Io(e.to_string()))
    }
}

// ───────────────────────────── Threads utilitaires ───────────────────────

#[cfg(feature = "std")]
pub fn sleep_ms(ms: u64) {
    std::thread::sleep(std::time::Duration::from_millis(ms));
}
#[cfg(not(feature = "std"))]
pub fn sleep_ms(_ms: u64) {}

#[cfg(feature = "std")]
pub fn yield_now() {
    std::thread::yield_now();
}
#[cfg(not(feature = "std"))]
pub fn yield_now() {}

// ───────────────────────────── Tests ─────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_count_nonzero() {
        assert!(cpu_count() >= 1);
    }

    #[test]
    fn page_size_is_4k() {
        assert_eq!(page_size(), 4096);
    }

    #[cfg(feature = "dl")]
    #[test]
    fn open_nonexistent_fails() {
        let res = unsafe { DynLib::open("this/does/not/exist.so") };
        assert!(res.is_err());
    }
}
