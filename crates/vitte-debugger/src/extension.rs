//! extension.rs — Chargement des extensions natives (modules étrangers).
//!
//! Une extension est une bibliothèque partagée (`.so`/`.dll`/`.dylib`)
//! exportant trois symboles : `Initialize`, `Shutdown` et `GetFunction`.
//! Le débogueur les charge au démarrage pour résoudre les méthodes
//! étrangères que le script cible déclare hors de la façade de callback.

use std::ffi::c_void;
use std::fs;
use std::path::Path;

use vitte_sys::DynLib;

use crate::error::{DebuggerError, Result};

#[cfg(target_os = "windows")]
const NATIVE_EXTENSION: &str = "dll";
#[cfg(target_os = "macos")]
const NATIVE_EXTENSION: &str = "dylib";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const NATIVE_EXTENSION: &str = "so";

type InitializeFn = unsafe extern "C" fn(vm_handle: *mut c_void);
type ShutdownFn = unsafe extern "C" fn();
type GetFunctionFn = unsafe extern "C" fn(name: *const i8) -> *mut c_void;

/// Une extension native chargée et initialisée.
pub struct NativeExtension {
    path: String,
    lib: DynLib,
}

impl NativeExtension {
    /// Charge et initialise l'extension à `path`.
    ///
    /// # Safety
    /// Exécute le code natif de `Initialize` de la bibliothèque chargée ;
    /// l'appelant garantit qu'il s'agit d'une extension de confiance.
    pub unsafe fn load(path: &Path, vm_handle: *mut c_void) -> Result<Self> {
        let path_str = path.to_string_lossy().to_string();
        let lib = DynLib::open(&path_str)
            .map_err(|e| DebuggerError::Load(format!("{path_str}: {e}")))?;
        let init: libloading::Symbol<InitializeFn> = lib
            .symbol(b"Initialize\0")
            .map_err(|e| DebuggerError::Load(format!("{path_str}: missing Initialize: {e}")))?;
        init(vm_handle);
        Ok(Self { path: path_str, lib })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Résout une fonction étrangère exportée par cette extension, ou
    /// `None` si elle ne la fournit pas.
    ///
    /// # Safety
    /// L'appelant garantit que `name` est une chaîne C valide et que le
    /// pointeur retourné est appelé avec la signature attendue par l'extension.
    pub unsafe fn get_function(&self, name: &std::ffi::CStr) -> Option<*mut c_void> {
        let get: libloading::Symbol<GetFunctionFn> = self.lib.symbol(b"GetFunction\0").ok()?;
        let ptr = get(name.as_ptr());
        if ptr.is_null() {
            None
        } else {
            Some(ptr)
        }
    }

    /// # Safety
    /// Exécute le code natif de `Shutdown` ; l'appelant garantit que plus
    /// aucun appel vers cette extension n'est en vol.
    unsafe fn shutdown(&self) {
        if let Ok(f) = self.lib.symbol::<ShutdownFn>(b"Shutdown\0") {
            f();
        }
    }
}

/// Registre des extensions natives chargées, dans leur ordre de chargement.
/// Arrêtées en ordre inverse à la libération, comme tout empilement de
/// ressources dont l'ordre d'initialisation importe.
#[derive(Default)]
pub struct NativeExtensionRegistry {
    extensions: Vec<NativeExtension>,
}

impl NativeExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scanne `dir` à la recherche de bibliothèques partagées et charge
    /// celles qui exposent un `Initialize` valide. Les échecs individuels
    /// sont journalisés et ignorés : une extension corrompue ne doit pas
    /// empêcher le chargement des autres.
    ///
    /// # Safety
    /// Exécute le code natif de chaque extension trouvée dans `dir`.
    pub unsafe fn load_dir(&mut self, dir: &Path, vm_handle: *mut c_void) -> Result<()> {
        let entries = fs::read_dir(dir)
            .map_err(|e| DebuggerError::Load(format!("{}: {e}", dir.display())))?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(NATIVE_EXTENSION) {
                continue;
            }
            match NativeExtension::load(&path, vm_handle) {
                Ok(ext) => {
                    #[cfg(feature = "trace")]
                    log::info!("loaded native extension {}", ext.path());
                    self.extensions.push(ext);
                }
                Err(err) => {
                    #[cfg(feature = "trace")]
                    log::warn!("skipping native extension {}: {err}", path.display());
                    #[cfg(not(feature = "trace"))]
                    let _ = err;
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NativeExtension> {
        self.extensions.iter()
    }
}

impl Drop for NativeExtensionRegistry {
    fn drop(&mut self) {
        for ext in self.extensions.iter().rev() {
            unsafe { ext.shutdown() };
        }
    }
}
