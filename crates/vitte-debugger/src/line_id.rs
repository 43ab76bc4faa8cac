//! line_id.rs — Identifiant de ligne probée (`LineId`).
//!
//! Un `LineId` est dérivé par hash de la clé textuelle `Classe.Méthode.Ligne`
//! et masqué à 52 bits : la VM hôte ne conserve les entiers sans perte que
//! jusqu'à la mantisse d'un double (2^53). Les collisions ne sont pas
//! traitées ; le hachage sur une clé aussi discriminante les rend
//! négligeables en pratique, au sein d'un seul module instrumenté.

use std::hash::{Hash, Hasher};

/// Masque conservant les 52 bits de poids faible d'un hash 64 bits.
const LINE_ID_MASK: u64 = (1u64 << 52) - 1;

/// Identifiant stable d'un site de probe, tronqué à 52 bits.
pub type LineId = u64;

/// Calcule le `LineId` pour le triplet `(classe, méthode, index de ligne)`.
///
/// Utilise le hasher par défaut de la std (`SipHash`), suffisant ici puisque
/// l'identifiant n'a besoin que d'être stable au sein d'un même processus,
/// pas portable entre exécutions.
pub fn compute_line_id(class_name: &str, method_name: &str, original_line_index: usize) -> LineId {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    class_name.hash(&mut hasher);
    '.'.hash(&mut hasher);
    method_name.hash(&mut hasher);
    '.'.hash(&mut hasher);
    original_line_index.hash(&mut hasher);
    hasher.finish() & LINE_ID_MASK
}
