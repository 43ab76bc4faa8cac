//! layout.rs — Schéma et résolution du fichier de mise en page de l'UI.
//!
//! Lu (optionnellement) depuis `$HOME/.gubed/layout.json`. Décrit un arbre
//! de conteneurs verticaux/horizontaux subdivisant l'écran en rectangles
//! nommés, que la couche de rendu (hors périmètre de ce crate) associe à
//! ses fenêtres (`Project`, `Code`, `Vars`, `Output`).

use serde::{Deserialize, Serialize};

use crate::error::{DebuggerError, Result};

/// Orientation d'un conteneur, ou feuille terminale (rectangle nommé).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Vertical,
    Horizontal,
    Rect,
}

/// Un nœud de l'arbre de mise en page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub percentage: u32,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub id: Option<String>,
}

/// Rectangle résolu en pixels, feuille de l'arbre après mise en page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRect {
    pub id: Option<String>,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Valide que les pourcentages des enfants d'un nœud respectent la règle :
/// la somme vaut 100, sauf si exactement un enfant a `percentage == 0`,
/// auquel cas il reçoit le complément.
fn normalize_percentages(children: &[Node]) -> Result<Vec<u32>> {
    let zero_count = children.iter().filter(|c| c.percentage == 0).count();
    let sum: u32 = children.iter().map(|c| c.percentage).sum();

    if zero_count == 0 {
        if sum != 100 {
            return Err(DebuggerError::Layout(format!(
                "children percentages sum to {sum}, expected 100"
            )));
        }
        return Ok(children.iter().map(|c| c.percentage).collect());
    }

    if zero_count > 1 {
        return Err(DebuggerError::Layout(format!(
            "{zero_count} children have percentage=0, at most one is allowed"
        )));
    }

    let remainder = 100_u32.checked_sub(sum).ok_or_else(|| {
        DebuggerError::Layout(format!("non-zero children already sum past 100 ({sum})"))
    })?;
    Ok(children.iter().map(|c| if c.percentage == 0 { remainder } else { c.percentage }).collect())
}

/// Répartit `total` pixels entre `shares` pourcentages par troncature
/// entière, le reliquat étant affecté au dernier enfant.
fn apportion_pixels(total: u32, shares: &[u32]) -> Vec<u32> {
    if shares.is_empty() {
        return Vec::new();
    }
    let mut out: Vec<u32> = shares.iter().map(|p| total * p / 100).collect();
    let assigned: u32 = out.iter().sum();
    if let Some(last) = out.last_mut() {
        *last += total.saturating_sub(assigned);
    }
    out
}

impl Node {
    /// Résout récursivement ce nœud en rectangles pixel, en profondeur.
    pub fn resolve(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Vec<ResolvedRect>> {
        match self.kind {
            NodeKind::Rect => {
                Ok(vec![ResolvedRect { id: self.id.clone(), x, y, width, height }])
            }
            NodeKind::Vertical => {
                let shares = normalize_percentages(&self.children)?;
                let heights = apportion_pixels(height, &shares);
                let mut out = Vec::new();
                let mut cursor_y = y;
                for (child, h) in self.children.iter().zip(heights) {
                    out.extend(child.resolve(x, cursor_y, width, h)?);
                    cursor_y += h;
                }
                Ok(out)
            }
            NodeKind::Horizontal => {
                let shares = normalize_percentages(&self.children)?;
                let widths = apportion_pixels(width, &shares);
                let mut out = Vec::new();
                let mut cursor_x = x;
                for (child, w) in self.children.iter().zip(widths) {
                    out.extend(child.resolve(cursor_x, y, w, height)?);
                    cursor_x += w;
                }
                Ok(out)
            }
        }
    }
}

/// Mise en page par défaut, utilisée quand aucun `layout.json` n'est
/// trouvé ou qu'il est rejeté : trois colonnes (projet, code, variables)
/// au-dessus d'une bande de sortie.
pub fn default_layout() -> Node {
    Node {
        kind: NodeKind::Vertical,
        percentage: 100,
        id: None,
        children: vec![
            Node {
                kind: NodeKind::Horizontal,
                percentage: 80,
                id: None,
                children: vec![
                    rect("Project", 20),
                    rect("Code", 55),
                    rect("Vars", 25),
                ],
            },
            rect("Output", 0),
        ],
    }
}

fn rect(id: &str, percentage: u32) -> Node {
    Node { kind: NodeKind::Rect, percentage, id: Some(id.to_string()), children: Vec::new() }
}

/// Parse une mise en page depuis du JSON, repliant sur `default_layout` et
/// journalisant une seule fois en cas d'échec (JSON malformé ou
/// pourcentages invalides quelque part dans l'arbre).
pub fn load_layout(json: &str) -> Node {
    match serde_json::from_str::<Node>(json).map_err(|e| DebuggerError::Layout(e.to_string())) {
        Ok(node) => match node.resolve(0, 0, 100, 100) {
            Ok(_) => node,
            Err(err) => {
                #[cfg(feature = "trace")]
                log::warn!("invalid layout.json, falling back to default: {err}");
                #[cfg(not(feature = "trace"))]
                let _ = err;
                default_layout()
            }
        },
        Err(err) => {
            #[cfg(feature = "trace")]
            log::warn!("malformed layout.json, falling back to default: {err}");
            #[cfg(not(feature = "trace"))]
            let _ = err;
            default_layout()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_rect_fills_area() {
        let node = rect("Code", 100);
        let rects = node.resolve(0, 0, 800, 600).unwrap();
        assert_eq!(rects, vec![ResolvedRect { id: Some("Code".into()), x: 0, y: 0, width: 800, height: 600 }]);
    }

    #[test]
    fn horizontal_split_sums_to_total_width() {
        let node = Node {
            kind: NodeKind::Horizontal,
            percentage: 100,
            id: None,
            children: vec![rect("A", 30), rect("B", 30), rect("C", 40)],
        };
        let rects = node.resolve(0, 0, 101, 50).unwrap();
        let total: u32 = rects.iter().map(|r| r.width).sum();
        assert_eq!(total, 101);
    }

    #[test]
    fn zero_percentage_child_receives_remainder() {
        let node = Node {
            kind: NodeKind::Vertical,
            percentage: 100,
            id: None,
            children: vec![rect("Top", 80), rect("Bottom", 0)],
        };
        let rects = node.resolve(0, 0, 100, 100).unwrap();
        assert_eq!(rects[0].height, 80);
        assert_eq!(rects[1].height, 20);
    }

    #[test]
    fn two_zero_percentage_children_is_an_error() {
        let node = Node {
            kind: NodeKind::Vertical,
            percentage: 100,
            id: None,
            children: vec![rect("A", 0), rect("B", 0)],
        };
        assert!(node.resolve(0, 0, 100, 100).is_err());
    }

    #[test]
    fn percentages_not_summing_to_100_is_an_error() {
        let node = Node {
            kind: NodeKind::Vertical,
            percentage: 100,
            id: None,
            children: vec![rect("A", 50), rect("B", 40)],
        };
        assert!(node.resolve(0, 0, 100, 100).is_err());
    }

    #[test]
    fn malformed_json_falls_back_to_default() {
        let node = load_layout("{ not json");
        let rects = node.resolve(0, 0, 100, 100).unwrap();
        assert!(rects.iter().any(|r| r.id.as_deref() == Some("Code")));
    }

    #[test]
    fn invalid_percentages_fall_back_to_default() {
        let json = r#"{"type":"vertical","percentage":100,"children":[
            {"type":"rect","percentage":50,"id":"A"},
            {"type":"rect","percentage":40,"id":"B"}
        ]}"#;
        let node = load_layout(json);
        let rects = node.resolve(0, 0, 100, 100).unwrap();
        assert!(rects.iter().any(|r| r.id.as_deref() == Some("Output")));
    }

    #[test]
    fn pixel_apportionment_assigns_remainder_to_last_child() {
        let shares = vec![33, 33, 34];
        let pixels = apportion_pixels(10, &shares);
        assert_eq!(pixels.iter().sum::<u32>(), 10);
        assert_eq!(pixels[2], 10 - pixels[0] - pixels[1]);
    }
}
