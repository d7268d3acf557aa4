//! Mine plan records and the piece tree derived from them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineCategory {
    pub name: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinePiece {
    pub label: String,
    pub category: String,
    /// Geometry file URL; the extension selects the loader.
    #[serde(default)]
    pub file: String,
    /// 1 means visible by default.
    #[serde(default)]
    pub visibility: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinePlan {
    /// `[xmin, xmax, ymin, ymax, zmin, zmax]`.
    pub boundaries: [f64; 6],
    #[serde(default)]
    pub categories: Vec<MineCategory>,
    #[serde(default)]
    pub pieces: Vec<MinePiece>,
}

/// Node of the mine piece tree shown in the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct MineNode {
    pub id: String,
    pub name: String,
    pub children: Vec<MineNode>,
}

/// Tree plus default visibility derived from one plan.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MineTree {
    pub roots: Vec<MineNode>,
    /// Piece ids visible by default. Always contains the station layer id.
    pub default_visibility: Vec<String>,
    /// Pieces to load, in plan order. Pieces whose category is not declared
    /// in the plan are dropped; servers have shipped undeclared categories
    /// before and those pieces have no place in the tree.
    pub pieces_to_load: Vec<MinePiece>,
}

/// Piece id of the station layer in the visibility tree.
pub const STATIONS_PIECE_ID: &str = "stations";

impl MineTree {
    pub fn from_plan(plan: &MinePlan) -> Self {
        let mut roots: Vec<MineNode> = Vec::with_capacity(plan.categories.len());
        for cat in &plan.categories {
            roots.push(MineNode {
                id: cat.label.clone(),
                name: cat.label.clone(),
                children: Vec::new(),
            });
        }

        let mut default_visibility = vec![STATIONS_PIECE_ID.to_string()];
        let mut pieces_to_load = Vec::new();

        for piece in &plan.pieces {
            let Some(cat_idx) = plan
                .categories
                .iter()
                .position(|c| c.name == piece.category)
            else {
                continue;
            };
            roots[cat_idx].children.push(MineNode {
                id: piece.label.clone(),
                name: piece.label.clone(),
                children: Vec::new(),
            });
            if piece.visibility == 1 {
                default_visibility.push(piece.label.clone());
            }
            pieces_to_load.push(piece.clone());
        }

        MineTree {
            roots,
            default_visibility,
            pieces_to_load,
        }
    }

    /// All node ids in depth-first order, using an explicit stack.
    pub fn flatten_ids(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack: Vec<&MineNode> = self.roots.iter().rev().collect();
        while let Some(node) = stack.pop() {
            out.push(node.id.clone());
            for child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plan() -> MinePlan {
        MinePlan {
            boundaries: [0.0, 10.0, 0.0, 10.0, -5.0, 0.0],
            categories: vec![
                MineCategory {
                    name: "dev".into(),
                    label: "Development".into(),
                },
                MineCategory {
                    name: "ore".into(),
                    label: "Ore bodies".into(),
                },
            ],
            pieces: vec![
                MinePiece {
                    label: "ramp".into(),
                    category: "dev".into(),
                    file: "ramp.vtp".into(),
                    visibility: 1,
                },
                MinePiece {
                    label: "stope".into(),
                    category: "ore".into(),
                    file: "stope.vtp".into(),
                    visibility: 0,
                },
                MinePiece {
                    label: "ghost".into(),
                    category: "tester".into(),
                    file: "ghost.vtp".into(),
                    visibility: 1,
                },
            ],
        }
    }

    #[test]
    fn undeclared_categories_are_dropped() {
        let tree = MineTree::from_plan(&plan());
        assert_eq!(tree.roots.len(), 2);
        assert_eq!(tree.roots[0].children.len(), 1);
        assert_eq!(tree.roots[1].children.len(), 1);
        assert_eq!(tree.pieces_to_load.len(), 2);
        assert_eq!(tree.default_visibility, vec!["stations", "ramp"]);
    }

    #[test]
    fn flatten_is_depth_first_in_plan_order() {
        let tree = MineTree::from_plan(&plan());
        assert_eq!(
            tree.flatten_ids(),
            vec!["Development", "ramp", "Ore bodies", "stope"]
        );
    }
}
