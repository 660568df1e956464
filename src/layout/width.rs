use crate::config::LayoutConfig;

use super::tree::Tree;

/// Horizontal extent of every subtree, indexed like the tree arena.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtreeWidths(Vec<f32>);

impl SubtreeWidths {
    /// Bottom-up: reverse pre-order visits every child before its parent.
    pub fn compute(tree: &Tree, config: &LayoutConfig) -> Self {
        let mut widths = vec![config.node_width; tree.len()];
        for idx in tree.pre_order().into_iter().rev() {
            let children = tree.children(idx);
            if !children.is_empty() {
                let child_widths = children.iter().map(|&child| widths[child]);
                widths[idx] = span_of(child_widths, config.sibling_gap);
            }
        }
        Self(widths)
    }

    pub fn get(&self, idx: usize) -> f32 {
        self.0[idx]
    }

    /// Total span of `idx`'s children laid side by side, gaps included.
    pub fn children_width(&self, tree: &Tree, idx: usize, sibling_gap: f32) -> f32 {
        span_of(tree.children(idx).iter().map(|&child| self.0[child]), sibling_gap)
    }
}

fn span_of(widths: impl Iterator<Item = f32>, gap: f32) -> f32 {
    let (sum, count) = widths.fold((0.0f32, 0usize), |(sum, count), width| {
        (sum + width, count + 1)
    });
    if count == 0 {
        return 0.0;
    }
    sum + (count - 1) as f32 * gap
}
