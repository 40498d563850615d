use crate::geometry::{Rect, Vec2};
use crate::model::Node;
use crate::settings::GraphSettings;
use std::collections::HashMap;

pub trait Layouter {
    /// Positions for every node, in input order.
    fn execute(&self, nodes: &[Node]) -> Vec<Vec2>;
}

/// Square-ish grid: `ceil(sqrt(n))` columns, row-major.
#[derive(Debug, Clone, Copy)]
pub struct GridLayouter {
    pub cell_width: f32,
    pub cell_height: f32,
    pub horizontal_spacing: f32,
    pub vertical_spacing: f32,
}

impl GridLayouter {
    pub fn from_settings(settings: &GraphSettings) -> Self {
        Self {
            cell_width: settings.node_width,
            cell_height: settings.layout_node_height,
            horizontal_spacing: settings.horizontal_spacing,
            vertical_spacing: settings.vertical_spacing,
        }
    }

    pub fn columns(node_count: usize) -> usize {
        ((node_count as f64).sqrt().ceil() as usize).max(1)
    }

    pub fn position_for(&self, index: usize, columns: usize) -> Vec2 {
        let col = index % columns;
        let row = index / columns;
        Vec2::new(
            col as f32 * (self.cell_width + self.horizontal_spacing),
            row as f32 * (self.cell_height + self.vertical_spacing),
        )
    }
}

impl Default for GridLayouter {
    fn default() -> Self {
        Self::from_settings(&GraphSettings::default())
    }
}

impl Layouter for GridLayouter {
    fn execute(&self, nodes: &[Node]) -> Vec<Vec2> {
        let columns = Self::columns(nodes.len());
        (0..nodes.len())
            .map(|i| self.position_for(i, columns))
            .collect()
    }
}

/// Run a layouter over the whole node set. Manual positions are discarded.
pub fn apply_layout<L: Layouter>(layouter: &L, nodes: &mut [Node]) {
    let positions = layouter.execute(nodes);
    for (node, pos) in nodes.iter_mut().zip(positions) {
        node.position = pos;
    }
}

/// Lay out `nodes`, then restore any position recorded in `previous` by id.
pub fn apply_layout_preserving<L: Layouter>(
    layouter: &L,
    nodes: &mut [Node],
    previous: &HashMap<String, Vec2>,
) -> usize {
    apply_layout(layouter, nodes);
    let mut kept = 0;
    for node in nodes.iter_mut() {
        if let Some(&pos) = previous.get(&node.id) {
            node.position = pos;
            kept += 1;
        }
    }
    kept
}

pub fn bounding_box<'a, I: IntoIterator<Item = &'a Node>>(nodes: I) -> Option<Rect> {
    Rect::bounding(nodes.into_iter().map(Node::rect))
}

/// Pan that centers `bounds` in a canvas of `canvas_size` at zoom 1.
pub fn centering_pan(bounds: Rect, canvas_size: Vec2) -> Vec2 {
    canvas_size * 0.5 - bounds.center()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::NodeMetrics;
    use schemaviz_core::Table;
    use std::sync::Arc;

    fn nodes(count: usize) -> Vec<Node> {
        let metrics = NodeMetrics::default();
        (0..count)
            .map(|i| Node::new(Arc::new(Table::new(format!("t{i}"))), &metrics))
            .collect()
    }

    #[test]
    fn test_grid_columns() {
        assert_eq!(GridLayouter::columns(0), 1);
        assert_eq!(GridLayouter::columns(1), 1);
        assert_eq!(GridLayouter::columns(4), 2);
        assert_eq!(GridLayouter::columns(5), 3);
        assert_eq!(GridLayouter::columns(10), 4);
    }

    #[test]
    fn test_grid_placement_row_major() {
        let layouter = GridLayouter::default();
        let mut ns = nodes(5);
        apply_layout(&layouter, &mut ns);

        // 3 columns, step 350 x 280
        assert_eq!(ns[0].position, Vec2::new(0.0, 0.0));
        assert_eq!(ns[2].position, Vec2::new(700.0, 0.0));
        assert_eq!(ns[3].position, Vec2::new(0.0, 280.0));
        assert_eq!(ns[4].position, Vec2::new(350.0, 280.0));
    }

    #[test]
    fn test_layout_preserving_keeps_known_ids() {
        let layouter = GridLayouter::default();
        let mut ns = nodes(3);
        let mut previous = HashMap::new();
        previous.insert("t1".to_string(), Vec2::new(-40.0, 12.0));

        let kept = apply_layout_preserving(&layouter, &mut ns, &previous);
        assert_eq!(kept, 1);
        assert_eq!(ns[1].position, Vec2::new(-40.0, 12.0));
        assert_eq!(ns[0].position, Vec2::ZERO);
    }

    #[test]
    fn test_centering_pan() {
        let bounds = Rect::from_pos_size(Vec2::new(0.0, 0.0), Vec2::new(600.0, 140.0));
        let pan = centering_pan(bounds, Vec2::new(1200.0, 800.0));
        assert_eq!(pan, Vec2::new(300.0, 330.0));
    }

    #[test]
    fn test_bounding_box_empty() {
        assert!(bounding_box(&Vec::<Node>::new()).is_none());
    }
}
