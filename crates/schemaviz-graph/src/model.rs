use crate::geometry::{Rect, Vec2};
use crate::settings::NodeMetrics;
use schemaviz_core::{Field, Table};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// On-screen card for one table.
#[derive(Debug, Clone)]
pub struct Node {
    /// Table name, unique within a snapshot.
    pub id: String,
    pub position: Vec2,
    /// Height follows the field count and is refreshed before every frame.
    pub size: Vec2,
    pub table: Arc<Table>,
    pub visible: bool,
}

impl Node {
    pub fn new(table: Arc<Table>, metrics: &NodeMetrics) -> Self {
        let mut node = Self {
            id: table.name.clone(),
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            table,
            visible: true,
        };
        node.refresh_size(metrics);
        node
    }

    pub fn refresh_size(&mut self, metrics: &NodeMetrics) {
        self.size = Vec2::new(metrics.width, metrics.height_for(self.table.fields.len()));
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }

    pub fn fields(&self) -> &[Field] {
        &self.table.fields
    }

    /// World-space rectangle of the `index`-th field row.
    pub fn field_row_rect(&self, index: usize, metrics: &NodeMetrics) -> Rect {
        let top = self.position.y + metrics.header_height + index as f32 * metrics.field_row_height;
        Rect::from_pos_size(
            Vec2::new(self.position.x, top),
            Vec2::new(self.size.x, metrics.field_row_height),
        )
    }
}

/// Foreign-key-like relationship between two tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub from_field: String,
    pub to_field: String,
    /// `true` when derived from field naming rather than an explicit `Id<"T">` type.
    pub inferred: bool,
}

impl Edge {
    pub fn typed(from: &str, to: &str, from_field: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            from_field: from_field.to_string(),
            to_field: "_id".to_string(),
            inferred: false,
        }
    }

    pub fn inferred(from: &str, to: &str, from_field: &str) -> Self {
        Self {
            inferred: true,
            ..Self::typed(from, to, from_field)
        }
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.from == node_id || self.to == node_id
    }
}

/// Position-only view of a node, used by history and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
    pub id: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibleNode {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// What an exporter gets: visible nodes plus the edges between them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibleGraph {
    pub nodes: Vec<VisibleNode>,
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub table_count: usize,
    pub relationship_count: usize,
    pub typed_relationships: usize,
    pub inferred_relationships: usize,
    pub visible_tables: usize,
    pub visible_relationships: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_size_follows_fields() {
        let metrics = NodeMetrics::default();
        let table = Table::new("users").with_fields(vec![
            Field::new("_id", "Id<\"users\">"),
            Field::new("name", "string"),
        ]);
        let mut node = Node::new(Arc::new(table), &metrics);
        assert_eq!(node.size, Vec2::new(250.0, metrics.height_for(2)));

        let grown = Table::new("users").with_fields(vec![Field::new("a", "string"); 5]);
        node.table = Arc::new(grown);
        node.refresh_size(&metrics);
        assert_eq!(node.size.y, metrics.height_for(5));
    }

    #[test]
    fn test_field_row_rect() {
        let metrics = NodeMetrics::default();
        let table = Table::new("t").with_fields(vec![Field::new("a", "string"); 3]);
        let mut node = Node::new(Arc::new(table), &metrics);
        node.position = Vec2::new(100.0, 50.0);
        let row = node.field_row_rect(1, &metrics);
        assert_eq!(row.min, Vec2::new(100.0, 50.0 + 36.0 + 24.0));
        assert_eq!(row.height(), 24.0);
    }
}
